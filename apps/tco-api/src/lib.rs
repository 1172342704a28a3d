//! # tco-api
//!
//! HTTP boundary for the immersion vs. air cooling TCO engine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           tco-api                                       │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  config        │  │  routes        │  │  error                     ││
//! │  │                │  │                │  │                            ││
//! │  │ • TOML file    │  │ • validate     │  │ • ApiError {code, message, ││
//! │  │ • TCO_* env    │  │ • calculate    │  │   errors}                  ││
//! │  │ • catalog load │  │ • health       │  │ • 400 / 422 / 500          ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                              │                                          │
//! │                              ▼                                          │
//! │                    tco_core::Calculator (Arc)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `TCO_API_CONFIG` - Path of the TOML config file (default: tco-api.toml)
//! - `TCO_API_PORT` - Listen port (default: 8080)
//! - `TCO_API_BIND_ADDR` - Listen address (default: 0.0.0.0)
//! - `TCO_CATALOG_PATH` - Replacement equipment catalog (TOML)
//! - `TCO_HYPERSCALE_LIMITS` - Accept hyperscale deployments (true/false)
//! - `RUST_LOG` - Log filter (default: info)

pub mod config;
pub mod error;
pub mod routes;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use routes::{router, AppState};
