//! # tco-core: Cooling Total Cost of Ownership Engine
//!
//! This crate compares an air-cooled data-center deployment with an
//! immersion-cooled one and produces CAPEX, multi-year OPEX, NPV/TCO, PUE
//! and environmental figures. It is a pure function of its input.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Immersion TCO Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web UI / API clients                         │   │
//! │  │     Configuration form ──► Results dashboard ──► Reports       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tco-api (axum)                               │   │
//! │  │    POST /calculations/validate, POST /calculations/calculate   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tco-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │  validation ─► capex ─┐                                         │   │
//! │  │              ─► opex ─┴─► tco ─► environmental ─► results       │   │
//! │  │                                                                 │   │
//! │  │  region (static tables)   equipment (catalog + tank planner)   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CACHING • NO LIVE RATES • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Configuration input (tagged input methods)
//! - [`validation`] - Structural and range checks, warnings
//! - [`region`] - Regional factors and currency rates
//! - [`equipment`] - Pricing catalog and auto-optimize tank planner
//! - [`capex`], [`opex`], [`tco`] - The cost model
//! - [`pue`], [`environmental`] - Efficiency and ESG metrics
//! - [`results`] - Output types, the only place money is rounded
//! - [`engine`] - `Calculator`, which wires it all together
//! - [`guards`] - Named clamps (PUE floor, non-negative savings)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same configuration, same figures (ids and timestamps aside)
//! 2. **No I/O**: the catalog is passed in, never loaded here
//! 3. **Round Once**: `f64` inside, whole-unit `Money` at the output boundary
//! 4. **Clamp, Don't Throw**: numeric edge cases are bounded by [`guards`]
//!
//! ## Example Usage
//!
//! ```rust
//! use tco_core::{calculate, CalculationConfiguration};
//!
//! let config: CalculationConfiguration = serde_json::from_str(r#"{
//!     "air_cooling": {
//!         "input_method": "rack_count",
//!         "rack_count": 77,
//!         "power_per_rack_kw": 15.5,
//!         "hvac_efficiency": 0.83,
//!         "power_distribution_efficiency": 0.94
//!     },
//!     "immersion_cooling": {
//!         "input_method": "auto_optimize",
//!         "target_power_kw": 1193.5
//!     },
//!     "financial": { "analysis_years": 5, "region": "US", "energy_cost_kwh": 0.12 }
//! }"#).unwrap();
//!
//! let results = calculate(&config).unwrap();
//! assert!(results.pue_analysis.improvement_percent > 35.0);
//! assert_eq!(results.charts.tco_progression.len(), 5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod capex;
pub mod engine;
pub mod environmental;
pub mod equipment;
pub mod error;
pub mod guards;
pub mod money;
pub mod opex;
pub mod pue;
pub mod region;
pub mod results;
pub mod tco;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{calculate, configuration_hash, Calculator};
pub use environmental::{EnvironmentalImpact, PueAnalysis};
pub use equipment::{EquipmentCatalog, TankPlan};
pub use error::{ConfigurationError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use region::{Currency, Region};
pub use results::CalculationResults;
pub use types::*;
pub use validation::{validate_configuration, validate_json, ValidationLimits, ValidationReport};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Version stamped on every result. Bump when a formula or table changes.
pub const CALCULATION_VERSION: &str = "1.0.0";

/// Hours in a (non-leap) year of continuous operation.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Longest supported projection.
pub const MAX_ANALYSIS_YEARS: u32 = 10;
