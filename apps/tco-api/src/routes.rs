//! # HTTP Routes
//!
//! ```text
//! POST /calculations/validate   {configuration, locale?}
//!      200 {valid: true, warnings}      400 VALIDATION_ERROR
//!
//! POST /calculations/calculate  {configuration, locale?, save_session?}
//!      200 {results, meta}              400 VALIDATION_ERROR
//!                                       422 CONFIGURATION_ERROR
//! GET  /health                  "OK"
//! ```
//!
//! The configuration is taken as raw JSON so shape errors come back as
//! field-level validation errors instead of an extractor rejection.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tco_core::validation::parse_configuration;
use tco_core::{CalculationResults, Calculator};

use crate::error::ApiError;

/// Locale echoed back when the request has none.
pub const DEFAULT_LOCALE: &str = "en";

/// Shared application state.
pub struct AppState {
    pub calculator: Calculator,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/calculations/validate", post(validate_handler))
        .route("/calculations/calculate", post(calculate_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub configuration: serde_json::Value,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub configuration: serde_json::Value,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub save_session: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub results: CalculationResults,
    pub meta: ResponseMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub processing_time_ms: f64,
    pub locale: String,
    /// Always false; sessions are not persisted by this service.
    pub session_saved: bool,
}

// =============================================================================
// Handlers
// =============================================================================

pub async fn health_handler() -> impl IntoResponse {
    "OK"
}

pub async fn validate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let config = parse_configuration(request.configuration)?;
    let report = state.calculator.validate(&config);

    if !report.valid {
        warn!(errors = report.errors.len(), "Configuration rejected");
        return Err(ApiError::validation(&report.errors));
    }

    Ok(Json(ValidateResponse {
        valid: true,
        warnings: report.warnings,
    }))
}

pub async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let started = Instant::now();
    let config = parse_configuration(request.configuration)?;

    let results = tokio::task::spawn_blocking(move || state.calculator.calculate(&config))
        .await
        .map_err(|e| ApiError::internal(format!("Calculation task failed: {}", e)))?
        .map_err(|e| {
            warn!(error = %e, "Calculation failed");
            ApiError::from(e)
        })?;

    if request.save_session {
        info!(
            calculation_id = %results.calculation_id,
            "Session persistence requested but not available"
        );
    }

    let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    info!(
        calculation_id = %results.calculation_id,
        processing_time_ms,
        "Calculation served"
    );

    Ok(Json(CalculateResponse {
        results,
        meta: ResponseMeta {
            processing_time_ms,
            locale: request
                .locale
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            session_saved: false,
        },
    }))
}
