//! # Error Types
//!
//! Domain-specific error types for tco-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tco-core errors (this file)                                           │
//! │  ├── CoreError           - What `calculate` returns                    │
//! │  ├── ValidationError     - Structural or range violation (one field)   │
//! │  └── ConfigurationError  - Valid input that cannot be satisfied        │
//! │                                                                         │
//! │  tco-api errors (separate crate)                                       │
//! │  └── ApiError            - What HTTP clients see (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError ─┐                                              │
//! │                         ├─► CoreError ──► ApiError ──► HTTP 400 / 422  │
//! │  ConfigurationError ────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numerical edge cases (PUE below 1.0, negative savings, zero annual
//! savings) are NOT errors. They are clamped by [`crate::guards`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the calculation engine.
///
/// A calculation either fails before any arithmetic runs (validation) or
/// while sizing equipment (configuration). There are no partial results.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more fields failed validation.
    ///
    /// ## When This Occurs
    /// - A number is NaN or infinite
    /// - A value is outside its documented range
    /// - `manual_config` was chosen with an empty tank list
    #[error("Invalid configuration: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// The configuration is valid but cannot be satisfied.
    #[error("Configuration cannot be satisfied: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl CoreError {
    /// Returns the validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            CoreError::Validation(errors) => errors,
            CoreError::Configuration(_) => &[],
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::Validation(vec![err])
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant carries the dotted field path (for example
/// `air_cooling.power_per_rack_kw`) so the API layer can report field-level
/// errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The JSON document does not have the configuration shape.
    #[error("{field}: {reason}")]
    Structure { field: String, reason: String },

    /// A number is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    /// An efficiency ratio is outside (0, 1].
    #[error("{field} must be greater than 0 and at most 1 (got {value})")]
    InvalidRatio { field: String, value: f64 },

    /// A list that must have entries is empty.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },
}

impl ValidationError {
    /// Returns the dotted path of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Structure { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidRatio { field, .. }
            | ValidationError::Empty { field } => field,
        }
    }
}

// =============================================================================
// Configuration Error
// =============================================================================

/// A semantically valid configuration that the engine cannot satisfy.
///
/// Messages end with a remediation hint because the caller usually has to
/// change the input to get a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// No tank combination reaches the requested power.
    #[error(
        "no tank combination reaches {target_kw} kW (maximum {max_kw} kW); \
         split the deployment or use manual_config with higher power density"
    )]
    TargetUnreachable { target_kw: f64, max_kw: f64 },

    /// The equipment catalog has no row for a rack, HVAC, tank or coolant type.
    #[error("equipment catalog has no pricing for {item}; add it to the catalog")]
    MissingPricing { item: String },

    /// The equipment catalog has no tank sizes at all.
    #[error("equipment catalog lists no tank sizes; supply at least one tank row")]
    EmptyTankCatalog,

    /// A catalog price, rate or density is unusable (NaN, negative, zero
    /// where a divisor is needed).
    #[error("equipment catalog entry {entry} is {value}, expected {expected}; correct the catalog")]
    InvalidCatalogValue {
        entry: String,
        value: f64,
        expected: &'static str,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
