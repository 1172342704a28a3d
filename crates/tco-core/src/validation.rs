//! # Validation Module
//!
//! Structural and business-rule validation of a [`CalculationConfiguration`].
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Required sub-objects present                                      │
//! │  ├── input_method variant has all of its fields                        │
//! │  └── Unknown region / currency → US / USD (never an error)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Every number finite (NaN / ±∞ rejected)                           │
//! │  ├── Ranges (rack count, kW, years, rates)                             │
//! │  ├── Efficiency ratios in (0, 1]                                       │
//! │  ├── manual_config has at least one tank line                          │
//! │  └── Warning (not error): immersion PUE above air PUE                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Engine: runs only on a configuration with zero errors                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All errors are collected, not just the first one, and validating the
//! same input twice gives the same report.
//!
//! ## Usage
//! ```rust
//! use tco_core::validation::{validate_ratio, validate_range};
//!
//! assert!(validate_range("financial.discount_rate", 0.08, 0.01, 0.30).is_ok());
//! assert!(validate_ratio("air_cooling.hvac_efficiency", 1.2).is_err());
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::pue::{air_pue, immersion_pue};
use crate::types::{
    AirCoolingInput, CalculationConfiguration, FinancialConfig, ImmersionCoolingInput,
};
use crate::MAX_ANALYSIS_YEARS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Limits
// =============================================================================

pub const DISCOUNT_RATE_RANGE: (f64, f64) = (0.01, 0.30);
pub const ENERGY_COST_RANGE: (f64, f64) = (0.01, 1.00);
pub const ESCALATION_RANGE: (f64, f64) = (0.0, 0.25);

/// Numeric limits for deployment size. Financial ranges are fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationLimits {
    pub max_rack_count: u32,
    pub min_power_per_rack_kw: f64,
    pub max_power_per_rack_kw: f64,
    /// Bounds for `total_power_kw` and `target_power_kw`.
    pub min_power_kw: f64,
    pub max_power_kw: f64,
    pub max_tank_quantity: u32,
    pub min_power_density_kw_per_u: f64,
    pub max_power_density_kw_per_u: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        ValidationLimits {
            max_rack_count: 1_000,
            min_power_per_rack_kw: 0.1,
            max_power_per_rack_kw: 100.0,
            min_power_kw: 0.1,
            max_power_kw: 100_000.0,
            max_tank_quantity: 500,
            min_power_density_kw_per_u: 0.1,
            max_power_density_kw_per_u: 10.0,
        }
    }
}

impl ValidationLimits {
    /// Widened ceilings for capacity-planning studies.
    pub fn hyperscale() -> Self {
        ValidationLimits {
            max_rack_count: 10_000,
            max_power_kw: 1e9,
            max_tank_quantity: 100_000,
            ..Self::default()
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// Outcome of validating one configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_parts(errors: Vec<ValidationError>, warnings: Vec<String>) -> Self {
        ValidationReport {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Error messages, one per failed check.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Returns the warnings when valid, or every error as a [`CoreError`].
    pub fn into_result(self) -> CoreResult<Vec<String>> {
        if self.valid {
            Ok(self.warnings)
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Rejects NaN and ±∞.
pub fn validate_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Requires `min <= value <= max` on a finite value.
pub fn validate_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    validate_finite(field, value)?;

    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
            value,
        });
    }

    Ok(())
}

/// Requires an efficiency ratio in (0, 1].
pub fn validate_ratio(field: &str, value: f64) -> ValidationResult<()> {
    validate_finite(field, value)?;

    if value <= 0.0 || value > 1.0 {
        return Err(ValidationError::InvalidRatio {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

/// Requires `1 <= count <= max`.
pub fn validate_count(field: &str, count: u32, max: u32) -> ValidationResult<()> {
    if count == 0 || count > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1.0,
            max: max as f64,
            value: count as f64,
        });
    }
    Ok(())
}

// =============================================================================
// Configuration Validator
// =============================================================================

/// Validates a typed configuration.
///
/// ## Example
/// ```rust,no_run
/// use tco_core::validation::{validate_configuration, ValidationLimits};
/// # let config: tco_core::CalculationConfiguration = unimplemented!();
///
/// let report = validate_configuration(&config, &ValidationLimits::default());
/// if !report.valid {
///     for message in report.error_messages() {
///         eprintln!("{message}");
///     }
/// }
/// ```
pub fn validate_configuration(
    config: &CalculationConfiguration,
    limits: &ValidationLimits,
) -> ValidationReport {
    let mut errors = Vec::new();
    let mut push = |result: ValidationResult<()>| {
        if let Err(err) = result {
            errors.push(err);
        }
    };

    // Air cooling
    let air = &config.air_cooling;
    match &air.input {
        AirCoolingInput::RackCount {
            rack_count,
            power_per_rack_kw,
        } => {
            push(validate_count(
                "air_cooling.rack_count",
                *rack_count,
                limits.max_rack_count,
            ));
            push(validate_range(
                "air_cooling.power_per_rack_kw",
                *power_per_rack_kw,
                limits.min_power_per_rack_kw,
                limits.max_power_per_rack_kw,
            ));
        }
        AirCoolingInput::TotalPower { total_power_kw } => {
            push(validate_range(
                "air_cooling.total_power_kw",
                *total_power_kw,
                limits.min_power_kw,
                limits.max_power_kw,
            ));
        }
    }
    push(validate_ratio("air_cooling.hvac_efficiency", air.hvac_efficiency));
    push(validate_ratio(
        "air_cooling.power_distribution_efficiency",
        air.power_distribution_efficiency,
    ));

    // Immersion cooling
    let immersion = &config.immersion_cooling;
    match &immersion.input {
        ImmersionCoolingInput::AutoOptimize { target_power_kw } => {
            push(validate_range(
                "immersion_cooling.target_power_kw",
                *target_power_kw,
                limits.min_power_kw,
                limits.max_power_kw,
            ));
        }
        ImmersionCoolingInput::ManualConfig { tanks } => {
            if tanks.is_empty() {
                push(Err(ValidationError::Empty {
                    field: "immersion_cooling.tanks".to_string(),
                }));
            }
            for (i, tank) in tanks.iter().enumerate() {
                push(validate_count(
                    &format!("immersion_cooling.tanks[{}].quantity", i),
                    tank.quantity,
                    limits.max_tank_quantity,
                ));
                push(validate_range(
                    &format!("immersion_cooling.tanks[{}].power_density_kw_per_u", i),
                    tank.power_density_kw_per_u,
                    limits.min_power_density_kw_per_u,
                    limits.max_power_density_kw_per_u,
                ));
            }
        }
    }
    push(validate_ratio(
        "immersion_cooling.pumping_efficiency",
        immersion.pumping_efficiency,
    ));
    push(validate_ratio(
        "immersion_cooling.heat_exchanger_efficiency",
        immersion.heat_exchanger_efficiency,
    ));
    push(validate_ratio(
        "immersion_cooling.power_distribution_efficiency",
        immersion.power_distribution_efficiency,
    ));

    // Financial
    for result in validate_financial(&config.financial) {
        push(result);
    }

    let mut warnings = Vec::new();
    if errors.is_empty() {
        let air = air_pue(&config.air_cooling);
        let immersion = immersion_pue(&config.immersion_cooling);
        if immersion > air {
            warnings.push(format!(
                "immersion cooling PUE ({:.3}) is higher than air cooling PUE ({:.3}); \
                 no efficiency benefit will be reported",
                immersion, air
            ));
        }
    }

    ValidationReport::from_parts(errors, warnings)
}

fn validate_financial(financial: &FinancialConfig) -> Vec<ValidationResult<()>> {
    let mut results = vec![
        validate_count(
            "financial.analysis_years",
            financial.analysis_years,
            MAX_ANALYSIS_YEARS,
        ),
        validate_range(
            "financial.discount_rate",
            financial.discount_rate,
            DISCOUNT_RATE_RANGE.0,
            DISCOUNT_RATE_RANGE.1,
        ),
        validate_range(
            "financial.energy_escalation_rate",
            financial.energy_escalation_rate,
            ESCALATION_RANGE.0,
            ESCALATION_RANGE.1,
        ),
        validate_range(
            "financial.maintenance_escalation_rate",
            financial.maintenance_escalation_rate,
            ESCALATION_RANGE.0,
            ESCALATION_RANGE.1,
        ),
        validate_range(
            "financial.labor_escalation_rate",
            financial.labor_escalation_rate,
            ESCALATION_RANGE.0,
            ESCALATION_RANGE.1,
        ),
    ];
    if let Some(cost) = financial.energy_cost_kwh {
        results.push(validate_range(
            "financial.energy_cost_kwh",
            cost,
            ENERGY_COST_RANGE.0,
            ENERGY_COST_RANGE.1,
        ));
    }
    results
}

// =============================================================================
// JSON Entry Points
// =============================================================================

/// Deserializes a JSON configuration, turning shape errors into a
/// [`ValidationError::Structure`].
///
/// Each section is parsed on its own so the error carries a path such as
/// `air_cooling.power_per_rack_kw` rather than the bare leaf name.
pub fn parse_configuration(value: Value) -> ValidationResult<CalculationConfiguration> {
    let kind = json_kind(&value);
    let Value::Object(mut document) = value else {
        return Err(ValidationError::Structure {
            field: "configuration".to_string(),
            reason: format!("expected a JSON object, found {}", kind),
        });
    };

    Ok(CalculationConfiguration {
        air_cooling: parse_section(&mut document, "air_cooling")?,
        immersion_cooling: parse_section(&mut document, "immersion_cooling")?,
        financial: parse_section(&mut document, "financial")?,
    })
}

fn parse_section<T: DeserializeOwned>(
    document: &mut Map<String, Value>,
    section: &str,
) -> ValidationResult<T> {
    let value = document
        .remove(section)
        .ok_or_else(|| ValidationError::Structure {
            field: section.to_string(),
            reason: format!("missing field `{}`", section),
        })?;

    serde_json::from_value(value).map_err(|err| {
        let reason = err.to_string();
        let field = match missing_field_name(&reason) {
            Some(name) => format!("{}.{}", section, name),
            None => section.to_string(),
        };
        ValidationError::Structure { field, reason }
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validates an untyped JSON document: structure first, then ranges.
pub fn validate_json(value: Value, limits: &ValidationLimits) -> ValidationReport {
    match parse_configuration(value) {
        Ok(config) => validate_configuration(&config, limits),
        Err(err) => ValidationReport::from_parts(vec![err], Vec::new()),
    }
}

/// Pulls `x` out of serde's "missing field `x`" message.
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

// =============================================================================
// Unit Tests
// =============================================================================
