//! # PUE Model
//!
//! Power Usage Effectiveness for each cooling system, derived from its
//! efficiency factors.
//!
//! ```text
//! PUE = clamp_pue( 1 / Π efficiency factors )
//!
//!   air:       hvac_efficiency × power_distribution_efficiency
//!   immersion: pumping_efficiency × heat_exchanger_efficiency
//!              × power_distribution_efficiency
//!
//! facility power (kW) = IT power (kW) × PUE
//! ```

use crate::guards::clamp_pue;
use crate::types::{AirCoolingConfig, ImmersionCoolingConfig};

/// Converts an efficiency product into a PUE, floored at 1.0.
///
/// A zero or negative product cannot come out of validation, but it still
/// maps to the floor rather than to infinity.
pub fn pue_from_efficiency(efficiency_product: f64) -> f64 {
    if efficiency_product > 0.0 {
        clamp_pue(1.0 / efficiency_product)
    } else {
        clamp_pue(f64::NAN)
    }
}

pub fn air_efficiency_product(air: &AirCoolingConfig) -> f64 {
    air.hvac_efficiency * air.power_distribution_efficiency
}

pub fn immersion_efficiency_product(immersion: &ImmersionCoolingConfig) -> f64 {
    immersion.pumping_efficiency
        * immersion.heat_exchanger_efficiency
        * immersion.power_distribution_efficiency
}

/// PUE of the air-cooled deployment.
pub fn air_pue(air: &AirCoolingConfig) -> f64 {
    pue_from_efficiency(air_efficiency_product(air))
}

/// PUE of the immersion deployment.
pub fn immersion_pue(immersion: &ImmersionCoolingConfig) -> f64 {
    pue_from_efficiency(immersion_efficiency_product(immersion))
}

/// Total facility draw for an IT load at a given PUE.
#[inline]
pub fn facility_power_kw(it_power_kw: f64, pue: f64) -> f64 {
    it_power_kw * pue
}

// =============================================================================
// Unit Tests
// =============================================================================
