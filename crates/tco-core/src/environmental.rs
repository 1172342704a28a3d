//! # PUE & Environmental Analyzer
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  improvement %   = (PUE_air − PUE_imm) / (PUE_air − 1) × 100            │
//! │                    share of the air system's overhead removed,          │
//! │                    clamped to [0, 99.99], 0 when PUE_air = 1            │
//! │                                                                         │
//! │  energy savings  = max(0, (facility_air − facility_imm) × 8760) kWh     │
//! │  carbon savings  = energy savings × regional kg CO₂/kWh                 │
//! │  water savings   = energy savings × regional gal/kWh                    │
//! │  footprint cut % = improvement % / PUE_air × 100                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The energy savings figure is computed once and copied into both the PUE
//! analysis and the environmental impact, so the two are always equal.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::guards::{clamp_non_negative, clamp_percent, finite_or_zero};
use crate::pue::facility_power_kw;
use crate::region::{Region, ResolvedRegion};
use crate::HOURS_PER_YEAR;

/// Upper bound on the reported improvement. 100% would mean zero overhead.
pub const MAX_IMPROVEMENT_PERCENT: f64 = 99.99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PueAnalysis {
    pub air_cooling_pue: f64,
    pub immersion_cooling_pue: f64,
    pub improvement_percent: f64,
    pub energy_savings_kwh_annual: f64,
    pub air_facility_power_kw: f64,
    pub immersion_facility_power_kw: f64,
    /// Set when immersion PUE is above air PUE. The improvement is then 0.
    pub immersion_worse: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EnvironmentalImpact {
    pub energy_savings_kwh_annual: f64,
    pub carbon_savings_kg_co2_annual: f64,
    pub water_savings_gallons_annual: f64,
    pub carbon_footprint_reduction_percent: f64,
    /// Annual carbon savings over the whole horizon.
    pub carbon_savings_kg_co2_total: f64,
    pub region: Region,
    pub carbon_factor_kg_per_kwh: f64,
    pub water_factor_gal_per_kwh: f64,
}

/// Share of the air system's non-IT overhead that immersion removes.
pub fn improvement_percent(air_pue: f64, immersion_pue: f64) -> f64 {
    let overhead = air_pue - 1.0;
    if overhead <= 0.0 {
        return 0.0;
    }
    clamp_percent(
        (air_pue - immersion_pue) / overhead * 100.0,
        MAX_IMPROVEMENT_PERCENT,
    )
}

/// Annual kWh saved, floored at zero.
pub fn annual_energy_savings_kwh(air_facility_kw: f64, immersion_facility_kw: f64) -> f64 {
    clamp_non_negative(finite_or_zero(
        (air_facility_kw - immersion_facility_kw) * HOURS_PER_YEAR,
    ))
}

pub fn analyze_pue(
    air_pue: f64,
    immersion_pue: f64,
    air_it_kw: f64,
    immersion_it_kw: f64,
) -> PueAnalysis {
    let air_facility_power_kw = facility_power_kw(air_it_kw, air_pue);
    let immersion_facility_power_kw = facility_power_kw(immersion_it_kw, immersion_pue);

    PueAnalysis {
        air_cooling_pue: air_pue,
        immersion_cooling_pue: immersion_pue,
        improvement_percent: improvement_percent(air_pue, immersion_pue),
        energy_savings_kwh_annual: annual_energy_savings_kwh(
            air_facility_power_kw,
            immersion_facility_power_kw,
        ),
        air_facility_power_kw,
        immersion_facility_power_kw,
        immersion_worse: immersion_pue > air_pue,
    }
}

/// `improvement_percent / PUE_air × 100`, derived from the improvement and
/// never computed independently.
pub fn carbon_footprint_reduction_percent(improvement_percent: f64, air_pue: f64) -> f64 {
    clamp_non_negative(finite_or_zero(improvement_percent / air_pue * 100.0))
}

pub fn analyze_environment(
    pue: &PueAnalysis,
    regional: &ResolvedRegion,
    analysis_years: u32,
) -> EnvironmentalImpact {
    let energy = pue.energy_savings_kwh_annual;
    let carbon = energy * regional.carbon_factor_kg_per_kwh;

    EnvironmentalImpact {
        energy_savings_kwh_annual: energy,
        carbon_savings_kg_co2_annual: carbon,
        water_savings_gallons_annual: energy * regional.water_factor_gal_per_kwh,
        carbon_footprint_reduction_percent: carbon_footprint_reduction_percent(
            pue.improvement_percent,
            pue.air_cooling_pue,
        ),
        carbon_savings_kg_co2_total: carbon * analysis_years as f64,
        region: regional.region,
        carbon_factor_kg_per_kwh: regional.carbon_factor_kg_per_kwh,
        water_factor_gal_per_kwh: regional.water_factor_gal_per_kwh,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
