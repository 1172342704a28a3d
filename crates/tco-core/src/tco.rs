//! # TCO / NPV Aggregator
//!
//! ```text
//! TCO(system) = CAPEX + Σ_{y=1..N} OPEX_y / (1 + r)^y
//!
//! total_savings       = max(0, TCO_air − TCO_immersion)
//! capex_difference    = max(0, CAPEX_immersion − CAPEX_air)
//! annual_opex_savings = mean of yearly (undiscounted) savings
//! payback_months      = | capex_difference / (annual_opex_savings / 12) |
//! roi_percent         = total_savings / CAPEX_immersion × 100
//! ```
//!
//! Savings, ROI and the CAPEX difference are floored at zero. When the
//! immersion system costs more over the horizon, `immersion_costs_more` is
//! set instead of reporting a negative saving.
//!
//! Payback has no value when the annual savings are (near) zero; it is
//! `None` rather than infinity.

use crate::guards::{clamp_non_negative, finite_or_zero};
use crate::opex::OpexYear;

/// Below this, annual savings count as zero for payback.
pub const SAVINGS_EPSILON: f64 = 1e-9;

/// Cumulative position at the end of one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TcoYear {
    pub year: u32,
    pub air_cumulative: f64,
    pub immersion_cumulative: f64,
    /// Floored at zero.
    pub cumulative_savings: f64,
    /// That year's savings discounted to present value, floored at zero.
    pub npv_savings: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TcoSummary {
    pub tco_air: f64,
    pub tco_immersion: f64,
    pub total_savings: f64,
    pub capex_difference: f64,
    pub annual_opex_savings: f64,
    pub payback_months: Option<f64>,
    pub roi_percent: f64,
    /// `TCO_air − TCO_immersion` before flooring.
    pub net_savings: f64,
    pub years: Vec<TcoYear>,
}

impl TcoSummary {
    pub fn immersion_costs_more(&self) -> bool {
        self.net_savings < 0.0
    }
}

/// `1 / (1 + rate)^year`.
#[inline]
pub fn discount_factor(rate: f64, year: u32) -> f64 {
    1.0 / (1.0 + rate).powi(year as i32)
}

pub fn payback_months(capex_difference: f64, annual_opex_savings: f64) -> Option<f64> {
    if annual_opex_savings.abs() < SAVINGS_EPSILON {
        return None;
    }
    let months = (capex_difference / (annual_opex_savings / 12.0)).abs();
    months.is_finite().then_some(months)
}

/// Zero when there is no immersion investment to relate to. Never negative.
pub fn roi_percent(total_savings: f64, capex_immersion: f64) -> f64 {
    if capex_immersion <= 0.0 {
        return 0.0;
    }
    clamp_non_negative(finite_or_zero(total_savings / capex_immersion * 100.0))
}

pub fn aggregate(
    capex_air: f64,
    capex_immersion: f64,
    opex: &[OpexYear],
    discount_rate: f64,
) -> TcoSummary {
    let mut air_cumulative = capex_air;
    let mut immersion_cumulative = capex_immersion;
    let mut years = Vec::with_capacity(opex.len());

    for year in opex {
        let factor = discount_factor(discount_rate, year.year);
        air_cumulative += year.air.total() * factor;
        immersion_cumulative += year.immersion.total() * factor;
        years.push(TcoYear {
            year: year.year,
            air_cumulative,
            immersion_cumulative,
            cumulative_savings: clamp_non_negative(air_cumulative - immersion_cumulative),
            npv_savings: clamp_non_negative(year.savings() * factor),
        });
    }

    let net_savings = air_cumulative - immersion_cumulative;
    let total_savings = clamp_non_negative(net_savings);
    let net_capex_difference = capex_immersion - capex_air;
    let annual_opex_savings = if opex.is_empty() {
        0.0
    } else {
        clamp_non_negative(opex.iter().map(OpexYear::savings).sum::<f64>() / opex.len() as f64)
    };

    TcoSummary {
        tco_air: air_cumulative,
        tco_immersion: immersion_cumulative,
        total_savings,
        capex_difference: clamp_non_negative(net_capex_difference),
        annual_opex_savings,
        payback_months: payback_months(net_capex_difference, annual_opex_savings),
        roi_percent: roi_percent(total_savings, capex_immersion),
        net_savings,
        years,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
