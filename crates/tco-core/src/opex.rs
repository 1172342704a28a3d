//! # OPEX Projector
//!
//! Year-by-year operating cost of each cooling system.
//!
//! ```text
//! year y ∈ 1..=N, factor(rate) = (1 + rate)^(y−1)
//!
//! energy      = facility kW × 8760 × tariff          × factor(energy)
//! maintenance = CAPEX total × maintenance rate       × factor(maintenance)
//! labor       = units × labor per unit               × factor(labor)
//! coolant     = coolant CAPEX × replacement rate     × factor(maintenance)
//! ```
//!
//! Every year is computed from its own exponent; there is no running
//! accumulator.

use crate::HOURS_PER_YEAR;

/// Cost drivers of one system that stay fixed over the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingProfile {
    /// IT power × PUE.
    pub facility_power_kw: f64,
    pub capex_total: f64,
    pub maintenance_rate: f64,
    /// Racks for air, tanks for immersion.
    pub labor_units: f64,
    /// Reporting currency.
    pub labor_cost_per_unit: f64,
    pub coolant_capex: f64,
    pub coolant_replacement_rate: f64,
}

/// Yearly growth rates applied from year 2 on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Escalation {
    pub energy: f64,
    pub maintenance: f64,
    pub labor: f64,
}

/// One system's costs for one year, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemOpex {
    pub energy: f64,
    pub maintenance: f64,
    pub labor: f64,
    pub coolant: f64,
}

impl SystemOpex {
    pub fn total(&self) -> f64 {
        self.energy + self.maintenance + self.labor + self.coolant
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpexYear {
    /// 1-based.
    pub year: u32,
    pub air: SystemOpex,
    pub immersion: SystemOpex,
}

impl OpexYear {
    /// Air total minus immersion total. Negative when immersion costs more.
    pub fn savings(&self) -> f64 {
        self.air.total() - self.immersion.total()
    }

    /// Savings as a share of the air total; zero when the air total is zero.
    pub fn savings_percent(&self) -> f64 {
        let air_total = self.air.total();
        if air_total == 0.0 {
            0.0
        } else {
            self.savings() / air_total * 100.0
        }
    }
}

/// `(1 + rate)^(year − 1)`.
#[inline]
pub fn escalation_factor(rate: f64, year: u32) -> f64 {
    (1.0 + rate).powi(year.saturating_sub(1) as i32)
}

/// Costs of one system in one year.
pub fn project_year(
    profile: &OperatingProfile,
    energy_cost_per_kwh: f64,
    escalation: &Escalation,
    year: u32,
) -> SystemOpex {
    let maintenance_factor = escalation_factor(escalation.maintenance, year);

    SystemOpex {
        energy: profile.facility_power_kw
            * HOURS_PER_YEAR
            * energy_cost_per_kwh
            * escalation_factor(escalation.energy, year),
        maintenance: profile.capex_total * profile.maintenance_rate * maintenance_factor,
        labor: profile.labor_units
            * profile.labor_cost_per_unit
            * escalation_factor(escalation.labor, year),
        coolant: profile.coolant_capex * profile.coolant_replacement_rate * maintenance_factor,
    }
}

/// Projects both systems over `years` years.
pub fn project(
    air: &OperatingProfile,
    immersion: &OperatingProfile,
    energy_cost_per_kwh: f64,
    escalation: &Escalation,
    years: u32,
) -> Vec<OpexYear> {
    (1..=years)
        .map(|year| OpexYear {
            year,
            air: project_year(air, energy_cost_per_kwh, escalation, year),
            immersion: project_year(immersion, energy_cost_per_kwh, escalation, year),
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(facility_kw: f64) -> OperatingProfile {
        OperatingProfile {
            facility_power_kw: facility_kw,
            capex_total: 1_000_000.0,
            maintenance_rate: 0.04,
            labor_units: 10.0,
            labor_cost_per_unit: 1_200.0,
            coolant_capex: 0.0,
            coolant_replacement_rate: 0.0,
        }
    }

    fn escalation() -> Escalation {
        Escalation {
            energy: 0.03,
            maintenance: 0.025,
            labor: 0.03,
        }
    }

    #[test]
    fn test_escalation_factor() {
        assert_eq!(escalation_factor(0.03, 1), 1.0);
        assert!((escalation_factor(0.03, 2) - 1.03).abs() < 1e-12);
        assert!((escalation_factor(0.10, 3) - 1.21).abs() < 1e-12);
        assert_eq!(escalation_factor(0.0, 10), 1.0);
    }

    #[test]
    fn test_first_year_is_unescalated() {
        let year = project_year(&profile(100.0), 0.12, &escalation(), 1);
        assert!((year.energy - 100.0 * 8760.0 * 0.12).abs() < 1e-6);
        assert!((year.maintenance - 40_000.0).abs() < 1e-6);
        assert!((year.labor - 12_000.0).abs() < 1e-6);
        assert_eq!(year.coolant, 0.0);
    }

    #[test]
    fn test_each_line_uses_its_own_rate() {
        let mut profile = profile(100.0);
        profile.coolant_capex = 10_000.0;
        profile.coolant_replacement_rate = 0.02;

        let first = project_year(&profile, 0.12, &escalation(), 1);
        let third = project_year(&profile, 0.12, &escalation(), 3);

        assert!((third.energy / first.energy - 1.03f64.powi(2)).abs() < 1e-12);
        assert!((third.maintenance / first.maintenance - 1.025f64.powi(2)).abs() < 1e-12);
        assert!((third.labor / first.labor - 1.03f64.powi(2)).abs() < 1e-12);
        assert!((third.coolant / first.coolant - 1.025f64.powi(2)).abs() < 1e-12);
    }

    #[test]
    fn test_project_length_and_order() {
        let years = project(&profile(120.0), &profile(100.0), 0.12, &escalation(), 7);
        assert_eq!(years.len(), 7);
        for (i, year) in years.iter().enumerate() {
            assert_eq!(year.year, i as u32 + 1);
            assert!(year.savings() > 0.0);
        }
    }

    #[test]
    fn test_savings_percent() {
        let year = OpexYear {
            year: 1,
            air: SystemOpex {
                energy: 100.0,
                ..SystemOpex::default()
            },
            immersion: SystemOpex {
                energy: 75.0,
                ..SystemOpex::default()
            },
        };
        assert_eq!(year.savings(), 25.0);
        assert_eq!(year.savings_percent(), 25.0);

        let zero = OpexYear {
            year: 1,
            air: SystemOpex::default(),
            immersion: SystemOpex {
                labor: 10.0,
                ..SystemOpex::default()
            },
        };
        assert_eq!(zero.savings_percent(), 0.0);
        assert_eq!(zero.savings(), -10.0);
    }
}
