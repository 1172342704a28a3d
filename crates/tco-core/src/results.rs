//! # Calculation Results
//!
//! The immutable output of one calculation.
//!
//! ## Layout
//! ```text
//! CalculationResults
//! ├── identity      calculation_id, calculated_at, configuration_hash, versions
//! ├── summary       headline figures (Money + ratios)
//! ├── breakdown
//! │   ├── capex                 per system: equipment … total
//! │   ├── opex_annual[N]        per year, per system + savings
//! │   ├── tco_cumulative[N]     discounted running totals
//! │   ├── maintenance_schedule[N]
//! │   └── tank_plan, IT kW, rack count
//! ├── environmental
//! ├── pue_analysis
//! ├── charts        tco_progression[N], cost_breakdown[N]
//! └── warnings
//! ```
//!
//! Conversions from the unrounded working types live here; this is the only
//! place `Money::round` is applied. Every reported figure is ≥ 0: savings
//! that would be negative are floored and `summary.immersion_costs_more`
//! carries the sign.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::capex::CapexLines;
use crate::environmental::{EnvironmentalImpact, PueAnalysis};
use crate::equipment::TankPlan;
use crate::guards::clamp_non_negative;
use crate::money::Money;
use crate::opex::{OpexYear, SystemOpex};
use crate::region::Currency;
use crate::tco::TcoYear;
use crate::types::CoolingSystem;

// =============================================================================
// Top Level
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalculationResults {
    /// UUID v4.
    pub calculation_id: String,
    #[ts(type = "string")]
    pub calculated_at: DateTime<Utc>,
    /// SHA-256 hex of the configuration JSON.
    pub configuration_hash: String,
    pub calculation_version: String,
    /// Version of the regional carbon, water and currency tables used.
    pub regional_table_version: String,

    pub summary: Summary,
    pub breakdown: Breakdown,
    pub environmental: EnvironmentalImpact,
    pub pue_analysis: PueAnalysis,
    pub charts: Charts,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Summary {
    /// Floored at zero; see `immersion_costs_more`.
    pub total_savings: Money,
    pub roi_percent: f64,
    /// `null` when annual savings are zero.
    pub payback_months: Option<f64>,
    pub air_cooling_pue: f64,
    pub immersion_cooling_pue: f64,
    pub efficiency_improvement_percent: f64,
    pub capex_difference: Money,
    pub annual_opex_savings: Money,
    pub tco_air_cooling: Money,
    pub tco_immersion_cooling: Money,
    /// Set when the immersion TCO exceeds the air TCO over the horizon.
    pub immersion_costs_more: bool,
    pub currency: Currency,
    pub analysis_years: u32,
}

// =============================================================================
// Breakdown
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Breakdown {
    pub capex: CapexComparison,
    pub opex_annual: Vec<OpexYearRow>,
    pub tco_cumulative: Vec<TcoYearRow>,
    pub maintenance_schedule: Vec<MaintenanceYear>,
    pub tank_plan: TankPlan,
    pub air_cooling_it_power_kw: f64,
    pub immersion_cooling_it_power_kw: f64,
    pub air_cooling_rack_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CapexComparison {
    pub air_cooling: CapexBreakdown,
    pub immersion_cooling: CapexBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CapexBreakdown {
    pub equipment: Money,
    pub installation: Money,
    pub infrastructure: Money,
    pub coolant: Money,
    /// Sum of the four rounded lines.
    pub total: Money,
}

impl From<&CapexLines> for CapexBreakdown {
    fn from(lines: &CapexLines) -> Self {
        let equipment = Money::round(lines.equipment);
        let installation = Money::round(lines.installation);
        let infrastructure = Money::round(lines.infrastructure);
        let coolant = Money::round(lines.coolant);
        CapexBreakdown {
            equipment,
            installation,
            infrastructure,
            coolant,
            total: equipment + installation + infrastructure + coolant,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SystemOpexRow {
    pub energy: Money,
    pub maintenance: Money,
    pub labor: Money,
    pub coolant: Money,
    pub total: Money,
}

impl From<&SystemOpex> for SystemOpexRow {
    fn from(opex: &SystemOpex) -> Self {
        SystemOpexRow {
            energy: Money::round(opex.energy),
            maintenance: Money::round(opex.maintenance),
            labor: Money::round(opex.labor),
            coolant: Money::round(opex.coolant),
            total: Money::round(opex.total()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OpexYearRow {
    pub year: u32,
    pub air_cooling: SystemOpexRow,
    pub immersion_cooling: SystemOpexRow,
    pub savings: Money,
    pub savings_percent: f64,
}

impl From<&OpexYear> for OpexYearRow {
    fn from(year: &OpexYear) -> Self {
        OpexYearRow {
            year: year.year,
            air_cooling: SystemOpexRow::from(&year.air),
            immersion_cooling: SystemOpexRow::from(&year.immersion),
            savings: Money::round(clamp_non_negative(year.savings())),
            savings_percent: clamp_non_negative(year.savings_percent()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TcoYearRow {
    pub year: u32,
    pub air_cooling: Money,
    pub immersion_cooling: Money,
    pub cumulative_savings: Money,
    pub npv_savings: Money,
}

impl From<&TcoYear> for TcoYearRow {
    fn from(year: &TcoYear) -> Self {
        TcoYearRow {
            year: year.year,
            air_cooling: Money::round(year.air_cumulative),
            immersion_cooling: Money::round(year.immersion_cumulative),
            cumulative_savings: Money::round(year.cumulative_savings),
            npv_savings: Money::round(year.npv_savings),
        }
    }
}

// =============================================================================
// Maintenance Schedule
// =============================================================================

/// Share of a year's maintenance line per task. Shares sum to 1.
const AIR_MAINTENANCE_TASKS: [(&str, f64); 3] = [
    ("HVAC preventive maintenance", 0.60),
    ("Filter replacement", 0.25),
    ("Rack/PDU inspection", 0.15),
];

const IMMERSION_MAINTENANCE_TASKS: [(&str, f64); 3] = [
    ("Pump and CDU service", 0.50),
    ("Heat exchanger cleaning", 0.30),
    ("Coolant quality analysis", 0.20),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaintenanceTask {
    pub system: CoolingSystem,
    pub task: String,
    pub cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaintenanceYear {
    pub year: u32,
    pub tasks: Vec<MaintenanceTask>,
}

impl From<&OpexYear> for MaintenanceYear {
    fn from(year: &OpexYear) -> Self {
        let mut tasks = split_maintenance(
            CoolingSystem::AirCooling,
            year.air.maintenance,
            &AIR_MAINTENANCE_TASKS,
        );
        tasks.extend(split_maintenance(
            CoolingSystem::ImmersionCooling,
            year.immersion.maintenance,
            &IMMERSION_MAINTENANCE_TASKS,
        ));
        MaintenanceYear {
            year: year.year,
            tasks,
        }
    }
}

/// Splits one maintenance line across tasks.
///
/// Each task is the difference of two rounded running totals, so costs are
/// never negative and add up to the rounded line exactly.
fn split_maintenance(
    system: CoolingSystem,
    amount: f64,
    shares: &[(&str, f64)],
) -> Vec<MaintenanceTask> {
    let line = Money::round(clamp_non_negative(amount));
    let last = shares.len().saturating_sub(1);
    let mut running_share = 0.0;
    let mut allocated = Money::zero();

    shares
        .iter()
        .enumerate()
        .map(|(i, (task, share))| {
            running_share += share;
            let running = if i == last {
                line
            } else {
                Money::round(clamp_non_negative(amount) * running_share).min(line)
            };
            let cost = running - allocated;
            allocated = running;
            MaintenanceTask {
                system,
                task: task.to_string(),
                cost,
            }
        })
        .collect()
}

// =============================================================================
// Charts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Charts {
    pub tco_progression: Vec<TcoProgressionPoint>,
    pub cost_breakdown: Vec<CostBreakdownPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TcoProgressionPoint {
    pub year: u32,
    pub air_cooling: Money,
    pub immersion_cooling: Money,
    pub savings: Money,
}

impl From<&TcoYear> for TcoProgressionPoint {
    fn from(year: &TcoYear) -> Self {
        TcoProgressionPoint {
            year: year.year,
            air_cooling: Money::round(year.air_cumulative),
            immersion_cooling: Money::round(year.immersion_cumulative),
            savings: Money::round(year.cumulative_savings),
        }
    }
}

/// Stacked cost categories for one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CostBreakdownPoint {
    pub year: u32,
    pub air_energy: Money,
    pub air_maintenance: Money,
    pub air_labor: Money,
    pub immersion_energy: Money,
    pub immersion_maintenance: Money,
    pub immersion_labor: Money,
    pub immersion_coolant: Money,
}

impl From<&OpexYear> for CostBreakdownPoint {
    fn from(year: &OpexYear) -> Self {
        CostBreakdownPoint {
            year: year.year,
            air_energy: Money::round(year.air.energy),
            air_maintenance: Money::round(year.air.maintenance),
            air_labor: Money::round(year.air.labor),
            immersion_energy: Money::round(year.immersion.energy),
            immersion_maintenance: Money::round(year.immersion.maintenance),
            immersion_labor: Money::round(year.immersion.labor),
            immersion_coolant: Money::round(year.immersion.coolant),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
