//! # Equipment Catalog & Tank Planning
//!
//! Unit costs for both cooling systems and the auto-optimize tank heuristic.
//!
//! ## Catalog Is Data
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EquipmentCatalog                                                       │
//! │                                                                         │
//! │  racks    ── keyed by RackType    ── unit, install, reference kW, labor │
//! │  hvac     ── keyed by HvacType    ── cost per kW of IT load             │
//! │  tanks    ── keyed by TankSize    ── unit, install, coolant litres      │
//! │  coolants ── keyed by CoolantType ── cost per litre, yearly top-up      │
//! │  scalars  ── per-kW infrastructure, maintenance rates, planning limits  │
//! │                                                                         │
//! │  EquipmentCatalog::default()  → reference pricing shipped with crate   │
//! │  serde Deserialize            → replacement catalog supplied by caller │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All prices are USD. Conversion to the reporting currency happens in the
//! CAPEX calculator.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ConfigurationError;
use crate::types::{CoolantType, HvacType, RackType, TankConfiguration, TankSize};

/// Remainders below this (kW) do not need another tank.
const CAPACITY_EPSILON_KW: f64 = 1e-9;

// =============================================================================
// Catalog Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackPricing {
    pub rack_type: RackType,
    pub unit_cost_usd: f64,
    pub installation_cost_usd: f64,
    /// IT load of one rack, used to derive a rack count from total power.
    pub reference_power_kw: f64,
    pub annual_labor_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacPricing {
    pub hvac_type: HvacType,
    pub cost_per_kw_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankPricing {
    pub size: TankSize,
    pub unit_cost_usd: f64,
    pub installation_cost_usd: f64,
    pub coolant_liters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolantPricing {
    pub coolant_type: CoolantType,
    pub cost_per_liter_usd: f64,
    /// Share of the fill replaced every year.
    pub annual_replacement_rate: f64,
}

// =============================================================================
// Catalog
// =============================================================================

/// Equipment pricing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    pub version: String,
    pub air_electrical_cost_per_kw_usd: f64,
    /// Yearly maintenance as a share of air-cooling CAPEX.
    pub air_maintenance_rate: f64,
    /// CDU, pumps and plate heat exchangers.
    pub pump_heat_exchanger_cost_per_kw_usd: f64,
    /// Dry coolers, busway and floor works.
    pub immersion_infrastructure_cost_per_kw_usd: f64,
    pub tank_annual_labor_usd: f64,
    /// Yearly maintenance as a share of immersion CAPEX.
    pub immersion_maintenance_rate: f64,
    /// Power density assumed when the engine picks tanks itself.
    pub auto_optimize_power_density_kw_per_u: f64,
    /// Upper bound on tanks the auto-optimizer may place.
    pub max_tanks: u32,
    // Row tables last so the TOML form keeps scalars above `[[racks]]`.
    pub racks: Vec<RackPricing>,
    pub hvac: Vec<HvacPricing>,
    pub tanks: Vec<TankPricing>,
    pub coolants: Vec<CoolantPricing>,
}

impl Default for EquipmentCatalog {
    fn default() -> Self {
        EquipmentCatalog {
            version: "reference-2024.1".to_string(),
            racks: vec![
                RackPricing {
                    rack_type: RackType::Standard,
                    unit_cost_usd: 8_000.0,
                    installation_cost_usd: 2_000.0,
                    reference_power_kw: 10.0,
                    annual_labor_usd: 1_200.0,
                },
                RackPricing {
                    rack_type: RackType::HighDensity,
                    unit_cost_usd: 14_000.0,
                    installation_cost_usd: 3_000.0,
                    reference_power_kw: 20.0,
                    annual_labor_usd: 1_500.0,
                },
                RackPricing {
                    rack_type: RackType::Blade,
                    unit_cost_usd: 22_000.0,
                    installation_cost_usd: 3_500.0,
                    reference_power_kw: 30.0,
                    annual_labor_usd: 1_800.0,
                },
            ],
            hvac: vec![
                HvacPricing {
                    hvac_type: HvacType::Crac,
                    cost_per_kw_usd: 1_000.0,
                },
                HvacPricing {
                    hvac_type: HvacType::Crah,
                    cost_per_kw_usd: 800.0,
                },
                HvacPricing {
                    hvac_type: HvacType::InRow,
                    cost_per_kw_usd: 1_200.0,
                },
            ],
            air_electrical_cost_per_kw_usd: 300.0,
            air_maintenance_rate: 0.04,
            tanks: vec![
                TankPricing {
                    size: TankSize::U23,
                    unit_cost_usd: 55_000.0,
                    installation_cost_usd: 5_000.0,
                    coolant_liters: 600.0,
                },
                TankPricing {
                    size: TankSize::U42,
                    unit_cost_usd: 80_000.0,
                    installation_cost_usd: 7_000.0,
                    coolant_liters: 1_000.0,
                },
                TankPricing {
                    size: TankSize::U52,
                    unit_cost_usd: 95_000.0,
                    installation_cost_usd: 8_000.0,
                    coolant_liters: 1_250.0,
                },
            ],
            coolants: vec![
                CoolantPricing {
                    coolant_type: CoolantType::Synthetic,
                    cost_per_liter_usd: 25.0,
                    annual_replacement_rate: 0.02,
                },
                CoolantPricing {
                    coolant_type: CoolantType::MineralOil,
                    cost_per_liter_usd: 8.0,
                    annual_replacement_rate: 0.03,
                },
                CoolantPricing {
                    coolant_type: CoolantType::Fluorocarbon,
                    cost_per_liter_usd: 90.0,
                    annual_replacement_rate: 0.05,
                },
            ],
            pump_heat_exchanger_cost_per_kw_usd: 600.0,
            immersion_infrastructure_cost_per_kw_usd: 900.0,
            tank_annual_labor_usd: 2_400.0,
            immersion_maintenance_rate: 0.025,
            auto_optimize_power_density_kw_per_u: 2.0,
            max_tanks: 100_000,
        }
    }
}

impl EquipmentCatalog {
    pub fn rack(&self, rack_type: RackType) -> Result<&RackPricing, ConfigurationError> {
        self.racks
            .iter()
            .find(|row| row.rack_type == rack_type)
            .ok_or_else(|| missing(format!("rack type {:?}", rack_type)))
    }

    pub fn hvac(&self, hvac_type: HvacType) -> Result<&HvacPricing, ConfigurationError> {
        self.hvac
            .iter()
            .find(|row| row.hvac_type == hvac_type)
            .ok_or_else(|| missing(format!("HVAC type {:?}", hvac_type)))
    }

    pub fn tank(&self, size: TankSize) -> Result<&TankPricing, ConfigurationError> {
        self.tanks
            .iter()
            .find(|row| row.size == size)
            .ok_or_else(|| missing(format!("tank size {}", size)))
    }

    pub fn coolant(&self, coolant_type: CoolantType) -> Result<&CoolantPricing, ConfigurationError> {
        self.coolants
            .iter()
            .find(|row| row.coolant_type == coolant_type)
            .ok_or_else(|| missing(format!("coolant {:?}", coolant_type)))
    }
}

// =============================================================================
// Catalog Checks
// =============================================================================

impl EquipmentCatalog {
    /// Checks that every number in the catalog can be priced with.
    ///
    /// ```text
    /// costs, prices, litres, labor   finite, ≥ 0
    /// maintenance / replacement      finite, within [0, 1]
    /// densities, reference power     finite, > 0
    /// max_tanks                      ≥ 1
    /// ```
    pub fn check(&self) -> Result<(), ConfigurationError> {
        if self.tanks.is_empty() {
            return Err(ConfigurationError::EmptyTankCatalog);
        }

        check_amount("air_electrical_cost_per_kw_usd", self.air_electrical_cost_per_kw_usd)?;
        check_rate("air_maintenance_rate", self.air_maintenance_rate)?;
        check_amount(
            "pump_heat_exchanger_cost_per_kw_usd",
            self.pump_heat_exchanger_cost_per_kw_usd,
        )?;
        check_amount(
            "immersion_infrastructure_cost_per_kw_usd",
            self.immersion_infrastructure_cost_per_kw_usd,
        )?;
        check_amount("tank_annual_labor_usd", self.tank_annual_labor_usd)?;
        check_rate("immersion_maintenance_rate", self.immersion_maintenance_rate)?;
        check_positive(
            "auto_optimize_power_density_kw_per_u",
            self.auto_optimize_power_density_kw_per_u,
        )?;
        if self.max_tanks == 0 {
            return Err(invalid("max_tanks".to_string(), 0.0, "at least 1"));
        }

        for (i, row) in self.racks.iter().enumerate() {
            check_amount(&format!("racks[{}].unit_cost_usd", i), row.unit_cost_usd)?;
            check_amount(
                &format!("racks[{}].installation_cost_usd", i),
                row.installation_cost_usd,
            )?;
            check_positive(
                &format!("racks[{}].reference_power_kw", i),
                row.reference_power_kw,
            )?;
            check_amount(&format!("racks[{}].annual_labor_usd", i), row.annual_labor_usd)?;
        }
        for (i, row) in self.hvac.iter().enumerate() {
            check_amount(&format!("hvac[{}].cost_per_kw_usd", i), row.cost_per_kw_usd)?;
        }
        for (i, row) in self.tanks.iter().enumerate() {
            check_amount(&format!("tanks[{}].unit_cost_usd", i), row.unit_cost_usd)?;
            check_amount(
                &format!("tanks[{}].installation_cost_usd", i),
                row.installation_cost_usd,
            )?;
            check_amount(&format!("tanks[{}].coolant_liters", i), row.coolant_liters)?;
        }
        for (i, row) in self.coolants.iter().enumerate() {
            check_amount(
                &format!("coolants[{}].cost_per_liter_usd", i),
                row.cost_per_liter_usd,
            )?;
            check_rate(
                &format!("coolants[{}].annual_replacement_rate", i),
                row.annual_replacement_rate,
            )?;
        }
        Ok(())
    }
}

fn check_amount(entry: &str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(entry.to_string(), value, "a finite amount of at least 0"))
    }
}

fn check_rate(entry: &str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(entry.to_string(), value, "a rate between 0 and 1"))
    }
}

fn check_positive(entry: &str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(entry.to_string(), value, "a finite value above 0"))
    }
}

fn invalid(entry: String, value: f64, expected: &'static str) -> ConfigurationError {
    ConfigurationError::InvalidCatalogValue {
        entry,
        value,
        expected,
    }
}

fn missing(item: String) -> ConfigurationError {
    ConfigurationError::MissingPricing { item }
}

// =============================================================================
// Tank Plan
// =============================================================================

/// One line of a tank layout with its resolved capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TankPlanLine {
    pub size: TankSize,
    pub quantity: u32,
    pub power_density_kw_per_u: f64,
    pub capacity_kw: f64,
}

/// The tank layout a calculation is costed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TankPlan {
    pub lines: Vec<TankPlanLine>,
    pub total_tanks: u32,
    /// Sum of line capacities.
    pub capacity_kw: f64,
    /// IT load served: the target for auto-optimize, the capacity for a
    /// manual layout.
    pub it_power_kw: f64,
    pub auto_optimized: bool,
}

impl TankPlan {
    /// Wraps a manual layout. Lines keep their input order.
    pub fn manual(tanks: &[TankConfiguration]) -> Self {
        let lines: Vec<TankPlanLine> = tanks
            .iter()
            .map(|tank| TankPlanLine {
                size: tank.size,
                quantity: tank.quantity,
                power_density_kw_per_u: tank.power_density_kw_per_u,
                capacity_kw: tank.capacity_kw(),
            })
            .collect();
        let capacity_kw = lines.iter().map(|line| line.capacity_kw).sum();
        let total_tanks = lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity));

        TankPlan {
            lines,
            total_tanks,
            capacity_kw,
            it_power_kw: capacity_kw,
            auto_optimized: false,
        }
    }
}

/// Picks tanks whose combined capacity covers `target_power_kw`.
///
/// ## Heuristic
/// ```text
/// 1. Fill with the largest tank:   n = floor(target / cap_largest)
/// 2. Remainder r = target − n × cap_largest
/// 3. If r > 0, add ONE tank: the cheapest size whose capacity ≥ r
///    (ties on cost → smaller capacity)
///
/// Example (2 kW/U): target 1193.5 kW
///   52U = 104 kW → 11 tanks, r = 49.5 kW
///   candidates ≥ 49.5: 42U ($80k), 52U ($95k) → 42U
///   plan: 11 × 52U + 1 × 42U = 12 tanks, 1228 kW
/// ```
/// The count is minimal because every tank except the last is the
/// largest size.
pub fn plan_tanks(
    catalog: &EquipmentCatalog,
    target_power_kw: f64,
) -> Result<TankPlan, ConfigurationError> {
    let density = catalog.auto_optimize_power_density_kw_per_u;
    let capacity_of = |size: TankSize| size.rack_units() as f64 * density;

    let largest = catalog
        .tanks
        .iter()
        .max_by_key(|row| row.size.rack_units())
        .ok_or(ConfigurationError::EmptyTankCatalog)?;
    let largest_capacity = capacity_of(largest.size);
    let max_kw = largest_capacity * catalog.max_tanks as f64;

    if !(largest_capacity > 0.0) || target_power_kw > max_kw {
        return Err(ConfigurationError::TargetUnreachable {
            target_kw: target_power_kw,
            max_kw,
        });
    }

    let full = (target_power_kw / largest_capacity).floor();
    let remainder = target_power_kw - full * largest_capacity;
    let full = full as u32;

    let mut lines = Vec::with_capacity(2);
    if full > 0 {
        lines.push(TankPlanLine {
            size: largest.size,
            quantity: full,
            power_density_kw_per_u: density,
            capacity_kw: full as f64 * largest_capacity,
        });
    }

    if remainder > CAPACITY_EPSILON_KW {
        let filler = catalog
            .tanks
            .iter()
            .filter(|row| capacity_of(row.size) + CAPACITY_EPSILON_KW >= remainder)
            .min_by(|a, b| {
                a.unit_cost_usd
                    .total_cmp(&b.unit_cost_usd)
                    .then(a.size.rack_units().cmp(&b.size.rack_units()))
            })
            .unwrap_or(largest);

        match lines.iter_mut().find(|line| line.size == filler.size) {
            Some(line) => {
                line.quantity += 1;
                line.capacity_kw += capacity_of(filler.size);
            }
            None => lines.push(TankPlanLine {
                size: filler.size,
                quantity: 1,
                power_density_kw_per_u: density,
                capacity_kw: capacity_of(filler.size),
            }),
        }
    }

    let total_tanks: u32 = lines.iter().map(|line| line.quantity).sum();
    if total_tanks > catalog.max_tanks {
        return Err(ConfigurationError::TargetUnreachable {
            target_kw: target_power_kw,
            max_kw,
        });
    }

    Ok(TankPlan {
        capacity_kw: lines.iter().map(|line| line.capacity_kw).sum(),
        lines,
        total_tanks,
        it_power_kw: target_power_kw,
        auto_optimized: true,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
