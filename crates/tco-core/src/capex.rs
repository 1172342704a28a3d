//! # CAPEX Calculator
//!
//! One-time capital cost of each cooling system.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AIR                                                                    │
//! │    equipment      = racks × rack unit cost                              │
//! │    installation   = racks × rack installation cost                      │
//! │    infrastructure = IT kW × (HVAC cost/kW + electrical cost/kW)         │
//! │                                                                         │
//! │  IMMERSION                                                              │
//! │    equipment      = Σ qty × tank unit cost + IT kW × pump/HX cost/kW    │
//! │    installation   = Σ qty × tank installation cost                      │
//! │    infrastructure = IT kW × immersion infrastructure cost/kW            │
//! │    coolant        = Σ qty × tank litres × coolant cost/litre            │
//! │                                                                         │
//! │  total = equipment + installation + infrastructure + coolant            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog prices are USD; every line is converted into the reporting
//! currency here. Nothing is rounded.

use crate::equipment::{plan_tanks, EquipmentCatalog, TankPlan};
use crate::error::ConfigurationError;
use crate::region::Currency;
use crate::types::{AirCoolingConfig, AirCoolingInput, ImmersionCoolingConfig, ImmersionCoolingInput};

// =============================================================================
// Types
// =============================================================================

/// CAPEX lines in the reporting currency, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CapexLines {
    pub equipment: f64,
    pub installation: f64,
    pub infrastructure: f64,
    /// Initial coolant fill. Always zero for air cooling.
    pub coolant: f64,
}

impl CapexLines {
    pub fn total(&self) -> f64 {
        self.equipment + self.installation + self.infrastructure + self.coolant
    }
}

/// Rack count and IT load of the air-cooled deployment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirSizing {
    pub rack_count: u32,
    pub it_power_kw: f64,
}

// =============================================================================
// Sizing
// =============================================================================

/// Resolves the air deployment into racks and IT kW.
///
/// For `total_power` the rack count is the load divided by the rack type's
/// reference power, rounded up.
pub fn size_air(
    air: &AirCoolingConfig,
    catalog: &EquipmentCatalog,
) -> Result<AirSizing, ConfigurationError> {
    match air.input {
        AirCoolingInput::RackCount {
            rack_count,
            power_per_rack_kw,
        } => Ok(AirSizing {
            rack_count,
            it_power_kw: rack_count as f64 * power_per_rack_kw,
        }),
        AirCoolingInput::TotalPower { total_power_kw } => {
            let reference_kw = catalog.rack(air.rack_type)?.reference_power_kw;
            let racks = if reference_kw > 0.0 {
                (total_power_kw / reference_kw).ceil().max(1.0)
            } else {
                1.0
            };
            Ok(AirSizing {
                // `as` saturates; validated loads stay far below u32::MAX racks.
                rack_count: racks as u32,
                it_power_kw: total_power_kw,
            })
        }
    }
}

/// Resolves the immersion deployment into a tank layout.
pub fn size_immersion(
    immersion: &ImmersionCoolingConfig,
    catalog: &EquipmentCatalog,
) -> Result<TankPlan, ConfigurationError> {
    match &immersion.input {
        ImmersionCoolingInput::AutoOptimize { target_power_kw } => {
            plan_tanks(catalog, *target_power_kw)
        }
        ImmersionCoolingInput::ManualConfig { tanks } => Ok(TankPlan::manual(tanks)),
    }
}

// =============================================================================
// Costing
// =============================================================================

pub fn air_capex(
    air: &AirCoolingConfig,
    sizing: &AirSizing,
    catalog: &EquipmentCatalog,
    currency: Currency,
) -> Result<CapexLines, ConfigurationError> {
    let rack = catalog.rack(air.rack_type)?;
    let hvac = catalog.hvac(air.hvac_type)?;
    let racks = sizing.rack_count as f64;

    Ok(CapexLines {
        equipment: currency.from_usd(racks * rack.unit_cost_usd),
        installation: currency.from_usd(racks * rack.installation_cost_usd),
        infrastructure: currency.from_usd(
            sizing.it_power_kw * (hvac.cost_per_kw_usd + catalog.air_electrical_cost_per_kw_usd),
        ),
        coolant: 0.0,
    })
}

pub fn immersion_capex(
    immersion: &ImmersionCoolingConfig,
    plan: &TankPlan,
    catalog: &EquipmentCatalog,
    currency: Currency,
) -> Result<CapexLines, ConfigurationError> {
    let coolant = catalog.coolant(immersion.coolant_type)?;

    let mut tanks_usd = 0.0;
    let mut installation_usd = 0.0;
    let mut coolant_liters = 0.0;
    for line in &plan.lines {
        let pricing = catalog.tank(line.size)?;
        let quantity = line.quantity as f64;
        tanks_usd += quantity * pricing.unit_cost_usd;
        installation_usd += quantity * pricing.installation_cost_usd;
        coolant_liters += quantity * pricing.coolant_liters;
    }

    let it_kw = plan.it_power_kw;
    Ok(CapexLines {
        equipment: currency
            .from_usd(tanks_usd + it_kw * catalog.pump_heat_exchanger_cost_per_kw_usd),
        installation: currency.from_usd(installation_usd),
        infrastructure: currency.from_usd(it_kw * catalog.immersion_infrastructure_cost_per_kw_usd),
        coolant: currency.from_usd(coolant_liters * coolant.cost_per_liter_usd),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
