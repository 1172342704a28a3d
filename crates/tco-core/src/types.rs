//! # Configuration Types
//!
//! The input side of a calculation.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CalculationConfiguration                             │
//! │                                                                         │
//! │  ┌───────────────────────┐ ┌───────────────────────┐ ┌───────────────┐ │
//! │  │  AirCoolingConfig     │ │ ImmersionCoolingConfig│ │FinancialConfig│ │
//! │  │  ───────────────────  │ │ ───────────────────── │ │ ───────────── │ │
//! │  │  input (tagged):      │ │ input (tagged):       │ │ analysis_years│ │
//! │  │   rack_count {..}     │ │  auto_optimize {..}   │ │ currency      │ │
//! │  │   total_power {..}    │ │  manual_config {..}   │ │ region        │ │
//! │  │  hvac_efficiency      │ │ pumping_efficiency    │ │ discount_rate │ │
//! │  │  power_distribution.. │ │ heat_exchanger_eff..  │ │ energy_cost.. │ │
//! │  │  rack_type, hvac_type │ │ coolant_type          │ │ escalations   │ │
//! │  └───────────────────────┘ └───────────────────────┘ └───────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tagged Input Methods
//! The `input_method` field selects a variant and each variant carries
//! exactly the fields it needs. A `rack_count` configuration without
//! `power_per_rack_kw` fails to deserialize instead of reaching the engine.
//!
//! ```json
//! {
//!   "input_method": "rack_count",
//!   "rack_count": 77,
//!   "power_per_rack_kw": 15.5,
//!   "hvac_efficiency": 0.83,
//!   "power_distribution_efficiency": 0.94
//! }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::region::{Currency, Region};

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// Everything a calculation needs. Created per request, never mutated by
/// the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalculationConfiguration {
    pub air_cooling: AirCoolingConfig,
    pub immersion_cooling: ImmersionCoolingConfig,
    pub financial: FinancialConfig,
}

// =============================================================================
// Air Cooling
// =============================================================================

/// How the air-cooled deployment is sized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "input_method", rename_all = "snake_case")]
#[ts(export)]
pub enum AirCoolingInput {
    /// Count of racks at a uniform power draw.
    RackCount {
        rack_count: u32,
        power_per_rack_kw: f64,
    },
    /// Total IT load; rack count is derived from the rack type.
    TotalPower { total_power_kw: f64 },
}

/// Rack class. Selects the price row and the reference power used when the
/// rack count has to be derived from a total load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RackType {
    #[default]
    Standard,
    HighDensity,
    Blade,
}

/// Air handling class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum HvacType {
    /// Computer room air conditioner (DX).
    Crac,
    /// Computer room air handler (chilled water).
    #[default]
    Crah,
    /// In-row coolers.
    InRow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AirCoolingConfig {
    #[serde(flatten)]
    pub input: AirCoolingInput,

    /// Share of cooling input power that ends up as useful heat removal.
    #[serde(default = "default_hvac_efficiency")]
    pub hvac_efficiency: f64,

    /// UPS + PDU efficiency.
    #[serde(default = "default_air_power_distribution_efficiency")]
    pub power_distribution_efficiency: f64,

    #[serde(default)]
    pub rack_type: RackType,

    #[serde(default)]
    pub hvac_type: HvacType,
}

fn default_hvac_efficiency() -> f64 {
    0.85
}

fn default_air_power_distribution_efficiency() -> f64 {
    0.95
}

// =============================================================================
// Immersion Cooling
// =============================================================================

/// Standard immersion tank sizes, in rack units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TankSize {
    #[serde(rename = "23U")]
    U23,
    #[serde(rename = "42U")]
    U42,
    #[serde(rename = "52U")]
    U52,
}

impl TankSize {
    /// Number of rack units in the tank.
    pub const fn rack_units(&self) -> u32 {
        match self {
            TankSize::U23 => 23,
            TankSize::U42 => 42,
            TankSize::U52 => 52,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TankSize::U23 => "23U",
            TankSize::U42 => "42U",
            TankSize::U52 => "52U",
        }
    }
}

impl std::fmt::Display for TankSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of a manual tank layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TankConfiguration {
    pub size: TankSize,
    pub quantity: u32,
    pub power_density_kw_per_u: f64,
}

impl TankConfiguration {
    /// IT capacity of this line (all tanks).
    pub fn capacity_kw(&self) -> f64 {
        self.size.rack_units() as f64 * self.power_density_kw_per_u * self.quantity as f64
    }
}

/// How the immersion deployment is sized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "input_method", rename_all = "snake_case")]
#[ts(export)]
pub enum ImmersionCoolingInput {
    /// Let the engine pick tanks for a target IT load.
    AutoOptimize { target_power_kw: f64 },
    /// Use the given tank layout, in order.
    ManualConfig { tanks: Vec<TankConfiguration> },
}

/// Dielectric fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CoolantType {
    /// Single-phase synthetic hydrocarbon.
    #[default]
    Synthetic,
    /// Single-phase mineral oil.
    MineralOil,
    /// Two-phase engineered fluorocarbon.
    Fluorocarbon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImmersionCoolingConfig {
    #[serde(flatten)]
    pub input: ImmersionCoolingInput,

    #[serde(default = "default_pumping_efficiency")]
    pub pumping_efficiency: f64,

    #[serde(default = "default_heat_exchanger_efficiency")]
    pub heat_exchanger_efficiency: f64,

    /// Immersion halls still have UPS and busway losses.
    #[serde(default = "default_immersion_power_distribution_efficiency")]
    pub power_distribution_efficiency: f64,

    #[serde(default)]
    pub coolant_type: CoolantType,
}

fn default_pumping_efficiency() -> f64 {
    0.92
}

fn default_heat_exchanger_efficiency() -> f64 {
    0.95
}

fn default_immersion_power_distribution_efficiency() -> f64 {
    0.975
}

// =============================================================================
// Financial
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinancialConfig {
    /// Horizon of the projection, 1..=10 years.
    #[serde(default = "default_analysis_years")]
    pub analysis_years: u32,

    #[serde(default)]
    pub currency: Currency,

    #[serde(default)]
    pub region: Region,

    #[serde(default = "default_discount_rate")]
    pub discount_rate: f64,

    /// Tariff in the reporting currency. Falls back to the regional default.
    #[serde(default)]
    pub energy_cost_kwh: Option<f64>,

    #[serde(default = "default_energy_escalation_rate")]
    pub energy_escalation_rate: f64,

    #[serde(default = "default_maintenance_escalation_rate")]
    pub maintenance_escalation_rate: f64,

    #[serde(default = "default_labor_escalation_rate")]
    pub labor_escalation_rate: f64,
}

fn default_analysis_years() -> u32 {
    5
}

fn default_discount_rate() -> f64 {
    0.08
}

fn default_energy_escalation_rate() -> f64 {
    0.03
}

fn default_maintenance_escalation_rate() -> f64 {
    0.025
}

fn default_labor_escalation_rate() -> f64 {
    0.03
}

impl Default for FinancialConfig {
    fn default() -> Self {
        FinancialConfig {
            analysis_years: default_analysis_years(),
            currency: Currency::default(),
            region: Region::default(),
            discount_rate: default_discount_rate(),
            energy_cost_kwh: None,
            energy_escalation_rate: default_energy_escalation_rate(),
            maintenance_escalation_rate: default_maintenance_escalation_rate(),
            labor_escalation_rate: default_labor_escalation_rate(),
        }
    }
}

// =============================================================================
// Cooling System Tag
// =============================================================================

/// Which side of the comparison a figure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CoolingSystem {
    AirCooling,
    ImmersionCooling,
}

// =============================================================================
// Unit Tests
// =============================================================================
