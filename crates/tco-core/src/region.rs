//! # Regional & Currency Resolver
//!
//! Static lookup tables for grid carbon intensity, default tariffs, water
//! usage and currency conversion.
//!
//! ## Table Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  REGION_PROFILES (const, one row per Region)                            │
//! │                                                                         │
//! │  Region │ kg CO₂ / kWh │ default tariff (USD/kWh) │ gal water / kWh     │
//! │  ───────┼──────────────┼──────────────────────────┼──────────────────   │
//! │  US     │     0.4      │          0.12            │       0.5           │
//! │  EU     │     0.3      │          0.20            │       0.4           │
//! │  ME     │     0.5      │          0.08            │       0.7           │
//! │                                                                         │
//! │  CURRENCY_RATES (const, units of currency per 1 USD)                   │
//! │  USD 1.00 │ EUR 0.92 │ SAR 3.75 │ AED 3.6725                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown region or currency strings fall back to US / USD. That is the
//! documented behavior, not an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Version tag of the static tables in this module, stamped on every result.
pub const REGIONAL_TABLE_VERSION: &str = "2024.1";

// =============================================================================
// Region
// =============================================================================

/// Deployment region. Selects grid carbon intensity, default tariff and
/// water factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(from = "String", rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Region {
    /// United States.
    #[default]
    Us,
    /// European Union.
    Eu,
    /// Middle East.
    Me,
}

impl Region {
    /// All supported regions, in table order.
    pub const ALL: [Region; 3] = [Region::Us, Region::Eu, Region::Me];

    /// Returns the static profile for this region.
    pub fn profile(&self) -> &'static RegionProfile {
        // REGION_PROFILES is declared in enum order.
        &REGION_PROFILES[*self as usize]
    }

    /// Returns the region code as used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Eu => "EU",
            Region::Me => "ME",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Lenient parse: unknown values resolve to [`Region::Us`].
impl FromStr for Region {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "EU" | "EUROPE" => Region::Eu,
            "ME" | "MIDDLE_EAST" | "MENA" => Region::Me,
            _ => Region::Us,
        })
    }
}

impl From<String> for Region {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(region) => region,
            Err(never) => match never {},
        }
    }
}

/// One row of the regional table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionProfile {
    pub region: Region,
    /// Grid carbon intensity.
    pub carbon_factor_kg_per_kwh: f64,
    /// Default electricity tariff, in USD.
    pub default_energy_cost_usd_per_kwh: f64,
    /// Water consumed per kWh of facility energy (cooling towers, generation).
    pub water_factor_gal_per_kwh: f64,
}

/// Regional lookup table, indexed by `Region as usize`.
pub const REGION_PROFILES: [RegionProfile; 3] = [
    RegionProfile {
        region: Region::Us,
        carbon_factor_kg_per_kwh: 0.4,
        default_energy_cost_usd_per_kwh: 0.12,
        water_factor_gal_per_kwh: 0.5,
    },
    RegionProfile {
        region: Region::Eu,
        carbon_factor_kg_per_kwh: 0.3,
        default_energy_cost_usd_per_kwh: 0.20,
        water_factor_gal_per_kwh: 0.4,
    },
    RegionProfile {
        region: Region::Me,
        carbon_factor_kg_per_kwh: 0.5,
        default_energy_cost_usd_per_kwh: 0.08,
        water_factor_gal_per_kwh: 0.7,
    },
];

// =============================================================================
// Currency
// =============================================================================

/// Reporting currency. All catalog prices are stored in USD and converted
/// with the fixed rates below; no live rates are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(from = "String", rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Sar,
    Aed,
}

/// Units of each currency per 1 USD, indexed by `Currency as usize`.
const CURRENCY_RATES: [f64; 4] = [1.0, 0.92, 3.75, 3.6725];

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Sar, Currency::Aed];

    /// Units of this currency per 1 USD.
    #[inline]
    pub fn rate_per_usd(&self) -> f64 {
        CURRENCY_RATES[*self as usize]
    }

    /// Converts a USD amount into this currency.
    ///
    /// ## Example
    /// ```rust
    /// use tco_core::region::Currency;
    ///
    /// assert_eq!(Currency::Sar.from_usd(100.0), 375.0);
    /// ```
    #[inline]
    pub fn from_usd(&self, usd: f64) -> f64 {
        usd * self.rate_per_usd()
    }

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Sar => "SAR",
            Currency::Aed => "AED",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Lenient parse: unknown values resolve to [`Currency::Usd`].
impl FromStr for Currency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Ok(Currency::ALL
            .into_iter()
            .find(|currency| currency.code() == code)
            .unwrap_or_default())
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(currency) => currency,
            Err(never) => match never {},
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Regional factors resolved for one calculation, already in the reporting
/// currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRegion {
    pub region: Region,
    pub currency: Currency,
    pub carbon_factor_kg_per_kwh: f64,
    pub water_factor_gal_per_kwh: f64,
    /// Tariff in the reporting currency: the configured value, or the
    /// regional default converted from USD.
    pub energy_cost_per_kwh: f64,
}

/// Resolves the regional row and the effective tariff.
pub fn resolve(region: Region, currency: Currency, energy_cost_kwh: Option<f64>) -> ResolvedRegion {
    let profile = region.profile();
    let energy_cost_per_kwh = energy_cost_kwh
        .unwrap_or_else(|| currency.from_usd(profile.default_energy_cost_usd_per_kwh));

    ResolvedRegion {
        region,
        currency,
        carbon_factor_kg_per_kwh: profile.carbon_factor_kg_per_kwh,
        water_factor_gal_per_kwh: profile.water_factor_gal_per_kwh,
        energy_cost_per_kwh,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
