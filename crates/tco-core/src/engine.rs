//! # Calculation Engine
//!
//! Runs the full pipeline for one configuration.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Calculator::calculate(&config)                                         │
//! │                                                                         │
//! │  1. validate_configuration ──── any error ──► CoreError::Validation    │
//! │     catalog check ──────────── unusable price ──► ConfigurationError   │
//! │  2. resolve region / currency / tariff                                  │
//! │  3. size air (racks) and immersion (tank plan) ─► ConfigurationError   │
//! │  4. CAPEX per system                                                    │
//! │  5. PUE analysis (facility power per system)                            │
//! │  6. OPEX projection, year 1..=N                                         │
//! │  7. TCO / NPV aggregation                                               │
//! │  8. environmental impact                                                │
//! │  9. assemble CalculationResults (rounding happens here)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Calculator` holds only read-only data (catalog and limits), so one
//! instance can be shared across threads behind an `Arc`.

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::capex::{air_capex, immersion_capex, size_air, size_immersion};
use crate::environmental::{analyze_environment, analyze_pue};
use crate::equipment::EquipmentCatalog;
use crate::error::CoreResult;
use crate::money::Money;
use crate::opex::{project, Escalation, OperatingProfile};
use crate::pue::{air_pue, immersion_pue};
use crate::region::{resolve, REGIONAL_TABLE_VERSION};
use crate::results::{
    Breakdown, CalculationResults, CapexBreakdown, CapexComparison, Charts, CostBreakdownPoint,
    MaintenanceYear, OpexYearRow, Summary, TcoProgressionPoint, TcoYearRow,
};
use crate::tco::aggregate;
use crate::types::CalculationConfiguration;
use crate::validation::{validate_configuration, ValidationLimits, ValidationReport};
use crate::CALCULATION_VERSION;

/// Relative IT load difference above which the comparison is flagged.
const LOAD_MISMATCH_RATIO: f64 = 0.05;

/// The calculation engine with its pricing data and validation limits.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    catalog: EquipmentCatalog,
    limits: ValidationLimits,
}

impl Calculator {
    pub fn new(catalog: EquipmentCatalog, limits: ValidationLimits) -> Self {
        Calculator { catalog, limits }
    }

    pub fn catalog(&self) -> &EquipmentCatalog {
        &self.catalog
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Validates without calculating.
    pub fn validate(&self, config: &CalculationConfiguration) -> ValidationReport {
        validate_configuration(config, &self.limits)
    }

    /// Produces the full results for a configuration.
    ///
    /// ## Errors
    /// - [`crate::CoreError::Validation`] with every failed check
    /// - [`crate::CoreError::Configuration`] when no tank layout or price
    ///   row can satisfy the configuration
    pub fn calculate(&self, config: &CalculationConfiguration) -> CoreResult<CalculationResults> {
        let mut warnings = self.validate(config).into_result()?;
        self.catalog.check()?;

        let financial = &config.financial;
        let currency = financial.currency;
        let regional = resolve(financial.region, currency, financial.energy_cost_kwh);

        // Sizing
        let air_sizing = size_air(&config.air_cooling, &self.catalog)?;
        let tank_plan = size_immersion(&config.immersion_cooling, &self.catalog)?;

        if let Some(warning) = load_mismatch_warning(air_sizing.it_power_kw, tank_plan.it_power_kw)
        {
            warnings.push(warning);
        }

        // CAPEX
        let air_capex_lines =
            air_capex(&config.air_cooling, &air_sizing, &self.catalog, currency)?;
        let immersion_capex_lines = immersion_capex(
            &config.immersion_cooling,
            &tank_plan,
            &self.catalog,
            currency,
        )?;

        // PUE
        let pue_analysis = analyze_pue(
            air_pue(&config.air_cooling),
            immersion_pue(&config.immersion_cooling),
            air_sizing.it_power_kw,
            tank_plan.it_power_kw,
        );

        // OPEX
        let rack = self.catalog.rack(config.air_cooling.rack_type)?;
        let coolant = self.catalog.coolant(config.immersion_cooling.coolant_type)?;
        let air_profile = OperatingProfile {
            facility_power_kw: pue_analysis.air_facility_power_kw,
            capex_total: air_capex_lines.total(),
            maintenance_rate: self.catalog.air_maintenance_rate,
            labor_units: air_sizing.rack_count as f64,
            labor_cost_per_unit: currency.from_usd(rack.annual_labor_usd),
            coolant_capex: 0.0,
            coolant_replacement_rate: 0.0,
        };
        let immersion_profile = OperatingProfile {
            facility_power_kw: pue_analysis.immersion_facility_power_kw,
            capex_total: immersion_capex_lines.total(),
            maintenance_rate: self.catalog.immersion_maintenance_rate,
            labor_units: tank_plan.total_tanks as f64,
            labor_cost_per_unit: currency.from_usd(self.catalog.tank_annual_labor_usd),
            coolant_capex: immersion_capex_lines.coolant,
            coolant_replacement_rate: coolant.annual_replacement_rate,
        };
        let escalation = Escalation {
            energy: financial.energy_escalation_rate,
            maintenance: financial.maintenance_escalation_rate,
            labor: financial.labor_escalation_rate,
        };
        let opex = project(
            &air_profile,
            &immersion_profile,
            regional.energy_cost_per_kwh,
            &escalation,
            financial.analysis_years,
        );

        // TCO
        let tco = aggregate(
            air_capex_lines.total(),
            immersion_capex_lines.total(),
            &opex,
            financial.discount_rate,
        );

        let environmental = analyze_environment(&pue_analysis, &regional, financial.analysis_years);

        let calculation_id = Uuid::new_v4().to_string();
        debug!(
            calculation_id = %calculation_id,
            air_it_kw = air_sizing.it_power_kw,
            immersion_it_kw = tank_plan.it_power_kw,
            tanks = tank_plan.total_tanks,
            air_pue = pue_analysis.air_cooling_pue,
            immersion_pue = pue_analysis.immersion_cooling_pue,
            net_savings = tco.net_savings,
            "Calculation complete"
        );

        let summary = Summary {
            total_savings: Money::round(tco.total_savings),
            roi_percent: tco.roi_percent,
            payback_months: tco.payback_months,
            air_cooling_pue: pue_analysis.air_cooling_pue,
            immersion_cooling_pue: pue_analysis.immersion_cooling_pue,
            efficiency_improvement_percent: pue_analysis.improvement_percent,
            capex_difference: Money::round(tco.capex_difference),
            annual_opex_savings: Money::round(tco.annual_opex_savings),
            tco_air_cooling: Money::round(tco.tco_air),
            tco_immersion_cooling: Money::round(tco.tco_immersion),
            immersion_costs_more: tco.immersion_costs_more(),
            currency,
            analysis_years: financial.analysis_years,
        };

        let breakdown = Breakdown {
            capex: CapexComparison {
                air_cooling: CapexBreakdown::from(&air_capex_lines),
                immersion_cooling: CapexBreakdown::from(&immersion_capex_lines),
            },
            opex_annual: opex.iter().map(OpexYearRow::from).collect(),
            tco_cumulative: tco.years.iter().map(TcoYearRow::from).collect(),
            maintenance_schedule: opex.iter().map(MaintenanceYear::from).collect(),
            air_cooling_it_power_kw: air_sizing.it_power_kw,
            immersion_cooling_it_power_kw: tank_plan.it_power_kw,
            air_cooling_rack_count: air_sizing.rack_count,
            tank_plan,
        };

        let charts = Charts {
            tco_progression: tco.years.iter().map(TcoProgressionPoint::from).collect(),
            cost_breakdown: opex.iter().map(CostBreakdownPoint::from).collect(),
        };

        Ok(CalculationResults {
            calculation_id,
            calculated_at: Utc::now(),
            configuration_hash: configuration_hash(config),
            calculation_version: CALCULATION_VERSION.to_string(),
            regional_table_version: REGIONAL_TABLE_VERSION.to_string(),
            summary,
            breakdown,
            environmental,
            pue_analysis,
            charts,
            warnings,
        })
    }
}

/// Calculates with the reference catalog and default limits.
///
/// ## Example
/// ```rust,no_run
/// # let config: tco_core::CalculationConfiguration = unimplemented!();
/// let results = tco_core::calculate(&config)?;
/// println!("5-year savings: {}", results.summary.total_savings);
/// # Ok::<(), tco_core::CoreError>(())
/// ```
pub fn calculate(config: &CalculationConfiguration) -> CoreResult<CalculationResults> {
    Calculator::default().calculate(config)
}

/// SHA-256 hex digest of the configuration's JSON form.
///
/// Field order is fixed by the type definitions, so equal configurations
/// always hash equally.
pub fn configuration_hash(config: &CalculationConfiguration) -> String {
    let json = serde_json::to_vec(config).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&json);
    format!("{:x}", hasher.finalize())
}

fn load_mismatch_warning(air_it_kw: f64, immersion_it_kw: f64) -> Option<String> {
    let larger = air_it_kw.max(immersion_it_kw);
    if larger <= 0.0 {
        return None;
    }
    let ratio = (air_it_kw - immersion_it_kw).abs() / larger;
    (ratio > LOAD_MISMATCH_RATIO).then(|| {
        format!(
            "air cooling IT load ({:.1} kW) and immersion IT load ({:.1} kW) differ by {:.0}%; \
             savings compare deployments of different size",
            air_it_kw,
            immersion_it_kw,
            ratio * 100.0
        )
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, CoreError};
    use crate::region::{Currency, Region};
    use crate::types::{
        AirCoolingConfig, AirCoolingInput, CoolantType, FinancialConfig, HvacType,
        ImmersionCoolingConfig, ImmersionCoolingInput, RackType,
    };
    use pretty_assertions::assert_eq;

    fn benchmark() -> CalculationConfiguration {
        CalculationConfiguration {
            air_cooling: AirCoolingConfig {
                input: AirCoolingInput::RackCount {
                    rack_count: 77,
                    power_per_rack_kw: 15.5,
                },
                hvac_efficiency: 0.83,
                power_distribution_efficiency: 0.94,
                rack_type: RackType::Standard,
                hvac_type: HvacType::Crah,
            },
            immersion_cooling: ImmersionCoolingConfig {
                input: ImmersionCoolingInput::AutoOptimize {
                    target_power_kw: 1193.5,
                },
                pumping_efficiency: 0.92,
                heat_exchanger_efficiency: 0.95,
                power_distribution_efficiency: 0.975,
                coolant_type: CoolantType::Synthetic,
            },
            financial: FinancialConfig {
                analysis_years: 5,
                region: Region::Us,
                energy_cost_kwh: Some(0.12),
                ..FinancialConfig::default()
            },
        }
    }

    #[test]
    fn test_benchmark_headline_figures() {
        let results = calculate(&benchmark()).unwrap();

        let improvement = results.pue_analysis.improvement_percent;
        assert!(improvement > 35.0 && improvement < 42.0, "{improvement}");

        let mwh = results.environmental.energy_savings_kwh_annual / 1000.0;
        assert!(mwh > 1000.0 && mwh < 1300.0, "{mwh}");

        let tons = results.environmental.carbon_savings_kg_co2_annual / 1000.0;
        assert!(tons > 400.0 && tons < 520.0, "{tons}");

        assert_eq!(
            results.breakdown.capex.air_cooling.total,
            Money::from_units(2_082_850)
        );
        assert_eq!(
            results.breakdown.capex.immersion_cooling.total,
            Money::from_units(3_379_000)
        );
        assert_eq!(results.breakdown.tank_plan.total_tanks, 12);
        assert_eq!(results.breakdown.air_cooling_rack_count, 77);
        assert!(results.warnings.is_empty());
    }

    #[test]
    fn test_series_lengths_match_horizon() {
        let mut config = benchmark();
        config.financial.analysis_years = 8;
        let results = calculate(&config).unwrap();

        assert_eq!(results.breakdown.opex_annual.len(), 8);
        assert_eq!(results.breakdown.tco_cumulative.len(), 8);
        assert_eq!(results.breakdown.maintenance_schedule.len(), 8);
        assert_eq!(results.charts.tco_progression.len(), 8);
        assert_eq!(results.charts.cost_breakdown.len(), 8);
    }

    #[test]
    fn test_energy_savings_agree() {
        let results = calculate(&benchmark()).unwrap();
        assert_eq!(
            results.environmental.energy_savings_kwh_annual,
            results.pue_analysis.energy_savings_kwh_annual
        );
    }

    #[test]
    fn test_final_cumulative_tco_matches_summary() {
        let results = calculate(&benchmark()).unwrap();
        let last = results.breakdown.tco_cumulative.last().unwrap();
        assert_eq!(last.air_cooling, results.summary.tco_air_cooling);
        assert_eq!(last.immersion_cooling, results.summary.tco_immersion_cooling);
    }

    #[test]
    fn test_identity_fields() {
        let config = benchmark();
        let first = calculate(&config).unwrap();
        let second = calculate(&config).unwrap();

        assert_ne!(first.calculation_id, second.calculation_id);
        assert!(Uuid::parse_str(&first.calculation_id).is_ok());
        assert_eq!(first.configuration_hash, second.configuration_hash);
        assert_eq!(first.configuration_hash.len(), 64);
        assert_eq!(first.calculation_version, CALCULATION_VERSION);
        assert_eq!(first.regional_table_version, REGIONAL_TABLE_VERSION);
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let config = benchmark();
        let first = calculate(&config).unwrap();
        let second = calculate(&config).unwrap();

        assert_eq!(first.summary, second.summary);
        assert_eq!(first.breakdown, second.breakdown);
        assert_eq!(first.environmental, second.environmental);
        assert_eq!(first.pue_analysis, second.pue_analysis);
    }

    #[test]
    fn test_hash_changes_with_configuration() {
        let mut other = benchmark();
        other.financial.discount_rate = 0.09;
        assert_ne!(configuration_hash(&benchmark()), configuration_hash(&other));
    }

    #[test]
    fn test_invalid_configuration_aborts() {
        let mut config = benchmark();
        config.financial.analysis_years = 0;
        config.air_cooling.hvac_efficiency = f64::NAN;

        let err = calculate(&config).unwrap_err();
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_unreachable_target_is_configuration_error() {
        let mut catalog = EquipmentCatalog::default();
        catalog.max_tanks = 5;
        let calculator = Calculator::new(catalog, ValidationLimits::default());

        let err = calculator.calculate(&benchmark()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Configuration(ConfigurationError::TargetUnreachable { .. })
        ));
    }

    #[test]
    fn test_unusable_catalog_is_configuration_error() {
        let mut catalog = EquipmentCatalog::default();
        catalog.auto_optimize_power_density_kw_per_u = 0.0;
        let calculator = Calculator::new(catalog, ValidationLimits::default());

        let err = calculator.calculate(&benchmark()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Configuration(ConfigurationError::InvalidCatalogValue { .. })
        ));
    }

    #[test]
    fn test_currency_scales_money_but_not_energy() {
        let usd = calculate(&benchmark()).unwrap();

        let mut config = benchmark();
        config.financial.currency = Currency::Eur;
        config.financial.energy_cost_kwh = Some(0.12 * 0.92);
        let eur = calculate(&config).unwrap();

        assert_eq!(eur.summary.currency, Currency::Eur);
        let ratio = eur.summary.tco_air_cooling.as_f64() / usd.summary.tco_air_cooling.as_f64();
        assert!((ratio - 0.92).abs() < 1e-6, "{ratio}");
        assert_eq!(
            eur.environmental.energy_savings_kwh_annual,
            usd.environmental.energy_savings_kwh_annual
        );
    }

    #[test]
    fn test_load_mismatch_warning() {
        assert!(load_mismatch_warning(100.0, 102.0).is_none());
        assert!(load_mismatch_warning(100.0, 150.0).is_some());
        assert!(load_mismatch_warning(0.0, 0.0).is_none());

        let mut config = benchmark();
        config.immersion_cooling.input = ImmersionCoolingInput::AutoOptimize {
            target_power_kw: 2000.0,
        };
        let results = calculate(&config).unwrap();
        assert_eq!(results.warnings.len(), 1);
    }
}
