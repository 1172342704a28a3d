//! Whole-engine properties and golden scenarios.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

use tco_core::{
    calculate, AirCoolingConfig, AirCoolingInput, CalculationConfiguration, CalculationResults,
    Calculator, CoolantType, Currency, EquipmentCatalog, FinancialConfig, HvacType,
    ImmersionCoolingConfig, ImmersionCoolingInput, Money, RackType, Region, TankConfiguration,
    TankSize, ValidationLimits,
};

// =============================================================================
// Builders
// =============================================================================

fn configuration(
    rack_count: u32,
    power_per_rack_kw: f64,
    target_power_kw: f64,
    financial: FinancialConfig,
) -> CalculationConfiguration {
    CalculationConfiguration {
        air_cooling: AirCoolingConfig {
            input: AirCoolingInput::RackCount {
                rack_count,
                power_per_rack_kw,
            },
            hvac_efficiency: 0.83,
            power_distribution_efficiency: 0.94,
            rack_type: RackType::Standard,
            hvac_type: HvacType::Crah,
        },
        immersion_cooling: ImmersionCoolingConfig {
            input: ImmersionCoolingInput::AutoOptimize { target_power_kw },
            pumping_efficiency: 0.92,
            heat_exchanger_efficiency: 0.95,
            power_distribution_efficiency: 0.975,
            coolant_type: CoolantType::Synthetic,
        },
        financial,
    }
}

fn benchmark_financial() -> FinancialConfig {
    FinancialConfig {
        analysis_years: 5,
        region: Region::Us,
        energy_cost_kwh: Some(0.12),
        ..FinancialConfig::default()
    }
}

fn assert_all_finite(results: &CalculationResults) {
    let summary = &results.summary;
    let env = &results.environmental;
    let pue = &results.pue_analysis;

    let figures = [
        summary.roi_percent,
        summary.air_cooling_pue,
        summary.immersion_cooling_pue,
        summary.efficiency_improvement_percent,
        env.energy_savings_kwh_annual,
        env.carbon_savings_kg_co2_annual,
        env.water_savings_gallons_annual,
        env.carbon_footprint_reduction_percent,
        env.carbon_savings_kg_co2_total,
        pue.air_facility_power_kw,
        pue.immersion_facility_power_kw,
    ];
    for figure in figures {
        assert!(figure.is_finite(), "non-finite figure {figure}");
    }
    if let Some(months) = summary.payback_months {
        assert!(months.is_finite() && months >= 0.0);
    }
    for row in &results.breakdown.opex_annual {
        assert!(row.savings_percent.is_finite());
    }
}

/// Every figure a caller sees, summary through charts, is at least zero.
fn assert_reported_figures_non_negative(results: &CalculationResults) {
    let zero = Money::zero();
    let summary = &results.summary;

    for (name, money) in [
        ("total_savings", summary.total_savings),
        ("capex_difference", summary.capex_difference),
        ("annual_opex_savings", summary.annual_opex_savings),
        ("tco_air_cooling", summary.tco_air_cooling),
        ("tco_immersion_cooling", summary.tco_immersion_cooling),
    ] {
        assert!(money >= zero, "summary.{name} = {money}");
    }
    for (name, figure) in [
        ("roi_percent", summary.roi_percent),
        ("air_cooling_pue", summary.air_cooling_pue),
        ("immersion_cooling_pue", summary.immersion_cooling_pue),
        ("efficiency_improvement_percent", summary.efficiency_improvement_percent),
    ] {
        assert!(figure >= 0.0, "summary.{name} = {figure}");
    }
    if let Some(months) = summary.payback_months {
        assert!(months >= 0.0);
    }

    let breakdown = &results.breakdown;
    for capex in [&breakdown.capex.air_cooling, &breakdown.capex.immersion_cooling] {
        for money in [
            capex.equipment,
            capex.installation,
            capex.infrastructure,
            capex.coolant,
            capex.total,
        ] {
            assert!(money >= zero, "capex line {money}");
        }
    }
    for row in &breakdown.opex_annual {
        for system in [&row.air_cooling, &row.immersion_cooling] {
            for money in [
                system.energy,
                system.maintenance,
                system.labor,
                system.coolant,
                system.total,
            ] {
                assert!(money >= zero, "year {} opex {money}", row.year);
            }
        }
        assert!(row.savings >= zero, "year {} savings {}", row.year, row.savings);
        assert!(row.savings_percent >= 0.0, "year {} savings %", row.year);
    }
    for row in &breakdown.tco_cumulative {
        for money in [
            row.air_cooling,
            row.immersion_cooling,
            row.cumulative_savings,
            row.npv_savings,
        ] {
            assert!(money >= zero, "year {} cumulative {money}", row.year);
        }
    }
    for year in &breakdown.maintenance_schedule {
        for task in &year.tasks {
            assert!(task.cost >= zero, "year {} {} {}", year.year, task.task, task.cost);
        }
    }
    for point in &results.charts.tco_progression {
        for money in [point.air_cooling, point.immersion_cooling, point.savings] {
            assert!(money >= zero, "year {} progression {money}", point.year);
        }
    }
    for point in &results.charts.cost_breakdown {
        for money in [
            point.air_energy,
            point.air_maintenance,
            point.air_labor,
            point.immersion_energy,
            point.immersion_maintenance,
            point.immersion_labor,
            point.immersion_coolant,
        ] {
            assert!(money >= zero, "year {} cost breakdown {money}", point.year);
        }
    }

    let env = &results.environmental;
    for figure in [
        env.energy_savings_kwh_annual,
        env.carbon_savings_kg_co2_annual,
        env.water_savings_gallons_annual,
        env.carbon_footprint_reduction_percent,
        env.carbon_savings_kg_co2_total,
    ] {
        assert!(figure >= 0.0, "environmental figure {figure}");
    }
}

// =============================================================================
// Golden Scenarios
// =============================================================================

#[test]
fn benchmark_scenario() {
    let results = calculate(&configuration(77, 15.5, 1193.5, benchmark_financial())).unwrap();

    let improvement = results.pue_analysis.improvement_percent;
    assert!(improvement > 35.0 && improvement < 42.0, "{improvement}");

    let mwh = results.environmental.energy_savings_kwh_annual / 1000.0;
    assert!(mwh > 1000.0 && mwh < 1300.0, "{mwh}");

    let tons = results.environmental.carbon_savings_kg_co2_annual / 1000.0;
    assert!(tons > 400.0 && tons < 520.0, "{tons}");

    assert_all_finite(&results);
}

#[test]
fn small_deployment_scenario() {
    let results = calculate(&configuration(1, 0.1, 0.1, benchmark_financial())).unwrap();

    assert_all_finite(&results);
    assert_reported_figures_non_negative(&results);

    // One 23U tank against a 0.1 kW rack: immersion loses on cost and says so.
    assert!(results.summary.immersion_costs_more);
    assert_eq!(results.summary.total_savings, Money::zero());
    assert_eq!(results.summary.roi_percent, 0.0);
    assert_eq!(results.summary.annual_opex_savings, Money::zero());
    assert_eq!(results.summary.payback_months, None);
}

#[test]
fn total_power_with_manual_tanks_scenario() {
    let mut config = configuration(1, 1.0, 1.0, benchmark_financial());
    config.air_cooling.input = AirCoolingInput::TotalPower {
        total_power_kw: 1193.5,
    };
    config.immersion_cooling.input = ImmersionCoolingInput::ManualConfig {
        tanks: vec![
            TankConfiguration {
                size: TankSize::U52,
                quantity: 10,
                power_density_kw_per_u: 2.0,
            },
            TankConfiguration {
                size: TankSize::U42,
                quantity: 2,
                power_density_kw_per_u: 1.25,
            },
        ],
    };

    let results = calculate(&config).unwrap();

    // 1193.5 kW at 10 kW per standard rack
    assert_eq!(results.breakdown.air_cooling_rack_count, 120);
    let plan = &results.breakdown.tank_plan;
    assert!(!plan.auto_optimized);
    assert_eq!(plan.total_tanks, 12);
    assert_eq!(plan.lines[0].size, TankSize::U52);
    assert!((plan.capacity_kw - (1040.0 + 105.0)).abs() < 1e-9);
    assert_eq!(
        results.environmental.energy_savings_kwh_annual,
        results.pue_analysis.energy_savings_kwh_annual
    );
    assert_all_finite(&results);
    assert_reported_figures_non_negative(&results);
}

#[test]
fn extreme_deployment_scenario() {
    let calculator = Calculator::new(EquipmentCatalog::default(), ValidationLimits::hyperscale());
    let config = configuration(10_000, 100.0, 1_000_000.0, benchmark_financial());

    let results = calculator.calculate(&config).unwrap();

    assert_all_finite(&results);
    assert_eq!(results.breakdown.air_cooling_rack_count, 10_000);
    assert!(results.environmental.energy_savings_kwh_annual > 0.0);
}

#[test]
fn extreme_deployment_rejected_by_default_limits() {
    let config = configuration(10_000, 100.0, 1_000_000.0, benchmark_financial());
    let err = calculate(&config).unwrap_err();
    let fields: Vec<&str> = err.validation_errors().iter().map(|e| e.field()).collect();
    assert_eq!(
        fields,
        vec!["air_cooling.rack_count", "immersion_cooling.target_power_kw"]
    );
}

#[test]
fn unknown_region_and_currency_fall_back() {
    let config: CalculationConfiguration = serde_json::from_value(json!({
        "air_cooling": {
            "input_method": "rack_count",
            "rack_count": 77,
            "power_per_rack_kw": 15.5,
            "hvac_efficiency": 0.83,
            "power_distribution_efficiency": 0.94
        },
        "immersion_cooling": { "input_method": "auto_optimize", "target_power_kw": 1193.5 },
        "financial": { "region": "ANTARCTICA", "currency": "BTC" }
    }))
    .unwrap();

    let results = calculate(&config).unwrap();
    assert_eq!(results.environmental.region, Region::Us);
    assert_eq!(results.summary.currency, Currency::Usd);
    assert_eq!(results.environmental.carbon_factor_kg_per_kwh, 0.4);
    assert_eq!(results.environmental.water_factor_gal_per_kwh, 0.5);
}

#[test]
fn regional_carbon_ordering() {
    let carbon = |region| {
        let financial = FinancialConfig {
            region,
            ..benchmark_financial()
        };
        calculate(&configuration(77, 15.5, 1193.5, financial))
            .unwrap()
            .environmental
            .carbon_savings_kg_co2_annual
    };

    let (us, eu, me) = (carbon(Region::Us), carbon(Region::Eu), carbon(Region::Me));
    assert!(me > us, "ME {me} <= US {us}");
    assert!(us > eu, "US {us} <= EU {eu}");
}

// =============================================================================
// Properties
// =============================================================================

fn region_strategy() -> impl Strategy<Value = Region> {
    prop_oneof![Just(Region::Us), Just(Region::Eu), Just(Region::Me)]
}

fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::Usd),
        Just(Currency::Eur),
        Just(Currency::Sar),
        Just(Currency::Aed)
    ]
}

fn financial_strategy() -> impl Strategy<Value = FinancialConfig> {
    (
        1u32..=10,
        region_strategy(),
        currency_strategy(),
        0.01f64..=0.30,
        prop::option::of(0.01f64..=1.0),
        0.0f64..=0.25,
        0.0f64..=0.25,
    )
        .prop_map(
            |(years, region, currency, discount, tariff, energy, maintenance)| FinancialConfig {
                analysis_years: years,
                currency,
                region,
                discount_rate: discount,
                energy_cost_kwh: tariff,
                energy_escalation_rate: energy,
                maintenance_escalation_rate: maintenance,
                labor_escalation_rate: maintenance,
            },
        )
}

fn air_input_strategy() -> impl Strategy<Value = AirCoolingInput> {
    prop_oneof![
        (1u32..=1000, 0.1f64..=100.0).prop_map(|(rack_count, power_per_rack_kw)| {
            AirCoolingInput::RackCount {
                rack_count,
                power_per_rack_kw,
            }
        }),
        (0.1f64..=100_000.0)
            .prop_map(|total_power_kw| AirCoolingInput::TotalPower { total_power_kw }),
    ]
}

fn tank_strategy() -> impl Strategy<Value = TankConfiguration> {
    (
        prop_oneof![Just(TankSize::U23), Just(TankSize::U42), Just(TankSize::U52)],
        1u32..=50,
        0.1f64..=10.0,
    )
        .prop_map(|(size, quantity, power_density_kw_per_u)| TankConfiguration {
            size,
            quantity,
            power_density_kw_per_u,
        })
}

fn immersion_input_strategy() -> impl Strategy<Value = ImmersionCoolingInput> {
    prop_oneof![
        (0.1f64..=100_000.0)
            .prop_map(|target_power_kw| ImmersionCoolingInput::AutoOptimize { target_power_kw }),
        prop::collection::vec(tank_strategy(), 1..=4)
            .prop_map(|tanks| ImmersionCoolingInput::ManualConfig { tanks }),
    ]
}

fn configuration_strategy() -> impl Strategy<Value = CalculationConfiguration> {
    (
        air_input_strategy(),
        immersion_input_strategy(),
        0.3f64..=1.0,
        0.3f64..=1.0,
        0.3f64..=1.0,
        0.3f64..=1.0,
        financial_strategy(),
    )
        .prop_map(|(air_input, immersion_input, hvac, pd, pump, hx, financial)| {
            let mut config = configuration(1, 1.0, 1.0, financial);
            config.air_cooling.input = air_input;
            config.immersion_cooling.input = immersion_input;
            config.air_cooling.hvac_efficiency = hvac;
            config.air_cooling.power_distribution_efficiency = pd;
            config.immersion_cooling.pumping_efficiency = pump;
            config.immersion_cooling.heat_exchanger_efficiency = hx;
            config
        })
}

proptest! {
    #[test]
    fn prop_pue_and_improvement_bounds(config in configuration_strategy()) {
        let results = calculate(&config).unwrap();
        let pue = &results.pue_analysis;

        prop_assert!(pue.air_cooling_pue >= 1.0);
        prop_assert!(pue.immersion_cooling_pue >= 1.0);
        prop_assert!(pue.improvement_percent >= 0.0);
        prop_assert!(pue.improvement_percent < 100.0);
    }

    #[test]
    fn prop_energy_savings_identical(config in configuration_strategy()) {
        let results = calculate(&config).unwrap();
        prop_assert_eq!(
            results.environmental.energy_savings_kwh_annual,
            results.pue_analysis.energy_savings_kwh_annual
        );
    }

    #[test]
    fn prop_series_lengths(config in configuration_strategy()) {
        let results = calculate(&config).unwrap();
        let years = config.financial.analysis_years as usize;

        prop_assert_eq!(results.breakdown.opex_annual.len(), years);
        prop_assert_eq!(results.breakdown.tco_cumulative.len(), years);
        prop_assert_eq!(results.charts.tco_progression.len(), years);
        prop_assert_eq!(results.charts.cost_breakdown.len(), years);
    }

    #[test]
    fn prop_outputs_finite_and_environment_non_negative(config in configuration_strategy()) {
        let results = calculate(&config).unwrap();
        assert_all_finite(&results);

        let env = &results.environmental;
        prop_assert!(env.energy_savings_kwh_annual >= 0.0);
        prop_assert!(env.carbon_savings_kg_co2_annual >= 0.0);
        prop_assert!(env.water_savings_gallons_annual >= 0.0);
        prop_assert!(env.carbon_footprint_reduction_percent >= 0.0);
    }

    #[test]
    fn prop_reported_figures_non_negative(config in configuration_strategy()) {
        let results = calculate(&config).unwrap();
        assert_reported_figures_non_negative(&results);
        if results.summary.total_savings > Money::zero() {
            prop_assert!(!results.summary.immersion_costs_more);
        }
    }

    #[test]
    fn prop_footprint_reduction_follows_improvement(config in configuration_strategy()) {
        let results = calculate(&config).unwrap();
        let pue = &results.pue_analysis;
        let expected = pue.improvement_percent / pue.air_cooling_pue * 100.0;
        prop_assert!(
            (results.environmental.carbon_footprint_reduction_percent - expected).abs() < 1e-9
        );
    }

    #[test]
    fn prop_more_air_load_never_reduces_savings(
        config in configuration_strategy(),
        extra in 1u32..=500,
    ) {
        let smaller = calculate(&config).unwrap();

        let mut bigger_config = config.clone();
        match &mut bigger_config.air_cooling.input {
            AirCoolingInput::RackCount { rack_count, .. } => {
                *rack_count = (*rack_count + extra).min(1000);
            }
            AirCoolingInput::TotalPower { total_power_kw } => {
                *total_power_kw = (*total_power_kw + extra as f64 * 10.0).min(100_000.0);
            }
        }
        let bigger = calculate(&bigger_config).unwrap();

        let (a, b) = (&smaller.environmental, &bigger.environmental);
        prop_assert!(b.energy_savings_kwh_annual >= a.energy_savings_kwh_annual);
        prop_assert!(b.carbon_savings_kg_co2_annual >= a.carbon_savings_kg_co2_annual);
        prop_assert!(b.water_savings_gallons_annual >= a.water_savings_gallons_annual);
    }

    #[test]
    fn prop_calculation_is_idempotent(config in configuration_strategy()) {
        let first = calculate(&config).unwrap();
        let second = calculate(&config).unwrap();

        prop_assert_eq!(&first.summary, &second.summary);
        prop_assert_eq!(&first.breakdown, &second.breakdown);
        prop_assert_eq!(&first.environmental, &second.environmental);
        prop_assert_eq!(&first.pue_analysis, &second.pue_analysis);
        prop_assert_eq!(&first.configuration_hash, &second.configuration_hash);
    }

    #[test]
    fn prop_capex_total_is_sum_of_parts(config in configuration_strategy()) {
        let results = calculate(&config).unwrap();
        for capex in [
            &results.breakdown.capex.air_cooling,
            &results.breakdown.capex.immersion_cooling,
        ] {
            prop_assert_eq!(
                capex.total,
                capex.equipment + capex.installation + capex.infrastructure + capex.coolant
            );
        }
        prop_assert_eq!(results.breakdown.capex.air_cooling.coolant.units(), 0);
    }

    #[test]
    fn prop_tank_plan_matches_input(config in configuration_strategy()) {
        let results = calculate(&config).unwrap();
        let plan = &results.breakdown.tank_plan;

        match &config.immersion_cooling.input {
            ImmersionCoolingInput::AutoOptimize { target_power_kw } => {
                prop_assert!(plan.auto_optimized);
                prop_assert_eq!(plan.it_power_kw, *target_power_kw);
                prop_assert!(plan.capacity_kw + 1e-6 >= plan.it_power_kw);
            }
            ImmersionCoolingInput::ManualConfig { tanks } => {
                prop_assert!(!plan.auto_optimized);
                prop_assert_eq!(plan.lines.len(), tanks.len());
                let quantity: u32 = tanks.iter().map(|t| t.quantity).sum();
                prop_assert_eq!(plan.total_tanks, quantity);
                prop_assert_eq!(plan.it_power_kw, plan.capacity_kw);
            }
        }
    }

    #[test]
    fn prop_air_sizing_matches_input(config in configuration_strategy()) {
        let results = calculate(&config).unwrap();
        let breakdown = &results.breakdown;

        match &config.air_cooling.input {
            AirCoolingInput::RackCount { rack_count, power_per_rack_kw } => {
                prop_assert_eq!(breakdown.air_cooling_rack_count, *rack_count);
                prop_assert_eq!(
                    breakdown.air_cooling_it_power_kw,
                    *rack_count as f64 * *power_per_rack_kw
                );
            }
            AirCoolingInput::TotalPower { total_power_kw } => {
                prop_assert!(breakdown.air_cooling_rack_count >= 1);
                prop_assert_eq!(breakdown.air_cooling_it_power_kw, *total_power_kw);
            }
        }
    }
}
