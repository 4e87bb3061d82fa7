//! End-to-end projections through the public API

use approx::{assert_abs_diff_eq, assert_relative_eq};
use serde_json::json;

use remuneration_projection::parameters::loader::load_simulation_from_reader;
use remuneration_projection::{
    Assumptions, GlobalParameters, ProjectionConfig, ProjectionEngine, ProjectionHorizon, ScenarioParameters,
    ScenarioRunner, YearMonth,
};

fn start() -> YearMonth {
    YearMonth::new(2026, 10).unwrap()
}

fn engine() -> ProjectionEngine {
    ProjectionEngine::new(Assumptions::sef_mg(), ProjectionConfig::starting_at(start()))
}

fn scenario(code: &str, entry: YearMonth) -> ScenarioParameters {
    ScenarioParameters::new(code.parse().unwrap(), entry)
}

#[test]
fn test_current_period_equals_first_projected_period() {
    let global = GlobalParameters {
        dependents: 0,
        working_days: 20,
        general_raise_rate: 0.0,
        gepi_growth_rate: 0.0,
        inflation_rate: 0.0,
        horizon: ProjectionHorizon::Years(30),
        ..Default::default()
    };
    let s = scenario("I-A", YearMonth::january(start().year - 5));
    let engine = engine();

    let projection = engine.project(&global, &s).unwrap();
    let current = engine.compute_at(&global, &s, start()).unwrap();

    assert_eq!(projection.records.len(), 30);
    assert_eq!(projection.records[0], current);
}

#[test]
fn test_projection_is_idempotent() {
    let global = GlobalParameters {
        general_raise_rate: 0.035,
        gepi_growth_rate: 0.01,
        inflation_rate: 0.045,
        dependents: 2,
        ..Default::default()
    };
    let s = scenario("II-A", YearMonth::new(2011, 5).unwrap());

    let first = engine().project(&global, &s).unwrap();
    let second = engine().project(&global, &s).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_no_advancement_during_probation() {
    let global = GlobalParameters {
        horizon: ProjectionHorizon::Months(48),
        ..Default::default()
    };
    let result = engine().project(&global, &scenario("I-A", start())).unwrap();

    assert!(result.records[..36].iter().all(|r| r.position.code() == "I-A"));
    assert_eq!(result.records[36].position.code(), "I-B");
    assert_eq!(result.records[36].progressions, 1);
}

#[test]
fn test_target_before_entry_has_zero_service() {
    let global = GlobalParameters {
        horizon: ProjectionHorizon::Years(3),
        ..Default::default()
    };
    let result = engine()
        .project(&global, &scenario("I-A", start().add_months(30)))
        .unwrap();

    assert_eq!(result.records[0].service_years, 0);
    assert_eq!(result.records[0].ade, 0.0);
    assert_eq!(result.records[0].position.code(), "I-A");
}

#[test]
fn test_caps_hold_over_a_long_projection() {
    let global = GlobalParameters {
        general_raise_rate: 0.04,
        gepi_growth_rate: 0.06,
        inflation_rate: 0.02,
        public_ceiling: 30_000.0,
        horizon: ProjectionHorizon::Years(40),
        ..Default::default()
    };
    let mut s = scenario("III-B", YearMonth::new(1998, 2).unwrap());
    s.gepi_points = 9000.0;

    let result = engine().project(&global, &s).unwrap();
    assert!(result.records.iter().any(|r| r.over_ceiling > 0.0));

    for r in &result.records {
        assert!(r.gepi_paid <= r.gepi_cap + 1e-9, "{}: GEPI {} over cap {}", r.label(false), r.gepi_paid, r.gepi_cap);
        let capped = r.base_salary + r.gepi_paid + r.ade - r.over_ceiling;
        assert!(capped <= r.public_ceiling + 1e-6, "{}: {} over ceiling", r.label(false), capped);
    }
}

#[test]
fn test_components_non_negative_with_zero_working_days() {
    let global = GlobalParameters {
        working_days: 0,
        dependents: 5,
        horizon: ProjectionHorizon::Years(10),
        ..Default::default()
    };
    let result = engine()
        .project(&global, &scenario("I-A", YearMonth::new(2024, 1).unwrap()))
        .unwrap();

    for r in &result.records {
        assert_eq!(r.vi, 0.0);
        assert!(r.rpps >= 0.0 && r.prevcom >= 0.0 && r.irrf >= 0.0 && r.union_due >= 0.0);
        assert!(r.net_pay > 0.0);
    }
}

#[test]
fn test_present_value_deflates_by_inflation() {
    let global = GlobalParameters {
        inflation_rate: 0.05,
        horizon: ProjectionHorizon::Years(5),
        ..Default::default()
    };
    let nominal = engine()
        .project(&global, &scenario("II-A", YearMonth::new(2015, 1).unwrap()))
        .unwrap();
    let real = nominal.in_present_value();

    assert_eq!(real.records[0], nominal.records[0]);
    let last = &nominal.records[4];
    assert_relative_eq!(real.records[4].net_pay, last.net_pay / 1.05f64.powi(4), max_relative = 1e-12);
    assert_eq!(real.records[4].position, last.position);
}

#[test]
fn test_annual_figures() {
    let global = GlobalParameters {
        horizon: ProjectionHorizon::Years(1),
        ..Default::default()
    };
    let record = engine()
        .compute_at(&global, &scenario("I-A", YearMonth::new(2020, 1).unwrap()), start())
        .unwrap();

    assert_relative_eq!(record.annual_gross(), record.gross_pay * 12.0);
    assert_relative_eq!(record.annual_net(), record.net_pay * 13.0);
    assert_abs_diff_eq!(
        record.annual_gross_with_benefits(),
        record.taxable_income * (13.0 + 1.0 / 3.0),
        epsilon = 1e-6
    );
}

#[test]
fn test_legacy_simulation_projects_like_current_schema() {
    let legacy = json!({
        "global": { "horizon": { "years": 5 } },
        "scenarios": [
            { "id": "old", "parameters": { "level": "II-A", "entryYear": 2012, "entryMonth": 6, "gepiPoints": 4800 } }
        ]
    });
    let current = json!({
        "global": { "horizon": { "years": 5 } },
        "scenarios": [
            {
                "schema_version": 2,
                "id": "old",
                "name": "old",
                "parameters": {
                    "initial_position": "II-A",
                    "entry_date": { "year": 2012, "month": 6 },
                    "gepi_points": 4800
                }
            }
        ]
    });

    let career = Assumptions::sef_mg().career;
    let a = load_simulation_from_reader(legacy.to_string().as_bytes(), &career, start()).unwrap();
    let b = load_simulation_from_reader(current.to_string().as_bytes(), &career, start()).unwrap();
    assert_eq!(a, b);

    let runner = ScenarioRunner::new(ProjectionConfig::starting_at(start()));
    let results = runner.run_all(&a.global, &a.scenarios).unwrap();
    assert_eq!(results[0].scenario_id, "old");
    assert_eq!(results[0].records.len(), 5);
    assert!(results[0].record_for(YearMonth::new(2028, 10).unwrap()).is_some());
}

#[test]
fn test_bundled_tables_match_built_in() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/tables");
    let loaded = Assumptions::from_csv_path(&dir).unwrap();
    let built_in = Assumptions::sef_mg();

    let global = GlobalParameters {
        horizon: ProjectionHorizon::Years(10),
        ..Default::default()
    };
    let s = scenario("I-C", YearMonth::new(2019, 9).unwrap());
    let config = ProjectionConfig::starting_at(start());
    let a = ProjectionEngine::new(loaded, config.clone()).project(&global, &s).unwrap();
    let b = ProjectionEngine::new(built_in, config).project(&global, &s).unwrap();

    for (x, y) in a.records.iter().zip(&b.records) {
        assert_eq!(x.position, y.position);
        assert_abs_diff_eq!(x.net_pay, y.net_pay, epsilon = 1e-6);
    }
}
