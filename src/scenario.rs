//! Scenario runner for comparing several career tracks under one set of global parameters
//!
//! Loads tables once, then projects every scenario and assembles the
//! per-period series the comparison chart and detail views consume.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::error::EngineResult;
use crate::parameters::{GlobalParameters, Scenario};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// One chart point: a period label and the net pay of each scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    /// Net pay keyed by scenario id
    pub values: BTreeMap<String, f64>,
}

/// Pre-loaded scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ProjectionConfig::default());
/// let results = runner.run_all(&global, &scenarios)?;
/// let series = ScenarioRunner::net_series(&results);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the built-in tables
    pub fn new(config: ProjectionConfig) -> Self {
        Self::with_assumptions(Assumptions::sef_mg(), config)
    }

    /// Create runner by loading tables from CSV files
    pub fn from_csv(config: ProjectionConfig) -> EngineResult<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv()?, config))
    }

    /// Create runner from a specific tables directory
    pub fn from_csv_path(path: &std::path::Path, config: ProjectionConfig) -> EngineResult<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv_path(path)?, config))
    }

    pub fn with_assumptions(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(assumptions, config),
        }
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    /// Project a single scenario
    pub fn run(&self, global: &GlobalParameters, scenario: &Scenario) -> EngineResult<ProjectionResult> {
        self.engine.project_scenario(global, scenario)
    }

    /// Project every scenario; fails if any one fails
    pub fn run_all(&self, global: &GlobalParameters, scenarios: &[Scenario]) -> EngineResult<Vec<ProjectionResult>> {
        scenarios.iter().map(|s| self.run(global, s)).collect()
    }

    /// Net pay per period label, one value per scenario
    ///
    /// Labels follow the first result's periods.
    pub fn net_series(results: &[ProjectionResult]) -> Vec<SeriesPoint> {
        let Some(first) = results.first() else {
            return Vec::new();
        };

        first
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| SeriesPoint {
                label: record.label(first.monthly),
                values: results
                    .iter()
                    .filter_map(|r| r.records.get(index).map(|rec| (r.scenario_id.clone(), rec.net_pay)))
                    .collect(),
            })
            .collect()
    }

    /// Scenario with the highest net pay at a period label
    ///
    /// Ties go to the scenario listed first.
    pub fn best_scenario_at<'r>(results: &'r [ProjectionResult], label: &str) -> Option<&'r str> {
        let mut best: Option<(&str, f64)> = None;
        for result in results {
            if let Some(record) = result.record_for_label(label) {
                if best.map_or(true, |(_, net)| record.net_pay > net) {
                    best = Some((result.scenario_id.as_str(), record.net_pay));
                }
            }
        }
        best.map(|(id, _)| id)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}
