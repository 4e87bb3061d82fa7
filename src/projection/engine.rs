//! Projection driver: one independent breakdown per period from the start month

use rayon::prelude::*;

use super::compensation::{AdjustmentFactors, CompensationAssembler};
use super::deductions::DeductionCalculator;
use super::position::PositionResolver;
use super::record::{PeriodRecord, ProjectionResult};
use crate::assumptions::Assumptions;
use crate::calendar::YearMonth;
use crate::error::{EngineError, EngineResult};
use crate::parameters::{GlobalParameters, ProjectionHorizon, Scenario, ScenarioParameters};

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Month of period 0 ("now")
    pub start: YearMonth,

    /// Compute periods on the rayon pool
    pub parallel: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            start: YearMonth::current(),
            parallel: true,
        }
    }
}

impl ProjectionConfig {
    pub fn starting_at(start: YearMonth) -> Self {
        Self {
            start,
            ..Default::default()
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Target month of a period index
    pub fn target_for(&self, horizon: ProjectionHorizon, period_index: u32) -> YearMonth {
        self.config
            .start
            .add_months(period_index as i64 * horizon.step_months())
    }

    /// Run projection for a scenario
    pub fn project(&self, global: &GlobalParameters, scenario: &ScenarioParameters) -> EngineResult<ProjectionResult> {
        self.project_with_id("", global, scenario)
    }

    /// Run projection for a stored scenario, tagging the result with its id
    pub fn project_scenario(&self, global: &GlobalParameters, scenario: &Scenario) -> EngineResult<ProjectionResult> {
        self.project_with_id(&scenario.id, global, &scenario.parameters)
    }

    fn project_with_id(
        &self,
        scenario_id: &str,
        global: &GlobalParameters,
        scenario: &ScenarioParameters,
    ) -> EngineResult<ProjectionResult> {
        global.validate()?;
        scenario.validate(&self.assumptions.career)?;

        let horizon = global.horizon;
        let monthly = matches!(horizon, ProjectionHorizon::Months(_));
        log::info!(
            "Projecting scenario {:?}: {} periods from {}",
            scenario_id,
            horizon.periods(),
            self.config.start
        );

        let compute = |i: u32| self.compute_period(global, scenario, i, self.target_for(horizon, i));
        let records: Vec<PeriodRecord> = if self.config.parallel {
            (0..horizon.periods())
                .into_par_iter()
                .map(compute)
                .collect::<EngineResult<_>>()?
        } else {
            (0..horizon.periods()).map(compute).collect::<EngineResult<_>>()?
        };

        let mut result = ProjectionResult::new(scenario_id, monthly);
        for record in records {
            result.add_record(record);
        }

        log::info!("Projection of {:?} complete: {} records", scenario_id, result.records.len());
        Ok(result)
    }

    /// Breakdown for a single month, independent of any other period
    ///
    /// The period index counts horizon steps from the start, so a month on
    /// the projection grid reproduces the projected record exactly.
    pub fn compute_at(
        &self,
        global: &GlobalParameters,
        scenario: &ScenarioParameters,
        target: YearMonth,
    ) -> EngineResult<PeriodRecord> {
        global.validate()?;
        scenario.validate(&self.assumptions.career)?;
        let months = target.months_since(self.config.start).max(0);
        let index = u32::try_from(months / global.horizon.step_months()).map_err(|_| EngineError::InvalidDate {
            year: target.year,
            month: target.month,
        })?;
        self.compute_period(global, scenario, index, target)
    }

    fn compute_period(
        &self,
        global: &GlobalParameters,
        scenario: &ScenarioParameters,
        period_index: u32,
        target: YearMonth,
    ) -> EngineResult<PeriodRecord> {
        let resolution = PositionResolver::new(&self.assumptions.career, self.assumptions.rules)
            .resolve_for(scenario, target)?;

        let elapsed_years = target.years_since(self.config.start).max(0.0);
        let factors = AdjustmentFactors::at(global, elapsed_years);
        let service_years = target.whole_years_since(scenario.entry_date);

        let compensation = CompensationAssembler::new(&self.assumptions).assemble(
            resolution.position,
            scenario,
            global,
            &factors,
            service_years,
        )?;
        let deductions = DeductionCalculator::new(&self.assumptions).compute(&compensation, global, &factors);

        let net_pay = compensation.gross_pay
            - deductions.total()
            - compensation.clawbacks_outside_gross(global);

        log::debug!(
            "{} {}: gross {:.2} net {:.2}",
            target,
            resolution.position,
            compensation.gross_pay,
            net_pay
        );

        let irrf_exempt_bound = self
            .assumptions
            .irrf
            .brackets()
            .first()
            .map(|b| b.upper_bound * factors.inflation)
            .unwrap_or(0.0);

        Ok(PeriodRecord {
            period_index,
            year: target.year,
            month: target.month,
            service_years,
            position: resolution.position,
            promotions: resolution.promotions,
            progressions: resolution.progressions,
            base_salary: compensation.base_salary,
            gepi_point_value: compensation.gepi_point_value,
            gepi: compensation.gepi,
            gepi_over_cap: compensation.gepi_over_cap,
            gepi_paid: compensation.gepi_paid(),
            vi: compensation.vi,
            ade_percentage: compensation.ade_percentage,
            ade: compensation.ade,
            over_ceiling: compensation.over_ceiling,
            taxable_income: compensation.taxable_income,
            gross_pay: compensation.gross_pay,
            rpps_base: deductions.rpps_base,
            rpps: deductions.rpps,
            prevcom: deductions.prevcom,
            irrf_base: deductions.irrf_base,
            irrf: deductions.irrf,
            union_due: deductions.union_due,
            net_pay,
            raise_factor: factors.raise,
            gepi_growth_factor: factors.gepi_growth,
            inflation_factor: factors.inflation,
            gepi_cap: compensation.gepi_cap,
            public_ceiling: compensation.public_ceiling,
            rpps_reference_ceiling: deductions.rpps_reference_ceiling,
            irrf_exempt_bound,
        })
    }
}
