//! Compensation assembler: base salary, GEPI, VI and ADE with cap and ceiling claw-backs

use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, Position};
use crate::error::EngineResult;
use crate::parameters::{GlobalParameters, ScenarioParameters};

/// Compounded adjustment factors after some elapsed years
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    /// General raise (RGA), applied to salaries and the GEPI point
    pub raise: f64,
    /// Extra growth of the GEPI point value
    pub gepi_growth: f64,
    /// Inflation, applied to ceilings and bracket bounds
    pub inflation: f64,
}

impl AdjustmentFactors {
    pub fn at(global: &GlobalParameters, elapsed_years: f64) -> Self {
        Self {
            raise: (1.0 + global.general_raise_rate).powf(elapsed_years),
            gepi_growth: (1.0 + global.gepi_growth_rate).powf(elapsed_years),
            inflation: (1.0 + global.inflation_rate).powf(elapsed_years),
        }
    }

    pub fn identity() -> Self {
        Self {
            raise: 1.0,
            gepi_growth: 1.0,
            inflation: 1.0,
        }
    }
}

/// Monthly pay components for one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    /// Rescaled and raised base salary
    pub base_salary: f64,
    pub gepi_point_value: f64,
    /// GEPI before the cap
    pub gepi: f64,
    /// Inflation-adjusted GEPI cap
    pub gepi_cap: f64,
    pub gepi_over_cap: f64,
    pub vi: f64,
    pub ade_percentage: f64,
    pub ade: f64,
    /// Inflation-adjusted public-sector ceiling
    pub public_ceiling: f64,
    pub over_ceiling: f64,
    pub taxable_income: f64,
    pub gross_pay: f64,
}

impl Compensation {
    /// GEPI actually paid after the cap
    pub fn gepi_paid(&self) -> f64 {
        self.gepi - self.gepi_over_cap
    }

    /// Claw-backs not already removed from gross pay
    pub fn clawbacks_outside_gross(&self, global: &GlobalParameters) -> f64 {
        if global.ceiling_reduces_gross {
            0.0
        } else {
            self.gepi_over_cap + self.over_ceiling
        }
    }
}

/// Builds [`Compensation`] from a resolved position and the run parameters
#[derive(Debug, Clone, Copy)]
pub struct CompensationAssembler<'a> {
    assumptions: &'a Assumptions,
}

impl<'a> CompensationAssembler<'a> {
    pub fn new(assumptions: &'a Assumptions) -> Self {
        Self { assumptions }
    }

    /// Nominal base salary of `position`, rescaled by the scenario override
    ///
    /// The override replaces the table value at the initial position. With
    /// repique the whole table scales by the same ratio, otherwise every
    /// position shifts by the same difference.
    pub fn nominal_base_salary(&self, position: Position, scenario: &ScenarioParameters) -> EngineResult<f64> {
        let career = &self.assumptions.career;
        let table_salary = career.base_salary(position)?;

        let Some(override_salary) = scenario.base_salary_override else {
            return Ok(table_salary);
        };
        let initial_salary = career.base_salary(scenario.initial_position)?;

        let rescaled = if scenario.repique {
            if initial_salary > 0.0 {
                table_salary * override_salary / initial_salary
            } else {
                override_salary
            }
        } else {
            table_salary + (override_salary - initial_salary)
        };
        Ok(rescaled.max(0.0))
    }

    pub fn assemble(
        &self,
        position: Position,
        scenario: &ScenarioParameters,
        global: &GlobalParameters,
        factors: &AdjustmentFactors,
        service_years: u32,
    ) -> EngineResult<Compensation> {
        let base_salary = self.nominal_base_salary(position, scenario)? * factors.raise;

        let gepi_point_value = scenario
            .gepi_point_value
            .unwrap_or(self.assumptions.gepi_point_value)
            * factors.gepi_growth
            * factors.raise;
        let gepi = scenario.gepi_points * gepi_point_value;

        let ade_percentage = self.assumptions.ade.resolve(service_years);
        let ade = base_salary * ade_percentage;

        let vi = global.working_days as f64 * scenario.vi_daily_value;

        let gepi_cap = global.gepi_cap_multiple * self.assumptions.top_rank_base_salary() * factors.inflation;
        let gepi_over_cap = (gepi - gepi_cap).max(0.0);

        let public_ceiling = global.public_ceiling * factors.inflation;
        let over_ceiling = (base_salary + gepi - gepi_over_cap + ade - public_ceiling).max(0.0);

        if gepi_over_cap > 0.0 || over_ceiling > 0.0 {
            log::debug!(
                "{}: GEPI over cap {:.2}, over ceiling {:.2}",
                position,
                gepi_over_cap,
                over_ceiling
            );
        }

        let taxable_income = base_salary + gepi + ade - gepi_over_cap - over_ceiling;
        let gross_pay = if global.ceiling_reduces_gross {
            taxable_income + vi
        } else {
            base_salary + gepi + ade + vi
        };

        Ok(Compensation {
            base_salary,
            gepi_point_value,
            gepi,
            gepi_cap,
            gepi_over_cap,
            vi,
            ade_percentage,
            ade,
            public_ceiling,
            over_ceiling,
            taxable_income,
            gross_pay,
        })
    }
}
