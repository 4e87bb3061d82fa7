//! Deduction calculator: RPPS, PREVCOM, IRRF and union due

use serde::{Deserialize, Serialize};

use super::compensation::{AdjustmentFactors, Compensation};
use crate::assumptions::Assumptions;
use crate::parameters::GlobalParameters;

/// Monthly deductions for one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Deductions {
    /// Income the RPPS brackets were applied to
    pub rpps_base: f64,
    pub rpps: f64,
    pub prevcom: f64,
    /// Income the IRRF brackets were applied to
    pub irrf_base: f64,
    pub irrf: f64,
    pub union_due: f64,
    /// Inflation-adjusted RPPS reference ceiling
    pub rpps_reference_ceiling: f64,
}

impl Deductions {
    pub fn total(&self) -> f64 {
        self.rpps + self.prevcom + self.irrf + self.union_due
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeductionCalculator<'a> {
    assumptions: &'a Assumptions,
}

impl<'a> DeductionCalculator<'a> {
    pub fn new(assumptions: &'a Assumptions) -> Self {
        Self { assumptions }
    }

    /// RPPS and PREVCOM contributions on the taxable income
    ///
    /// PREVCOM members contribute to RPPS only up to the reference ceiling
    /// and pay the PREVCOM rate on the excess.
    pub fn pension(&self, taxable_income: f64, global: &GlobalParameters, inflation: f64) -> (f64, f64, f64) {
        let taxable_income = taxable_income.max(0.0);
        let reference_ceiling = self.assumptions.rpps_reference_ceiling * inflation;

        if global.prevcom_member {
            let rpps_base = taxable_income.min(reference_ceiling);
            let prevcom = (global.prevcom_rate * (taxable_income - reference_ceiling).max(0.0))
                .clamp(0.0, taxable_income);
            (rpps_base, self.assumptions.rpps.apply(rpps_base, inflation), prevcom)
        } else {
            (taxable_income, self.assumptions.rpps.apply(taxable_income, inflation), 0.0)
        }
    }

    /// Income tax on what is left after pensions and the dependent deduction
    pub fn income_tax(&self, taxable_income: f64, pensions: f64, global: &GlobalParameters, inflation: f64) -> (f64, f64) {
        let base = (taxable_income
            - pensions
            - global.dependents as f64 * self.assumptions.deduction_per_dependent)
            .max(0.0);
        (base, self.assumptions.irrf.apply(base, inflation))
    }

    /// Union due on the entry rank salary plus the capped GEPI
    pub fn union_due(&self, compensation: &Compensation, global: &GlobalParameters, factors: &AdjustmentFactors) -> f64 {
        if !global.union_member {
            return 0.0;
        }
        let entry_salary = self.assumptions.entry_rank_base_salary() * factors.raise;
        let capped_gepi = compensation.gepi.min(compensation.gepi_cap);
        (self.assumptions.union_due_rate * (entry_salary + capped_gepi)).max(0.0)
    }

    pub fn compute(&self, compensation: &Compensation, global: &GlobalParameters, factors: &AdjustmentFactors) -> Deductions {
        let taxable = compensation.taxable_income;
        let (rpps_base, rpps, prevcom) = self.pension(taxable, global, factors.inflation);
        let (irrf_base, irrf) = self.income_tax(taxable, rpps + prevcom, global, factors.inflation);

        Deductions {
            rpps_base,
            rpps,
            prevcom,
            irrf_base,
            irrf,
            union_due: self.union_due(compensation, global, factors),
            rpps_reference_ceiling: self.assumptions.rpps_reference_ceiling * factors.inflation,
        }
    }
}
