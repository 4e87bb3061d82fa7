//! ADE performance bonus: percentage of base salary stepped by years of service

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A step of the ADE table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdeStep {
    pub min_years: u32,
    /// Fraction of base salary (0.06 = 6%)
    pub percentage: f64,
}

/// Step table mapping years of service to the ADE percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdeTable {
    /// Strictly increasing `min_years`, non-decreasing `percentage`
    steps: Vec<AdeStep>,
}

impl AdeTable {
    pub fn new(steps: Vec<AdeStep>) -> EngineResult<Self> {
        let unsorted = steps.windows(2).any(|w| {
            w[0].min_years >= w[1].min_years || w[0].percentage > w[1].percentage
        });
        if unsorted {
            return Err(EngineError::UnsortedTable("ade_steps"));
        }
        for step in &steps {
            crate::error::ensure_non_negative("ade_percentage", step.percentage)?;
        }
        Ok(Self { steps })
    }

    /// Build the table from the acquisition cycle rules
    ///
    /// Nothing is paid before `start_years`; the first step is granted at
    /// `start_years` and one more for every completed `cycle_years`, up to
    /// `max_cycles` steps.
    pub fn from_cycles(start_years: u32, cycle_years: u32, percentage_per_cycle: f64, max_cycles: u32) -> Self {
        let steps = (0..max_cycles)
            .map(|cycle| AdeStep {
                min_years: start_years + cycle * cycle_years.max(1),
                percentage: percentage_per_cycle * (cycle + 1) as f64,
            })
            .collect();
        Self { steps }
    }

    /// SEF/MG default: 6% per 5-year cycle from year 3, at most 5 cycles
    pub fn sef_mg() -> Self {
        Self::from_cycles(3, 5, 0.06, 5)
    }

    pub fn steps(&self) -> &[AdeStep] {
        &self.steps
    }

    /// Percentage of the greatest step reached, 0 below the first step
    pub fn resolve(&self, years_of_service: u32) -> f64 {
        self.steps
            .iter()
            .take_while(|step| step.min_years <= years_of_service)
            .last()
            .map(|step| step.percentage)
            .unwrap_or(0.0)
    }
}

impl Default for AdeTable {
    fn default() -> Self {
        Self::sef_mg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_no_ade_during_first_years() {
        let ade = AdeTable::sef_mg();
        assert_eq!(ade.resolve(0), 0.0);
        assert_eq!(ade.resolve(2), 0.0);
    }

    #[test]
    fn test_cycle_steps() {
        let ade = AdeTable::sef_mg();
        assert_abs_diff_eq!(ade.resolve(3), 0.06, epsilon = 1e-12);
        assert_abs_diff_eq!(ade.resolve(7), 0.06, epsilon = 1e-12);
        assert_abs_diff_eq!(ade.resolve(8), 0.12, epsilon = 1e-12);
        assert_abs_diff_eq!(ade.resolve(23), 0.30, epsilon = 1e-12);
        // Capped after the last cycle
        assert_abs_diff_eq!(ade.resolve(40), 0.30, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_table_pays_nothing() {
        let ade = AdeTable::new(vec![]).unwrap();
        assert_eq!(ade.resolve(30), 0.0);
    }

    #[test]
    fn test_new_rejects_decreasing_percentage() {
        let steps = vec![
            AdeStep { min_years: 1, percentage: 0.10 },
            AdeStep { min_years: 2, percentage: 0.05 },
        ];
        assert!(AdeTable::new(steps).is_err());
    }

    proptest! {
        #[test]
        fn prop_ade_monotonic(a in 0u32..60, b in 0u32..60) {
            let ade = AdeTable::sef_mg();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ade.resolve(lo) <= ade.resolve(hi));
        }
    }
}
