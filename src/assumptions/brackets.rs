//! Tiered bracket tables shared by the pension (RPPS) and income tax (IRRF) calculations
//!
//! Each bracket applies `input * rate - subtracted` to the whole input; the
//! bracket is the first whose upper bound is at or above the input. Bounds
//! and subtracted amounts are scaled by an inflation factor at lookup time.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One row of a bracket table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// Inclusive upper bound, `f64::INFINITY` for the last row
    pub upper_bound: f64,
    pub rate: f64,
    /// Amount subtracted after applying the rate
    pub subtracted: f64,
}

impl Bracket {
    pub const fn new(upper_bound: f64, rate: f64, subtracted: f64) -> Self {
        Self { upper_bound, rate, subtracted }
    }

    fn amount(&self, input: f64, factor: f64) -> f64 {
        input * self.rate - self.subtracted * factor
    }
}

/// Jump in the bracket formula at a boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discontinuity {
    pub bound: f64,
    /// Value of the lower bracket at the bound
    pub below: f64,
    /// Value of the upper bracket at the bound
    pub above: f64,
}

impl Discontinuity {
    pub fn jump(&self) -> f64 {
        self.above - self.below
    }
}

/// Ordered bracket table, last bound unbounded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Validate ordering; the last bound is forced to infinity
    pub fn new(name: &'static str, mut brackets: Vec<Bracket>) -> EngineResult<Self> {
        if brackets.is_empty() {
            return Err(EngineError::EmptyTable(name));
        }
        if brackets.windows(2).any(|w| w[0].upper_bound >= w[1].upper_bound) {
            return Err(EngineError::UnsortedTable(name));
        }
        for b in &brackets {
            crate::error::ensure_non_negative("bracket_rate", b.rate)?;
        }
        if let Some(last) = brackets.last_mut() {
            last.upper_bound = f64::INFINITY;
        }

        let table = Self { brackets };
        for d in table.continuity_report() {
            log::warn!(
                "{} bracket table jumps by {:.6} at bound {:.2}",
                name,
                d.jump(),
                d.bound
            );
        }
        Ok(table)
    }

    /// Monthly withholding income tax table in force from February 2024
    pub fn irrf_2024() -> Self {
        Self {
            brackets: vec![
                Bracket::new(2259.20, 0.0, 0.0),
                Bracket::new(2826.65, 0.075, 169.44),
                Bracket::new(3751.05, 0.15, 381.44),
                Bracket::new(4664.68, 0.225, 662.77),
                Bracket::new(f64::INFINITY, 0.275, 896.00),
            ],
        }
    }

    /// Progressive RPPS contribution table for Minas Gerais servants
    pub fn rpps_mg() -> Self {
        Self {
            brackets: vec![
                Bracket::new(1412.00, 0.11, 0.0),
                Bracket::new(2666.68, 0.12, 14.12),
                Bracket::new(4000.03, 0.14, 67.45),
                Bracket::new(7786.02, 0.16, 147.45),
                Bracket::new(f64::INFINITY, 0.19, 381.03),
            ],
        }
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Bracket applying to `input` with bounds scaled by `factor`
    pub fn lookup(&self, input: f64, factor: f64) -> &Bracket {
        self.brackets
            .iter()
            .find(|b| input <= b.upper_bound * factor)
            .unwrap_or_else(|| &self.brackets[self.brackets.len() - 1])
    }

    /// Apply the table to a non-negative input, clamped to `[0, input]`
    pub fn apply(&self, input: f64, factor: f64) -> f64 {
        if input <= 0.0 {
            return 0.0;
        }
        self.lookup(input, factor).amount(input, factor).clamp(0.0, input)
    }

    /// Boundaries where the formula of the bracket below and above disagree
    pub fn continuity_report(&self) -> Vec<Discontinuity> {
        self.brackets
            .windows(2)
            .filter_map(|w| {
                let bound = w[0].upper_bound;
                let below = w[0].amount(bound, 1.0);
                let above = w[1].amount(bound, 1.0);
                ((above - below).abs() > 1e-9).then_some(Discontinuity { bound, below, above })
            })
            .collect()
    }
}
