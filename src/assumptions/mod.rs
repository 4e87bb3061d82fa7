//! Remuneration tables and fixed rules: career, ADE, RPPS and IRRF

mod ade;
mod brackets;
mod career;
pub mod loader;

pub use ade::{AdeStep, AdeTable};
pub use brackets::{Bracket, BracketTable, Discontinuity};
pub use career::{CareerRules, CareerTable, Position};
pub use loader::LoadedTables;

use std::path::Path;

use crate::error::EngineResult;

/// Value of one GEPI point in the base year
pub const GEPI_POINT_VALUE: f64 = 3.90;

/// IRRF deduction per dependent
pub const DEDUCTION_PER_DEPENDENT: f64 = 189.59;

/// RGPS ceiling: RPPS base limit for PREVCOM members
pub const RPPS_REFERENCE_CEILING: f64 = 7786.02;

/// Union due as a fraction of entry base salary plus capped GEPI
pub const UNION_DUE_RATE: f64 = 0.01;

/// Container for every table the engine reads
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub career: CareerTable,
    pub rules: CareerRules,
    pub ade: AdeTable,
    pub rpps: BracketTable,
    pub irrf: BracketTable,
    pub gepi_point_value: f64,
    pub deduction_per_dependent: f64,
    pub rpps_reference_ceiling: f64,
    pub union_due_rate: f64,
}

impl Assumptions {
    /// Built-in SEF/MG tables
    pub fn sef_mg() -> Self {
        Self {
            career: CareerTable::sef_mg(),
            rules: CareerRules::default(),
            ade: AdeTable::sef_mg(),
            rpps: BracketTable::rpps_mg(),
            irrf: BracketTable::irrf_2024(),
            gepi_point_value: GEPI_POINT_VALUE,
            deduction_per_dependent: DEDUCTION_PER_DEPENDENT,
            rpps_reference_ceiling: RPPS_REFERENCE_CEILING,
            union_due_rate: UNION_DUE_RATE,
        }
    }

    /// Load tables from CSV files in the default location (data/tables/)
    pub fn from_csv() -> EngineResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_TABLES_PATH))
    }

    /// Load tables from CSV files in a specific directory, keeping built-in scalars
    pub fn from_csv_path(path: &Path) -> EngineResult<Self> {
        let loaded = LoadedTables::load_from(path)?;

        Ok(Self {
            career: loaded.career,
            ade: loaded.ade,
            rpps: loaded.rpps,
            irrf: loaded.irrf,
            ..Self::sef_mg()
        })
    }

    /// Nominal base salary of the top position, reference for the GEPI cap
    pub fn top_rank_base_salary(&self) -> f64 {
        self.career
            .base_salary(self.career.top())
            .unwrap_or_default()
    }

    /// Nominal base salary of the entry position, reference for the union due
    pub fn entry_rank_base_salary(&self) -> f64 {
        self.career
            .base_salary(self.career.first())
            .unwrap_or_default()
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::sef_mg()
    }
}
