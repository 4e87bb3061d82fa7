//! CSV-based table loader
//!
//! Loads the career, bracket and ADE tables from CSV files in data/tables/

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::{AdeStep, AdeTable, Bracket, BracketTable, CareerTable, Position};
use crate::error::EngineResult;

/// Default path to the tables directory
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

pub const CAREER_TABLE_FILE: &str = "career_table.csv";
pub const RPPS_BRACKETS_FILE: &str = "rpps_brackets.csv";
pub const IRRF_BRACKETS_FILE: &str = "irrf_brackets.csv";
pub const ADE_STEPS_FILE: &str = "ade_steps.csv";

#[derive(Debug, Deserialize)]
struct CareerRow {
    position: String,
    base_salary: f64,
}

/// Empty `upper_bound` marks the unbounded last bracket
#[derive(Debug, Deserialize)]
struct BracketRow {
    upper_bound: Option<f64>,
    rate: f64,
    subtracted: f64,
}

#[derive(Debug, Deserialize)]
struct AdeRow {
    min_years: u32,
    percentage: f64,
}

/// Load a career table (`position,base_salary`)
pub fn load_career_table_from_reader<R: Read>(reader: R) -> EngineResult<CareerTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CareerRow = result?;
        let position: Position = row.position.parse()?;
        entries.push((position, row.base_salary));
    }

    CareerTable::new(entries)
}

/// Load a bracket table (`upper_bound,rate,subtracted`)
pub fn load_brackets_from_reader<R: Read>(name: &'static str, reader: R) -> EngineResult<BracketTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut brackets = Vec::new();

    for result in csv_reader.deserialize() {
        let row: BracketRow = result?;
        brackets.push(Bracket::new(
            row.upper_bound.unwrap_or(f64::INFINITY),
            row.rate,
            row.subtracted,
        ));
    }

    BracketTable::new(name, brackets)
}

/// Load ADE steps (`min_years,percentage`)
pub fn load_ade_steps_from_reader<R: Read>(reader: R) -> EngineResult<AdeTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut steps = Vec::new();

    for result in csv_reader.deserialize() {
        let row: AdeRow = result?;
        steps.push(AdeStep {
            min_years: row.min_years,
            percentage: row.percentage,
        });
    }

    AdeTable::new(steps)
}

/// All tables loaded from one directory
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub career: CareerTable,
    pub rpps: BracketTable,
    pub irrf: BracketTable,
    pub ade: AdeTable,
}

impl LoadedTables {
    /// Load all tables from the default path
    pub fn load_default() -> EngineResult<Self> {
        Self::load_from(Path::new(DEFAULT_TABLES_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> EngineResult<Self> {
        log::debug!("Loading tables from {}", path.display());
        Ok(Self {
            career: load_career_table_from_reader(std::fs::File::open(path.join(CAREER_TABLE_FILE))?)?,
            rpps: load_brackets_from_reader("rpps", std::fs::File::open(path.join(RPPS_BRACKETS_FILE))?)?,
            irrf: load_brackets_from_reader("irrf", std::fs::File::open(path.join(IRRF_BRACKETS_FILE))?)?,
            ade: load_ade_steps_from_reader(std::fs::File::open(path.join(ADE_STEPS_FILE))?)?,
        })
    }
}
