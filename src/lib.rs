//! Remuneration projection engine for SEF/MG tax auditor careers
//!
//! This library provides:
//! - Career position resolution (probation, grade progression, level promotion)
//! - ADE performance bonus by years of service
//! - Compensation assembly with GEPI cap and public-sector ceiling claw-backs
//! - RPPS, PREVCOM, IRRF and union deductions with inflation-adjusted brackets
//! - Multi-decade yearly or monthly projections and multi-scenario comparison
//! - Migration of persisted scenario records to the current schema

pub mod assumptions;
pub mod calendar;
pub mod error;
pub mod parameters;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::{Assumptions, BracketTable, CareerTable, Position};
pub use calendar::YearMonth;
pub use error::{EngineError, EngineResult};
pub use parameters::{GlobalParameters, ProjectionHorizon, Scenario, ScenarioParameters};
pub use projection::{PeriodRecord, ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use scenario::ScenarioRunner;
