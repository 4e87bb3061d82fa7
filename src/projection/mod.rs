//! Remuneration projection: position, compensation, deductions and the period driver

mod compensation;
mod deductions;
mod engine;
mod position;
mod record;

pub use compensation::{AdjustmentFactors, Compensation, CompensationAssembler};
pub use deductions::{DeductionCalculator, Deductions};
pub use engine::{ProjectionConfig, ProjectionEngine};
pub use position::{PositionResolution, PositionResolver};
pub use record::{PeriodRecord, ProjectionResult, ProjectionSummary, ANNUAL_FACTOR};
