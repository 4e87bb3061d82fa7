//! Simulation inputs, their persisted form and schema migration

mod data;
pub mod loader;
pub mod migrate;

pub use data::{
    GlobalParameters, ProjectionHorizon, Scenario, ScenarioParameters, DEFAULT_GEPI_CAP_MULTIPLE,
    DEFAULT_GEPI_POINTS, DEFAULT_PREVCOM_RATE, DEFAULT_PROJECTION_YEARS, DEFAULT_PUBLIC_CEILING,
    DEFAULT_VI_DAILY_VALUE, DEFAULT_WORKING_DAYS,
};
pub use loader::{load_simulation, save_simulation, Simulation};
pub use migrate::{migrate, migrate_with};
