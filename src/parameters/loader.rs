//! Load and save simulation files (global parameters plus scenarios) as JSON

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::data::{GlobalParameters, Scenario};
use super::migrate::{migrate_scenario, CURRENT_SCHEMA_VERSION};
use crate::assumptions::CareerTable;
use crate::calendar::YearMonth;
use crate::error::EngineResult;

/// Everything one projection run needs besides the tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub global: GlobalParameters,
    pub scenarios: Vec<Scenario>,
}

/// On-disk shape; scenarios stay raw until migrated
#[derive(Debug, Deserialize)]
struct RawSimulation {
    #[serde(default)]
    global: GlobalParameters,
    #[serde(default)]
    scenarios: Vec<Value>,
}

/// Load a simulation from any reader, migrating each scenario
pub fn load_simulation_from_reader<R: Read>(
    reader: R,
    career: &CareerTable,
    fallback_entry: YearMonth,
) -> EngineResult<Simulation> {
    let raw: RawSimulation = serde_json::from_reader(reader)?;
    raw.global.validate()?;

    let scenarios = raw
        .scenarios
        .iter()
        .map(|s| migrate_scenario(s, career, fallback_entry))
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(Simulation {
        global: raw.global,
        scenarios,
    })
}

/// Load a simulation file
pub fn load_simulation<P: AsRef<Path>>(path: P, career: &CareerTable) -> EngineResult<Simulation> {
    let file = File::open(path)?;
    load_simulation_from_reader(BufReader::new(file), career, YearMonth::current())
}

/// Current-schema JSON, each scenario stamped with its schema version
pub fn to_json(simulation: &Simulation) -> EngineResult<Value> {
    let mut value = serde_json::to_value(simulation)?;
    if let Some(scenarios) = value.get_mut("scenarios").and_then(Value::as_array_mut) {
        for scenario in scenarios {
            if let Some(obj) = scenario.as_object_mut() {
                obj.insert("schema_version".to_string(), Value::from(CURRENT_SCHEMA_VERSION));
            }
        }
    }
    Ok(value)
}

pub fn save_simulation_to_writer<W: Write>(writer: W, simulation: &Simulation) -> EngineResult<()> {
    serde_json::to_writer_pretty(writer, &to_json(simulation)?)?;
    Ok(())
}

pub fn save_simulation<P: AsRef<Path>>(path: P, simulation: &Simulation) -> EngineResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    save_simulation_to_writer(&mut writer, simulation)?;
    writer.flush()?;
    Ok(())
}
