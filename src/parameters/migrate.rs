//! Migration of persisted scenario records to the current schema
//!
//! Records written by older front-ends are camelCase, may nest the fields
//! under `parameters`, may lack any optional field, and may carry the
//! legacy `salaryAdjustment`/`gepiAdjustment` percentage instead of a base
//! salary override. Current records carry `schema_version = 2` and the
//! snake_case shape of [`ScenarioParameters`]; an unversioned record in
//! that shape is read as current. A legacy record whose fields are all
//! unknown is rejected rather than projected on defaults.

use serde_json::{Map, Value};

use super::data::{Scenario, ScenarioParameters, DEFAULT_GEPI_POINTS, DEFAULT_VI_DAILY_VALUE};
use crate::assumptions::{CareerTable, Position};
use crate::calendar::YearMonth;
use crate::error::{EngineError, EngineResult};

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Migrate with the built-in career table, defaulting a missing entry date to the current month
pub fn migrate(raw: &Value) -> EngineResult<ScenarioParameters> {
    migrate_with(raw, &CareerTable::sef_mg(), YearMonth::current())
}

/// Migrate a raw record
///
/// `fallback_entry` is used when the record has no entry year at all.
pub fn migrate_with(raw: &Value, career: &CareerTable, fallback_entry: YearMonth) -> EngineResult<ScenarioParameters> {
    let record = raw
        .as_object()
        .ok_or_else(|| EngineError::MalformedRecord("expected a JSON object".to_string()))?;

    let version = match record.get("schema_version") {
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| EngineError::MalformedRecord(format!("schema_version {} is not a version number", v)))?,
        None if is_current_shape(nested_parameters(record)) => CURRENT_SCHEMA_VERSION,
        None => 1,
    };

    let params = match version {
        1 => migrate_legacy(nested_parameters(record), career, fallback_entry)?,
        CURRENT_SCHEMA_VERSION => {
            let body = record.get("parameters").cloned().unwrap_or_else(|| raw.clone());
            serde_json::from_value(body)?
        }
        other => return Err(EngineError::UnsupportedSchema(other)),
    };

    params.validate(career)?;
    Ok(params)
}

/// Migrate a stored scenario (id, name and parameters)
pub fn migrate_scenario(raw: &Value, career: &CareerTable, fallback_entry: YearMonth) -> EngineResult<Scenario> {
    let record = raw
        .as_object()
        .ok_or_else(|| EngineError::MalformedRecord("expected a JSON object".to_string()))?;

    let id = record
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::MalformedRecord("scenario without id".to_string()))?
        .to_string();
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(&id)
        .to_string();

    Ok(Scenario {
        parameters: migrate_with(raw, career, fallback_entry)?,
        id,
        name,
    })
}

/// Keys understood by the legacy migration
const LEGACY_KEYS: &[&str] = &[
    "level",
    "posicaoCarreira",
    "entryYear",
    "anoIngresso",
    "entryMonth",
    "mesIngresso",
    "lastPromotionYear",
    "lastPromotionMonth",
    "lastProgressionYear",
    "lastProgressionMonth",
    "baseSalaryOverride",
    "salarioBaseSobreposto",
    "salaryAdjustment",
    "gepiAdjustment",
    "gepiPoints",
    "gepiPointValue",
    "viDailyValue",
    "repique",
];

/// Legacy per-scenario fields that are run-wide settings now
const GLOBAL_KEYS: &[&str] = &[
    "dependents",
    "workingDays",
    "isSindifiscoMember",
    "isPrevcomMember",
    "prevcomContributionPercentage",
];

/// Envelope keys of a stored scenario
const ENVELOPE_KEYS: &[&str] = &["id", "name", "schema_version", "parameters"];

fn is_current_shape(fields: &Map<String, Value>) -> bool {
    fields.contains_key("initial_position") || fields.contains_key("entry_date")
}

fn nested_parameters(record: &Map<String, Value>) -> &Map<String, Value> {
    record
        .get("parameters")
        .and_then(Value::as_object)
        .unwrap_or(record)
}

fn number(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| fields.get(*k).and_then(Value::as_f64))
}

fn year_month(fields: &Map<String, Value>, year_keys: &[&str], month_keys: &[&str]) -> EngineResult<Option<YearMonth>> {
    let Some(year) = number(fields, year_keys) else {
        return Ok(None);
    };
    let month = number(fields, month_keys).unwrap_or(1.0);
    YearMonth::new(year as i32, month as u32).map(Some)
}

fn migrate_legacy(
    fields: &Map<String, Value>,
    career: &CareerTable,
    fallback_entry: YearMonth,
) -> EngineResult<ScenarioParameters> {
    let unknown: Vec<&str> = fields
        .keys()
        .map(String::as_str)
        .filter(|k| !LEGACY_KEYS.contains(k) && !GLOBAL_KEYS.contains(k) && !ENVELOPE_KEYS.contains(k))
        .collect();
    if !unknown.is_empty() {
        let recognised = ["level", "posicaoCarreira", "entryYear", "anoIngresso"]
            .iter()
            .any(|k| fields.contains_key(*k));
        if !recognised {
            return Err(EngineError::MalformedRecord(format!(
                "no career position or entry year among fields {}",
                unknown.join(", ")
            )));
        }
        log::warn!("Ignoring unknown scenario fields: {}", unknown.join(", "));
    }

    for key in GLOBAL_KEYS.iter().filter(|k| fields.contains_key(**k)) {
        log::warn!(
            "Scenario field {} = {} is a global parameter now and is not migrated",
            key,
            fields[*key]
        );
    }

    let initial_position: Position = match fields
        .get("level")
        .or_else(|| fields.get("posicaoCarreira"))
        .and_then(Value::as_str)
    {
        Some(code) => career.lookup(code)?,
        None => {
            log::warn!("Scenario without a career position, using {}", career.first());
            career.first()
        }
    };

    let entry_date = match year_month(fields, &["entryYear", "anoIngresso"], &["entryMonth", "mesIngresso"])? {
        Some(date) => date,
        None => {
            log::warn!("Scenario without an entry date, using {}", fallback_entry);
            fallback_entry
        }
    };

    let last_promotion = year_month(fields, &["lastPromotionYear"], &["lastPromotionMonth"])?;
    let last_progression = year_month(fields, &["lastProgressionYear"], &["lastProgressionMonth"])?;

    let mut base_salary_override = number(fields, &["baseSalaryOverride", "salarioBaseSobreposto"]);
    if base_salary_override.is_none() {
        let adjustment = match number(fields, &["salaryAdjustment"]) {
            Some(adj) => adj,
            None => {
                let legacy = number(fields, &["gepiAdjustment"]).unwrap_or(0.0);
                if legacy != 0.0 {
                    log::warn!("Mapping legacy gepiAdjustment {} onto the salary adjustment", legacy);
                }
                legacy
            }
        };
        if adjustment != 0.0 {
            let table_salary = career.base_salary(initial_position)?;
            base_salary_override = Some(table_salary * (1.0 + adjustment / 100.0));
        }
    }

    Ok(ScenarioParameters {
        initial_position,
        entry_date,
        last_promotion,
        last_progression,
        base_salary_override,
        gepi_points: number(fields, &["gepiPoints"]).unwrap_or(DEFAULT_GEPI_POINTS),
        gepi_point_value: number(fields, &["gepiPointValue"]),
        vi_daily_value: number(fields, &["viDailyValue"]).unwrap_or(DEFAULT_VI_DAILY_VALUE),
        repique: fields.get("repique").and_then(Value::as_bool).unwrap_or(true),
    })
}
