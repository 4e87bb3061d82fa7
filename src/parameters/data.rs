//! Simulation inputs: per-scenario career parameters and run-wide economic assumptions

use serde::{Deserialize, Serialize};

use crate::assumptions::{CareerTable, Position};
use crate::calendar::YearMonth;
use crate::error::{ensure_non_negative, ensure_rate, EngineResult};

/// Default GEPI point count
pub const DEFAULT_GEPI_POINTS: f64 = 5000.0;

/// Default VI daily value
pub const DEFAULT_VI_DAILY_VALUE: f64 = 179.00;

/// Default working days per month
pub const DEFAULT_WORKING_DAYS: u32 = 20;

/// Default PREVCOM contribution rate
pub const DEFAULT_PREVCOM_RATE: f64 = 0.085;

/// Default GEPI cap, as a multiple of the top rank's base salary
pub const DEFAULT_GEPI_CAP_MULTIPLE: f64 = 1.0;

/// Default public-sector pay ceiling (state judiciary subsidy)
pub const DEFAULT_PUBLIC_CEILING: f64 = 41845.49;

pub const DEFAULT_PROJECTION_YEARS: u32 = 30;

fn default_gepi_points() -> f64 {
    DEFAULT_GEPI_POINTS
}

fn default_vi_daily_value() -> f64 {
    DEFAULT_VI_DAILY_VALUE
}

fn default_working_days() -> u32 {
    DEFAULT_WORKING_DAYS
}

fn default_prevcom_rate() -> f64 {
    DEFAULT_PREVCOM_RATE
}

fn default_gepi_cap_multiple() -> f64 {
    DEFAULT_GEPI_CAP_MULTIPLE
}

fn default_public_ceiling() -> f64 {
    DEFAULT_PUBLIC_CEILING
}

fn default_true() -> bool {
    true
}

/// Parameters of one simulated career track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Position held at the most recent of entry, last promotion and last progression
    pub initial_position: Position,

    pub entry_date: YearMonth,

    /// Defaults to the entry date
    #[serde(default)]
    pub last_promotion: Option<YearMonth>,

    /// Defaults to the entry date
    #[serde(default)]
    pub last_progression: Option<YearMonth>,

    /// Base salary at the initial position replacing the table value
    #[serde(default)]
    pub base_salary_override: Option<f64>,

    #[serde(default = "default_gepi_points")]
    pub gepi_points: f64,

    /// Base-year GEPI point value replacing the table constant
    #[serde(default)]
    pub gepi_point_value: Option<f64>,

    #[serde(default = "default_vi_daily_value")]
    pub vi_daily_value: f64,

    /// Override scales the whole table proportionally (true) or by a fixed offset (false)
    #[serde(default = "default_true")]
    pub repique: bool,
}

impl ScenarioParameters {
    /// Parameters with every optional field at its default
    pub fn new(initial_position: Position, entry_date: YearMonth) -> Self {
        Self {
            initial_position,
            entry_date,
            last_promotion: None,
            last_progression: None,
            base_salary_override: None,
            gepi_points: DEFAULT_GEPI_POINTS,
            gepi_point_value: None,
            vi_daily_value: DEFAULT_VI_DAILY_VALUE,
            repique: true,
        }
    }

    pub fn last_promotion_or_entry(&self) -> YearMonth {
        self.last_promotion.unwrap_or(self.entry_date)
    }

    pub fn last_progression_or_entry(&self) -> YearMonth {
        self.last_progression.unwrap_or(self.entry_date)
    }

    pub fn validate(&self, career: &CareerTable) -> EngineResult<()> {
        career.require(self.initial_position)?;
        for date in [Some(self.entry_date), self.last_promotion, self.last_progression]
            .into_iter()
            .flatten()
        {
            YearMonth::new(date.year, date.month)?;
        }
        ensure_non_negative("gepi_points", self.gepi_points)?;
        if let Some(value) = self.gepi_point_value {
            ensure_non_negative("gepi_point_value", value)?;
        }
        ensure_non_negative("vi_daily_value", self.vi_daily_value)?;
        if let Some(salary) = self.base_salary_override {
            ensure_non_negative("base_salary_override", salary)?;
        }
        Ok(())
    }
}

/// Projection length and resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionHorizon {
    /// One record per year, taken at the starting month
    Years(u32),
    /// One record per month
    Months(u32),
}

impl ProjectionHorizon {
    pub fn periods(&self) -> u32 {
        match self {
            ProjectionHorizon::Years(n) | ProjectionHorizon::Months(n) => *n,
        }
    }

    /// Months between consecutive records
    pub fn step_months(&self) -> i64 {
        match self {
            ProjectionHorizon::Years(_) => 12,
            ProjectionHorizon::Months(_) => 1,
        }
    }
}

impl Default for ProjectionHorizon {
    fn default() -> Self {
        ProjectionHorizon::Years(DEFAULT_PROJECTION_YEARS)
    }
}

/// Assumptions shared by every scenario of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalParameters {
    /// IRRF dependents
    #[serde(default)]
    pub dependents: u32,

    /// Working days per month, for the VI
    #[serde(default = "default_working_days")]
    pub working_days: u32,

    /// Average annual general raise (RGA)
    #[serde(default)]
    pub general_raise_rate: f64,

    /// Average annual growth of the GEPI point value
    #[serde(default)]
    pub gepi_growth_rate: f64,

    /// Average annual inflation, applied to ceilings and brackets
    #[serde(default)]
    pub inflation_rate: f64,

    #[serde(default = "default_gepi_cap_multiple")]
    pub gepi_cap_multiple: f64,

    #[serde(default = "default_public_ceiling")]
    pub public_ceiling: f64,

    #[serde(default = "default_true")]
    pub union_member: bool,

    #[serde(default = "default_true")]
    pub prevcom_member: bool,

    /// Fraction of income above the RPPS reference ceiling
    #[serde(default = "default_prevcom_rate")]
    pub prevcom_rate: f64,

    #[serde(default)]
    pub horizon: ProjectionHorizon,

    /// Ceiling claw-back lowers gross pay (true) or only taxable and net pay (false)
    #[serde(default = "default_true")]
    pub ceiling_reduces_gross: bool,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            dependents: 0,
            working_days: DEFAULT_WORKING_DAYS,
            general_raise_rate: 0.0,
            gepi_growth_rate: 0.0,
            inflation_rate: 0.0,
            gepi_cap_multiple: DEFAULT_GEPI_CAP_MULTIPLE,
            public_ceiling: DEFAULT_PUBLIC_CEILING,
            union_member: true,
            prevcom_member: true,
            prevcom_rate: DEFAULT_PREVCOM_RATE,
            horizon: ProjectionHorizon::default(),
            ceiling_reduces_gross: true,
        }
    }
}

impl GlobalParameters {
    pub fn validate(&self) -> EngineResult<()> {
        ensure_rate("general_raise_rate", self.general_raise_rate)?;
        ensure_rate("gepi_growth_rate", self.gepi_growth_rate)?;
        ensure_rate("inflation_rate", self.inflation_rate)?;
        ensure_non_negative("gepi_cap_multiple", self.gepi_cap_multiple)?;
        ensure_non_negative("public_ceiling", self.public_ceiling)?;
        ensure_non_negative("prevcom_rate", self.prevcom_rate)?;
        Ok(())
    }
}

/// A named scenario as stored by the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub parameters: ScenarioParameters,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn params() -> ScenarioParameters {
        ScenarioParameters::new("I-A".parse().unwrap(), YearMonth::new(2020, 3).unwrap())
    }

    #[test]
    fn test_clock_defaults_to_entry() {
        let p = params();
        assert_eq!(p.last_promotion_or_entry(), p.entry_date);
        assert_eq!(p.last_progression_or_entry(), p.entry_date);
    }

    #[test]
    fn test_optional_fields_default_on_deserialize() {
        let json = r#"{"initial_position": "II-B", "entry_date": {"year": 2018, "month": 7}}"#;
        let p: ScenarioParameters = serde_json::from_str(json).unwrap();
        assert_eq!(p.gepi_points, DEFAULT_GEPI_POINTS);
        assert_eq!(p.vi_daily_value, DEFAULT_VI_DAILY_VALUE);
        assert!(p.repique);
        assert!(p.base_salary_override.is_none());

        let g: GlobalParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(g, GlobalParameters::default());
    }

    #[test]
    fn test_validate_rejects_negative_points() {
        let mut p = params();
        p.gepi_points = -1.0;
        assert!(p.validate(&CareerTable::sef_mg()).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_position() {
        let mut p = params();
        p.initial_position = Position::new(7, 0);
        assert!(p.validate(&CareerTable::sef_mg()).is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_clock_months() {
        let career = CareerTable::sef_mg();
        let json = r#"{
            "initial_position": "I-A",
            "entry_date": {"year": 2018, "month": 7},
            "last_promotion": {"year": 2020, "month": 0}
        }"#;
        let p: ScenarioParameters = serde_json::from_str(json).unwrap();
        assert!(matches!(p.validate(&career), Err(EngineError::InvalidDate { month: 0, .. })));

        let mut p = params();
        p.last_progression = Some(YearMonth { year: 2020, month: 13 });
        assert!(matches!(p.validate(&career), Err(EngineError::InvalidDate { month: 13, .. })));

        p.last_progression = Some(YearMonth::new(2022, 12).unwrap());
        assert!(p.validate(&career).is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_point_value() {
        let mut p = params();
        p.gepi_point_value = Some(-0.5);
        assert!(p.validate(&CareerTable::sef_mg()).is_err());
    }

    #[test]
    fn test_global_validate_allows_zero_states() {
        let g = GlobalParameters {
            working_days: 0,
            dependents: 0,
            prevcom_rate: 0.0,
            ..Default::default()
        };
        assert!(g.validate().is_ok());

        let bad = GlobalParameters { inflation_rate: -1.5, ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_horizon_serde() {
        let h: ProjectionHorizon = serde_json::from_str(r#"{"months": 24}"#).unwrap();
        assert_eq!(h, ProjectionHorizon::Months(24));
        assert_eq!(h.step_months(), 1);
        assert_eq!(ProjectionHorizon::Years(5).periods(), 5);
    }
}
