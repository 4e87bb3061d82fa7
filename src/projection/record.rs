//! Projection output structures

use serde::{Deserialize, Serialize};

use crate::assumptions::Position;
use crate::calendar::YearMonth;

/// Months of pay in a year counting the 13th salary and the vacation third
pub const ANNUAL_FACTOR: f64 = 12.0 + 1.0 + 1.0 / 3.0;

/// Full monthly breakdown for one projected period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    // Timing
    pub period_index: u32,
    pub year: i32,
    pub month: u32,
    pub service_years: u32,

    // Career
    pub position: Position,
    pub promotions: u32,
    pub progressions: u32,

    // Earnings
    pub base_salary: f64,
    pub gepi_point_value: f64,
    pub gepi: f64,
    pub gepi_over_cap: f64,
    pub gepi_paid: f64,
    pub vi: f64,
    pub ade_percentage: f64,
    pub ade: f64,
    pub over_ceiling: f64,
    pub taxable_income: f64,
    pub gross_pay: f64,

    // Deductions
    pub rpps_base: f64,
    pub rpps: f64,
    pub prevcom: f64,
    pub irrf_base: f64,
    pub irrf: f64,
    pub union_due: f64,

    pub net_pay: f64,

    // Adjusted references used for this period
    pub raise_factor: f64,
    pub gepi_growth_factor: f64,
    pub inflation_factor: f64,
    pub gepi_cap: f64,
    pub public_ceiling: f64,
    pub rpps_reference_ceiling: f64,
    pub irrf_exempt_bound: f64,
}

impl PeriodRecord {
    pub fn target(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }

    /// Label used to key chart series, `YYYY` for yearly and `YYYY-MM` for monthly runs
    pub fn label(&self, monthly: bool) -> String {
        if monthly {
            self.target().to_string()
        } else {
            self.year.to_string()
        }
    }

    pub fn total_deductions(&self) -> f64 {
        self.rpps + self.prevcom + self.irrf + self.union_due
    }

    /// Twelve monthly gross payments
    pub fn annual_gross(&self) -> f64 {
        self.gross_pay * 12.0
    }

    /// Thirteen monthly net payments (with the 13th salary)
    pub fn annual_net(&self) -> f64 {
        self.net_pay * 13.0
    }

    /// Taxable pay over a year including the 13th salary and vacation third
    pub fn annual_gross_with_benefits(&self) -> f64 {
        self.taxable_income * ANNUAL_FACTOR
    }

    /// Value in money of the projection start
    pub fn deflated(&self, value: f64) -> f64 {
        if self.inflation_factor > 0.0 {
            value / self.inflation_factor
        } else {
            value
        }
    }

    /// Copy with every monetary field deflated to the projection start
    pub fn in_present_value(&self) -> PeriodRecord {
        let d = |v: f64| self.deflated(v);
        PeriodRecord {
            base_salary: d(self.base_salary),
            gepi_point_value: d(self.gepi_point_value),
            gepi: d(self.gepi),
            gepi_over_cap: d(self.gepi_over_cap),
            gepi_paid: d(self.gepi_paid),
            vi: d(self.vi),
            ade: d(self.ade),
            over_ceiling: d(self.over_ceiling),
            taxable_income: d(self.taxable_income),
            gross_pay: d(self.gross_pay),
            rpps_base: d(self.rpps_base),
            rpps: d(self.rpps),
            prevcom: d(self.prevcom),
            irrf_base: d(self.irrf_base),
            irrf: d(self.irrf),
            union_due: d(self.union_due),
            net_pay: d(self.net_pay),
            gepi_cap: d(self.gepi_cap),
            public_ceiling: d(self.public_ceiling),
            rpps_reference_ceiling: d(self.rpps_reference_ceiling),
            irrf_exempt_bound: d(self.irrf_exempt_bound),
            ..self.clone()
        }
    }
}

/// Complete projection of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub scenario_id: String,

    /// True when records are monthly rather than yearly
    pub monthly: bool,

    pub records: Vec<PeriodRecord>,
}

impl ProjectionResult {
    pub fn new(scenario_id: impl Into<String>, monthly: bool) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            monthly,
            records: Vec::new(),
        }
    }

    pub fn add_record(&mut self, record: PeriodRecord) {
        self.records.push(record);
    }

    /// Record for one period, for detail views
    pub fn record_for(&self, target: YearMonth) -> Option<&PeriodRecord> {
        self.records.iter().find(|r| r.target() == target)
    }

    /// Record whose label matches (`YYYY` or `YYYY-MM`)
    pub fn record_for_label(&self, label: &str) -> Option<&PeriodRecord> {
        self.records.iter().find(|r| r.label(self.monthly) == label)
    }

    /// Same projection expressed in money of the projection start
    pub fn in_present_value(&self) -> ProjectionResult {
        ProjectionResult {
            scenario_id: self.scenario_id.clone(),
            monthly: self.monthly,
            records: self.records.iter().map(PeriodRecord::in_present_value).collect(),
        }
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_gross: f64 = self.records.iter().map(|r| r.gross_pay).sum();
        let total_net: f64 = self.records.iter().map(|r| r.net_pay).sum();
        let total_deductions: f64 = self.records.iter().map(|r| r.total_deductions()).sum();
        let total_clawbacks: f64 = self.records.iter().map(|r| r.gepi_over_cap + r.over_ceiling).sum();

        let last = self.records.last();

        ProjectionSummary {
            periods: self.records.len() as u32,
            total_gross,
            total_net,
            total_deductions,
            total_clawbacks,
            final_position: last.map(|r| r.position),
            final_net: last.map(|r| r.net_pay).unwrap_or(0.0),
            promotions: last.map(|r| r.promotions).unwrap_or(0),
            progressions: last.map(|r| r.progressions).unwrap_or(0),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub periods: u32,
    pub total_gross: f64,
    pub total_net: f64,
    pub total_deductions: f64,
    pub total_clawbacks: f64,
    pub final_position: Option<Position>,
    pub final_net: f64,
    pub promotions: u32,
    pub progressions: u32,
}
