//! Month-resolution calendar used by the projection

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A (year, month) pair, month 1-12
///
/// Field order matters: the derived ordering compares year first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Create a validated year/month
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidDate { year, month });
        }
        Ok(Self { year, month })
    }

    /// January of the given year
    pub fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    /// Month containing today's local date
    pub fn current() -> Self {
        Self::from(Local::now().date_naive())
    }

    /// Absolute month count since year 0
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Signed number of months from `earlier` to `self`
    pub fn months_since(&self, earlier: YearMonth) -> i64 {
        self.index() - earlier.index()
    }

    pub fn add_months(&self, months: i64) -> Self {
        Self::from_index(self.index() + months)
    }

    /// Whole years elapsed since `earlier`, zero when `earlier` is in the future
    pub fn whole_years_since(&self, earlier: YearMonth) -> u32 {
        (self.months_since(earlier).max(0) / 12) as u32
    }

    /// Fractional years since `earlier`, used for compounding
    pub fn years_since(&self, earlier: YearMonth) -> f64 {
        self.months_since(earlier) as f64 / 12.0
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Parses `YYYY-MM`, or `YYYY` meaning January
impl FromStr for YearMonth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::MalformedRecord(format!("expected YYYY-MM, got {:?}", s));
        let (year, month) = match s.trim().split_once('-') {
            Some((y, m)) => (y, m.parse::<u32>().map_err(|_| invalid())?),
            None => (s.trim(), 1),
        };
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_across_year_boundary() {
        let dec = YearMonth::new(2024, 12).unwrap();
        let jan = dec.add_months(1);
        assert_eq!(jan, YearMonth::new(2025, 1).unwrap());
        assert_eq!(jan.months_since(dec), 1);
        assert_eq!(dec.add_months(-12), YearMonth::new(2023, 12).unwrap());
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
    }

    #[test]
    fn test_whole_years_clamped_at_zero() {
        let entry = YearMonth::new(2030, 6).unwrap();
        let target = YearMonth::new(2025, 6).unwrap();
        assert_eq!(target.whole_years_since(entry), 0);

        let later = YearMonth::new(2035, 5).unwrap();
        assert_eq!(later.whole_years_since(entry), 4);
    }

    #[test]
    fn test_ordering_and_display() {
        let a = YearMonth::new(2024, 11).unwrap();
        let b = YearMonth::new(2025, 2).unwrap();
        assert!(a < b);
        assert_eq!(b.to_string(), "2025-02");
    }

    #[test]
    fn test_parse() {
        assert_eq!("2031-07".parse::<YearMonth>().unwrap(), YearMonth::new(2031, 7).unwrap());
        assert_eq!("2031".parse::<YearMonth>().unwrap(), YearMonth::january(2031));
        assert!("2031-13".parse::<YearMonth>().is_err());
        assert!("july".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_from_naive_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(YearMonth::from(date), YearMonth::new(2026, 10).unwrap());
    }
}
