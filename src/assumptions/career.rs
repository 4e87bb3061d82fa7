//! Career table: positions (level + grade) and their base salaries

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const ROMAN_LEVELS: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

/// A career position such as `II-C` (level II, grade C)
///
/// Ordering is by level, then grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Level, 1-indexed (I = 1)
    pub level: u8,
    /// Grade letter, A = 0
    pub grade: u8,
}

impl Position {
    pub fn new(level: u8, grade: u8) -> Self {
        Self { level, grade }
    }

    pub fn code(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPositionCode(code.to_string());

        let (level, grade) = code.trim().split_once('-').ok_or_else(invalid)?;
        let level = ROMAN_LEVELS
            .iter()
            .position(|roman| roman.eq_ignore_ascii_case(level.trim()))
            .ok_or_else(invalid)?;

        let mut chars = grade.trim().chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => return Err(invalid()),
        };

        Ok(Position::new(level as u8 + 1, letter as u8 - b'A'))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roman = self
            .level
            .checked_sub(1)
            .and_then(|i| ROMAN_LEVELS.get(i as usize))
            .copied()
            .unwrap_or("?");
        let letter = b'A'
            .checked_add(self.grade)
            .filter(u8::is_ascii_uppercase)
            .map(char::from)
            .unwrap_or('?');
        write!(f, "{}-{}", roman, letter)
    }
}

impl Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Career progression timing rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CareerRules {
    /// Initial probation, during which rank never advances
    pub probation_years: u32,
    /// Years between promotions, on top of the probation term
    pub years_for_promotion: u32,
    /// Years between grade progressions within a level
    pub years_for_progression: u32,
}

impl Default for CareerRules {
    fn default() -> Self {
        Self {
            probation_years: 3,
            years_for_promotion: 5,
            years_for_progression: 2,
        }
    }
}

impl CareerRules {
    pub fn probation_months(&self) -> i64 {
        self.probation_years as i64 * 12
    }

    pub fn promotion_months(&self) -> i64 {
        (self.years_for_promotion + self.probation_years) as i64 * 12
    }

    pub fn progression_months(&self) -> i64 {
        self.years_for_progression as i64 * 12
    }
}

/// Ordered mapping from position to nominal base salary
#[derive(Debug, Clone, PartialEq)]
pub struct CareerTable {
    /// Sorted by position, no duplicates
    entries: Vec<(Position, f64)>,
}

impl CareerTable {
    /// Build a table, sorting by position
    pub fn new(mut entries: Vec<(Position, f64)>) -> EngineResult<Self> {
        if entries.is_empty() {
            return Err(EngineError::EmptyTable("career_table"));
        }
        for (_, salary) in &entries {
            crate::error::ensure_non_negative("base_salary", *salary)?;
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        if entries.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(EngineError::UnsortedTable("career_table"));
        }
        Ok(Self { entries })
    }

    /// SEF/MG tax auditor table: levels I-IV, grades A-D
    pub fn sef_mg() -> Self {
        let salaries = [
            6155.78, 6771.36, 7448.49, 8193.34, // I
            9012.67, 9913.94, 10905.33, 11995.87, // II
            13195.45, 14515.00, 15966.50, 17563.15, // III
            19319.46, 21251.41, 23376.55, 25714.21, // IV
        ];
        let entries = salaries
            .iter()
            .enumerate()
            .map(|(i, &salary)| (Position::new(i as u8 / 4 + 1, i as u8 % 4), salary))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }

    pub fn contains(&self, position: Position) -> bool {
        self.index_of(position).is_some()
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        self.entries.binary_search_by(|(p, _)| p.cmp(&position)).ok()
    }

    /// Parse a code and check it belongs to the table
    pub fn lookup(&self, code: &str) -> EngineResult<Position> {
        let position: Position = code.parse()?;
        self.require(position)?;
        Ok(position)
    }

    pub fn require(&self, position: Position) -> EngineResult<()> {
        if self.contains(position) {
            Ok(())
        } else {
            Err(EngineError::UnknownPosition(position.code()))
        }
    }

    /// Nominal base salary for a position
    pub fn base_salary(&self, position: Position) -> EngineResult<f64> {
        self.index_of(position)
            .map(|i| self.entries[i].1)
            .ok_or_else(|| EngineError::UnknownPosition(position.code()))
    }

    /// Entry-level position (first in order)
    pub fn first(&self) -> Position {
        self.entries[0].0
    }

    /// Top position (last in order)
    pub fn top(&self) -> Position {
        self.entries[self.entries.len() - 1].0
    }

    /// First grade of the next level, `None` at the top level
    pub fn promote(&self, position: Position) -> Option<Position> {
        self.positions().find(|p| p.level > position.level)
    }

    /// Next grade within the same level, `None` at the level's last grade
    pub fn progress(&self, position: Position) -> Option<Position> {
        self.positions()
            .find(|p| p.level == position.level && p.grade > position.grade)
    }
}

impl Default for CareerTable {
    fn default() -> Self {
        Self::sef_mg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_out_of_range_grade() {
        assert_eq!(Position::new(1, 25).to_string(), "I-Z");
        assert_eq!(Position::new(1, 26).to_string(), "I-?");
        assert_eq!(Position::new(2, 255).to_string(), "II-?");
        assert_eq!(Position::new(0, 0).to_string(), "?-A");
    }

    #[test]
    fn test_parse_and_display() {
        let p: Position = "II-C".parse().unwrap();
        assert_eq!(p, Position::new(2, 2));
        assert_eq!(p.to_string(), "II-C");
        assert_eq!("iv-a".parse::<Position>().unwrap(), Position::new(4, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Position>().is_err());
        assert!("II".parse::<Position>().is_err());
        assert!("XX-A".parse::<Position>().is_err());
        assert!("II-CD".parse::<Position>().is_err());
    }

    #[test]
    fn test_lexical_order() {
        let a: Position = "I-D".parse().unwrap();
        let b: Position = "II-A".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_sef_mg_table() {
        let table = CareerTable::sef_mg();
        assert_eq!(table.len(), 16);
        assert_eq!(table.first().code(), "I-A");
        assert_eq!(table.top().code(), "IV-D");
        assert_eq!(table.base_salary(table.lookup("II-C").unwrap()).unwrap(), 10905.33);
    }

    #[test]
    fn test_unknown_position() {
        let table = CareerTable::sef_mg();
        assert!(matches!(table.lookup("V-A"), Err(EngineError::UnknownPosition(_))));
        assert!(matches!(table.lookup("nope"), Err(EngineError::InvalidPositionCode(_))));
    }

    #[test]
    fn test_promote_and_progress() {
        let table = CareerTable::sef_mg();
        let p = table.lookup("II-C").unwrap();
        assert_eq!(table.promote(p).unwrap().code(), "III-A");
        assert_eq!(table.progress(p).unwrap().code(), "II-D");

        let last_grade = table.lookup("II-D").unwrap();
        assert!(table.progress(last_grade).is_none());

        let top_level = table.lookup("IV-B").unwrap();
        assert!(table.promote(top_level).is_none());
        assert!(table.progress(table.top()).is_none());
    }

    #[test]
    fn test_rules_clock_lengths() {
        let rules = CareerRules::default();
        assert_eq!(rules.probation_months(), 36);
        assert_eq!(rules.promotion_months(), 96);
        assert_eq!(rules.progression_months(), 24);
    }

    #[test]
    fn test_position_serde_as_code() {
        let p: Position = "III-B".parse().unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"III-B\"");
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
