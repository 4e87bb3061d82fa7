//! Career position resolver: walks promotion and progression clocks month by month

use crate::assumptions::{CareerRules, CareerTable, Position};
use crate::calendar::YearMonth;
use crate::error::EngineResult;
use crate::parameters::ScenarioParameters;

/// Position reached at a target month, with the advancement events on the way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionResolution {
    pub position: Position,
    pub promotions: u32,
    pub progressions: u32,
}

/// Resolves the effective position at a date
#[derive(Debug, Clone, Copy)]
pub struct PositionResolver<'a> {
    career: &'a CareerTable,
    rules: CareerRules,
}

impl<'a> PositionResolver<'a> {
    pub fn new(career: &'a CareerTable, rules: CareerRules) -> Self {
        Self { career, rules }
    }

    /// Position of a scenario at `target`
    pub fn resolve_for(&self, scenario: &ScenarioParameters, target: YearMonth) -> EngineResult<PositionResolution> {
        self.resolve(
            scenario.initial_position,
            scenario.entry_date,
            scenario.last_promotion_or_entry(),
            scenario.last_progression_or_entry(),
            target,
        )
    }

    /// Walk from the most recent known event to `target`
    ///
    /// `initial` is the position held at the latest of the three dates. No
    /// advancement happens while service is shorter than the probation term.
    /// When both clocks are due in the same month only the promotion fires,
    /// and it restarts both clocks. Targets before the start resolve to
    /// `initial`.
    pub fn resolve(
        &self,
        initial: Position,
        entry: YearMonth,
        last_promotion: YearMonth,
        last_progression: YearMonth,
        target: YearMonth,
    ) -> EngineResult<PositionResolution> {
        self.career.require(initial)?;

        let start = entry.max(last_promotion).max(last_progression);
        let mut resolution = PositionResolution {
            position: initial,
            promotions: 0,
            progressions: 0,
        };
        let mut promotion_clock = last_promotion;
        let mut progression_clock = last_progression;

        for index in (start.index() + 1)..=target.index() {
            let month = YearMonth::from_index(index);
            if month.months_since(entry) < self.rules.probation_months() {
                continue;
            }

            if month.months_since(promotion_clock) >= self.rules.promotion_months() {
                if let Some(next) = self.career.promote(resolution.position) {
                    log::trace!("{}: promotion {} -> {}", month, resolution.position, next);
                    resolution.position = next;
                    resolution.promotions += 1;
                    promotion_clock = month;
                    progression_clock = month;
                    continue;
                }
            }

            if month.months_since(progression_clock) >= self.rules.progression_months() {
                if let Some(next) = self.career.progress(resolution.position) {
                    log::trace!("{}: progression {} -> {}", month, resolution.position, next);
                    resolution.position = next;
                    resolution.progressions += 1;
                    progression_clock = month;
                }
            }
        }

        Ok(resolution)
    }
}
