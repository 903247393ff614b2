use anchor_lang::prelude::*;

use super::{MappedResult, MapperConfig, ResultMapper};
use crate::constants::BPS;
use crate::oracle::MatchFacts;

/// `[Over, Under]` on total goals against a line
pub struct OverUnder;

impl ResultMapper for OverUnder {
    fn outcome_count(&self, _config: &MapperConfig) -> usize {
        2
    }

    fn may_split(&self, config: &MapperConfig) -> bool {
        splits(config.line_quarters)
    }

    fn map(&self, config: &MapperConfig, facts: &MatchFacts) -> Result<MappedResult> {
        let margin = facts.total_goals() as i32 * 4 - config.line_quarters as i32;
        Ok(MappedResult::from_weights(&line_weights(margin)))
    }
}

/// `[Home, Away]` on goal difference with the line added to the home side
pub struct AsianHandicap;

impl ResultMapper for AsianHandicap {
    fn outcome_count(&self, _config: &MapperConfig) -> usize {
        2
    }

    fn may_split(&self, config: &MapperConfig) -> bool {
        splits(config.line_quarters)
    }

    fn map(&self, config: &MapperConfig, facts: &MatchFacts) -> Result<MappedResult> {
        let margin = facts.goal_difference() as i32 * 4 + config.line_quarters as i32;
        Ok(MappedResult::from_weights(&line_weights(margin)))
    }
}

/// Half lines (`x.5`) never push; whole and quarter lines can.
fn splits(line_quarters: i16) -> bool {
    line_quarters.rem_euclid(4) != 2
}

/// Weights of `[first, second]` for a margin in quarter goals, positive
/// favouring the first outcome. Odd margins come from quarter lines and
/// settle as two half stakes on the neighbouring lines.
fn line_weights(margin: i32) -> [u16; 2] {
    let full = BPS as u16;
    if margin % 2 != 0 {
        let lower = line_weights(margin - 1);
        let upper = line_weights(margin + 1);
        return [(lower[0] + upper[0]) / 2, (lower[1] + upper[1]) / 2];
    }
    match margin.signum() {
        1 => [full, 0],
        -1 => [0, full],
        _ => [full / 2, full / 2],
    }
}
