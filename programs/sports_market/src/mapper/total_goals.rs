use anchor_lang::prelude::*;

use super::{MappedResult, MapperConfig, ResultMapper};
use crate::oracle::MatchFacts;

/// One outcome per exact goal total; the last band catches every total at
/// or above it.
pub struct TotalGoals;

impl ResultMapper for TotalGoals {
    fn outcome_count(&self, config: &MapperConfig) -> usize {
        config.bands as usize
    }

    fn may_split(&self, _config: &MapperConfig) -> bool {
        false
    }

    fn map(&self, config: &MapperConfig, facts: &MatchFacts) -> Result<MappedResult> {
        let last = config.bands.saturating_sub(1) as u16;
        Ok(MappedResult::single(facts.total_goals().min(last) as u8))
    }
}
