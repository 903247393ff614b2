use std::cmp::Ordering;

use anchor_lang::prelude::*;

use super::{MappedResult, MapperConfig, ResultMapper};
use crate::errors::ValidationError;
use crate::oracle::MatchFacts;

pub const HOME: u8 = 0;
pub const DRAW: u8 = 1;
pub const AWAY: u8 = 2;

/// 1X2 market on the reported score
pub struct WinDrawWin;

impl ResultMapper for WinDrawWin {
    fn outcome_count(&self, _config: &MapperConfig) -> usize {
        3
    }

    fn may_split(&self, _config: &MapperConfig) -> bool {
        false
    }

    fn map(&self, _config: &MapperConfig, facts: &MatchFacts) -> Result<MappedResult> {
        let winner = match facts.home_goals.cmp(&facts.away_goals) {
            Ordering::Greater => HOME,
            Ordering::Equal => DRAW,
            Ordering::Less => AWAY,
        };
        Ok(MappedResult::single(winner))
    }
}

/// Which side advances; `[Home, Away]`
pub struct ToQualify;

impl ResultMapper for ToQualify {
    fn outcome_count(&self, _config: &MapperConfig) -> usize {
        2
    }

    fn may_split(&self, _config: &MapperConfig) -> bool {
        false
    }

    fn map(&self, _config: &MapperConfig, facts: &MatchFacts) -> Result<MappedResult> {
        let (home, away) = match (facts.home_goals.cmp(&facts.away_goals), facts.penalties) {
            (Ordering::Equal, Some(shootout)) => (shootout.home, shootout.away),
            (Ordering::Equal, None) => return err!(ValidationError::UnmappableResult),
            _ => (facts.home_goals, facts.away_goals),
        };
        require!(home != away, ValidationError::UnmappableResult);
        Ok(MappedResult::single(if home > away { 0 } else { 1 }))
    }
}
