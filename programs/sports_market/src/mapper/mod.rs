//! # Result Mappers
//!
//! A mapper turns finalized [`MatchFacts`] into the winning outcome ids of a
//! market and the weight each one pays, in bps summing to 10000.
//!
//! Lines are given in quarter goals (`-2` = -0.5, `9` = 2.25). Quarter lines
//! settle as two half stakes on the neighbouring lines, so a result can pay
//! both sides of a market partially:
//!
//! ```text
//!   Over 2.25, three goals  →  Over 10000
//!   Over 2.25, two goals    →  half on 2.0 (push) + half on 2.5 (lost)
//!                          →  Over 2500, Under 7500
//! ```

pub mod goal_line;
pub mod match_result;
pub mod total_goals;

pub use goal_line::*;
pub use match_result::*;
pub use total_goals::*;

use anchor_lang::prelude::*;

use crate::constants::{BPS, MAX_GOALS, MAX_OUTCOMES, MIN_OUTCOMES};
use crate::errors::ValidationError;
use crate::oracle::{MatchFacts, Scope};

/// Winning outcomes and their payout weights
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappedResult {
    pub outcome_ids: Vec<u8>,
    pub weights: Vec<u16>,
}

impl MappedResult {
    pub fn single(outcome: u8) -> Self {
        Self {
            outcome_ids: vec![outcome],
            weights: vec![BPS as u16],
        }
    }

    /// Builds a result from per-outcome weights, dropping zero entries.
    pub fn from_weights(weights: &[u16]) -> Self {
        let mut result = Self::default();
        for (outcome, weight) in weights.iter().enumerate() {
            if *weight > 0 {
                result.outcome_ids.push(outcome as u8);
                result.weights.push(*weight);
            }
        }
        result
    }

    pub fn total_weight(&self) -> u64 {
        self.weights.iter().map(|w| *w as u64).sum()
    }
}

/// Maps match facts onto a market's outcome list. Implementations are
/// stateless; the line and band count come from the market's config.
pub trait ResultMapper {
    /// Number of outcomes the market must list, in mapper order
    fn outcome_count(&self, config: &MapperConfig) -> usize;

    /// Whether some result pays an outcome less than a full weight
    fn may_split(&self, config: &MapperConfig) -> bool;

    fn map(&self, config: &MapperConfig, facts: &MatchFacts) -> Result<MappedResult>;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub enum MapperKind {
    /// `[Home, Draw, Away]`
    WinDrawWin,
    /// `[Over, Under]` on total goals
    OverUnder,
    /// `[Home, Away]` on goal difference plus the home line
    AsianHandicap,
    /// `[Home, Away]`, level scores decided on penalties
    ToQualify,
    /// `[0 goals, 1 goal, .., bands-1 or more]`
    TotalGoals,
}

impl MapperKind {
    pub fn mapper(self) -> &'static dyn ResultMapper {
        match self {
            MapperKind::WinDrawWin => &WinDrawWin,
            MapperKind::OverUnder => &OverUnder,
            MapperKind::AsianHandicap => &AsianHandicap,
            MapperKind::ToQualify => &ToQualify,
            MapperKind::TotalGoals => &TotalGoals,
        }
    }

    /// Scope a market of this kind settles on unless configured otherwise
    pub fn default_scope(self) -> Scope {
        match self {
            MapperKind::ToQualify => Scope::Penalties,
            _ => Scope::FullTime,
        }
    }
}

/// Mapper selector stored on the market
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub struct MapperConfig {
    pub kind: MapperKind,
    /// Line in quarter goals; zero for mappers without a line
    pub line_quarters: i16,
    /// Outcome count of a `TotalGoals` market; zero for the other kinds
    pub bands: u8,
    /// Period of play the market settles on; facts must report the same one
    pub scope: Scope,
}

impl MapperConfig {
    /// Config for `kind` at `line_quarters`, settling on the kind's default scope.
    pub fn new(kind: MapperKind, line_quarters: i16) -> Self {
        Self {
            kind,
            line_quarters,
            bands: 0,
            scope: kind.default_scope(),
        }
    }

    pub fn total_goals(bands: u8) -> Self {
        Self {
            bands,
            ..Self::new(MapperKind::TotalGoals, 0)
        }
    }

    pub fn with_scope(self, scope: Scope) -> Self {
        Self { scope, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        let max_total = MAX_GOALS as i16 * 2 * 4;
        let max_margin = MAX_GOALS as i16 * 4;
        let line_ok = match self.kind {
            MapperKind::WinDrawWin | MapperKind::ToQualify | MapperKind::TotalGoals => {
                self.line_quarters == 0
            }
            MapperKind::OverUnder => self.line_quarters > 0 && self.line_quarters <= max_total,
            MapperKind::AsianHandicap => self.line_quarters.abs() <= max_margin,
        };
        require!(line_ok, ValidationError::InvalidMapperLine);

        let bands_ok = match self.kind {
            MapperKind::TotalGoals => {
                (MIN_OUTCOMES..=MAX_OUTCOMES).contains(&(self.bands as usize))
            }
            _ => self.bands == 0,
        };
        require!(bands_ok, ValidationError::MapperOutcomeMismatch);

        // Only a qualification market is decided by a shootout
        let scope_ok = match self.kind {
            MapperKind::ToQualify => self.scope == Scope::Penalties,
            _ => self.scope != Scope::Penalties,
        };
        require!(scope_ok, ValidationError::InvalidScope);
        Ok(())
    }

    pub fn mapper(&self) -> &'static dyn ResultMapper {
        self.kind.mapper()
    }

    pub fn outcome_count(&self) -> usize {
        self.mapper().outcome_count(self)
    }

    pub fn may_split(&self) -> bool {
        self.mapper().may_split(self)
    }

    /// Maps facts reported for this market's scope.
    pub fn map(&self, facts: &MatchFacts) -> Result<MappedResult> {
        require!(facts.scope == self.scope, ValidationError::ScopeMismatch);
        self.mapper().map(self, facts)
    }
}
