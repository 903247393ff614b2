//! Match facts: the tuple every oracle backend reports and every market
//! settles against.
//!
//! ## Wire layout (15 bytes)
//!
//! ```text
//! ┌───────┬──────┬──────┬────┬──────────┬─────────┬─────────┬──────────────┐
//! │ scope │ home │ away │ ET │ pens set │ home pk │ away pk │ reported_at  │
//! │  u8   │  u8  │  u8  │ u8 │    u8    │   u8    │   u8    │   i64 (LE)   │
//! └───────┴──────┴──────┴────┴──────────┴─────────┴─────────┴──────────────┘
//! ```
//!
//! The content hash is `keccak(FACTS_DOMAIN ‖ market_id (LE) ‖ layout)`.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;

use crate::constants::{FACTS_DOMAIN, FACTS_LEN, MAX_GOALS, MAX_PENALTY_GOALS};
use crate::errors::ValidationError;

/// Period of play the reported score covers
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub enum Scope {
    /// Regulation time only
    FullTime,
    /// Regulation plus extra time when played
    ExtraTime,
    /// Regulation, extra time and the shootout when played
    Penalties,
}

impl Scope {
    pub fn tag(self) -> u8 {
        match self {
            Scope::FullTime => 0,
            Scope::ExtraTime => 1,
            Scope::Penalties => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Scope::FullTime),
            1 => Ok(Scope::ExtraTime),
            2 => Ok(Scope::Penalties),
            _ => err!(ValidationError::InvalidScope),
        }
    }
}

/// Shootout score
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub struct PenaltyScore {
    pub home: u8,
    pub away: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub struct MatchFacts {
    pub scope: Scope,
    pub home_goals: u8,
    pub away_goals: u8,
    pub extra_time: bool,
    pub penalties: Option<PenaltyScore>,
    pub reported_at: i64,
}

impl MatchFacts {
    /// Checks the facts are internally consistent and not from the future.
    pub fn validate(&self, now: i64) -> Result<()> {
        require!(
            self.home_goals <= MAX_GOALS && self.away_goals <= MAX_GOALS,
            ValidationError::GoalsOutOfRange
        );
        require!(
            !(self.scope == Scope::FullTime && self.extra_time),
            ValidationError::ScopeMismatch
        );

        // A match that went to extra time always reports a shootout score,
        // 0-0 when extra time decided it.
        require!(
            self.penalties.is_some() == self.extra_time,
            ValidationError::PenaltyDataInconsistent
        );
        if let Some(shootout) = self.penalties {
            require!(
                shootout.home <= MAX_PENALTY_GOALS && shootout.away <= MAX_PENALTY_GOALS,
                ValidationError::GoalsOutOfRange
            );
            let consistent = if self.home_goals == self.away_goals {
                shootout.home != shootout.away
            } else {
                shootout.home == 0 && shootout.away == 0
            };
            require!(consistent, ValidationError::PenaltyDataInconsistent);
        }

        require!(
            self.reported_at > 0 && self.reported_at <= now,
            ValidationError::FutureTimestamp
        );
        Ok(())
    }

    pub fn encode(&self) -> [u8; FACTS_LEN] {
        let mut out = [0u8; FACTS_LEN];
        out[0] = self.scope.tag();
        out[1] = self.home_goals;
        out[2] = self.away_goals;
        out[3] = u8::from(self.extra_time);
        if let Some(shootout) = self.penalties {
            out[4] = 1;
            out[5] = shootout.home;
            out[6] = shootout.away;
        }
        out[7..].copy_from_slice(&self.reported_at.to_le_bytes());
        out
    }

    pub fn decode(raw: &[u8]) -> Result<Self> {
        require!(raw.len() == FACTS_LEN, ValidationError::MalformedFacts);

        let flag = |byte: u8| -> Result<bool> {
            match byte {
                0 => Ok(false),
                1 => Ok(true),
                _ => err!(ValidationError::MalformedFacts),
            }
        };

        let penalties = if flag(raw[4])? {
            Some(PenaltyScore {
                home: raw[5],
                away: raw[6],
            })
        } else {
            require!(raw[5] == 0 && raw[6] == 0, ValidationError::MalformedFacts);
            None
        };

        let mut reported_at = [0u8; 8];
        reported_at.copy_from_slice(&raw[7..FACTS_LEN]);

        Ok(MatchFacts {
            scope: Scope::from_tag(raw[0])?,
            home_goals: raw[1],
            away_goals: raw[2],
            extra_time: flag(raw[3])?,
            penalties,
            reported_at: i64::from_le_bytes(reported_at),
        })
    }

    /// Deterministic content hash binding the facts to one market
    pub fn result_hash(&self, market_id: u64) -> [u8; 32] {
        keccak::hashv(&[FACTS_DOMAIN, &market_id.to_le_bytes(), &self.encode()]).to_bytes()
    }

    pub fn total_goals(&self) -> u16 {
        self.home_goals as u16 + self.away_goals as u16
    }

    pub fn goal_difference(&self) -> i16 {
        self.home_goals as i16 - self.away_goals as i16
    }
}
