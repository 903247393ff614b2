//! Oracle facts store
//!
//! One record per market, created with the market. Either oracle backend
//! writes into it; the market only ever reads it through [`ResultOracle`].
//!
//! ```text
//!   Empty ──propose──▶ Proposed ──finalize──▶ Finalized
//!     ▲                   │                      ▲
//!     │                dispute                   │
//!     │                   ▼                      │
//!     └────rejected─── Disputed ───upheld────────┘
//! ```
//!
//! [`ResultOracle`]: crate::oracle::ResultOracle

use anchor_lang::prelude::*;

use crate::errors::OracleError;
use crate::oracle::{MatchFacts, ResultOracle};

/// Which backend reports facts for a market
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub enum OracleBackend {
    /// Single authorized reporter, finalized on submission
    Direct,
    /// Bonded assertion with a challenge window
    Optimistic,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub enum FactsStatus {
    Empty,
    Proposed,
    Disputed,
    Finalized,
}

/// Seeds: ["facts", market]
#[account]
#[derive(InitSpace)]
pub struct FactsRecord {
    pub market: Pubkey,
    pub market_id: u64,
    pub backend: OracleBackend,
    pub status: FactsStatus,
    pub facts: Option<MatchFacts>,
    pub result_hash: [u8; 32],
    pub proposer: Pubkey,
    pub proposed_at: i64,
    pub finalized_at: i64,
    /// Assertion currently backing the proposal (optimistic backend)
    pub live_assertion: Option<Pubkey>,
    /// Assertions ever opened; seeds the next assertion PDA
    pub assertion_count: u32,
    /// Proposals discarded after a lost dispute
    pub rejected_count: u32,
    pub bump: u8,
}

impl FactsRecord {
    pub const SEED: &'static [u8] = b"facts";

    pub fn new(market: Pubkey, market_id: u64, backend: OracleBackend, bump: u8) -> Self {
        Self {
            market,
            market_id,
            backend,
            status: FactsStatus::Empty,
            facts: None,
            result_hash: [0u8; 32],
            proposer: Pubkey::default(),
            proposed_at: 0,
            finalized_at: 0,
            live_assertion: None,
            assertion_count: 0,
            rejected_count: 0,
            bump,
        }
    }

    pub fn require_backend(&self, backend: OracleBackend) -> Result<()> {
        require!(self.backend == backend, OracleError::WrongBackend);
        Ok(())
    }

    /// Stores validated facts and returns their content hash.
    pub fn record_proposal(
        &mut self,
        proposer: Pubkey,
        facts: MatchFacts,
        now: i64,
    ) -> Result<[u8; 32]> {
        require!(self.status == FactsStatus::Empty, OracleError::AlreadySubmitted);
        facts.validate(now)?;

        let hash = facts.result_hash(self.market_id);
        self.facts = Some(facts);
        self.result_hash = hash;
        self.proposer = proposer;
        self.proposed_at = now;
        self.status = FactsStatus::Proposed;
        Ok(hash)
    }

    pub fn mark_disputed(&mut self) -> Result<()> {
        require!(self.status == FactsStatus::Proposed, OracleError::ResultNotFound);
        self.status = FactsStatus::Disputed;
        Ok(())
    }

    /// Makes the current proposal authoritative.
    pub fn finalize(&mut self, now: i64) -> Result<[u8; 32]> {
        require!(
            matches!(self.status, FactsStatus::Proposed | FactsStatus::Disputed),
            OracleError::ResultNotFound
        );
        self.status = FactsStatus::Finalized;
        self.finalized_at = now;
        Ok(self.result_hash)
    }

    /// Drops a rejected proposal so a new one can be made.
    pub fn discard(&mut self) -> Result<()> {
        require!(self.status == FactsStatus::Disputed, OracleError::NotDisputed);
        self.status = FactsStatus::Empty;
        self.facts = None;
        self.result_hash = [0u8; 32];
        self.proposer = Pubkey::default();
        self.proposed_at = 0;
        self.rejected_count = self.rejected_count.saturating_add(1);
        Ok(())
    }
}

impl ResultOracle for FactsRecord {
    fn market_id(&self) -> u64 {
        self.market_id
    }

    fn get_result(&self) -> Result<(MatchFacts, bool)> {
        let facts = self.facts.ok_or(OracleError::ResultNotFound)?;
        Ok((facts, self.is_finalized()))
    }

    fn get_result_hash(&self) -> Result<[u8; 32]> {
        require!(self.facts.is_some(), OracleError::ResultNotFound);
        Ok(self.result_hash)
    }

    fn is_finalized(&self) -> bool {
        self.status == FactsStatus::Finalized
    }
}
