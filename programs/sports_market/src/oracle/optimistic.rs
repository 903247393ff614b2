//! # Optimistic Dispute Adapter
//!
//! ```text
//!  assert_facts ──▶ live ──(now ≥ expiration)──────────────▶ settle: accepted
//!                    │
//!                 dispute ──▶ arbitrate(true)  ──▶ settle: accepted, asserter takes both bonds
//!                          └▶ arbitrate(false) ──▶ settle: rejected, disputer takes both bonds
//! ```
//!
//! Bonds sit in an escrow token account owned by the config PDA. The caller
//! moves the tokens; this module only decides who is owed what.

use anchor_lang::prelude::*;

use super::MatchFacts;
use crate::constants::MAX_DISPUTE_REASON_LEN;
use crate::errors::{EconomicError, OracleError, ValidationError};
use crate::events::{
    AssertionArbitrated, AssertionDisputed, AssertionMade, AssertionSettled, ResultFinalized,
    ResultProposed,
};
use crate::state::{AccessControl, Assertion, Config, FactsRecord, OracleBackend, Role};

/// Bond parameters in force when an assertion is opened
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptimisticOracle {
    pub bond: u64,
    pub liveness_secs: i64,
}

/// Assertion opened by [`OptimisticOracle::assert_facts`]
pub struct OpenedAssertion {
    pub assertion: Assertion,
    pub proposed: ResultProposed,
    pub made: AssertionMade,
}

/// Outcome of [`OptimisticOracle::settle`]
pub struct SettledAssertion {
    /// Party the escrowed bonds are released to
    pub bond_recipient: Pubkey,
    pub bond_payout: u64,
    pub settled: AssertionSettled,
    pub finalized: ResultFinalized,
}

impl OptimisticOracle {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bond: config.oracle_bond,
            liveness_secs: config.oracle_liveness_secs,
        }
    }

    /// Records `facts` as a proposal and opens the assertion backing it.
    #[allow(clippy::too_many_arguments)]
    pub fn assert_facts(
        &self,
        record: &mut FactsRecord,
        access: &impl AccessControl,
        assertion_key: Pubkey,
        asserter: Pubkey,
        currency: Pubkey,
        bond_balance: u64,
        facts: MatchFacts,
        now: i64,
        bump: u8,
    ) -> Result<OpenedAssertion> {
        access.require_active()?;
        record.require_backend(OracleBackend::Optimistic)?;
        require!(record.live_assertion.is_none(), OracleError::AssertionAlreadyLive);
        require!(bond_balance >= self.bond, OracleError::BondAllowanceInsufficient);

        // The window runs from when the result was reported, not from when
        // it was asserted
        facts.validate(now)?;
        let expiration = facts
            .reported_at
            .checked_add(self.liveness_secs)
            .ok_or(EconomicError::Overflow)?;
        require!(expiration > now, OracleError::LivenessExpired);
        let nonce = record.assertion_count;
        let next_nonce = nonce.checked_add(1).ok_or(EconomicError::Overflow)?;

        let facts_hash = record.record_proposal(asserter, facts, now)?;
        record.assertion_count = next_nonce;
        record.live_assertion = Some(assertion_key);

        let assertion = Assertion {
            market: record.market,
            market_id: record.market_id,
            nonce,
            asserter,
            disputer: None,
            currency,
            bond: self.bond,
            facts_hash,
            asserted_at: now,
            expiration,
            verdict: None,
            resolved: false,
            bump,
        };

        Ok(OpenedAssertion {
            assertion,
            proposed: ResultProposed {
                market_id: record.market_id,
                proposer: asserter,
                backend: OracleBackend::Optimistic,
                result_hash: facts_hash,
                timestamp: now,
            },
            made: AssertionMade {
                assertion: assertion_key,
                market_id: record.market_id,
                asserter,
                bond: self.bond,
                expiration,
            },
        })
    }

    /// Challenges a live assertion inside its window. The disputer matches
    /// the asserter's bond.
    #[allow(clippy::too_many_arguments)]
    pub fn dispute(
        assertion: &mut Assertion,
        record: &mut FactsRecord,
        access: &impl AccessControl,
        assertion_key: Pubkey,
        disputer: Pubkey,
        bond_balance: u64,
        reason: String,
        now: i64,
    ) -> Result<AssertionDisputed> {
        access.require_active()?;
        require!(
            !reason.is_empty() && reason.len() <= MAX_DISPUTE_REASON_LEN,
            ValidationError::InvalidReason
        );
        check_link(assertion, record, assertion_key)?;
        require!(!assertion.resolved, OracleError::AssertionResolved);
        require!(!assertion.is_disputed(), OracleError::AlreadyDisputed);
        require!(now < assertion.expiration, OracleError::LivenessExpired);
        require!(
            bond_balance >= assertion.bond,
            OracleError::BondAllowanceInsufficient
        );

        record.mark_disputed()?;
        assertion.disputer = Some(disputer);

        Ok(AssertionDisputed {
            assertion: assertion_key,
            market_id: assertion.market_id,
            disputer,
            reason,
        })
    }

    /// Records the arbitration verdict for a disputed assertion.
    pub fn arbitrate(
        assertion: &mut Assertion,
        access: &impl AccessControl,
        arbiter: &Pubkey,
        assertion_key: Pubkey,
        truthful: bool,
    ) -> Result<AssertionArbitrated> {
        access.authorize(&[Role::Admin], arbiter)?;
        require!(!assertion.resolved, OracleError::AssertionResolved);
        require!(assertion.is_disputed(), OracleError::NotDisputed);
        require!(assertion.verdict.is_none(), OracleError::AlreadyArbitrated);

        assertion.verdict = Some(truthful);

        Ok(AssertionArbitrated {
            assertion: assertion_key,
            market_id: assertion.market_id,
            truthful,
        })
    }

    pub fn can_settle(assertion: &Assertion, now: i64) -> bool {
        assertion.can_settle(now)
    }

    /// Closes an assertion: accepted facts become final, rejected facts are
    /// cleared so the market can be asserted again.
    pub fn settle(
        assertion: &mut Assertion,
        record: &mut FactsRecord,
        access: &impl AccessControl,
        assertion_key: Pubkey,
        now: i64,
    ) -> Result<SettledAssertion> {
        access.require_active()?;
        check_link(assertion, record, assertion_key)?;
        require!(assertion.can_settle(now), OracleError::AssertionNotSettleable);

        let accepted = assertion.accepted();
        let (bond_recipient, bond_payout) = match assertion.disputer {
            None => (assertion.asserter, assertion.bond),
            Some(disputer) => {
                let pot = assertion
                    .bond
                    .checked_mul(2)
                    .ok_or(EconomicError::Overflow)?;
                (if accepted { assertion.asserter } else { disputer }, pot)
            }
        };

        if accepted {
            record.finalize(now)?;
        } else {
            record.discard()?;
        }
        record.live_assertion = None;
        assertion.resolved = true;

        Ok(SettledAssertion {
            bond_recipient,
            bond_payout,
            settled: AssertionSettled {
                assertion: assertion_key,
                market_id: assertion.market_id,
                accepted,
                bond_recipient,
                bond_payout,
            },
            finalized: ResultFinalized {
                market_id: assertion.market_id,
                result_hash: assertion.facts_hash,
                accepted,
                timestamp: now,
            },
        })
    }
}

fn check_link(assertion: &Assertion, record: &FactsRecord, assertion_key: Pubkey) -> Result<()> {
    require_keys_eq!(assertion.market, record.market, OracleError::WrongMarket);
    require!(
        record.live_assertion == Some(assertion_key),
        OracleError::WrongMarket
    );
    Ok(())
}
