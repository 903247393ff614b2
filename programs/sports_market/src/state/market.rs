//! Sports Market State
//!
//! Each market prices the outcomes of one match, holds the bettors' stakes
//! plus the liquidity it borrowed from the vault, and pays out against the
//! finalized match facts.

use std::fmt;

use anchor_lang::prelude::*;

use crate::amm::PricingModel;
use crate::errors::StateError;
use crate::mapper::MapperConfig;
use crate::state::OracleBackend;

/// Individual sports market account
///
/// Seeds: ["market", market_id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Market {
    /// Unique market identifier
    pub id: u64,

    /// Operator that opened the market
    pub operator: Pubkey,

    /// External fixture identifier
    #[max_len(64)]
    pub match_id: String,

    /// Unix timestamp of kickoff; betting closes here
    pub kickoff_time: i64,

    /// Ordered outcome list; an outcome id is its index
    #[max_len(100)]
    pub outcomes: Vec<OutcomeRule>,

    /// Collateral token mint address
    pub collateral_mint: Pubkey,

    /// Vault the initial liquidity was borrowed from
    pub vault: Pubkey,

    pub pricing: PricingModel,
    pub mapper: MapperConfig,

    /// Liquidity the market opened with (also the curve depth)
    pub initial_liquidity: u64,

    pub status: MarketStatus,

    /// Sum of all stakes received from bettors
    pub total_liquidity: u64,

    /// Principal owed to the vault
    pub borrowed_amount: u64,

    /// Curve-specific state, one entry per outcome
    #[max_len(100)]
    pub pricing_state: Vec<u64>,

    /// Outstanding shares per outcome
    #[max_len(100)]
    pub outcome_shares: Vec<u64>,

    /// Unrefunded stake per outcome
    #[max_len(100)]
    pub outcome_stakes: Vec<u64>,

    /// Unclaimed payout per outcome, fixed at finalize
    #[max_len(100)]
    pub allocations: Vec<u64>,

    pub total_payout_claimed: u64,
    pub total_refunded: u64,

    /// Scale applied to every payout, in bps
    pub payout_scale_bps: u16,

    pub settlement: SettlementResult,
    pub risk: RiskParams,

    /// Seconds after kickoff when anyone may lock
    pub lock_grace_secs: i64,

    pub created_at: i64,
    pub locked_at: i64,
    pub finalized_at: i64,
    pub cancelled_at: i64,

    /// Re-entrancy guard held while tokens move
    pub in_flight: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl Market {
    pub const SEED: &'static [u8] = b"market";

    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn require_status(&self, expected: MarketStatus) -> Result<()> {
        require_eq!(self.status, expected, StateError::InvalidStatus);
        Ok(())
    }

    pub fn acquire(&mut self) -> Result<()> {
        require!(!self.in_flight, StateError::Reentrancy);
        self.in_flight = true;
        Ok(())
    }

    pub fn release(&mut self) {
        self.in_flight = false;
    }
}

/// Market lifecycle status
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum MarketStatus {
    /// Accepting bets until kickoff
    #[default]
    Open,
    /// Betting stopped, awaiting facts
    Locked,
    /// Winning outcomes known, payout scale not yet set
    Resolved,
    /// Payouts claimable
    Finalized,
    /// Voided before resolution; stakes refundable
    Cancelled,
    /// Voided after resolution; stakes refundable
    CancelledAfterResolve,
}

impl MarketStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MarketStatus::Finalized | MarketStatus::Cancelled | MarketStatus::CancelledAfterResolve
        )
    }

    pub fn is_cancelled(self) -> bool {
        matches!(
            self,
            MarketStatus::Cancelled | MarketStatus::CancelledAfterResolve
        )
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketStatus::Open => "Open",
            MarketStatus::Locked => "Locked",
            MarketStatus::Resolved => "Resolved",
            MarketStatus::Finalized => "Finalized",
            MarketStatus::Cancelled => "Cancelled",
            MarketStatus::CancelledAfterResolve => "CancelledAfterResolve",
        };
        write!(f, "{}", name)
    }
}

/// How an outcome's shares are paid
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub enum PayoutType {
    /// Pays in full or not at all
    Binary,
    /// May pay a fraction (pushes, quarter lines)
    Weighted,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, InitSpace, Debug)]
pub struct OutcomeRule {
    #[max_len(24)]
    pub name: String,
    pub payout_type: PayoutType,
}

/// Price band and caps enforced on every bet
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct RiskParams {
    /// Lowest price any outcome may trade at, in bps
    pub min_price_bps: u16,
    /// Highest price any outcome may trade at, in bps
    pub max_price_bps: u16,
    /// Cap on a single holder's total stake (0 = unlimited)
    pub max_user_exposure: u64,
    /// Cap on the total payout at finalize (0 = funded collateral)
    pub max_liability: u64,
}

/// Written once by `resolve`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct SettlementResult {
    #[max_len(100)]
    pub winning_outcomes: Vec<u8>,
    /// Weight of each winning outcome, in bps summing to 10000
    #[max_len(100)]
    pub weights: Vec<u16>,
    /// Hash of the oracle payload the market resolved against
    pub raw_result_hash: [u8; 32],
    pub settled_at: i64,
    pub resolved: bool,
}

impl SettlementResult {
    pub fn weight_of(&self, outcome: usize) -> u16 {
        self.winning_outcomes
            .iter()
            .position(|id| *id as usize == outcome)
            .and_then(|i| self.weights.get(i).copied())
            .unwrap_or(0)
    }
}

/// Arguments of `create_market`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CreateMarketParams {
    pub match_id: String,
    pub kickoff_time: i64,
    pub outcomes: Vec<OutcomeRule>,
    pub pricing: PricingModel,
    pub mapper: MapperConfig,
    pub initial_liquidity: u64,
    /// Opening prices in bps; empty for a uniform book
    pub initial_prices: Vec<u16>,
    pub risk: RiskParams,
    pub oracle_backend: OracleBackend,
}
