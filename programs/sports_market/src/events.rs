//! Events emitted by the program, in the order the state changes happen.
//!
//! Core methods return these values; instruction handlers `emit!` them.

use anchor_lang::prelude::*;

use crate::amm::PricingModel;
use crate::state::{OracleBackend, Role};

// =============================================================================
// MARKET LIFECYCLE
// =============================================================================

#[event]
pub struct MarketCreated {
    pub market_id: u64,
    pub market: Pubkey,
    pub match_id: String,
    pub kickoff_time: i64,
    pub outcome_count: u8,
    pub pricing: PricingModel,
    pub initial_liquidity: u64,
}

#[event]
pub struct MarketLocked {
    pub market_id: u64,
    pub locked_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct MarketResolved {
    pub market_id: u64,
    pub winning_outcomes: Vec<u8>,
    pub weights: Vec<u16>,
    pub result_hash: [u8; 32],
    pub timestamp: i64,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketFinalized {
    pub market_id: u64,
    pub scale_bps: u16,
    pub total_allocated: u64,
    pub timestamp: i64,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketCancelled {
    pub market_id: u64,
    pub after_resolve: bool,
    pub cancelled_by: Pubkey,
    pub timestamp: i64,
}

// =============================================================================
// TRADING & CLAIMS
// =============================================================================

#[event]
pub struct BetPlaced {
    pub market_id: u64,
    pub user: Pubkey,
    pub payer: Pubkey,
    pub outcome: u8,
    pub amount: u64,
    pub shares: u64,
    pub new_price: u64,
    pub exposure: u64,
}

#[event]
pub struct PositionRedeemed {
    pub market_id: u64,
    pub user: Pubkey,
    pub outcome: u8,
    pub shares: u64,
    pub payout: u64,
}

#[event]
pub struct PositionRefunded {
    pub market_id: u64,
    pub user: Pubkey,
    pub outcome: u8,
    pub shares: u64,
    pub refund: u64,
}

#[event]
pub struct SharesTransferred {
    pub market_id: u64,
    pub from: Pubkey,
    pub to: Pubkey,
    pub outcome: u8,
    pub shares: u64,
}

// =============================================================================
// VAULT
// =============================================================================

#[event]
pub struct VaultFunded {
    pub market_id: u64,
    pub amount: u64,
    pub total_borrowed: u64,
}

#[event]
pub struct VaultSettled {
    pub market_id: u64,
    pub principal: u64,
    pub pnl: i64,
}

#[event]
pub struct VaultLoss {
    pub market_id: u64,
    pub amount: u64,
}

#[event]
pub struct LiquidityDeposited {
    pub depositor: Pubkey,
    pub amount: u64,
    pub total_assets: u64,
}

#[event]
pub struct LiquidityWithdrawn {
    pub recipient: Pubkey,
    pub amount: u64,
    pub total_assets: u64,
}

// =============================================================================
// ORACLE
// =============================================================================

#[event]
pub struct ResultProposed {
    pub market_id: u64,
    pub proposer: Pubkey,
    pub backend: OracleBackend,
    pub result_hash: [u8; 32],
    pub timestamp: i64,
}

#[event]
pub struct ResultFinalized {
    pub market_id: u64,
    pub result_hash: [u8; 32],
    pub accepted: bool,
    pub timestamp: i64,
}

#[event]
pub struct AssertionMade {
    pub assertion: Pubkey,
    pub market_id: u64,
    pub asserter: Pubkey,
    pub bond: u64,
    pub expiration: i64,
}

#[event]
pub struct AssertionDisputed {
    pub assertion: Pubkey,
    pub market_id: u64,
    pub disputer: Pubkey,
    pub reason: String,
}

#[event]
pub struct AssertionArbitrated {
    pub assertion: Pubkey,
    pub market_id: u64,
    pub truthful: bool,
}

#[event]
pub struct AssertionSettled {
    pub assertion: Pubkey,
    pub market_id: u64,
    pub accepted: bool,
    pub bond_recipient: Pubkey,
    pub bond_payout: u64,
}

// =============================================================================
// ADMINISTRATION
// =============================================================================

#[event]
pub struct RoleGranted {
    pub role: Role,
    pub member: Pubkey,
}

#[event]
pub struct RoleRevoked {
    pub role: Role,
    pub member: Pubkey,
}

#[event]
pub struct PauseChanged {
    pub paused: bool,
    pub changed_by: Pubkey,
}

#[event]
pub struct ProtocolParamsUpdated {
    pub lock_grace_secs: i64,
    pub oracle_bond: u64,
    pub oracle_liveness_secs: i64,
}
