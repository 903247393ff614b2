//! Program error families.
//!
//! Each family gets its own offset so codes stay distinct on-chain:
//!
//! | offset | family            |
//! |-------:|-------------------|
//! | 6000   | authorization     |
//! | 6100   | lifecycle state   |
//! | 6200   | validation        |
//! | 6300   | economic guards   |
//! | 6400   | oracle pipeline   |
//! | 6500   | curve math        |

use anchor_lang::prelude::*;

#[error_code(offset = 6000)]
pub enum AccessError {
    #[msg("Caller does not hold the required role")]
    Unauthorized,
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Role table is full")]
    RoleTableFull,
    #[msg("The admin role of the config owner cannot be revoked")]
    CannotRevokeOwner,
}

#[error_code(offset = 6100)]
pub enum StateError {
    #[msg("Market is not in the required status")]
    InvalidStatus,
    #[msg("Betting closed at kickoff")]
    BettingClosed,
    #[msg("Market cannot be locked yet by this caller")]
    LockNotAllowed,
    #[msg("Market is already being mutated")]
    Reentrancy,
}

#[error_code(offset = 6200)]
pub enum ValidationError {
    #[msg("Outcome count must be between 2 and 100")]
    InvalidOutcomeCount,
    #[msg("Outcome name is empty or too long")]
    InvalidOutcomeName,
    #[msg("Unknown outcome id")]
    InvalidOutcome,
    #[msg("Outcome list does not match the result mapper")]
    MapperOutcomeMismatch,
    #[msg("Result mapper line is not valid for this mapper")]
    InvalidMapperLine,
    #[msg("Price band must satisfy 1 <= min < max <= 10000")]
    InvalidPriceBand,
    #[msg("Initial prices do not match the outcome list")]
    InvalidInitialPrices,
    #[msg("Price would leave the allowed odds band")]
    OddsOutOfRange,
    #[msg("Kickoff must be in the future")]
    InvalidKickoff,
    #[msg("Match id is empty or too long")]
    InvalidMatchId,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Payout scale must be between 1 and 10000 bps")]
    InvalidPayoutScale,
    #[msg("Mapped weights are malformed")]
    InvalidWeights,
    #[msg("Match facts payload is malformed")]
    MalformedFacts,
    #[msg("Unsupported facts scope")]
    InvalidScope,
    #[msg("Goal count out of range")]
    GoalsOutOfRange,
    #[msg("Extra time and penalty data are inconsistent")]
    PenaltyDataInconsistent,
    #[msg("Facts scope does not allow extra time")]
    ScopeMismatch,
    #[msg("Facts are reported in the future")]
    FutureTimestamp,
    #[msg("Result cannot be mapped to an outcome")]
    UnmappableResult,
    #[msg("Invalid protocol parameter")]
    InvalidParameter,
    #[msg("Dispute reason is empty or too long")]
    InvalidReason,
    #[msg("Batch is empty or inconsistent with the supplied accounts")]
    InvalidBatch,
}

#[error_code(offset = 6300)]
pub enum EconomicError {
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,
    #[msg("User exposure limit exceeded")]
    ExposureLimitExceeded,
    #[msg("Market liability cap exceeded")]
    LiabilityCapExceeded,
    #[msg("Not enough shares")]
    InsufficientShares,
    #[msg("Vault cannot fund this amount")]
    VaultCapacityExceeded,
    #[msg("Vault accounting underflow")]
    VaultAccounting,
    #[msg("Arithmetic overflow")]
    Overflow,
}

#[error_code(offset = 6400)]
pub enum OracleError {
    #[msg("No result has been submitted for this market")]
    ResultNotFound,
    #[msg("A result has already been submitted for this market")]
    AlreadySubmitted,
    #[msg("Result is not finalized")]
    NotFinalized,
    #[msg("Result payload does not match the finalized record")]
    ResultHashMismatch,
    #[msg("Facts record belongs to a different oracle backend")]
    WrongBackend,
    #[msg("Facts record does not belong to this market")]
    WrongMarket,
    #[msg("Market already has a live assertion")]
    AssertionAlreadyLive,
    #[msg("Assertion cannot be settled yet")]
    AssertionNotSettleable,
    #[msg("Assertion is already resolved")]
    AssertionResolved,
    #[msg("Assertion is already disputed")]
    AlreadyDisputed,
    #[msg("Assertion is not disputed")]
    NotDisputed,
    #[msg("Assertion already has a verdict")]
    AlreadyArbitrated,
    #[msg("Liveness window has elapsed")]
    LivenessExpired,
    #[msg("Bond balance is insufficient")]
    BondAllowanceInsufficient,
    #[msg("Bond recipient does not match the winning party")]
    WrongBondRecipient,
}
