//! Protocol-wide constants.

/// Basis-point denominator (10000 = 100%)
pub const BPS: u64 = 10_000;

/// Smallest and largest outcome lists a market accepts
pub const MIN_OUTCOMES: usize = 2;
pub const MAX_OUTCOMES: usize = 100;

/// Maximum length of an outcome name
pub const MAX_OUTCOME_NAME_LEN: usize = 24;

/// Maximum length of the external match identifier
pub const MAX_MATCH_ID_LEN: usize = 64;

/// Maximum number of role grants held in the config role table
pub const MAX_ROLE_GRANTS: usize = 32;

/// Goal counts above this are rejected as malformed facts
pub const MAX_GOALS: u8 = 50;

/// Shootout goal counts above this are rejected as malformed facts
pub const MAX_PENALTY_GOALS: u8 = 30;

/// Maximum length of a dispute reason
pub const MAX_DISPUTE_REASON_LEN: usize = 200;

/// Domain separator mixed into every match-facts hash
pub const FACTS_DOMAIN: &[u8] = b"SPORTS_MARKET_FACTS_V1";

/// Encoded size of a match-facts payload
pub const FACTS_LEN: usize = 15;

/// Fixed-point precision used when inverting pool reserves into prices
pub const PRICE_PRECISION: u128 = 1_000_000_000_000_000_000;
