use anchor_lang::prelude::*;

/// Bonded claim that a market's facts are correct
///
/// Seeds: ["assertion", market, nonce (LE)]
#[account]
#[derive(InitSpace)]
pub struct Assertion {
    /// Market the asserted facts belong to
    pub market: Pubkey,
    pub market_id: u64,

    /// Index of this assertion within the market's facts record
    pub nonce: u32,

    pub asserter: Pubkey,
    pub disputer: Option<Pubkey>,

    /// Bond currency and amount each side puts up
    pub currency: Pubkey,
    pub bond: u64,

    /// Content hash of the asserted facts
    pub facts_hash: [u8; 32],

    pub asserted_at: i64,

    /// End of the challenge window
    pub expiration: i64,

    /// Arbiter's decision on a disputed assertion (true = facts hold)
    pub verdict: Option<bool>,

    pub resolved: bool,

    pub bump: u8,
}

impl Assertion {
    pub const SEED: &'static [u8] = b"assertion";

    pub fn is_disputed(&self) -> bool {
        self.disputer.is_some()
    }

    /// Whether the facts stand once this assertion settles
    pub fn accepted(&self) -> bool {
        !self.is_disputed() || self.verdict == Some(true)
    }

    pub fn can_settle(&self, now: i64) -> bool {
        if self.resolved {
            return false;
        }
        if self.is_disputed() {
            self.verdict.is_some()
        } else {
            now >= self.expiration
        }
    }
}
