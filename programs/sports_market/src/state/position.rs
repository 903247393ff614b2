//! Share ledger
//!
//! A position holds one owner's share balance per outcome in one market,
//! together with the total stake the owner has put into it.

use anchor_lang::prelude::*;

use crate::errors::{EconomicError, ValidationError};

/// Per-outcome share bookkeeping consumed by the market core.
pub trait ShareLedger {
    fn balance_of(&self, outcome: usize) -> u64;

    fn mint(&mut self, outcome: usize, shares: u64) -> Result<()>;

    fn burn(&mut self, outcome: usize, shares: u64) -> Result<()>;

    fn transfer(&mut self, to: &mut Self, outcome: usize, shares: u64) -> Result<()>
    where
        Self: Sized,
    {
        self.burn(outcome, shares)?;
        to.mint(outcome, shares)
    }
}

/// Seeds: ["position", market, owner]
#[account]
#[derive(InitSpace)]
pub struct Position {
    pub market: Pubkey,
    pub owner: Pubkey,

    #[max_len(100)]
    pub balances: Vec<u64>,

    /// Total stake placed through this position
    pub exposure: u64,

    pub bump: u8,
}

impl Position {
    pub const SEED: &'static [u8] = b"position";

    /// Sets up a freshly created position; no-op for an existing one.
    pub fn open(&mut self, market: Pubkey, owner: Pubkey, outcomes: usize, bump: u8) {
        if self.balances.is_empty() {
            self.market = market;
            self.owner = owner;
            self.balances = vec![0; outcomes];
            self.exposure = 0;
            self.bump = bump;
        }
    }
}

impl ShareLedger for Position {
    fn balance_of(&self, outcome: usize) -> u64 {
        self.balances.get(outcome).copied().unwrap_or(0)
    }

    fn mint(&mut self, outcome: usize, shares: u64) -> Result<()> {
        let balance = self
            .balances
            .get_mut(outcome)
            .ok_or(ValidationError::InvalidOutcome)?;
        *balance = balance.checked_add(shares).ok_or(EconomicError::Overflow)?;
        Ok(())
    }

    fn burn(&mut self, outcome: usize, shares: u64) -> Result<()> {
        let balance = self
            .balances
            .get_mut(outcome)
            .ok_or(ValidationError::InvalidOutcome)?;
        *balance = balance
            .checked_sub(shares)
            .ok_or(EconomicError::InsufficientShares)?;
        Ok(())
    }
}
