//! Exposure and liability limits.
//!
//! Worst-case liability is the largest outstanding share count of any
//! outcome: a share never pays more than one collateral unit, and the
//! weights of a split result never sum above one.

use anchor_lang::prelude::*;

use crate::errors::{EconomicError, ValidationError};
use crate::state::Market;

/// Read-only liability diagnostic
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiabilityReport {
    /// Worst-case payout at full scale
    pub liability: u64,
    /// Payout cap that applies at finalize
    pub cap: u64,
    pub exceeded: bool,
    pub excess: u64,
}

impl Market {
    /// Every price must sit inside the market's band.
    pub fn check_price_band(&self, prices: &[u64]) -> Result<()> {
        let min = self.risk.min_price_bps as u64;
        let max = self.risk.max_price_bps as u64;
        require!(
            prices.iter().all(|p| *p >= min && *p <= max),
            ValidationError::OddsOutOfRange
        );
        Ok(())
    }

    /// Holder exposure after staking `amount` more
    pub fn check_exposure(&self, current: u64, amount: u64) -> Result<u64> {
        let exposure = current.checked_add(amount).ok_or(EconomicError::Overflow)?;
        let cap = self.risk.max_user_exposure;
        require!(
            cap == 0 || exposure <= cap,
            EconomicError::ExposureLimitExceeded
        );
        Ok(exposure)
    }

    /// Collateral backing the market: vault principal plus stakes
    pub fn funded_collateral(&self) -> Result<u64> {
        self.borrowed_amount
            .checked_add(self.total_liquidity)
            .ok_or_else(|| error!(EconomicError::Overflow))
    }

    pub fn worst_case_liability(&self) -> u64 {
        self.outcome_shares.iter().copied().max().unwrap_or(0)
    }

    pub fn liability_cap(&self) -> Result<u64> {
        if self.risk.max_liability == 0 {
            self.funded_collateral()
        } else {
            Ok(self.risk.max_liability)
        }
    }

    /// Rejects a bet that would leave some outcome paying more than the
    /// market holds.
    pub(crate) fn check_solvency(
        &self,
        outcome: usize,
        shares_after: u64,
        total_liquidity_after: u64,
    ) -> Result<()> {
        let funded = self
            .borrowed_amount
            .checked_add(total_liquidity_after)
            .ok_or(EconomicError::Overflow)?;
        let worst = self
            .outcome_shares
            .iter()
            .enumerate()
            .map(|(j, s)| if j == outcome { shares_after } else { *s })
            .max()
            .unwrap_or(0);
        require!(worst <= funded, EconomicError::LiabilityCapExceeded);
        Ok(())
    }

    pub fn check_liability_limit(&self) -> Result<LiabilityReport> {
        let liability = self.worst_case_liability();
        let cap = self.liability_cap()?;
        let excess = liability.saturating_sub(cap);
        Ok(LiabilityReport {
            liability,
            cap,
            exceeded: excess > 0,
            excess,
        })
    }
}
