//! Protocol liquidity vault
//!
//! Liquidity providers' collateral sits in a token account owned by this
//! PDA. Markets borrow their opening liquidity from it and pay back the
//! principal plus or minus their result when they finalize or cancel.
//!
//! ```text
//!   deposit ──▶ total_assets ──fund──▶ total_borrowed ──settle──▶ total_assets ± pnl
//!                                            │
//!                                            └──loss──▶ total_losses
//! ```

use anchor_lang::prelude::*;

use crate::errors::EconomicError;
use crate::events::{VaultFunded, VaultLoss, VaultSettled};

/// Lending side of the vault as seen by a market.
pub trait VaultLedger {
    /// Lends `amount` to a market
    fn fund(&mut self, market_id: u64, amount: u64) -> Result<VaultFunded>;

    /// Books the return of `principal` adjusted by `pnl`
    fn report_settlement(&mut self, market_id: u64, principal: u64, pnl: i64)
        -> Result<VaultSettled>;

    /// Writes off principal a market could not return
    fn report_loss(&mut self, market_id: u64, amount: u64) -> Result<VaultLoss>;
}

/// Seeds: ["vault"]
#[account]
#[derive(InitSpace)]
pub struct LiquidityVault {
    pub collateral_mint: Pubkey,

    /// Idle collateral held by the vault
    pub total_assets: u64,

    /// Principal currently lent to markets
    pub total_borrowed: u64,

    /// Largest loan to a single market (0 = no cap)
    pub max_borrow_per_market: u64,

    /// Cumulative profit and loss across settled markets
    pub realized_pnl: i64,

    /// Principal written off by cancelled markets
    pub total_losses: u64,

    pub markets_funded: u64,

    pub bump: u8,
}

impl LiquidityVault {
    pub const SEED: &'static [u8] = b"vault";

    pub fn deposit(&mut self, amount: u64) -> Result<u64> {
        self.total_assets = self
            .total_assets
            .checked_add(amount)
            .ok_or(EconomicError::Overflow)?;
        Ok(self.total_assets)
    }

    pub fn withdraw(&mut self, amount: u64) -> Result<u64> {
        self.total_assets = self
            .total_assets
            .checked_sub(amount)
            .ok_or(EconomicError::VaultCapacityExceeded)?;
        Ok(self.total_assets)
    }
}

impl VaultLedger for LiquidityVault {
    fn fund(&mut self, market_id: u64, amount: u64) -> Result<VaultFunded> {
        require!(
            self.max_borrow_per_market == 0 || amount <= self.max_borrow_per_market,
            EconomicError::VaultCapacityExceeded
        );
        let total_assets = self
            .total_assets
            .checked_sub(amount)
            .ok_or(EconomicError::VaultCapacityExceeded)?;
        let total_borrowed = self
            .total_borrowed
            .checked_add(amount)
            .ok_or(EconomicError::Overflow)?;

        self.total_assets = total_assets;
        self.total_borrowed = total_borrowed;
        self.markets_funded = self.markets_funded.saturating_add(1);

        Ok(VaultFunded {
            market_id,
            amount,
            total_borrowed,
        })
    }

    fn report_settlement(
        &mut self,
        market_id: u64,
        principal: u64,
        pnl: i64,
    ) -> Result<VaultSettled> {
        let returned = (principal as i128)
            .checked_add(pnl as i128)
            .filter(|r| *r >= 0)
            .and_then(|r| u64::try_from(r).ok())
            .ok_or(EconomicError::VaultAccounting)?;
        let total_borrowed = self
            .total_borrowed
            .checked_sub(principal)
            .ok_or(EconomicError::VaultAccounting)?;
        let total_assets = self
            .total_assets
            .checked_add(returned)
            .ok_or(EconomicError::Overflow)?;
        let realized_pnl = self
            .realized_pnl
            .checked_add(pnl)
            .ok_or(EconomicError::Overflow)?;

        self.total_borrowed = total_borrowed;
        self.total_assets = total_assets;
        self.realized_pnl = realized_pnl;

        Ok(VaultSettled {
            market_id,
            principal,
            pnl,
        })
    }

    fn report_loss(&mut self, market_id: u64, amount: u64) -> Result<VaultLoss> {
        let total_borrowed = self
            .total_borrowed
            .checked_sub(amount)
            .ok_or(EconomicError::VaultAccounting)?;
        let loss = i64::try_from(amount).map_err(|_| error!(EconomicError::Overflow))?;
        let realized_pnl = self
            .realized_pnl
            .checked_sub(loss)
            .ok_or(EconomicError::Overflow)?;

        self.total_borrowed = total_borrowed;
        self.total_losses = self.total_losses.saturating_add(amount);
        self.realized_pnl = realized_pnl;

        Ok(VaultLoss { market_id, amount })
    }
}
