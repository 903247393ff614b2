//! Market Cancellation
//!
//! A cancelled market keeps enough escrow to refund every stake; whatever
//! is left returns to the vault and any unreturned principal is written off.

use anchor_lang::prelude::*;

use super::SettleWithVault;
use crate::engine::Cancellation;
use crate::state::{Config, VaultLedger};

impl<'info> SettleWithVault<'info> {
    pub fn cancel_market(&mut self) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        self.market.acquire()?;

        let config: &Config = &self.config;
        let cancellation = self.market.cancel(
            config,
            &self.authority.key(),
            self.market_escrow.amount,
            now,
        )?;

        self.settle_cancellation(cancellation)
    }

    pub fn cancel_after_resolve(&mut self) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        self.market.acquire()?;

        let config: &Config = &self.config;
        let cancellation = self.market.cancel_after_resolve(
            config,
            &self.authority.key(),
            self.market_escrow.amount,
            now,
        )?;

        self.settle_cancellation(cancellation)
    }

    fn settle_cancellation(&mut self, cancellation: Cancellation) -> Result<()> {
        let market_id = self.market.id;

        self.return_to_vault(cancellation.vault_return)?;
        let settled =
            self.liquidity_vault
                .report_settlement(market_id, cancellation.vault_return, 0)?;
        emit!(settled);

        if cancellation.vault_loss > 0 {
            let loss = self
                .liquidity_vault
                .report_loss(market_id, cancellation.vault_loss)?;
            msg!("Vault loss on market {}: {}", market_id, loss.amount);
            emit!(loss);
        }

        self.market.release();

        msg!(
            "Market {} cancelled, returned {} to vault",
            market_id,
            cancellation.vault_return
        );
        emit!(cancellation.cancelled);
        Ok(())
    }
}
