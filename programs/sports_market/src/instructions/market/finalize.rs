//! Market Finalization
//!
//! Fixes payouts for every outcome and returns the rest of the escrow to
//! the vault together with the market's profit or loss.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::state::{Config, LiquidityVault, Market, VaultLedger};
use crate::utils::move_collateral;

/// Accounts shared by finalize and both cancel paths: everything needed to
/// settle a market's loan with the vault.
#[derive(Accounts)]
pub struct SettleWithVault<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [LiquidityVault::SEED],
        bump = liquidity_vault.bump,
    )]
    pub liquidity_vault: Box<Account<'info, LiquidityVault>>,

    #[account(
        mut,
        seeds = [Market::SEED, market.id.to_le_bytes().as_ref()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(address = market.collateral_mint)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
    )]
    pub market_escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = liquidity_vault,
    )]
    pub vault_escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> SettleWithVault<'info> {
    pub fn finalize_market(&mut self, scale_bps: u16) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        self.market.acquire()?;

        let config: &Config = &self.config;
        let finalization = self.market.finalize(
            config,
            &self.authority.key(),
            scale_bps,
            self.market_escrow.amount,
            now,
        )?;

        self.return_to_vault(finalization.vault_return)?;
        let settled = self.liquidity_vault.report_settlement(
            self.market.id,
            finalization.principal,
            finalization.pnl,
        )?;

        self.market.release();

        msg!(
            "Market {} finalized at {} bps, allocated {}",
            self.market.id,
            scale_bps,
            finalization.finalized.total_allocated
        );
        msg!("Vault return: {}, pnl: {}", finalization.vault_return, finalization.pnl);
        emit!(finalization.finalized);
        emit!(settled);
        Ok(())
    }

    /// Moves `amount` from the market escrow to the vault, signed by the
    /// market PDA.
    pub(crate) fn return_to_vault(&self, amount: u64) -> Result<()> {
        let market_id = self.market.id.to_le_bytes();
        let market_seeds: &[&[u8]] = &[Market::SEED, &market_id, &[self.market.bump]];

        move_collateral(
            &self.token_program,
            &self.collateral_mint,
            &self.market_escrow,
            &self.vault_escrow,
            self.market.to_account_info(),
            &[market_seeds],
            amount,
        )
    }
}
