//! Liquidity Vault Management
//!
//! The vault lends every new market its opening liquidity and collects the
//! market's result when it finalizes or cancels. The vault keeps no LP
//! share ledger, so only the admin moves liquidity in or out.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::errors::ValidationError;
use crate::events::{LiquidityDeposited, LiquidityWithdrawn};
use crate::state::{AccessControl, Config, LiquidityVault, Role};
use crate::utils::move_collateral;

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        init,
        payer = admin,
        space = 8 + LiquidityVault::INIT_SPACE,
        seeds = [LiquidityVault::SEED],
        bump,
    )]
    pub liquidity_vault: Box<Account<'info, LiquidityVault>>,

    #[account(
        constraint = collateral_mint.key() == config.collateral_mint @ ValidationError::InvalidParameter,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Vault's collateral account
    #[account(
        init,
        payer = admin,
        associated_token::mint = collateral_mint,
        associated_token::authority = liquidity_vault,
    )]
    pub vault_escrow: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializeVault<'info> {
    pub fn initialize_vault(
        &mut self,
        max_borrow_per_market: u64,
        bumps: &InitializeVaultBumps,
    ) -> Result<()> {
        self.config
            .authorize(&[Role::Admin], &self.admin.key())?;

        self.liquidity_vault.set_inner(LiquidityVault {
            collateral_mint: self.collateral_mint.key(),
            total_assets: 0,
            total_borrowed: 0,
            max_borrow_per_market,
            realized_pnl: 0,
            total_losses: 0,
            markets_funded: 0,
            bump: bumps.liquidity_vault,
        });

        msg!("Vault initialized, max borrow per market: {}", max_borrow_per_market);
        Ok(())
    }
}

/// Accounts for moving collateral in or out of the vault
#[derive(Accounts)]
pub struct VaultLiquidity<'info> {
    #[account(mut)]
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
        constraint = collateral_mint.key() == liquidity_vault.collateral_mint @ ValidationError::InvalidParameter,
    )]
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Authority's collateral account
    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = authority,
    )]
    pub authority_collateral: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = liquidity_vault,
    )]
    pub vault_escrow: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> VaultLiquidity<'info> {
    pub fn deposit_liquidity(&mut self, amount: u64) -> Result<()> {
        self.config
            .authorize(&[Role::Admin], &self.authority.key())?;
        require!(amount > 0, ValidationError::ZeroAmount);

        move_collateral(
            &self.token_program,
            &self.collateral_mint,
            &self.authority_collateral,
            &self.vault_escrow,
            self.authority.to_account_info(),
            &[],
            amount,
        )?;
        let total_assets = self.liquidity_vault.deposit(amount)?;

        msg!("Deposited {} into vault, total assets: {}", amount, total_assets);
        emit!(LiquidityDeposited {
            depositor: self.authority.key(),
            amount,
            total_assets,
        });
        Ok(())
    }

    pub fn withdraw_liquidity(&mut self, amount: u64) -> Result<()> {
        self.config
            .authorize(&[Role::Admin], &self.authority.key())?;
        require!(amount > 0, ValidationError::ZeroAmount);

        let total_assets = self.liquidity_vault.withdraw(amount)?;

        let vault_seeds: &[&[u8]] = &[LiquidityVault::SEED, &[self.liquidity_vault.bump]];
        move_collateral(
            &self.token_program,
            &self.collateral_mint,
            &self.vault_escrow,
            &self.authority_collateral,
            self.liquidity_vault.to_account_info(),
            &[vault_seeds],
            amount,
        )?;

        msg!("Withdrew {} from vault, total assets: {}", amount, total_assets);
        emit!(LiquidityWithdrawn {
            recipient: self.authority.key(),
            amount,
            total_assets,
        });
        Ok(())
    }
}
