//! Protocol Initialization
//!
//! Sets up the global configuration and the bond escrow used by the
//! optimistic oracle. This is typically called once during deployment.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::errors::ValidationError;
use crate::state::Config;

/// Protocol-wide defaults set at initialization
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProtocolParams {
    /// Seconds after kickoff when anyone may lock a market
    pub lock_grace_secs: i64,
    /// Bond each side of an optimistic assertion posts
    pub oracle_bond: u64,
    /// Challenge window of an optimistic assertion
    pub oracle_liveness_secs: i64,
}

impl ProtocolParams {
    pub fn validate(&self) -> Result<()> {
        require!(self.lock_grace_secs >= 0, ValidationError::InvalidParameter);
        require!(self.oracle_liveness_secs > 0, ValidationError::InvalidParameter);
        Ok(())
    }
}

/// Accounts required for protocol initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Box<Account<'info, Config>>,

    /// Collateral token mint (e.g., USDC)
    pub collateral_mint: InterfaceAccount<'info, Mint>,

    /// Escrow for oracle bonds, owned by the config PDA
    #[account(
        init,
        payer = admin,
        associated_token::mint = collateral_mint,
        associated_token::authority = config,
    )]
    pub bond_escrow: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Initialize the protocol configuration
    pub fn initialize(&mut self, params: ProtocolParams, bumps: &InitializeBumps) -> Result<()> {
        params.validate()?;

        self.config.set_inner(Config {
            admin: self.admin.key(),
            collateral_mint: self.collateral_mint.key(),
            roles: Vec::new(),
            market_count: 0,
            lock_grace_secs: params.lock_grace_secs,
            oracle_bond: params.oracle_bond,
            oracle_liveness_secs: params.oracle_liveness_secs,
            paused: false,
            bump: bumps.config,
        });

        msg!("Protocol initialized!");
        msg!("Admin: {}", self.admin.key());
        msg!("Collateral: {}", self.collateral_mint.key());
        msg!(
            "Lock grace: {}s, oracle bond: {}, liveness: {}s",
            params.lock_grace_secs,
            params.oracle_bond,
            params.oracle_liveness_secs
        );

        Ok(())
    }
}
