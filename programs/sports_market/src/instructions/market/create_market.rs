//! Market Creation
//!
//! Creates the market account, its facts record and its collateral escrow
//! in one instruction, then borrows the opening liquidity from the vault.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::errors::{EconomicError, ValidationError};
use crate::state::{
    AccessControl, Config, CreateMarketParams, FactsRecord, LiquidityVault, Market, Role,
    VaultLedger,
};
use crate::utils::move_collateral;

#[derive(Accounts)]
pub struct CreateMarket<'info> {
    /// Operator creating the market (pays rent)
    #[account(mut)]
    pub operator: Signer<'info>,

    #[account(
        mut,
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
        init,
        payer = operator,
        space = 8 + Market::INIT_SPACE,
        seeds = [Market::SEED, config.market_count.to_le_bytes().as_ref()],
        bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        init,
        payer = operator,
        space = 8 + FactsRecord::INIT_SPACE,
        seeds = [FactsRecord::SEED, market.key().as_ref()],
        bump,
    )]
    pub facts_record: Box<Account<'info, FactsRecord>>,

    #[account(
        address = config.collateral_mint @ ValidationError::InvalidParameter,
    )]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = liquidity_vault,
    )]
    pub vault_escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Market's collateral escrow (created)
    #[account(
        init,
        payer = operator,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
    )]
    pub market_escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> CreateMarket<'info> {
    pub fn create_market(
        &mut self,
        params: CreateMarketParams,
        bumps: &CreateMarketBumps,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let operator = self.operator.key();
        self.config.authorize(&[Role::Operator], &operator)?;

        let market_id = self.config.market_count;
        let backend = params.oracle_backend;
        let market = Market::new(
            market_id,
            operator,
            params,
            self.collateral_mint.key(),
            self.liquidity_vault.key(),
            self.config.lock_grace_secs,
            clock.unix_timestamp,
            bumps.market,
        )?;
        let liquidity = market.initial_liquidity;
        let created = market.created_event(self.market.key());

        let funded = self.liquidity_vault.fund(market_id, liquidity)?;
        let vault_seeds: &[&[u8]] = &[LiquidityVault::SEED, &[self.liquidity_vault.bump]];
        move_collateral(
            &self.token_program,
            &self.collateral_mint,
            &self.vault_escrow,
            &self.market_escrow,
            self.liquidity_vault.to_account_info(),
            &[vault_seeds],
            liquidity,
        )?;

        self.market.set_inner(market);
        self.facts_record.set_inner(FactsRecord::new(
            self.market.key(),
            market_id,
            backend,
            bumps.facts_record,
        ));
        self.config.market_count = market_id
            .checked_add(1)
            .ok_or(EconomicError::Overflow)?;

        msg!("Market {} created: {}", market_id, created.match_id);
        msg!("Kickoff: {}, liquidity: {}", created.kickoff_time, liquidity);
        emit!(created);
        emit!(funded);

        Ok(())
    }
}
