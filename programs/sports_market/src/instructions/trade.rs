//! Trading
//!
//! Bets buy outcome shares from the market's AMM. There is no sell side:
//! shares leave a position only by transfer, redemption or refund.
//!
//! ## Flow
//!
//! ```text
//! payer ──collateral──▶ market escrow
//!                           │
//!             AMM quote ────┴──▶ shares credited to the user's position
//! ```

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::engine::{BetQuote, LiabilityReport};
use crate::state::{Config, Market, Position};
use crate::utils::move_collateral;

#[derive(Accounts)]
pub struct PlaceBet<'info> {
    /// Funds the stake: the user, or a router acting for them
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: Owner of the position; authorized against the payer in the handler
    pub user: UncheckedAccount<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [Market::SEED, market.id.to_le_bytes().as_ref()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + Position::INIT_SPACE,
        seeds = [Position::SEED, market.key().as_ref(), user.key().as_ref()],
        bump,
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(address = market.collateral_mint)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = payer,
    )]
    pub payer_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
    )]
    pub market_escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> PlaceBet<'info> {
    /// Place a bet of `amount` collateral on `outcome`; returns shares bought
    pub fn place_bet(
        &mut self,
        outcome: u8,
        amount: u64,
        min_shares: u64,
        bumps: &PlaceBetBumps,
    ) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;
        let market_key = self.market.key();
        let outcomes = self.market.outcome_count();
        self.position
            .open(market_key, self.user.key(), outcomes, bumps.position);

        self.market.acquire()?;
        let config: &Config = &self.config;
        let placed = self.market.place_bet(
            config,
            &self.payer.key(),
            &mut self.position,
            outcome,
            amount,
            min_shares,
            now,
        )?;

        move_collateral(
            &self.token_program,
            &self.collateral_mint,
            &self.payer_collateral,
            &self.market_escrow,
            self.payer.to_account_info(),
            &[],
            amount,
        )?;
        self.market.release();

        msg!(
            "Bet on market {}: {} for outcome {}, {} shares",
            placed.market_id,
            amount,
            outcome,
            placed.shares
        );
        msg!("New price: {} bps", placed.new_price);

        let shares = placed.shares;
        emit!(placed);
        Ok(shares)
    }
}

/// Read-only views over a market
#[derive(Accounts)]
pub struct ViewMarket<'info> {
    #[account(
        seeds = [Market::SEED, market.id.to_le_bytes().as_ref()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,
}

impl<'info> ViewMarket<'info> {
    pub fn preview_bet(&self, outcome: u8, amount: u64) -> Result<BetQuote> {
        self.market.preview_bet(outcome, amount)
    }

    pub fn check_liability_limit(&self) -> Result<LiabilityReport> {
        let report = self.market.check_liability_limit()?;
        if report.exceeded {
            msg!(
                "Market {} liability {} exceeds cap {} by {}",
                self.market.id,
                report.liability,
                report.cap,
                report.excess
            );
        }
        Ok(report)
    }
}

#[derive(Accounts)]
pub struct TransferShares<'info> {
    /// Holder of the source position, or a router
    #[account(mut)]
    pub caller: Signer<'info>,

    /// CHECK: Owner of the source position; authorized against the caller in the handler
    pub from: UncheckedAccount<'info>,

    /// CHECK: Any account may receive shares
    pub to: UncheckedAccount<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        seeds = [Market::SEED, market.id.to_le_bytes().as_ref()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        seeds = [Position::SEED, market.key().as_ref(), from.key().as_ref()],
        bump = from_position.bump,
    )]
    pub from_position: Box<Account<'info, Position>>,

    #[account(
        init_if_needed,
        payer = caller,
        space = 8 + Position::INIT_SPACE,
        seeds = [Position::SEED, market.key().as_ref(), to.key().as_ref()],
        bump,
    )]
    pub to_position: Box<Account<'info, Position>>,

    pub system_program: Program<'info, System>,
}

impl<'info> TransferShares<'info> {
    pub fn transfer_shares(
        &mut self,
        outcome: u8,
        shares: u64,
        bumps: &TransferSharesBumps,
    ) -> Result<()> {
        let market_key = self.market.key();
        let outcomes = self.market.outcome_count();
        self.to_position
            .open(market_key, self.to.key(), outcomes, bumps.to_position);

        let config: &Config = &self.config;
        let transferred = self.market.transfer_shares(
            config,
            &self.caller.key(),
            &mut self.from_position,
            &mut self.to_position,
            outcome,
            shares,
        )?;

        msg!(
            "Moved {} shares of outcome {} from {} to {}",
            shares,
            outcome,
            transferred.from,
            transferred.to
        );
        emit!(transferred);
        Ok(())
    }
}
