//! Claims
//!
//! After finalization, shares redeem for their pro-rata slice of their
//! outcome's allocation. After cancellation, shares refund their pro-rata
//! slice of the outcome's stakes. Either way the shares are burned and the
//! collateral leaves the market escrow for the user's token account.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::engine::ShareClaim;
use crate::state::{Config, Market, Position};
use crate::utils::move_collateral;

#[derive(Accounts)]
pub struct Claim<'info> {
    /// Position owner, or a router acting for them
    #[account(mut)]
    pub caller: Signer<'info>,

    /// CHECK: Owner of the position; receives the collateral
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
        mut,
        seeds = [Position::SEED, market.key().as_ref(), user.key().as_ref()],
        bump = position.bump,
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(address = market.collateral_mint)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = collateral_mint,
        associated_token::authority = market,
    )]
    pub market_escrow: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = caller,
        associated_token::mint = collateral_mint,
        associated_token::authority = user,
    )]
    pub user_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Claim<'info> {
    /// Redeem `shares` of `outcome`; returns the payout
    pub fn redeem(&mut self, outcome: u8, shares: u64) -> Result<u64> {
        self.market.acquire()?;
        let config: &Config = &self.config;
        let redeemed = self.market.redeem(
            config,
            &self.caller.key(),
            &mut self.position,
            outcome,
            shares,
        )?;

        self.pay_out(redeemed.payout)?;
        self.market.release();

        msg!(
            "Redeemed {} shares of outcome {} for {}",
            shares,
            outcome,
            redeemed.payout
        );
        let payout = redeemed.payout;
        emit!(redeemed);
        Ok(payout)
    }

    /// Redeem several outcomes in one transfer; returns the total payout
    pub fn redeem_batch(&mut self, claims: Vec<ShareClaim>) -> Result<u64> {
        self.market.acquire()?;
        let config: &Config = &self.config;
        let (total, redeemed) =
            self.market
                .redeem_batch(config, &self.caller.key(), &mut self.position, &claims)?;

        self.pay_out(total)?;
        self.market.release();

        msg!("Redeemed {} claims for {}", redeemed.len(), total);
        for event in redeemed {
            emit!(event);
        }
        Ok(total)
    }

    /// Refund `shares` of `outcome` from a cancelled market; returns the refund
    pub fn refund(&mut self, outcome: u8, shares: u64) -> Result<u64> {
        self.market.acquire()?;
        let config: &Config = &self.config;
        let refunded = self.market.refund(
            config,
            &self.caller.key(),
            &mut self.position,
            outcome,
            shares,
        )?;

        self.pay_out(refunded.refund)?;
        self.market.release();

        msg!(
            "Refunded {} shares of outcome {} for {}",
            shares,
            outcome,
            refunded.refund
        );
        let refund = refunded.refund;
        emit!(refunded);
        Ok(refund)
    }

    fn pay_out(&self, amount: u64) -> Result<()> {
        let market_id = self.market.id.to_le_bytes();
        let market_seeds: &[&[u8]] = &[Market::SEED, &market_id, &[self.market.bump]];

        move_collateral(
            &self.token_program,
            &self.collateral_mint,
            &self.market_escrow,
            &self.user_collateral,
            self.market.to_account_info(),
            &[market_seeds],
            amount,
        )
    }
}
