use anchor_lang::prelude::*;

use crate::amm::Quote;
use crate::errors::{EconomicError, StateError, ValidationError};
use crate::events::{BetPlaced, SharesTransferred};
use crate::state::{AccessControl, Market, MarketStatus, Position, Role, ShareLedger};

/// Pre-trade quote returned by `preview_bet`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BetQuote {
    pub shares: u64,
    /// Post-trade price of the outcome, in bps
    pub new_price: u64,
}

impl Market {
    pub fn outcome_index(&self, outcome: u8) -> Result<usize> {
        let index = outcome as usize;
        require!(index < self.outcome_count(), ValidationError::InvalidOutcome);
        Ok(index)
    }

    /// Holders act for themselves; routers act for anyone.
    pub(crate) fn authorize_holder(
        &self,
        access: &impl AccessControl,
        caller: &Pubkey,
        holder: &Pubkey,
    ) -> Result<()> {
        access.require_active()?;
        if caller != holder {
            access.require_any_role(&[Role::Router], caller)?;
        }
        Ok(())
    }

    fn quote_bet(&self, outcome: u8, amount: u64) -> Result<Quote> {
        let index = self.outcome_index(outcome)?;
        require!(amount > 0, ValidationError::ZeroAmount);

        let strategy = self.pricing.strategy();
        let quote = strategy.quote(&self.pricing_state, self.initial_liquidity, index, amount)?;
        self.check_price_band(&strategy.prices(&quote.new_state)?)?;
        Ok(quote)
    }

    pub fn preview_bet(&self, outcome: u8, amount: u64) -> Result<BetQuote> {
        let quote = self.quote_bet(outcome, amount)?;
        Ok(BetQuote {
            shares: quote.shares,
            new_price: quote.new_price,
        })
    }

    /// Sells `outcome` shares for `amount` collateral into `position`.
    /// `payer` funds the stake and must be the holder or a router.
    #[allow(clippy::too_many_arguments)]
    pub fn place_bet(
        &mut self,
        access: &impl AccessControl,
        payer: &Pubkey,
        position: &mut Position,
        outcome: u8,
        amount: u64,
        min_shares: u64,
        now: i64,
    ) -> Result<BetPlaced> {
        self.authorize_holder(access, payer, &position.owner)?;
        self.require_status(MarketStatus::Open)?;
        require!(now < self.kickoff_time, StateError::BettingClosed);

        let quote = self.quote_bet(outcome, amount)?;
        require!(quote.shares >= min_shares, EconomicError::SlippageExceeded);

        let index = outcome as usize;
        let exposure = self.check_exposure(position.exposure, amount)?;
        let shares_after = self.outcome_shares[index]
            .checked_add(quote.shares)
            .ok_or(EconomicError::Overflow)?;
        let stakes_after = self.outcome_stakes[index]
            .checked_add(amount)
            .ok_or(EconomicError::Overflow)?;
        let total_liquidity = self
            .total_liquidity
            .checked_add(amount)
            .ok_or(EconomicError::Overflow)?;
        self.check_solvency(index, shares_after, total_liquidity)?;

        position.mint(index, quote.shares)?;
        position.exposure = exposure;

        self.pricing_state = quote.new_state;
        self.outcome_shares[index] = shares_after;
        self.outcome_stakes[index] = stakes_after;
        self.total_liquidity = total_liquidity;

        Ok(BetPlaced {
            market_id: self.id,
            user: position.owner,
            payer: *payer,
            outcome,
            amount,
            shares: quote.shares,
            new_price: quote.new_price,
            exposure,
        })
    }

    /// Moves shares between two holders of this market.
    pub fn transfer_shares(
        &self,
        access: &impl AccessControl,
        caller: &Pubkey,
        from: &mut Position,
        to: &mut Position,
        outcome: u8,
        shares: u64,
    ) -> Result<SharesTransferred> {
        self.authorize_holder(access, caller, &from.owner)?;
        require_keys_neq!(from.owner, to.owner, ValidationError::InvalidParameter);
        let index = self.outcome_index(outcome)?;
        require!(shares > 0, ValidationError::ZeroAmount);
        require!(
            from.balance_of(index) >= shares,
            EconomicError::InsufficientShares
        );

        from.transfer(to, index, shares)?;

        Ok(SharesTransferred {
            market_id: self.id,
            from: from.owner,
            to: to.owner,
            outcome,
            shares,
        })
    }
}
