use anchor_lang::prelude::*;

use super::checked_sum;
use crate::constants::{BPS, MAX_MATCH_ID_LEN, MAX_OUTCOMES, MAX_OUTCOME_NAME_LEN, MIN_OUTCOMES};
use crate::errors::{StateError, ValidationError};
use crate::events::{MarketCancelled, MarketCreated, MarketLocked};
use crate::state::{
    AccessControl, CreateMarketParams, Market, MarketStatus, PayoutType, Role, SettlementResult,
};

/// What a cancelled market owes the vault
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cancellation {
    /// Principal the escrow can return
    pub vault_return: u64,
    /// Principal the escrow cannot cover
    pub vault_loss: u64,
    pub cancelled: MarketCancelled,
}

impl Market {
    /// Validates `params` and builds an open market. The vault loan of
    /// `initial_liquidity` must already be granted.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        operator: Pubkey,
        params: CreateMarketParams,
        collateral_mint: Pubkey,
        vault: Pubkey,
        lock_grace_secs: i64,
        now: i64,
        bump: u8,
    ) -> Result<Self> {
        let CreateMarketParams {
            match_id,
            kickoff_time,
            outcomes,
            pricing,
            mapper,
            initial_liquidity,
            initial_prices,
            risk,
            oracle_backend: _,
        } = params;
        let count = outcomes.len();

        require!(
            (MIN_OUTCOMES..=MAX_OUTCOMES).contains(&count),
            ValidationError::InvalidOutcomeCount
        );
        require!(
            outcomes
                .iter()
                .all(|o| !o.name.is_empty() && o.name.len() <= MAX_OUTCOME_NAME_LEN),
            ValidationError::InvalidOutcomeName
        );
        require!(
            !match_id.is_empty() && match_id.len() <= MAX_MATCH_ID_LEN,
            ValidationError::InvalidMatchId
        );
        require!(kickoff_time > now, ValidationError::InvalidKickoff);
        require!(initial_liquidity > 0, ValidationError::ZeroAmount);

        mapper.validate()?;
        require!(
            mapper.outcome_count() == count,
            ValidationError::MapperOutcomeMismatch
        );
        if mapper.may_split() {
            require!(
                outcomes.iter().all(|o| o.payout_type == PayoutType::Weighted),
                ValidationError::InvalidWeights
            );
        }

        require!(
            risk.min_price_bps >= 1
                && risk.min_price_bps < risk.max_price_bps
                && risk.max_price_bps as u64 <= BPS,
            ValidationError::InvalidPriceBand
        );
        if !initial_prices.is_empty() {
            require!(
                initial_prices.len() == count
                    && initial_prices.iter().all(|p| *p > 0)
                    && initial_prices.iter().map(|p| *p as u64).sum::<u64>() == BPS,
                ValidationError::InvalidInitialPrices
            );
        }

        let strategy = pricing.strategy();
        let pricing_state = strategy.initial_state(initial_liquidity, &initial_prices, count)?;

        let market = Self {
            id,
            operator,
            match_id,
            kickoff_time,
            outcomes,
            collateral_mint,
            vault,
            pricing,
            mapper,
            initial_liquidity,
            status: MarketStatus::Open,
            total_liquidity: 0,
            borrowed_amount: initial_liquidity,
            pricing_state,
            outcome_shares: vec![0; count],
            outcome_stakes: vec![0; count],
            allocations: vec![0; count],
            total_payout_claimed: 0,
            total_refunded: 0,
            payout_scale_bps: BPS as u16,
            settlement: SettlementResult::default(),
            risk,
            lock_grace_secs,
            created_at: now,
            locked_at: 0,
            finalized_at: 0,
            cancelled_at: 0,
            in_flight: false,
            bump,
        };
        market.check_price_band(&strategy.prices(&market.pricing_state)?)?;
        Ok(market)
    }

    pub fn created_event(&self, market: Pubkey) -> MarketCreated {
        MarketCreated {
            market_id: self.id,
            market,
            match_id: self.match_id.clone(),
            kickoff_time: self.kickoff_time,
            outcome_count: self.outcome_count() as u8,
            pricing: self.pricing,
            initial_liquidity: self.initial_liquidity,
        }
    }

    /// Stops betting. Keepers and operators may lock at any time; anyone
    /// may once the grace period after kickoff has passed.
    pub fn lock(
        &mut self,
        access: &impl AccessControl,
        caller: &Pubkey,
        now: i64,
    ) -> Result<MarketLocked> {
        access.require_active()?;
        self.require_status(MarketStatus::Open)?;

        let privileged =
            access.has_role(Role::Keeper, caller) || access.has_role(Role::Operator, caller);
        let overdue = now >= self.kickoff_time.saturating_add(self.lock_grace_secs);
        require!(privileged || overdue, StateError::LockNotAllowed);

        self.status = MarketStatus::Locked;
        self.locked_at = now;

        Ok(MarketLocked {
            market_id: self.id,
            locked_by: *caller,
            timestamp: now,
        })
    }

    /// Voids an open or locked market.
    pub fn cancel(
        &mut self,
        access: &impl AccessControl,
        caller: &Pubkey,
        escrow_balance: u64,
        now: i64,
    ) -> Result<Cancellation> {
        access.authorize(&[Role::Admin, Role::Operator], caller)?;
        if self.status != MarketStatus::Open {
            self.require_status(MarketStatus::Locked)?;
        }
        self.void(MarketStatus::Cancelled, caller, escrow_balance, now)
    }

    /// Voids a resolved market whose result is contested.
    pub fn cancel_after_resolve(
        &mut self,
        access: &impl AccessControl,
        caller: &Pubkey,
        escrow_balance: u64,
        now: i64,
    ) -> Result<Cancellation> {
        access.authorize(&[Role::Admin], caller)?;
        self.require_status(MarketStatus::Resolved)?;
        self.void(MarketStatus::CancelledAfterResolve, caller, escrow_balance, now)
    }

    /// Escrow first covers every stake refund; what is left goes back to
    /// the vault, up to the borrowed principal.
    fn void(
        &mut self,
        status: MarketStatus,
        caller: &Pubkey,
        escrow_balance: u64,
        now: i64,
    ) -> Result<Cancellation> {
        let reserved = checked_sum(&self.outcome_stakes)?;
        let vault_return = escrow_balance
            .saturating_sub(reserved)
            .min(self.borrowed_amount);
        let vault_loss = self.borrowed_amount - vault_return;

        self.status = status;
        self.cancelled_at = now;

        Ok(Cancellation {
            vault_return,
            vault_loss,
            cancelled: MarketCancelled {
                market_id: self.id,
                after_resolve: status == MarketStatus::CancelledAfterResolve,
                cancelled_by: *caller,
                timestamp: now,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::PricingModel;
    use crate::errors::AccessError;
    use crate::mapper::{MapperConfig, MapperKind};
    use crate::oracle::Scope;
    use crate::state::OutcomeRule;
    use crate::testing::*;

    #[test]
    fn test_new_market_is_open_and_funded() {
        let market = open_market(win_draw_win_params(1_000));
        assert_eq!(market.status, MarketStatus::Open);
        assert_eq!(market.outcome_count(), 3);
        assert_eq!(market.borrowed_amount, 1_000);
        assert_eq!(market.pricing_state, vec![1_000, 1_000, 1_000]);
        assert_eq!(market.outcome_shares, vec![0, 0, 0]);
    }

    #[test]
    fn test_new_market_validation() {
        let new = try_open_market;

        let mut params = win_draw_win_params(1_000);
        params.outcomes.truncate(1);
        assert_err(new(params), ValidationError::InvalidOutcomeCount);

        let mut params = win_draw_win_params(1_000);
        params.outcomes.pop();
        assert_err(new(params), ValidationError::MapperOutcomeMismatch);

        let mut params = win_draw_win_params(1_000);
        params.outcomes[1].name = String::new();
        assert_err(new(params), ValidationError::InvalidOutcomeName);

        let mut params = win_draw_win_params(1_000);
        params.kickoff_time = NOW;
        assert_err(new(params), ValidationError::InvalidKickoff);

        assert_err(new(win_draw_win_params(0)), ValidationError::ZeroAmount);

        let mut params = win_draw_win_params(1_000);
        params.risk.min_price_bps = 0;
        assert_err(new(params), ValidationError::InvalidPriceBand);

        let mut params = win_draw_win_params(1_000);
        params.initial_prices = vec![5_000, 5_000];
        assert_err(new(params), ValidationError::InvalidInitialPrices);

        let mut params = win_draw_win_params(1_000);
        params.mapper = params.mapper.with_scope(Scope::Penalties);
        assert_err(new(params), ValidationError::InvalidScope);

        let mut params = win_draw_win_params(1_000);
        params.mapper = MapperConfig::total_goals(4);
        assert_err(new(params), ValidationError::MapperOutcomeMismatch);
    }

    #[test]
    fn test_opening_prices_must_sit_in_band() {
        let mut params = win_draw_win_params(1_000);
        params.initial_prices = vec![9_000, 500, 500];
        params.risk.min_price_bps = 1_000;
        assert_err(
            try_open_market(params),
            ValidationError::OddsOutOfRange,
        );
    }

    #[test]
    fn test_splitting_mapper_needs_weighted_outcomes() {
        let mut params = win_draw_win_params(1_000);
        params.outcomes = vec![
            OutcomeRule { name: "Over 2".to_string(), payout_type: PayoutType::Binary },
            OutcomeRule { name: "Under 2".to_string(), payout_type: PayoutType::Binary },
        ];
        params.mapper = MapperConfig::new(MapperKind::OverUnder, 8);
        params.pricing = PricingModel::LinearDepth;
        assert_err(
            try_open_market(params.clone()),
            ValidationError::InvalidWeights,
        );

        for outcome in params.outcomes.iter_mut() {
            outcome.payout_type = PayoutType::Weighted;
        }
        let market = try_open_market(params).unwrap();
        assert_eq!(market.pricing_state, vec![5_000, 5_000]);
    }

    #[test]
    fn test_lock_permissions() {
        let (config, staff) = staffed_config();
        let stranger = Pubkey::new_unique();

        let mut market = open_market(win_draw_win_params(1_000));
        assert_err(market.lock(&config, &stranger, KICKOFF), StateError::LockNotAllowed);
        assert_err(
            market.lock(&config, &stranger, KICKOFF + 599),
            StateError::LockNotAllowed,
        );
        let locked = market.lock(&config, &stranger, KICKOFF + 600).unwrap();
        assert_eq!(locked.locked_by, stranger);
        assert_eq!(market.status, MarketStatus::Locked);
        assert_eq!(market.locked_at, KICKOFF + 600);

        let mut market = open_market(win_draw_win_params(1_000));
        assert!(market.lock(&config, &staff.keeper, NOW).is_ok());

        let mut market = open_market(win_draw_win_params(1_000));
        assert!(market.lock(&config, &staff.operator, NOW).is_ok());
        assert_err(
            market.lock(&config, &staff.operator, NOW),
            StateError::InvalidStatus,
        );
    }

    #[test]
    fn test_lock_blocked_while_paused() {
        let (mut config, staff) = staffed_config();
        config.paused = true;
        let mut market = open_market(win_draw_win_params(1_000));
        assert_err(market.lock(&config, &staff.keeper, NOW), AccessError::ProtocolPaused);
        assert_eq!(market.status, MarketStatus::Open);
    }

    #[test]
    fn test_cancel_open_market_returns_principal() {
        let (config, staff) = staffed_config();
        let mut market = open_market(win_draw_win_params(1_000));

        let cancellation = market.cancel(&config, &staff.operator, 1_000, NOW).unwrap();
        assert_eq!(
            cancellation,
            Cancellation {
                vault_return: 1_000,
                vault_loss: 0,
                cancelled: MarketCancelled {
                    market_id: market.id,
                    after_resolve: false,
                    cancelled_by: staff.operator,
                    timestamp: NOW,
                },
            }
        );
        assert_eq!(market.status, MarketStatus::Cancelled);
    }

    #[test]
    fn test_cancel_reserves_stakes_before_vault() {
        let (config, staff) = staffed_config();
        let mut market = open_market(win_draw_win_params(1_000));
        market.outcome_stakes = vec![300, 0, 200];
        market.total_liquidity = 500;

        let cancellation = market.cancel(&config, &staff.admin, 1_200, NOW).unwrap();
        assert_eq!(cancellation.vault_return, 700);
        assert_eq!(cancellation.vault_loss, 300);
    }

    #[test]
    fn test_cancel_guards() {
        let (config, staff) = staffed_config();
        let mut market = open_market(win_draw_win_params(1_000));
        assert_err(
            market.cancel(&config, &staff.keeper, 1_000, NOW),
            AccessError::Unauthorized,
        );

        market.status = MarketStatus::Resolved;
        assert_err(
            market.cancel(&config, &staff.admin, 1_000, NOW),
            StateError::InvalidStatus,
        );
        assert_err(
            market.cancel_after_resolve(&config, &staff.operator, 1_000, NOW),
            AccessError::Unauthorized,
        );

        let cancellation = market
            .cancel_after_resolve(&config, &staff.admin, 1_000, NOW)
            .unwrap();
        assert!(cancellation.cancelled.after_resolve);
        assert_eq!(market.status, MarketStatus::CancelledAfterResolve);
        assert!(market.status.is_terminal());

        assert_err(
            market.cancel_after_resolve(&config, &staff.admin, 1_000, NOW),
            StateError::InvalidStatus,
        );
    }
}
