//! Resolution, payout allocation, redemption and refunds.
//!
//! ```text
//! allocationⱼ = sharesⱼ · weightⱼ · scale / 10000²          (finalize)
//! payout      = shares · allocationⱼ / outstandingⱼ         (redeem)
//! refund      = shares · stakeⱼ / outstandingⱼ              (refund)
//! ```
//!
//! Allocations and stakes shrink with every claim, so the last holder of an
//! outcome takes exactly what is left and rounding never over-pays.

use anchor_lang::prelude::*;

use super::{checked_sum, mul_div};
use crate::constants::{BPS, MAX_OUTCOMES};
use crate::errors::{EconomicError, OracleError, StateError, ValidationError};
use crate::events::{MarketFinalized, MarketResolved, PositionRedeemed, PositionRefunded};
use crate::mapper::MappedResult;
use crate::oracle::{MatchFacts, ResultOracle};
use crate::state::{
    AccessControl, Market, MarketStatus, PayoutType, Position, Role, SettlementResult,
    ShareLedger,
};

/// One entry of a batch redemption
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShareClaim {
    pub outcome: u8,
    pub shares: u64,
}

/// What finalize leaves for the vault
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finalization {
    /// Principal the market borrowed
    pub principal: u64,
    /// Escrow not reserved for payouts
    pub vault_return: u64,
    /// `vault_return - principal`
    pub pnl: i64,
    pub finalized: MarketFinalized,
}

impl Market {
    /// Settles the market against finalized oracle facts. `raw` must hash to
    /// the record's content hash.
    pub fn resolve(
        &mut self,
        access: &impl AccessControl,
        caller: &Pubkey,
        oracle: &impl ResultOracle,
        raw: &[u8],
        now: i64,
    ) -> Result<MarketResolved> {
        access.authorize(&[Role::Keeper, Role::Oracle], caller)?;
        self.require_status(MarketStatus::Locked)?;
        require!(oracle.market_id() == self.id, OracleError::WrongMarket);
        require!(oracle.is_finalized(), OracleError::NotFinalized);

        let facts = MatchFacts::decode(raw)?;
        let result_hash = facts.result_hash(self.id);
        require!(
            result_hash == oracle.get_result_hash()?,
            OracleError::ResultHashMismatch
        );

        let mapped = self.mapper.map(&facts)?;
        self.check_mapped(&mapped)?;

        self.settlement = SettlementResult {
            winning_outcomes: mapped.outcome_ids,
            weights: mapped.weights,
            raw_result_hash: result_hash,
            settled_at: now,
            resolved: true,
        };
        self.status = MarketStatus::Resolved;

        Ok(MarketResolved {
            market_id: self.id,
            winning_outcomes: self.settlement.winning_outcomes.clone(),
            weights: self.settlement.weights.clone(),
            result_hash,
            timestamp: now,
        })
    }

    fn check_mapped(&self, mapped: &MappedResult) -> Result<()> {
        require!(
            !mapped.outcome_ids.is_empty() && mapped.outcome_ids.len() == mapped.weights.len(),
            ValidationError::InvalidWeights
        );
        require!(mapped.total_weight() == BPS, ValidationError::InvalidWeights);
        for (id, weight) in mapped.outcome_ids.iter().zip(&mapped.weights) {
            let index = self.outcome_index(*id)?;
            require!(
                *weight as u64 == BPS || self.outcomes[index].payout_type == PayoutType::Weighted,
                ValidationError::InvalidWeights
            );
        }
        Ok(())
    }

    /// Fixes per-outcome payouts at `scale_bps` of face value. The scaled
    /// total must fit both the liability cap and the escrow balance.
    pub fn finalize(
        &mut self,
        access: &impl AccessControl,
        caller: &Pubkey,
        scale_bps: u16,
        escrow_balance: u64,
        now: i64,
    ) -> Result<Finalization> {
        access.authorize(&[Role::Keeper, Role::Admin], caller)?;
        self.require_status(MarketStatus::Resolved)?;
        require!(
            scale_bps >= 1 && scale_bps as u64 <= BPS,
            ValidationError::InvalidPayoutScale
        );

        let allocations = self
            .outcome_shares
            .iter()
            .enumerate()
            .map(|(j, shares)| {
                let weight = self.settlement.weight_of(j) as u64 * scale_bps as u64;
                mul_div(*shares, weight, BPS * BPS)
            })
            .collect::<Result<Vec<u64>>>()?;
        let total_allocated = checked_sum(&allocations)?;

        let cap = self.liability_cap()?.min(escrow_balance);
        require!(
            total_allocated <= cap,
            EconomicError::LiabilityCapExceeded
        );

        let vault_return = escrow_balance - total_allocated;
        let pnl = i64::try_from(vault_return as i128 - self.borrowed_amount as i128)
            .map_err(|_| error!(EconomicError::Overflow))?;

        self.allocations = allocations;
        self.payout_scale_bps = scale_bps;
        self.status = MarketStatus::Finalized;
        self.finalized_at = now;

        Ok(Finalization {
            principal: self.borrowed_amount,
            vault_return,
            pnl,
            finalized: MarketFinalized {
                market_id: self.id,
                scale_bps,
                total_allocated,
                timestamp: now,
            },
        })
    }

    /// Burns `shares` of `outcome` for their share of its allocation.
    pub fn redeem(
        &mut self,
        access: &impl AccessControl,
        caller: &Pubkey,
        position: &mut Position,
        outcome: u8,
        shares: u64,
    ) -> Result<PositionRedeemed> {
        self.authorize_holder(access, caller, &position.owner)?;
        self.require_status(MarketStatus::Finalized)?;
        self.claim_payout(position, outcome, shares)
    }

    /// Redeems several outcomes at once; either every claim succeeds or
    /// nothing changes.
    pub fn redeem_batch(
        &mut self,
        access: &impl AccessControl,
        caller: &Pubkey,
        position: &mut Position,
        claims: &[ShareClaim],
    ) -> Result<(u64, Vec<PositionRedeemed>)> {
        self.authorize_holder(access, caller, &position.owner)?;
        self.require_status(MarketStatus::Finalized)?;
        require!(
            !claims.is_empty() && claims.len() <= MAX_OUTCOMES,
            ValidationError::InvalidBatch
        );

        let mut market = self.clone();
        let mut holder = position.clone();
        let mut total = 0u64;
        let mut redeemed = Vec::with_capacity(claims.len());
        for claim in claims {
            let event = market.claim_payout(&mut holder, claim.outcome, claim.shares)?;
            total = total.checked_add(event.payout).ok_or(EconomicError::Overflow)?;
            redeemed.push(event);
        }

        *self = market;
        *position = holder;
        Ok((total, redeemed))
    }

    fn claim_payout(
        &mut self,
        position: &mut Position,
        outcome: u8,
        shares: u64,
    ) -> Result<PositionRedeemed> {
        let index = self.outcome_index(outcome)?;
        require!(shares > 0, ValidationError::ZeroAmount);
        require!(
            position.balance_of(index) >= shares,
            EconomicError::InsufficientShares
        );

        let outstanding = self.outcome_shares[index];
        require!(outstanding >= shares, EconomicError::InsufficientShares);
        let payout = mul_div(shares, self.allocations[index], outstanding)?;
        let claimed = self
            .total_payout_claimed
            .checked_add(payout)
            .ok_or(EconomicError::Overflow)?;

        position.burn(index, shares)?;
        self.allocations[index] -= payout;
        self.outcome_shares[index] = outstanding - shares;
        self.total_payout_claimed = claimed;

        Ok(PositionRedeemed {
            market_id: self.id,
            user: position.owner,
            outcome,
            shares,
            payout,
        })
    }

    /// Burns `shares` of `outcome` for their share of the outcome's stakes.
    pub fn refund(
        &mut self,
        access: &impl AccessControl,
        caller: &Pubkey,
        position: &mut Position,
        outcome: u8,
        shares: u64,
    ) -> Result<PositionRefunded> {
        self.authorize_holder(access, caller, &position.owner)?;
        require!(self.status.is_cancelled(), StateError::InvalidStatus);
        let index = self.outcome_index(outcome)?;
        require!(shares > 0, ValidationError::ZeroAmount);
        require!(
            position.balance_of(index) >= shares,
            EconomicError::InsufficientShares
        );

        let outstanding = self.outcome_shares[index];
        require!(outstanding >= shares, EconomicError::InsufficientShares);
        let refund = mul_div(shares, self.outcome_stakes[index], outstanding)?;
        let refunded = self
            .total_refunded
            .checked_add(refund)
            .ok_or(EconomicError::Overflow)?;

        position.burn(index, shares)?;
        self.outcome_stakes[index] -= refund;
        self.outcome_shares[index] = outstanding - shares;
        self.total_refunded = refunded;

        Ok(PositionRefunded {
            market_id: self.id,
            user: position.owner,
            outcome,
            shares,
            refund,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::PricingModel;
    use crate::errors::AccessError;
    use crate::mapper::{MapperConfig, MapperKind};
    use crate::oracle::{PenaltyScore, Scope};
    use crate::state::{Config, FactsRecord, OracleBackend, RiskParams};
    use crate::testing::*;

    fn score(home_goals: u8, away_goals: u8) -> MatchFacts {
        MatchFacts {
            scope: Scope::FullTime,
            home_goals,
            away_goals,
            extra_time: false,
            penalties: None,
            reported_at: KICKOFF + 6_000,
        }
    }

    fn finalized_record(market_id: u64, facts: MatchFacts) -> FactsRecord {
        let mut record =
            FactsRecord::new(Pubkey::new_unique(), market_id, OracleBackend::Direct, 255);
        record
            .record_proposal(Pubkey::new_unique(), facts, KICKOFF + 6_000)
            .unwrap();
        record.finalize(KICKOFF + 6_000).unwrap();
        record
    }

    /// Market with bets of 100 on Home (alice) and 100 on Away (bob), locked.
    fn locked_with_bets() -> (Market, Position, Position) {
        let (config, staff) = staffed_config();
        let mut market = open_market(win_draw_win_params(1_000));
        let mut alice = position_in(&market, Pubkey::new_unique());
        let mut bob = position_in(&market, Pubkey::new_unique());
        let alice_key = alice.owner;
        let bob_key = bob.owner;
        market
            .place_bet(&config, &alice_key, &mut alice, 0, 100, 0, NOW)
            .unwrap();
        market
            .place_bet(&config, &bob_key, &mut bob, 2, 100, 0, NOW)
            .unwrap();
        market.lock(&config, &staff.keeper, KICKOFF).unwrap();
        (market, alice, bob)
    }

    #[test]
    fn test_resolve_against_finalized_facts() {
        let (config, staff) = staffed_config();
        let (mut market, _, _) = locked_with_bets();
        let facts = score(2, 1);
        let record = finalized_record(market.id, facts);

        let resolved = market
            .resolve(&config, &staff.oracle, &record, &facts.encode(), KICKOFF + 7_000)
            .unwrap();
        assert_eq!(resolved.winning_outcomes, vec![0]);
        assert_eq!(resolved.weights, vec![10_000]);
        assert_eq!(resolved.result_hash, facts.result_hash(market.id));
        assert_eq!(market.status, MarketStatus::Resolved);
        assert!(market.settlement.resolved);
        assert_eq!(market.settlement.weight_of(0), 10_000);
        assert_eq!(market.settlement.weight_of(2), 0);
    }

    #[test]
    fn test_resolve_rejects_mismatched_payload() {
        let (config, staff) = staffed_config();
        let (mut market, _, _) = locked_with_bets();
        let record = finalized_record(market.id, score(2, 1));

        assert_err(
            market.resolve(&config, &staff.keeper, &record, &score(1, 2).encode(), KICKOFF),
            OracleError::ResultHashMismatch,
        );
        assert_err(
            market.resolve(&config, &staff.keeper, &record, &[0u8; 3], KICKOFF),
            ValidationError::MalformedFacts,
        );
        assert_eq!(market.status, MarketStatus::Locked);
    }

    #[test]
    fn test_resolve_requires_final_record_for_this_market() {
        let (config, staff) = staffed_config();
        let (mut market, _, _) = locked_with_bets();
        let facts = score(0, 0);

        let mut pending =
            FactsRecord::new(Pubkey::new_unique(), market.id, OracleBackend::Optimistic, 255);
        pending
            .record_proposal(Pubkey::new_unique(), facts, KICKOFF + 6_000)
            .unwrap();
        assert_err(
            market.resolve(&config, &staff.keeper, &pending, &facts.encode(), KICKOFF),
            OracleError::NotFinalized,
        );

        let other = finalized_record(market.id + 1, facts);
        assert_err(
            market.resolve(&config, &staff.keeper, &other, &facts.encode(), KICKOFF),
            OracleError::WrongMarket,
        );

        assert_err(
            market.resolve(&config, &staff.operator, &pending, &facts.encode(), KICKOFF),
            AccessError::Unauthorized,
        );
    }

    #[test]
    fn test_resolve_rejects_facts_for_another_scope() {
        let (config, staff) = staffed_config();
        let (mut market, _, _) = locked_with_bets();
        // level after ninety minutes, home win after extra time
        let after_extra_time = MatchFacts {
            scope: Scope::ExtraTime,
            extra_time: true,
            penalties: Some(PenaltyScore { home: 0, away: 0 }),
            ..score(2, 1)
        };
        let record = finalized_record(market.id, after_extra_time);

        let mut extra_time_market = market.clone();
        assert_err(
            market.resolve(&config, &staff.keeper, &record, &after_extra_time.encode(), KICKOFF),
            ValidationError::ScopeMismatch,
        );
        assert_eq!(market.status, MarketStatus::Locked);

        extra_time_market.mapper = extra_time_market.mapper.with_scope(Scope::ExtraTime);
        let resolved = extra_time_market
            .resolve(&config, &staff.keeper, &record, &after_extra_time.encode(), KICKOFF)
            .unwrap();
        assert_eq!(resolved.winning_outcomes, vec![0]);
    }

    #[test]
    fn test_hundred_outcome_market_settles() {
        let (config, staff) = staffed_config();
        let mut params = win_draw_win_params(10_000);
        params.outcomes = (0..100)
            .map(|goals| outcome(&format!("{} goals", goals), PayoutType::Binary))
            .collect();
        params.mapper = MapperConfig::total_goals(100);
        params.risk = RiskParams {
            min_price_bps: 1,
            max_price_bps: 9_999,
            max_user_exposure: 0,
            max_liability: 0,
        };
        let mut market = open_market(params);
        assert_eq!(market.outcome_count(), 100);

        let user = Pubkey::new_unique();
        let mut position = position_in(&market, user);
        let shares = market
            .place_bet(&config, &user, &mut position, 3, 10, 0, NOW)
            .unwrap()
            .shares;
        market.lock(&config, &staff.keeper, KICKOFF).unwrap();

        let facts = score(2, 1);
        let record = finalized_record(market.id, facts);
        let resolved = market
            .resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF)
            .unwrap();
        assert_eq!(resolved.winning_outcomes, vec![3]);

        let escrow = market.funded_collateral().unwrap();
        let finalization = market
            .finalize(&config, &staff.keeper, 10_000, escrow, KICKOFF)
            .unwrap();
        assert_eq!(finalization.finalized.total_allocated, shares);

        let redeemed = market.redeem(&config, &user, &mut position, 3, shares).unwrap();
        assert_eq!(redeemed.payout, shares);
        assert_eq!(market.total_payout_claimed + finalization.vault_return, escrow);
    }

    #[test]
    fn test_resolve_requires_locked() {
        let (config, staff) = staffed_config();
        let mut market = open_market(win_draw_win_params(1_000));
        let facts = score(1, 0);
        let record = finalized_record(market.id, facts);
        assert_err(
            market.resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF),
            StateError::InvalidStatus,
        );
    }

    #[test]
    fn test_finalize_allocates_winners() {
        let (config, staff) = staffed_config();
        let (mut market, _, _) = locked_with_bets();
        let facts = score(3, 0);
        let record = finalized_record(market.id, facts);
        market
            .resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF)
            .unwrap();

        let home_shares = market.outcome_shares[0];
        let escrow = market.funded_collateral().unwrap();
        let finalization = market
            .finalize(&config, &staff.keeper, 10_000, escrow, KICKOFF)
            .unwrap();

        assert_eq!(market.allocations, vec![home_shares, 0, 0]);
        assert_eq!(finalization.finalized.total_allocated, home_shares);
        assert_eq!(finalization.vault_return, escrow - home_shares);
        assert_eq!(
            finalization.pnl,
            (escrow - home_shares) as i64 - 1_000
        );
        assert_eq!(market.status, MarketStatus::Finalized);
    }

    #[test]
    fn test_finalize_scale_and_cap() {
        let (config, staff) = staffed_config();
        let (mut market, _, _) = locked_with_bets();
        let facts = score(3, 0);
        let record = finalized_record(market.id, facts);
        market
            .resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF)
            .unwrap();
        let home_shares = market.outcome_shares[0];

        assert_err(
            market.finalize(&config, &staff.keeper, 0, 10_000, KICKOFF),
            ValidationError::InvalidPayoutScale,
        );
        assert_err(
            market.finalize(&config, &staff.keeper, 10_001, 10_000, KICKOFF),
            ValidationError::InvalidPayoutScale,
        );

        market.risk.max_liability = home_shares / 2;
        assert_err(
            market.finalize(&config, &staff.keeper, 10_000, 10_000, KICKOFF),
            EconomicError::LiabilityCapExceeded,
        );
        let finalization = market
            .finalize(&config, &staff.admin, 5_000, 10_000, KICKOFF)
            .unwrap();
        assert_eq!(finalization.finalized.total_allocated, home_shares / 2);
        assert_eq!(market.payout_scale_bps, 5_000);
    }

    #[test]
    fn test_finalize_is_replayable() {
        let (config, staff) = staffed_config();
        let (mut market, _, _) = locked_with_bets();
        let facts = score(1, 0);
        let record = finalized_record(market.id, facts);
        market
            .resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF)
            .unwrap();
        let escrow = market.funded_collateral().unwrap();

        let mut replay = market.clone();
        let first = market
            .finalize(&config, &staff.keeper, 7_500, escrow, KICKOFF)
            .unwrap();
        let second = replay
            .finalize(&config, &staff.keeper, 7_500, escrow, KICKOFF)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.finalized.clone(), second.finalized);
    }

    /// Redeems every share the holders own, a third at a time.
    fn redeem_everything(
        market: &mut Market,
        config: &Config,
        holders: &mut [&mut Position],
    ) -> u64 {
        let mut paid = 0;
        for holder in holders.iter_mut() {
            let owner = holder.owner;
            for index in 0..market.outcome_count() {
                while holder.balance_of(index) > 0 {
                    let balance = holder.balance_of(index);
                    let shares = (balance / 3).max(1).min(balance);
                    paid += market
                        .redeem(config, &owner, &mut **holder, index as u8, shares)
                        .unwrap()
                        .payout;
                }
            }
        }
        paid
    }

    #[test]
    fn test_payouts_never_exceed_scaled_collateral() {
        let (config, staff) = staffed_config();
        for scale in [1u16, 2_500, 5_000, 9_999, 10_000] {
            // single winner
            let (mut market, mut alice, mut bob) = locked_with_bets();
            let facts = score(1, 0);
            let record = finalized_record(market.id, facts);
            market
                .resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF)
                .unwrap();
            let funded = market.funded_collateral().unwrap();
            market
                .finalize(&config, &staff.keeper, scale, funded, KICKOFF)
                .unwrap();
            let paid = redeem_everything(&mut market, &config, &mut [&mut alice, &mut bob]);
            assert!(paid as u128 <= funded as u128 * scale as u128 / BPS as u128);
            assert_eq!(paid, market.total_payout_claimed);

            // quarter line paying both sides
            let mut params = win_draw_win_params(1_000);
            params.outcomes = vec![
                outcome("Over 2.25", PayoutType::Weighted),
                outcome("Under 2.25", PayoutType::Weighted),
            ];
            params.mapper = MapperConfig::new(MapperKind::OverUnder, 9);
            let mut market = open_market(params);
            let mut over = position_in(&market, Pubkey::new_unique());
            let mut under = position_in(&market, Pubkey::new_unique());
            let (over_key, under_key) = (over.owner, under.owner);
            market
                .place_bet(&config, &over_key, &mut over, 0, 150, 0, NOW)
                .unwrap();
            market
                .place_bet(&config, &under_key, &mut under, 1, 90, 0, NOW)
                .unwrap();
            market.lock(&config, &staff.keeper, KICKOFF).unwrap();
            let facts = score(1, 1);
            let record = finalized_record(market.id, facts);
            market
                .resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF)
                .unwrap();
            let funded = market.funded_collateral().unwrap();
            market
                .finalize(&config, &staff.keeper, scale, funded, KICKOFF)
                .unwrap();
            let paid = redeem_everything(&mut market, &config, &mut [&mut over, &mut under]);
            assert!(paid as u128 <= funded as u128 * scale as u128 / BPS as u128);
            assert_eq!(market.allocations, vec![0, 0]);
        }
    }

    #[test]
    fn test_outcome_shares_track_bets_less_burns() {
        let (config, staff) = staffed_config();
        for cancelled in [false, true] {
            let mut market = open_market(win_draw_win_params(1_000));
            let mut alice = position_in(&market, Pubkey::new_unique());
            let mut bob = position_in(&market, Pubkey::new_unique());
            let (alice_key, bob_key) = (alice.owner, bob.owner);

            let mut minted = [0u64; 3];
            for (outcome, amount) in [(0u8, 100u64), (2, 60), (1, 40)] {
                minted[outcome as usize] += market
                    .place_bet(&config, &alice_key, &mut alice, outcome, amount, 0, NOW)
                    .unwrap()
                    .shares;
            }
            minted[0] += market
                .place_bet(&config, &bob_key, &mut bob, 0, 70, 0, NOW)
                .unwrap()
                .shares;
            let moved = alice.balance_of(0) / 3;
            market
                .transfer_shares(&config, &alice_key, &mut alice, &mut bob, 0, moved)
                .unwrap();
            market
                .transfer_shares(&config, &alice_key, &mut alice, &mut bob, 2, 5)
                .unwrap();
            assert_eq!(market.outcome_shares, minted.to_vec());

            market.lock(&config, &staff.keeper, KICKOFF).unwrap();
            if cancelled {
                let escrow = market.funded_collateral().unwrap();
                market.cancel(&config, &staff.admin, escrow, KICKOFF).unwrap();
            } else {
                let facts = score(2, 1);
                let record = finalized_record(market.id, facts);
                market
                    .resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF)
                    .unwrap();
                let escrow = market.funded_collateral().unwrap();
                market
                    .finalize(&config, &staff.keeper, 10_000, escrow, KICKOFF)
                    .unwrap();
            }

            let mut burned = [0u64; 3];
            for (holder, outcome) in [(0, 0u8), (1, 0), (0, 2), (1, 2), (0, 1)] {
                let position = if holder == 0 { &mut alice } else { &mut bob };
                let owner = position.owner;
                let balance = position.balance_of(outcome as usize);
                let shares = balance - balance / 2;
                if cancelled {
                    market
                        .refund(&config, &owner, position, outcome, shares)
                        .unwrap();
                } else {
                    market
                        .redeem(&config, &owner, position, outcome, shares)
                        .unwrap();
                }
                burned[outcome as usize] += shares;
            }

            for j in 0..3 {
                assert_eq!(market.outcome_shares[j], minted[j] - burned[j]);
                assert_eq!(
                    market.outcome_shares[j],
                    alice.balance_of(j) + bob.balance_of(j)
                );
            }
        }
    }

    #[test]
    fn test_redeem_pays_pro_rata_and_burns() {
        let (config, staff) = staffed_config();
        let (mut market, mut alice, mut bob) = locked_with_bets();
        let facts = score(2, 0);
        let record = finalized_record(market.id, facts);
        market
            .resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF)
            .unwrap();

        let alice_key = alice.owner;
        assert_err(
            market.redeem(&config, &alice_key, &mut alice, 0, 1),
            StateError::InvalidStatus,
        );

        let escrow = market.funded_collateral().unwrap();
        market
            .finalize(&config, &staff.keeper, 10_000, escrow, KICKOFF)
            .unwrap();

        let shares = alice.balance_of(0);
        let half = shares / 2;
        let first = market.redeem(&config, &alice_key, &mut alice, 0, half).unwrap();
        let second = market
            .redeem(&config, &staff.router, &mut alice, 0, shares - half)
            .unwrap();
        assert_eq!(first.payout + second.payout, shares);
        assert_eq!(market.total_payout_claimed, shares);
        assert_eq!(market.allocations[0], 0);
        assert_eq!(alice.balance_of(0), 0);

        let bob_key = bob.owner;
        let bob_shares = bob.balance_of(2);
        let losing = market
            .redeem(&config, &bob_key, &mut bob, 2, bob_shares)
            .unwrap();
        assert_eq!(losing.payout, 0);

        assert_err(
            market.redeem(&config, &alice_key, &mut alice, 0, 1),
            EconomicError::InsufficientShares,
        );
    }

    #[test]
    fn test_redeem_batch_is_all_or_nothing() {
        let (config, staff) = staffed_config();
        let mut params = win_draw_win_params(1_000);
        params.outcomes = vec![
            outcome("Over 2", PayoutType::Weighted),
            outcome("Under 2", PayoutType::Weighted),
        ];
        params.mapper = MapperConfig::new(MapperKind::OverUnder, 8);
        params.pricing = PricingModel::ConstantProduct;
        let mut market = open_market(params);
        let user = Pubkey::new_unique();
        let mut position = position_in(&market, user);
        market
            .place_bet(&config, &user, &mut position, 0, 100, 0, NOW)
            .unwrap();
        market
            .place_bet(&config, &user, &mut position, 1, 100, 0, NOW)
            .unwrap();
        market.lock(&config, &staff.keeper, KICKOFF).unwrap();

        // two goals on a 2.0 line: push
        let facts = score(1, 1);
        let record = finalized_record(market.id, facts);
        market
            .resolve(&config, &staff.keeper, &record, &facts.encode(), KICKOFF)
            .unwrap();
        assert_eq!(market.settlement.weights, vec![5_000, 5_000]);
        let escrow = market.funded_collateral().unwrap();
        market
            .finalize(&config, &staff.keeper, 10_000, escrow, KICKOFF)
            .unwrap();

        let over = position.balance_of(0);
        let under = position.balance_of(1);
        let too_many = [
            ShareClaim { outcome: 0, shares: over },
            ShareClaim { outcome: 1, shares: under + 1 },
        ];
        assert_err(
            market.redeem_batch(&config, &user, &mut position, &too_many),
            EconomicError::InsufficientShares,
        );
        assert_eq!(position.balance_of(0), over);
        assert_eq!(market.total_payout_claimed, 0);

        let claims = [
            ShareClaim { outcome: 0, shares: over },
            ShareClaim { outcome: 1, shares: under },
        ];
        let (total, events) = market
            .redeem_batch(&config, &user, &mut position, &claims)
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(total, over / 2 + under / 2);
        assert_eq!(market.total_payout_claimed, total);

        assert_err(
            market.redeem_batch(&config, &user, &mut position, &[]),
            ValidationError::InvalidBatch,
        );
    }

    #[test]
    fn test_refund_after_cancel() {
        let (config, staff) = staffed_config();
        let (mut market, mut alice, _) = locked_with_bets();
        let alice_key = alice.owner;

        assert_err(
            market.refund(&config, &alice_key, &mut alice, 0, 1),
            StateError::InvalidStatus,
        );

        let escrow = market.funded_collateral().unwrap();
        market.cancel(&config, &staff.admin, escrow, KICKOFF).unwrap();

        let shares = alice.balance_of(0);
        let refunded = market
            .refund(&config, &alice_key, &mut alice, 0, shares)
            .unwrap();
        assert_eq!(refunded.refund, 100);
        assert_eq!(market.outcome_stakes[0], 0);
        assert_eq!(market.total_refunded, 100);
        assert_eq!(alice.balance_of(0), 0);
    }

    #[test]
    fn test_refund_rounding_never_overpays() {
        let (config, _) = staffed_config();
        let mut market = open_market(win_draw_win_params(1_000));
        market.status = MarketStatus::Cancelled;
        market.outcome_shares = vec![3, 0, 0];
        market.outcome_stakes = vec![10, 0, 0];
        let mut position = position_in(&market, Pubkey::new_unique());
        position.balances = vec![3, 0, 0];
        let owner = position.owner;

        let mut total = 0;
        for _ in 0..3 {
            total += market
                .refund(&config, &owner, &mut position, 0, 1)
                .unwrap()
                .refund;
        }
        assert_eq!(total, 10);
        assert_eq!(market.outcome_stakes[0], 0);
    }
}
