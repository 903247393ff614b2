//! # Sports Market: Per-Match Outcome Markets
//!
//! Each market covers one match. Bettors buy outcome shares from an AMM
//! funded by a shared liquidity vault; after the match an oracle reports the
//! facts, a result mapper turns them into winning outcomes, and shares
//! redeem against the escrowed collateral.
//!
//! ## How it works
//! - Pricing strategies (`amm`) quote every bet and keep prices in a band.
//! - Exposure and liability limits (`engine::risk`) bound what a market owes.
//! - Facts arrive from a direct reporter or a bonded optimistic assertion
//!   with a dispute window (`oracle`).
//! - The vault lends opening liquidity and books each market's profit or
//!   loss when it finalizes or cancels.
//!

use anchor_lang::prelude::*;

pub mod amm;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod mapper;
pub mod oracle;
pub mod state;
pub mod utils;

#[cfg(test)]
mod testing;

pub use engine::{BetQuote, LiabilityReport, ShareClaim};
pub use instructions::*;
pub use oracle::MatchFacts;
pub use state::{CreateMarketParams, Role};

declare_id!("4TX5TrzUuRAfRn7DoHZ2CHj2kvL6HXV8NWA6vdddQQKK");

#[program]
pub mod sports_market {
    use super::*;

    // =========================================================================
    // PROTOCOL ADMINISTRATION
    // =========================================================================

    /// Initialize the protocol with global configuration
    pub fn initialize(ctx: Context<Initialize>, params: ProtocolParams) -> Result<()> {
        ctx.accounts.initialize(params, &ctx.bumps)
    }

    pub fn grant_role(ctx: Context<UpdateConfig>, role: Role, member: Pubkey) -> Result<()> {
        ctx.accounts.grant_role(role, member)
    }

    pub fn revoke_role(ctx: Context<UpdateConfig>, role: Role, member: Pubkey) -> Result<()> {
        ctx.accounts.revoke_role(role, member)
    }

    pub fn set_paused(ctx: Context<UpdateConfig>, paused: bool) -> Result<()> {
        ctx.accounts.set_paused(paused)
    }

    pub fn update_oracle_params(
        ctx: Context<UpdateConfig>,
        oracle_bond: u64,
        oracle_liveness_secs: i64,
    ) -> Result<()> {
        ctx.accounts.update_oracle_params(oracle_bond, oracle_liveness_secs)
    }

    pub fn update_lock_grace(ctx: Context<UpdateConfig>, lock_grace_secs: i64) -> Result<()> {
        ctx.accounts.update_lock_grace(lock_grace_secs)
    }

    // =========================================================================
    // LIQUIDITY VAULT
    // =========================================================================

    pub fn initialize_vault(ctx: Context<InitializeVault>, max_borrow_per_market: u64) -> Result<()> {
        ctx.accounts.initialize_vault(max_borrow_per_market, &ctx.bumps)
    }

    pub fn deposit_liquidity(ctx: Context<VaultLiquidity>, amount: u64) -> Result<()> {
        ctx.accounts.deposit_liquidity(amount)
    }

    pub fn withdraw_liquidity(ctx: Context<VaultLiquidity>, amount: u64) -> Result<()> {
        ctx.accounts.withdraw_liquidity(amount)
    }

    // =========================================================================
    // MARKET LIFECYCLE
    // =========================================================================

    /// Create a market and borrow its opening liquidity from the vault
    pub fn create_market(ctx: Context<CreateMarket>, params: CreateMarketParams) -> Result<()> {
        ctx.accounts.create_market(params, &ctx.bumps)
    }

    /// Stop betting on a market
    pub fn lock_market(ctx: Context<LockMarket>) -> Result<()> {
        ctx.accounts.lock_market()
    }

    /// Settle a locked market against its finalized facts
    pub fn resolve_market(ctx: Context<ResolveMarket>, raw_facts: Vec<u8>) -> Result<()> {
        ctx.accounts.resolve_market(raw_facts)
    }

    /// Fix payouts at `scale_bps` and return the remaining escrow to the vault
    pub fn finalize_market(ctx: Context<SettleWithVault>, scale_bps: u16) -> Result<()> {
        ctx.accounts.finalize_market(scale_bps)
    }

    pub fn cancel_market(ctx: Context<SettleWithVault>) -> Result<()> {
        ctx.accounts.cancel_market()
    }

    pub fn cancel_after_resolve(ctx: Context<SettleWithVault>) -> Result<()> {
        ctx.accounts.cancel_after_resolve()
    }

    // =========================================================================
    // TRADING & CLAIMS
    // =========================================================================

    /// Buy outcome shares; returns the shares bought
    pub fn place_bet(
        ctx: Context<PlaceBet>,
        outcome: u8,
        amount: u64,
        min_shares: u64,
    ) -> Result<u64> {
        ctx.accounts.place_bet(outcome, amount, min_shares, &ctx.bumps)
    }

    pub fn transfer_shares(ctx: Context<TransferShares>, outcome: u8, shares: u64) -> Result<()> {
        ctx.accounts.transfer_shares(outcome, shares, &ctx.bumps)
    }

    pub fn redeem(ctx: Context<Claim>, outcome: u8, shares: u64) -> Result<u64> {
        ctx.accounts.redeem(outcome, shares)
    }

    pub fn redeem_batch(ctx: Context<Claim>, claims: Vec<ShareClaim>) -> Result<u64> {
        ctx.accounts.redeem_batch(claims)
    }

    pub fn refund(ctx: Context<Claim>, outcome: u8, shares: u64) -> Result<u64> {
        ctx.accounts.refund(outcome, shares)
    }

    pub fn preview_bet(ctx: Context<ViewMarket>, outcome: u8, amount: u64) -> Result<BetQuote> {
        ctx.accounts.preview_bet(outcome, amount)
    }

    pub fn check_liability_limit(ctx: Context<ViewMarket>) -> Result<LiabilityReport> {
        ctx.accounts.check_liability_limit()
    }

    // =========================================================================
    // ORACLE
    // =========================================================================

    /// Report final facts as a trusted oracle
    pub fn propose_result(ctx: Context<ProposeResult>, facts: MatchFacts) -> Result<()> {
        ctx.accounts.propose_result(facts)
    }

    /// Report facts for several markets; records go in remaining accounts
    pub fn propose_results_batch<'info>(
        ctx: Context<'_, '_, 'info, 'info, ProposeResultsBatch<'info>>,
        facts: Vec<MatchFacts>,
    ) -> Result<()> {
        handle_propose_results_batch(ctx, facts)
    }

    /// Propose facts behind a bond, open to dispute until liveness expires
    pub fn assert_result(ctx: Context<AssertResult>, facts: MatchFacts) -> Result<()> {
        ctx.accounts.assert_result(facts, &ctx.bumps)
    }

    pub fn dispute_assertion(ctx: Context<DisputeAssertion>, reason: String) -> Result<()> {
        ctx.accounts.dispute_assertion(reason)
    }

    pub fn arbitrate_assertion(ctx: Context<ArbitrateAssertion>, truthful: bool) -> Result<()> {
        ctx.accounts.arbitrate_assertion(truthful)
    }

    pub fn settle_assertion(ctx: Context<SettleAssertion>) -> Result<()> {
        ctx.accounts.settle_assertion()
    }

    pub fn can_settle(ctx: Context<ViewAssertion>) -> Result<bool> {
        ctx.accounts.can_settle()
    }

    pub fn get_result_hash(ctx: Context<ViewFacts>) -> Result<[u8; 32]> {
        ctx.accounts.get_result_hash()
    }

    pub fn is_result_finalized(ctx: Context<ViewFacts>) -> Result<bool> {
        ctx.accounts.is_result_finalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{DirectOracle, Scope};
    use crate::state::{
        FactsRecord, LiquidityVault, MarketStatus, OracleBackend, ShareLedger, VaultLedger,
    };
    use crate::testing::*;

    fn vault_with(total_assets: u64) -> LiquidityVault {
        LiquidityVault {
            collateral_mint: Pubkey::new_unique(),
            total_assets,
            total_borrowed: 0,
            max_borrow_per_market: 0,
            realized_pnl: 0,
            total_losses: 0,
            markets_funded: 0,
            bump: 255,
        }
    }

    fn home_win(reported_at: i64) -> MatchFacts {
        MatchFacts {
            scope: Scope::FullTime,
            home_goals: 2,
            away_goals: 1,
            extra_time: false,
            penalties: None,
            reported_at,
        }
    }

    #[test]
    fn test_market_from_bet_to_redemption() {
        let (config, staff) = staffed_config();
        let mut vault = vault_with(10_000);
        vault.fund(1, 1_000).unwrap();
        let mut market = open_market(win_draw_win_params(1_000));
        let mut record =
            FactsRecord::new(Pubkey::new_unique(), market.id, OracleBackend::Direct, 250);

        let alice = Pubkey::new_unique();
        let mut position = position_in(&market, alice);
        let placed = market
            .place_bet(&config, &alice, &mut position, 0, 100, 0, NOW)
            .unwrap();
        assert_eq!(placed.shares, 272);

        market.lock(&config, &staff.keeper, NOW + 60).unwrap();

        let reported_at = KICKOFF + 7_000;
        let facts = home_win(reported_at);
        DirectOracle::propose(&mut record, &config, &staff.oracle, facts, reported_at).unwrap();
        let resolved = market
            .resolve(&config, &staff.keeper, &record, &facts.encode(), reported_at + 60)
            .unwrap();
        assert_eq!(resolved.winning_outcomes, vec![0]);
        assert_eq!(resolved.weights, vec![10_000]);

        let escrow = 1_100;
        let finalization = market
            .finalize(&config, &staff.keeper, 10_000, escrow, reported_at + 120)
            .unwrap();
        assert_eq!(finalization.vault_return, 828);
        assert_eq!(finalization.pnl, -172);

        vault
            .report_settlement(market.id, finalization.principal, finalization.pnl)
            .unwrap();
        assert_eq!(vault.total_assets, 9_828);
        assert_eq!(vault.total_borrowed, 0);
        assert_eq!(vault.realized_pnl, -172);

        let redeemed = market.redeem(&config, &alice, &mut position, 0, 272).unwrap();
        assert_eq!(redeemed.payout, 272);
        assert_eq!(market.total_payout_claimed, 272);
        assert_eq!(position.balance_of(0), 0);
        assert_eq!(market.status, MarketStatus::Finalized);
    }

    #[test]
    fn test_cancelled_market_refunds_stakes_and_repays_vault() {
        let (config, staff) = staffed_config();
        let mut vault = vault_with(10_000);
        vault.fund(1, 1_000).unwrap();
        let mut market = open_market(win_draw_win_params(1_000));

        let alice = Pubkey::new_unique();
        let mut position = position_in(&market, alice);
        market
            .place_bet(&config, &alice, &mut position, 0, 100, 0, NOW)
            .unwrap();

        let cancellation = market.cancel(&config, &staff.operator, 1_100, NOW + 60).unwrap();
        assert_eq!(cancellation.vault_return, 1_000);
        assert_eq!(cancellation.vault_loss, 0);
        vault
            .report_settlement(market.id, cancellation.vault_return, 0)
            .unwrap();
        assert_eq!(vault.total_assets, 10_000);

        let refunded = market.refund(&config, &alice, &mut position, 0, 272).unwrap();
        assert_eq!(refunded.refund, 100);
        assert_eq!(market.total_refunded, 100);
    }

    #[test]
    fn test_untouched_market_cancels_without_loss() {
        let (config, staff) = staffed_config();
        let mut market = open_market(win_draw_win_params(1_000));

        let cancellation = market.cancel(&config, &staff.operator, 1_000, NOW).unwrap();
        assert_eq!(cancellation.vault_return, 1_000);
        assert_eq!(cancellation.vault_loss, 0);
        assert_eq!(market.status, MarketStatus::Cancelled);
    }
}
