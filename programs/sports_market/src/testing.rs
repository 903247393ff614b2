//! Shared fixtures for unit tests.

use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use crate::amm::PricingModel;
use crate::mapper::{MapperConfig, MapperKind};
use crate::state::{
    Config, CreateMarketParams, Market, OracleBackend, OutcomeRule, PayoutType, Position,
    RiskParams, Role,
};

pub const NOW: i64 = 1_700_000_000;
pub const KICKOFF: i64 = NOW + 3_600;

fn code(err: &Error) -> u32 {
    match err {
        Error::AnchorError(e) => e.error_code_number,
        Error::ProgramError(e) => panic!("unexpected program error: {:?}", e),
    }
}

/// Asserts that `result` failed with exactly `expected`.
pub fn assert_err<T>(result: Result<T>, expected: impl Into<Error>) {
    let expected = expected.into();
    match result {
        Ok(_) => panic!("expected {:?}, got Ok", expected),
        Err(err) => assert_eq!(code(&err), code(&expected), "got {:?}", err),
    }
}

pub fn test_config(admin: Pubkey) -> Config {
    Config {
        admin,
        collateral_mint: Pubkey::new_unique(),
        roles: Vec::new(),
        market_count: 0,
        lock_grace_secs: 600,
        oracle_bond: 1_000,
        oracle_liveness_secs: 7_200,
        paused: false,
        bump: 255,
    }
}

/// One key per role
pub struct Staff {
    pub admin: Pubkey,
    pub keeper: Pubkey,
    pub operator: Pubkey,
    pub oracle: Pubkey,
    pub router: Pubkey,
}

pub fn staffed_config() -> (Config, Staff) {
    let staff = Staff {
        admin: Pubkey::new_unique(),
        keeper: Pubkey::new_unique(),
        operator: Pubkey::new_unique(),
        oracle: Pubkey::new_unique(),
        router: Pubkey::new_unique(),
    };
    let mut config = test_config(staff.admin);
    for (role, member) in [
        (Role::Keeper, staff.keeper),
        (Role::Operator, staff.operator),
        (Role::Oracle, staff.oracle),
        (Role::Router, staff.router),
    ] {
        config.grant(role, member).unwrap();
    }
    (config, staff)
}

pub fn outcome(name: &str, payout_type: PayoutType) -> OutcomeRule {
    OutcomeRule {
        name: name.to_string(),
        payout_type,
    }
}

/// Home/Draw/Away on a constant-product book
pub fn win_draw_win_params(initial_liquidity: u64) -> CreateMarketParams {
    CreateMarketParams {
        match_id: "EPL-2024-ARS-CHE".to_string(),
        kickoff_time: KICKOFF,
        outcomes: vec![
            outcome("Home", PayoutType::Binary),
            outcome("Draw", PayoutType::Binary),
            outcome("Away", PayoutType::Binary),
        ],
        pricing: PricingModel::ConstantProduct,
        mapper: MapperConfig::new(MapperKind::WinDrawWin, 0),
        initial_liquidity,
        initial_prices: Vec::new(),
        risk: RiskParams {
            min_price_bps: 100,
            max_price_bps: 9_900,
            max_user_exposure: 0,
            max_liability: 0,
        },
        oracle_backend: OracleBackend::Direct,
    }
}

pub fn try_open_market(params: CreateMarketParams) -> Result<Market> {
    Market::new(
        1,
        Pubkey::new_unique(),
        params,
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        600,
        NOW,
        254,
    )
}

pub fn open_market(params: CreateMarketParams) -> Market {
    try_open_market(params).unwrap()
}

pub fn position_in(market: &Market, owner: Pubkey) -> Position {
    let mut position = Position {
        market: Pubkey::default(),
        owner: Pubkey::default(),
        balances: Vec::new(),
        exposure: 0,
        bump: 0,
    };
    position.open(Pubkey::new_unique(), owner, market.outcome_count(), 253);
    position
}
