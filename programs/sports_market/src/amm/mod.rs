//! # Automated Market Maker (AMM) Module
//!
//! Markets price their outcomes through a [`PricingStrategy`] chosen once at
//! creation and stored as a [`PricingModel`] tag. Every instruction resolves
//! the tag back to the same `&'static dyn PricingStrategy`, so the curve of a
//! market can never change after it opens.
//!
//! ```text
//!   ┌──────────────┐   quote(state, outcome, amount)   ┌─────────────────┐
//!   │    Market    │ ────────────────────────────────▶ │ PricingStrategy │
//!   │ pricing_state│ ◀──────────────────────────────── │  (pure, no I/O) │
//!   └──────────────┘   (shares, new_state, new_price)  └─────────────────┘
//! ```
//!
//! Prices are expressed in basis points of one collateral unit: a share
//! bought at 4000 bps costs 0.40 and pays 1.00 if its outcome wins outright.

pub mod constant_product;
pub mod linear_depth;

pub use constant_product::*;
pub use linear_depth::*;

use anchor_lang::prelude::*;

/// Errors specific to the pricing curves
#[error_code(offset = 6500)]
pub enum AmmError {
    #[msg("Invalid reserves: must be positive")]
    InvalidReserves,
    #[msg("Invalid pricing state")]
    InvalidSupplies,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Division by zero")]
    DivisionByZero,
    #[msg("Trade amount must be positive")]
    ZeroInput,
    #[msg("No shares to mint")]
    NoTokensToMint,
}

/// Result of pricing a bet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    /// Shares issued to the bettor
    pub shares: u64,
    /// Pricing state after the trade
    pub new_state: Vec<u64>,
    /// Post-trade price of the bought outcome, in bps
    pub new_price: u64,
}

/// Pluggable pricing curve.
///
/// `state` is the per-outcome pricing state stored on the market; its meaning
/// is private to each strategy. `depth` is the market's initial liquidity.
pub trait PricingStrategy {
    /// Pricing state of a freshly opened market
    fn initial_state(&self, liquidity: u64, initial_prices: &[u16], outcomes: usize)
        -> Result<Vec<u64>>;

    /// Prices `amount` of collateral spent on `outcome`
    fn quote(&self, state: &[u64], depth: u64, outcome: usize, amount: u64) -> Result<Quote>;

    /// Current price of every outcome, in bps
    fn prices(&self, state: &[u64]) -> Result<Vec<u64>>;

    fn price(&self, state: &[u64], outcome: usize) -> Result<u64> {
        self.prices(state)?
            .get(outcome)
            .copied()
            .ok_or_else(|| error!(AmmError::InvalidSupplies))
    }
}

/// Curve selector stored on the market
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub enum PricingModel {
    ConstantProduct,
    LinearDepth,
}

impl PricingModel {
    pub fn strategy(self) -> &'static dyn PricingStrategy {
        match self {
            PricingModel::ConstantProduct => &ConstantProduct,
            PricingModel::LinearDepth => &LinearDepth,
        }
    }
}

pub(crate) fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(AmmError::Overflow))
}
