//! # Constant-Product Outcome Pool
//!
//! The pool holds a reserve of shares for every outcome and keeps the
//! product of all reserves constant.
//!
//! ## The Core Invariant
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │              k = r₀ · r₁ · … · rₙ₋₁                          │
//! │                                                              │
//! │   Where:                                                     │
//! │   • rⱼ = pool reserve of outcome j shares                    │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Buying outcome i with L collateral
//!
//! ```text
//! 1. L collateral mints L complete sets:  rⱼ += L  for every j
//! 2. solve for rᵢ' keeping k:  rᵢ' = rᵢ · Π_{j≠i} rⱼ / (rⱼ + L)
//! 3. shares_out = rᵢ + L - rᵢ'
//! ```
//!
//! The product is evaluated one ratio at a time (rounding the reserve up at
//! each step), so a hundred outcomes never overflow and the pool never loses
//! to rounding.
//!
//! ## Prices
//!
//! ```text
//! priceᵢ = (1 / rᵢ) / Σⱼ (1 / rⱼ)
//! ```
//!
//! Each inverse is taken as `PRICE_PRECISION · min(r) / rᵢ`, which keeps
//! the ratio exact for reserves of any size up to `u64::MAX`.

use anchor_lang::prelude::*;

use super::{to_u64, AmmError, PricingStrategy, Quote};
use crate::constants::{BPS, PRICE_PRECISION};

/// n-outcome constant-product market maker
pub struct ConstantProduct;

impl PricingStrategy for ConstantProduct {
    /// Uniform reserves, or reserves inversely proportional to the hinted
    /// prices so the opening quotes match them.
    fn initial_state(
        &self,
        liquidity: u64,
        initial_prices: &[u16],
        outcomes: usize,
    ) -> Result<Vec<u64>> {
        require!(liquidity > 0, AmmError::InvalidReserves);
        if initial_prices.is_empty() {
            return Ok(vec![liquidity; outcomes]);
        }

        let floor = initial_prices
            .iter()
            .copied()
            .min()
            .ok_or(AmmError::InvalidSupplies)? as u128;
        require!(floor > 0, AmmError::InvalidSupplies);

        initial_prices
            .iter()
            .map(|price| {
                let reserve = (liquidity as u128)
                    .checked_mul(floor)
                    .ok_or(AmmError::Overflow)?
                    / (*price as u128);
                require!(reserve > 0, AmmError::InvalidReserves);
                to_u64(reserve)
            })
            .collect()
    }

    fn quote(&self, state: &[u64], _depth: u64, outcome: usize, amount: u64) -> Result<Quote> {
        require!(amount > 0, AmmError::ZeroInput);
        require!(outcome < state.len(), AmmError::InvalidSupplies);
        require!(state.iter().all(|r| *r > 0), AmmError::InvalidReserves);

        let amount = amount as u128;
        let mut target = state[outcome] as u128;
        for (j, reserve) in state.iter().enumerate() {
            if j == outcome {
                continue;
            }
            let reserve = *reserve as u128;
            let grown = reserve.checked_add(amount).ok_or(AmmError::Overflow)?;
            target = div_ceil(target.checked_mul(reserve).ok_or(AmmError::Overflow)?, grown);
        }

        let pooled = (state[outcome] as u128)
            .checked_add(amount)
            .ok_or(AmmError::Overflow)?;
        require!(pooled > target, AmmError::NoTokensToMint);
        let shares = to_u64(pooled - target)?;

        let new_state = state
            .iter()
            .enumerate()
            .map(|(j, reserve)| {
                if j == outcome {
                    to_u64(target)
                } else {
                    to_u64(*reserve as u128 + amount)
                }
            })
            .collect::<Result<Vec<u64>>>()?;
        let new_price = self.price(&new_state, outcome)?;

        Ok(Quote {
            shares,
            new_state,
            new_price,
        })
    }

    fn prices(&self, state: &[u64]) -> Result<Vec<u64>> {
        require!(state.iter().all(|r| *r > 0), AmmError::InvalidReserves);
        let floor = state
            .iter()
            .copied()
            .min()
            .ok_or(AmmError::InvalidSupplies)? as u128;

        // Inverses are scaled by the smallest reserve, so the largest is
        // exactly PRICE_PRECISION whatever the pool depth.
        let inverses = state
            .iter()
            .map(|reserve| {
                PRICE_PRECISION
                    .checked_mul(floor)
                    .map(|scaled| scaled / (*reserve as u128))
                    .ok_or_else(|| error!(AmmError::Overflow))
            })
            .collect::<Result<Vec<u128>>>()?;

        let total: u128 = inverses.iter().sum();
        require!(total > 0, AmmError::DivisionByZero);

        inverses
            .iter()
            .map(|inverse| to_u64(inverse * BPS as u128 / total))
            .collect()
    }
}

fn div_ceil(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    if numerator % denominator == 0 {
        quotient
    } else {
        quotient + 1
    }
}

// ============================================================================
// TESTS
// ============================================================================
