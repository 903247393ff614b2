//! # Linear Depth Book
//!
//! The pricing state is the price vector itself (bps, summing to 10000).
//! A bet of `L` against a book of depth `D` moves the bought outcome toward
//! certainty by a fraction of its remaining headroom:
//!
//! ```text
//! pᵢ' = pᵢ + (10000 - pᵢ) · L / (D + L)
//! pⱼ' = pⱼ · (10000 - pᵢ') / (10000 - pᵢ)        for j ≠ i
//! shares = L · 10000 / ((pᵢ + pᵢ') / 2)
//! ```
//!
//! Shares are filled at the average of the pre- and post-trade price, so a
//! trade split in two costs about the same as the trade in one piece.

use anchor_lang::prelude::*;

use super::{to_u64, AmmError, PricingStrategy, Quote};
use crate::constants::BPS;

pub struct LinearDepth;

impl PricingStrategy for LinearDepth {
    fn initial_state(
        &self,
        liquidity: u64,
        initial_prices: &[u16],
        outcomes: usize,
    ) -> Result<Vec<u64>> {
        require!(liquidity > 0, AmmError::InvalidReserves);

        if initial_prices.is_empty() {
            let n = outcomes as u64;
            require!(n > 0, AmmError::InvalidSupplies);
            let base = BPS / n;
            let remainder = BPS % n;
            require!(base > 0, AmmError::InvalidSupplies);
            return Ok((0..n).map(|i| base + u64::from(i < remainder)).collect());
        }

        let total: u64 = initial_prices.iter().map(|p| *p as u64).sum();
        require!(total == BPS, AmmError::InvalidSupplies);
        require!(initial_prices.iter().all(|p| *p > 0), AmmError::InvalidSupplies);
        Ok(initial_prices.iter().map(|p| *p as u64).collect())
    }

    fn quote(&self, state: &[u64], depth: u64, outcome: usize, amount: u64) -> Result<Quote> {
        require!(amount > 0, AmmError::ZeroInput);
        require!(depth > 0, AmmError::InvalidReserves);
        require!(outcome < state.len(), AmmError::InvalidSupplies);

        let bps = BPS as u128;
        let price = state[outcome] as u128;
        require!(price < bps, AmmError::InvalidSupplies);

        let amount = amount as u128;
        let headroom = bps - price;
        let step = headroom
            .checked_mul(amount)
            .ok_or(AmmError::Overflow)?
            / (depth as u128 + amount);
        let new_price = price + step;

        let average_twice = price + new_price;
        require!(average_twice > 0, AmmError::DivisionByZero);
        let shares = amount
            .checked_mul(bps * 2)
            .ok_or(AmmError::Overflow)?
            / average_twice;
        require!(shares > 0, AmmError::NoTokensToMint);

        let remaining = bps - new_price;
        let new_state = state
            .iter()
            .enumerate()
            .map(|(j, p)| {
                if j == outcome {
                    to_u64(new_price)
                } else {
                    to_u64(*p as u128 * remaining / headroom)
                }
            })
            .collect::<Result<Vec<u64>>>()?;

        Ok(Quote {
            shares: to_u64(shares)?,
            new_state,
            new_price: to_u64(new_price)?,
        })
    }

    fn prices(&self, state: &[u64]) -> Result<Vec<u64>> {
        Ok(state.to_vec())
    }
}
