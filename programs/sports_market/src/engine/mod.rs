//! # Market Engine
//!
//! The pure core of a market: every method here reads and writes plain
//! account structs, takes the clock and the role table as arguments, and
//! returns the events to emit. Instruction handlers load accounts, call in,
//! move tokens, and emit.
//!
//! ```text
//!            lock                resolve              finalize
//!   Open ─────────▶ Locked ─────────────▶ Resolved ─────────────▶ Finalized
//!    │                │                     │
//!    │ cancel         │ cancel              │ cancel_after_resolve
//!    ▼                ▼                     ▼
//!   Cancelled ◀───────┘            CancelledAfterResolve
//! ```

pub mod lifecycle;
pub mod risk;
pub mod settlement;
pub mod trading;

pub use lifecycle::*;
pub use risk::*;
pub use settlement::*;
pub use trading::*;

use anchor_lang::prelude::*;

use crate::errors::EconomicError;

/// `a * b / c`, truncating
pub(crate) fn mul_div(a: u64, b: u64, c: u64) -> Result<u64> {
    require!(c > 0, EconomicError::Overflow);
    let value = (a as u128)
        .checked_mul(b as u128)
        .ok_or(EconomicError::Overflow)?
        / c as u128;
    u64::try_from(value).map_err(|_| error!(EconomicError::Overflow))
}

pub(crate) fn checked_sum(values: &[u64]) -> Result<u64> {
    values.iter().try_fold(0u64, |acc, v| {
        acc.checked_add(*v).ok_or_else(|| error!(EconomicError::Overflow))
    })
}
