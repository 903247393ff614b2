//! Instruction handlers for the sports market protocol
//!
//! - `initialize` / `admin` - Protocol setup, roles, pause and parameters
//! - `vault` - Liquidity vault funding
//! - `market` - Create, lock, resolve, finalize and cancel markets
//! - `trade` - Bets, share transfers and read-only quotes
//! - `redeem` - Payouts and refunds
//! - `oracle` - Direct reports and optimistic assertions

pub mod admin;
pub mod initialize;
pub mod market;
pub mod oracle;
pub mod redeem;
pub mod trade;
pub mod vault;

pub use admin::*;
pub use initialize::*;
pub use market::*;
pub use oracle::*;
pub use redeem::*;
pub use trade::*;
pub use vault::*;
