//! # Oracle Module
//!
//! Match facts reach a market through one [`FactsRecord`] per market. Two
//! backends can populate it:
//!
//! - [`DirectOracle`]: an account holding `Role::Oracle` submits facts and
//!   they are final immediately.
//! - [`OptimisticOracle`]: anyone posts facts with a bond; after the
//!   challenge window passes undisputed, or an arbiter upholds a dispute,
//!   the facts become final.
//!
//! The market never knows which backend filled the record. It reads it
//! through [`ResultOracle`] and checks the submitted raw facts against the
//! stored content hash.
//!
//! [`FactsRecord`]: crate::state::FactsRecord

pub mod direct;
pub mod facts;
pub mod optimistic;

pub use direct::*;
pub use facts::*;
pub use optimistic::*;

use anchor_lang::prelude::*;

/// Read side of an oracle backend, as seen by a market.
pub trait ResultOracle {
    /// Market the reported facts belong to
    fn market_id(&self) -> u64;

    /// Latest facts and whether they are final
    fn get_result(&self) -> Result<(MatchFacts, bool)>;

    /// Content hash of the latest facts
    fn get_result_hash(&self) -> Result<[u8; 32]>;

    fn is_finalized(&self) -> bool;
}
