//! Market lifecycle instructions
//!
//! ```text
//! create_market ─▶ lock_market ─▶ resolve_market ─▶ finalize_market
//!        │              │                │
//!        └──────────────┴─ cancel_market └─ cancel_after_resolve
//! ```

pub mod cancel;
pub mod create_market;
pub mod finalize;
pub mod lock;
pub mod resolve;

pub use cancel::*;
pub use create_market::*;
pub use finalize::*;
pub use lock::*;
pub use resolve::*;
