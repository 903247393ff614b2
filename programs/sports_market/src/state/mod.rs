//! State structures for the sports market protocol

pub mod assertion;
pub mod config;
pub mod facts_record;
pub mod market;
pub mod position;
pub mod vault;

pub use assertion::*;
pub use config::*;
pub use facts_record::*;
pub use market::*;
pub use position::*;
pub use vault::*;
