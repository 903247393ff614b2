//! Oracle instructions: reporting facts and running the dispute window.

pub mod direct;
pub mod optimistic;

pub use direct::*;
pub use optimistic::*;
