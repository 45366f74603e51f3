//! CLI command implementations.

pub mod advise;
pub mod check;
pub mod solve;
