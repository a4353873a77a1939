//! Core engine — balance reads, single swaps, and the auto-swap loop.

pub mod balances;
pub mod executor;
pub mod controller;
