//! Integration tests: swaps, the auto loop, and the menu, all run
//! against an in-memory chain.

mod mock_chain;
mod swap_flow;
