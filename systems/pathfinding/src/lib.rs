#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path search for the snake.
//!
//! [`find_path`] runs a best-first search in which every state is a complete
//! body configuration plus the plan that produced it, so self-collisions
//! against the trailing body are simulated exactly. With
//! [`SearchConfig::avoid_separating_spaces`] enabled, each candidate move is
//! first checked by the [`connectivity`] analyzer, which uses the lockstep
//! [`probe`]s to detect moves that would split the free space in two.

pub mod connectivity;
pub mod probe;
mod search;

pub use search::{find_path, SearchConfig, SearchReport};
