//! Baseline strategies for Misère Nim.
//!
//! Three of the four interchangeable move-selection algorithms live here:
//!
//! - [`RandomStrategy`] - uniformly random legal moves
//! - [`OptimalStrategy`] - the closed-form misère nim-sum solution
//! - [`AlphaBetaStrategy`] - depth-bounded minimax with alpha-beta pruning
//!
//! The fourth, the persistent-tree MCTS, lives in the `nim-mcts` crate.

mod alphabeta;
mod optimal;
mod random;

pub use alphabeta::AlphaBetaStrategy;
pub use optimal::OptimalStrategy;
pub use random::RandomStrategy;
