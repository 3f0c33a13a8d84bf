//! Nim Core - state utilities and the move-selection contract
//!
//! This crate provides the pieces every Misère Nim strategy shares:
//!
//! - [`Move`] and the pure state utilities in [`state`]
//! - [`Strategy`] - the contract the game loop drives strategies through
//! - [`StrategyConfig`] / [`MctsConfig`] - the tagged-union configuration
//!   accepted by every strategy and interpreted by MCTS
//! - [`NimError`] - the engine error type

mod config;
mod error;
pub mod state;
mod strategy;

pub use config::{MctsConfig, SelectionPolicy, StrategyConfig};
pub use error::{NimError, Result};
pub use state::Move;
pub use strategy::Strategy;
