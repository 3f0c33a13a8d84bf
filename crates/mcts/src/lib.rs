//! Persistent-tree Monte Carlo Tree Search for Misère Nim.
//!
//! This crate provides [`MctsStrategy`], the fourth move-selection
//! algorithm behind the `nim_core::Strategy` contract.
//!
//! # Features
//!
//! - **Persistent tree**: the subtree under the chosen move survives into
//!   the next decision, keeping its accumulated statistics
//! - **Three selection scores**: UCB1, UCB-Tuned, and RAVE-blended,
//!   switched by `MctsConfig::selection`
//! - **Canonical state matching**: with `hash_states` enabled, permutations
//!   of the same stack multiset share one tree node
//! - **Arena storage**: nodes live in a `Vec` addressed by index, so
//!   promotion to root is an index remap rather than pointer surgery
//!
//! # Example
//!
//! ```
//! use nim_core::{MctsConfig, Strategy};
//! use nim_mcts::MctsStrategy;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let mut mcts = MctsStrategy::with_rng(MctsConfig::default(), rng).unwrap();
//!
//! // 500 iterations for this decision; from [2] the engine keeps one item
//! // in reserve so the opponent must take the last.
//! let mv = mcts.get_move(&[2], 500).unwrap();
//! assert_eq!(mv.items_to_remove, 1);
//! ```

mod node;
mod search;
mod tree;

pub use search::MctsStrategy;
pub use tree::discriminator;
