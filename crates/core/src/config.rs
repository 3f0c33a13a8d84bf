//! Strategy configuration types.
//!
//! Every strategy accepts a [`StrategyConfig`] through the contract, but
//! only the MCTS strategy interprets one. The variants are a tagged union
//! so the game loop can configure any strategy uniformly.

use crate::{NimError, Result};

/// Child-selection formula used by the MCTS strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Classic UCB1: exploitation plus a scaled exploration radical.
    Ucb1,
    /// UCB1 with the exploration term damped by the empirical variance.
    UcbTuned,
    /// Per-node value blended with all-moves-as-first action statistics.
    Rave,
}

/// Configuration for the MCTS strategy.
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Match search-tree nodes by the sorted non-empty stack multiset
    /// instead of exact stack identity. Actions are then keyed by stack
    /// size rather than index, so structurally identical states share one
    /// node at the cost of exactness.
    pub hash_states: bool,

    /// Exploration constant `C` in the UCB1 formula.
    pub exploration_constant: f64,

    /// Bias constant in the RAVE blend weight
    /// `beta = rave_visits / (visits + rave_visits + bias)`.
    pub beta: f64,

    /// Which selection-score formula to use during descent.
    pub selection: SelectionPolicy,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            hash_states: false,
            exploration_constant: 1.0,
            beta: 1e-6,
            selection: SelectionPolicy::Ucb1,
        }
    }
}

impl MctsConfig {
    /// Reject non-finite or negative numeric fields before an engine is
    /// constructed from this record.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(NimError::InvalidConfig(format!(
                "exploration_constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(NimError::InvalidConfig(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

/// Tagged-union configuration accepted by every strategy.
///
/// Non-MCTS strategies ignore it; the MCTS strategy validates and adopts
/// the `Mcts` variant.
#[derive(Clone, Debug, Default)]
pub enum StrategyConfig {
    #[default]
    None,
    Mcts(MctsConfig),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert!(!config.hash_states);
        assert!((config.exploration_constant - 1.0).abs() < 1e-9);
        assert_eq!(config.selection, SelectionPolicy::Ucb1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let negative = MctsConfig {
            exploration_constant: -0.5,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let nan_beta = MctsConfig {
            beta: f64::NAN,
            ..Default::default()
        };
        assert!(nan_beta.validate().is_err());
    }
}
