//! The move-selection contract.
//!
//! The game loop talks to every algorithm through [`Strategy`]: hand over
//! the current stacks and a budget, get back a legal move. The budget is
//! either a depth/iteration count or, via [`Strategy::get_move_timed`], a
//! wall-clock allowance spent with iterative deepening.

use std::time::{Duration, Instant};

use crate::{config::StrategyConfig, state::Move, Result};

/// A move-selection algorithm for Misère Nim.
///
/// Contract: given a state with at least one non-empty stack, every
/// implementation returns a legal move expressed in the caller's original
/// stack indexing. Implementations fail fast with an error on empty or
/// all-zero input.
pub trait Strategy {
    /// Pick a move for the given stacks.
    ///
    /// `depth` is an alpha-beta search depth or an MCTS iteration count,
    /// depending on the strategy; strategies that do not search ignore it.
    fn get_move(&mut self, stacks: &[u32], depth: u32) -> Result<Move>;

    /// Whether `depth` means anything to this strategy. Distinguishes the
    /// two budget semantics of [`Strategy::get_move_timed`].
    fn uses_depth(&self) -> bool;

    /// Accept a configuration record. The default implementation ignores
    /// it; only the MCTS strategy interprets one.
    fn configure(&mut self, _config: &StrategyConfig) -> Result<()> {
        Ok(())
    }

    /// Pick a move within a wall-clock budget.
    ///
    /// Depth-using strategies run iterative deepening: depth 1, 2, 3, …
    /// until the budget elapses. The first round always completes, a new
    /// round is never started after expiry, and a round in flight is never
    /// cut short, so the result is always the last fully completed search.
    fn get_move_timed(&mut self, stacks: &[u32], seconds: f64) -> Result<Move> {
        if !self.uses_depth() {
            return self.get_move(stacks, 0);
        }

        let budget = Duration::from_secs_f64(seconds.max(0.0));
        let start = Instant::now();

        let mut best = self.get_move(stacks, 1)?;
        let mut depth = 2;
        while start.elapsed() < budget {
            best = self.get_move(stacks, depth)?;
            depth += 1;
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state;

    /// Records the depths it was asked for and always takes one item from
    /// the first non-empty stack.
    struct Probe {
        uses_depth: bool,
        depths_seen: Vec<u32>,
    }

    impl Probe {
        fn new(uses_depth: bool) -> Self {
            Self {
                uses_depth,
                depths_seen: Vec::new(),
            }
        }
    }

    impl Strategy for Probe {
        fn get_move(&mut self, stacks: &[u32], depth: u32) -> Result<Move> {
            state::ensure_playable(stacks)?;
            self.depths_seen.push(depth);
            let (indices, _) = state::non_zero(stacks);
            Ok(Move {
                stack_index: indices[0],
                items_to_remove: 1,
            })
        }

        fn uses_depth(&self) -> bool {
            self.uses_depth
        }
    }

    #[test]
    fn test_timed_runs_depth_one_on_expired_budget() {
        let mut probe = Probe::new(true);
        let mv = probe.get_move_timed(&[2, 3], 0.0).unwrap();
        assert_eq!(mv.stack_index, 0);
        // The depth-1 round always completes even with no budget left.
        assert_eq!(probe.depths_seen, vec![1]);
    }

    #[test]
    fn test_timed_deepens_while_budget_lasts() {
        let mut probe = Probe::new(true);
        probe.get_move_timed(&[2, 3], 0.01).unwrap();
        assert!(probe.depths_seen.len() > 1);
        // Depths increment from one without gaps.
        let expected: Vec<u32> = (1..=probe.depths_seen.len() as u32).collect();
        assert_eq!(probe.depths_seen, expected);
    }

    #[test]
    fn test_timed_calls_once_without_depth() {
        let mut probe = Probe::new(false);
        probe.get_move_timed(&[2, 3], 5.0).unwrap();
        assert_eq!(probe.depths_seen, vec![0]);
    }

    #[test]
    fn test_timed_propagates_precondition_errors() {
        let mut probe = Probe::new(true);
        assert!(probe.get_move_timed(&[0, 0], 1.0).is_err());
    }
}
