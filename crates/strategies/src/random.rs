//! Uniformly random move selection.

use nim_core::{state, Move, Result, Strategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks a non-empty stack uniformly at random, then a take amount
/// uniformly in `[1, size]`. Ignores the depth budget.
pub struct RandomStrategy<R: Rng = StdRng> {
    rng: R,
}

impl RandomStrategy<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomStrategy<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomStrategy<R> {
    /// Construct with an explicit generator for reproducible play.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Strategy for RandomStrategy<R> {
    fn get_move(&mut self, stacks: &[u32], _depth: u32) -> Result<Move> {
        state::ensure_playable(stacks)?;
        let (indices, sizes) = state::non_zero(stacks);

        let pick = self.rng.gen_range(0..sizes.len());
        let items_to_remove = self.rng.gen_range(1..=sizes[pick]);
        Ok(Move {
            stack_index: indices[pick],
            items_to_remove,
        })
    }

    fn uses_depth(&self) -> bool {
        false
    }
}
