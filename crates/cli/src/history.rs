//! Move history with an undo cursor.
//!
//! Wraps a running game and records every applied move. Stepping back does
//! not mutate the game: it moves a cursor, and the viewed stacks are
//! reconstructed by reverting the most recent moves. Stepping forward
//! while behind replays the recorded move instead of querying a strategy.

use nim_core::{state, Move, Result};

use crate::game::{NimMisere, Winner};

pub struct GameHistory {
    game: NimMisere,
    history: Vec<Move>,
    behind_by: usize,
}

impl GameHistory {
    pub fn new(game: NimMisere) -> Self {
        Self {
            game,
            history: Vec::new(),
            behind_by: 0,
        }
    }

    /// Advance one move with a depth/iteration budget. Replays from the
    /// record when the view is behind the live game.
    pub fn step(&mut self, depth: u32) -> Result<Option<Move>> {
        if self.behind_by > 0 {
            let mv = self.history[self.history.len() - self.behind_by];
            self.behind_by -= 1;
            return Ok(Some(mv));
        }

        let mv = self.game.step(depth)?;
        if let Some(mv) = mv {
            self.history.push(mv);
        }
        Ok(mv)
    }

    /// Advance one move with a wall-clock budget per move.
    pub fn step_timed(&mut self, seconds: f64) -> Result<Option<Move>> {
        if self.behind_by > 0 {
            let mv = self.history[self.history.len() - self.behind_by];
            self.behind_by -= 1;
            return Ok(Some(mv));
        }

        let mv = self.game.step_timed(seconds)?;
        if let Some(mv) = mv {
            self.history.push(mv);
        }
        Ok(mv)
    }

    /// Move the view one step back, up to the start of the game.
    pub fn step_back(&mut self) {
        if self.behind_by < self.history.len() {
            self.behind_by += 1;
        }
    }

    /// The stacks as currently viewed: the live state with the last
    /// `behind_by` moves reverted.
    pub fn stacks(&self) -> Vec<u32> {
        let mut stacks = self.game.stacks().to_vec();
        for mv in self.history.iter().rev().take(self.behind_by) {
            state::undo_move(&mut stacks, mv);
        }
        stacks
    }

    /// Result of the live game, regardless of the view cursor.
    pub fn result(&self) -> Option<Winner> {
        self.game.result()
    }

    /// Every move applied to the live game so far.
    pub fn moves(&self) -> &[Move] {
        &self.history
    }
}
