//! The turn-taking game loop.
//!
//! `NimMisere` alternates two strategies over a shared stack state. It
//! consumes the engine solely through the `Strategy` contract; all search
//! state lives inside the strategies themselves.

use nim_core::{state, Move, Result, Strategy};

/// Which side won a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    First,
    Second,
}

impl Winner {
    pub fn other(self) -> Winner {
        match self {
            Winner::First => Winner::Second,
            Winner::Second => Winner::First,
        }
    }
}

/// A running game of Misère Nim between two strategies.
pub struct NimMisere {
    stacks: Vec<u32>,
    first_player: Box<dyn Strategy>,
    second_player: Box<dyn Strategy>,
    first_player_turn: bool,
}

impl NimMisere {
    pub fn new(
        stacks: Vec<u32>,
        first_player: Box<dyn Strategy>,
        second_player: Box<dyn Strategy>,
    ) -> Self {
        Self {
            stacks,
            first_player,
            second_player,
            first_player_turn: true,
        }
    }

    pub fn stacks(&self) -> &[u32] {
        &self.stacks
    }

    /// The winner, once every stack is empty. Misère: the side that took
    /// the last item loses, so the side now on turn has won.
    pub fn result(&self) -> Option<Winner> {
        if state::is_terminal(&self.stacks) {
            Some(if self.first_player_turn {
                Winner::First
            } else {
                Winner::Second
            })
        } else {
            None
        }
    }

    /// Ask the side on turn for a move under a depth/iteration budget and
    /// apply it. Returns the move, or `None` if the game is over.
    pub fn step(&mut self, depth: u32) -> Result<Option<Move>> {
        if self.result().is_some() {
            return Ok(None);
        }

        let mv = if self.first_player_turn {
            self.first_player.get_move(&self.stacks, depth)?
        } else {
            self.second_player.get_move(&self.stacks, depth)?
        };

        state::apply_move(&mut self.stacks, &mv)?;
        self.first_player_turn = !self.first_player_turn;
        Ok(Some(mv))
    }

    /// As [`NimMisere::step`], but with a wall-clock budget per move.
    pub fn step_timed(&mut self, seconds: f64) -> Result<Option<Move>> {
        if self.result().is_some() {
            return Ok(None);
        }

        let mv = if self.first_player_turn {
            self.first_player.get_move_timed(&self.stacks, seconds)?
        } else {
            self.second_player.get_move_timed(&self.stacks, seconds)?
        };

        state::apply_move(&mut self.stacks, &mv)?;
        self.first_player_turn = !self.first_player_turn;
        Ok(Some(mv))
    }
}
