//! Pure state utilities for Misère Nim.
//!
//! A game state is an ordered sequence of non-negative stack sizes. The
//! state is terminal once every stack is empty; in misère play the player
//! who removed the last item has lost.

use crate::{NimError, Result};

/// A move: remove `items_to_remove` items from the stack at `stack_index`.
///
/// Indices always refer to the caller's original stack ordering, including
/// any stacks that are already empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub stack_index: usize,
    pub items_to_remove: u32,
}

/// Returns true once every stack is empty.
pub fn is_terminal(stacks: &[u32]) -> bool {
    stacks.iter().all(|&s| s == 0)
}

/// Fail fast unless the state has at least one non-empty stack.
///
/// Strategies must only be invoked on non-terminal states; this is the
/// precondition check they all share.
pub fn ensure_playable(stacks: &[u32]) -> Result<()> {
    if stacks.is_empty() {
        return Err(NimError::EmptyState);
    }
    if is_terminal(stacks) {
        return Err(NimError::TerminalState);
    }
    Ok(())
}

/// Enumerate every legal move from the given state.
pub fn legal_moves(stacks: &[u32]) -> Vec<Move> {
    let mut moves = Vec::new();
    for (stack_index, &size) in stacks.iter().enumerate() {
        for items_to_remove in 1..=size {
            moves.push(Move {
                stack_index,
                items_to_remove,
            });
        }
    }
    moves
}

/// Apply a move in place, validating it against the current stack sizes.
pub fn apply_move(stacks: &mut [u32], mv: &Move) -> Result<()> {
    let size = stacks.get(mv.stack_index).copied().unwrap_or(0);
    if mv.items_to_remove == 0 || mv.items_to_remove > size {
        return Err(NimError::InvalidMove {
            stack: mv.stack_index,
            items: mv.items_to_remove,
            size,
        });
    }
    stacks[mv.stack_index] -= mv.items_to_remove;
    Ok(())
}

/// Revert a previously applied move.
pub fn undo_move(stacks: &mut [u32], mv: &Move) {
    stacks[mv.stack_index] += mv.items_to_remove;
}

/// Split a state into its non-empty stacks.
///
/// Returns the original indices of the non-empty stacks and their sizes, in
/// the caller's order. Search code operates on the filtered sizes and maps
/// chosen moves back through the index list.
pub fn non_zero(stacks: &[u32]) -> (Vec<usize>, Vec<u32>) {
    let mut indices = Vec::new();
    let mut sizes = Vec::new();
    for (i, &s) in stacks.iter().enumerate() {
        if s > 0 {
            indices.push(i);
            sizes.push(s);
        }
    }
    (indices, sizes)
}

/// Bitwise XOR of all stack sizes.
pub fn nim_sum(stacks: &[u32]) -> u32 {
    stacks.iter().fold(0, |acc, &s| acc ^ s)
}

/// Theoretical misère analysis: true if the player to move loses under
/// optimal play from both sides.
///
/// With every stack at size one the mover loses exactly when the count of
/// ones is odd; otherwise the position is lost exactly when the nim-sum is
/// zero. A terminal state is a win for the mover (the opponent just took
/// the last item).
pub fn is_misere_loss(stacks: &[u32]) -> bool {
    let (_, sizes) = non_zero(stacks);
    if sizes.is_empty() {
        return false;
    }
    if sizes.iter().all(|&s| s == 1) {
        sizes.len() % 2 == 1
    } else {
        nim_sum(&sizes) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_detection() {
        assert!(is_terminal(&[]));
        assert!(is_terminal(&[0, 0, 0]));
        assert!(!is_terminal(&[0, 1, 0]));
    }

    #[test]
    fn test_ensure_playable() {
        assert!(matches!(ensure_playable(&[]), Err(NimError::EmptyState)));
        assert!(matches!(
            ensure_playable(&[0, 0]),
            Err(NimError::TerminalState)
        ));
        assert!(ensure_playable(&[0, 2]).is_ok());
    }

    #[test]
    fn test_legal_moves_enumeration() {
        let moves = legal_moves(&[2, 0, 1]);
        assert_eq!(
            moves,
            vec![
                Move {
                    stack_index: 0,
                    items_to_remove: 1
                },
                Move {
                    stack_index: 0,
                    items_to_remove: 2
                },
                Move {
                    stack_index: 2,
                    items_to_remove: 1
                },
            ]
        );
    }

    #[test]
    fn test_apply_and_undo_round_trip() {
        let mut stacks = vec![3, 1, 2];
        let mv = Move {
            stack_index: 0,
            items_to_remove: 2,
        };
        apply_move(&mut stacks, &mv).unwrap();
        assert_eq!(stacks, vec![1, 1, 2]);
        undo_move(&mut stacks, &mv);
        assert_eq!(stacks, vec![3, 1, 2]);
    }

    #[test]
    fn test_apply_rejects_illegal_moves() {
        let mut stacks = vec![2, 0];
        let too_many = Move {
            stack_index: 0,
            items_to_remove: 3,
        };
        assert!(apply_move(&mut stacks, &too_many).is_err());

        let empty_stack = Move {
            stack_index: 1,
            items_to_remove: 1,
        };
        assert!(apply_move(&mut stacks, &empty_stack).is_err());

        let zero_items = Move {
            stack_index: 0,
            items_to_remove: 0,
        };
        assert!(apply_move(&mut stacks, &zero_items).is_err());
    }

    #[test]
    fn test_non_zero_filtering() {
        let (indices, sizes) = non_zero(&[0, 3, 0, 1]);
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(sizes, vec![3, 1]);
    }

    #[test]
    fn test_nim_sum() {
        assert_eq!(nim_sum(&[1, 2, 3]), 0);
        assert_eq!(nim_sum(&[4]), 4);
        assert_eq!(nim_sum(&[1, 4, 5]), 0);
    }

    #[test]
    fn test_misere_loss_classification() {
        // Terminal: the opponent just took the last item, mover wins.
        assert!(!is_misere_loss(&[0, 0]));
        // Odd count of ones loses, even count wins.
        assert!(is_misere_loss(&[1]));
        assert!(!is_misere_loss(&[1, 1]));
        assert!(is_misere_loss(&[1, 1, 1]));
        // Otherwise nim-sum zero loses.
        assert!(is_misere_loss(&[1, 2, 3]));
        assert!(!is_misere_loss(&[4]));
        assert!(!is_misere_loss(&[2, 3]));
    }
}
