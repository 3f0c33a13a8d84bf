//! Depth-bounded minimax with alpha-beta pruning.

use nim_core::{state, Move, Result, Strategy};

/// Exhaustive minimax over the filtered stack list, maximizing the acting
/// player's outcome. Scores live in the discrete set {-1, 0, 1}.
///
/// Known limitation: misère Nim has no cheap static evaluation, so a branch
/// truncated at depth zero scores as a neutral 0 (an unknown, treated like
/// a draw). Finite-depth move choice is biased accordingly; this baseline
/// behavior is kept on purpose for reproducible strategy comparisons.
pub struct AlphaBetaStrategy;

impl Strategy for AlphaBetaStrategy {
    fn get_move(&mut self, stacks: &[u32], depth: u32) -> Result<Move> {
        state::ensure_playable(stacks)?;
        let (indices, mut sizes) = state::non_zero(stacks);

        let mv = alphabeta_move(&mut sizes, depth);
        Ok(Move {
            stack_index: indices[mv.stack_index],
            items_to_remove: mv.items_to_remove,
        })
    }

    fn uses_depth(&self) -> bool {
        true
    }
}

/// Top-level move choice: score every (stack, take) pair and keep the
/// maximum, with ties broken in favor of the later-enumerated move. The
/// returned index is into `sizes`.
fn alphabeta_move(sizes: &mut [u32], depth: u32) -> Move {
    let mut best_value = i32::MIN;
    let mut chosen = Move {
        stack_index: 0,
        items_to_remove: 1,
    };

    for stack in 0..sizes.len() {
        for take in 1..=sizes[stack] {
            sizes[stack] -= take;
            let value = alphabeta_search(sizes, depth, i32::MIN, i32::MAX, false);
            sizes[stack] += take;

            // `<=`: the later-enumerated move wins ties.
            if best_value <= value {
                best_value = value;
                chosen = Move {
                    stack_index: stack,
                    items_to_remove: take,
                };
            }
        }
    }

    chosen
}

/// Recursive search. Mutates `sizes` in place and restores it exactly
/// before every return path.
fn alphabeta_search(
    sizes: &mut [u32],
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    our_turn: bool,
) -> i32 {
    if sizes.iter().all(|&s| s == 0) {
        // The previous mover took the last item and loses in misère play,
        // so the side to act here has already won.
        return if our_turn { 1 } else { -1 };
    }

    if depth == 0 {
        // Truncated: no static evaluation exists, score as unknown.
        return 0;
    }

    if our_turn {
        'moves: for stack in 0..sizes.len() {
            for take in 1..=sizes[stack] {
                sizes[stack] -= take;
                let value = alphabeta_search(sizes, depth - 1, alpha, beta, false);
                sizes[stack] += take;

                alpha = alpha.max(value);
                // Scores are bounded by {-1, 0, 1}: a proven loss for the
                // opponent below us cannot be improved on, so beta == -1 is
                // a legitimate extra cutoff.
                if alpha >= beta || beta == -1 {
                    break 'moves;
                }
            }
        }
        alpha
    } else {
        'moves: for stack in 0..sizes.len() {
            for take in 1..=sizes[stack] {
                sizes[stack] -= take;
                let value = alphabeta_search(sizes, depth - 1, alpha, beta, true);
                sizes[stack] += take;

                beta = beta.min(value);
                if alpha >= beta || alpha == 1 {
                    break 'moves;
                }
            }
        }
        beta
    }
}
