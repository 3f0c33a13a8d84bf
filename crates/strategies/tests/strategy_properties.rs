//! Property-based tests shared by the baseline strategies.

use nim_core::{state, Move, Strategy as _};
use nim_strategies::{AlphaBetaStrategy, OptimalStrategy, RandomStrategy};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn arb_stacks() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..6, 1..5)
        .prop_filter("need one non-empty stack", |s| s.iter().any(|&x| x > 0))
}

fn assert_legal(stacks: &[u32], mv: Move) {
    assert!(mv.stack_index < stacks.len());
    assert!(mv.items_to_remove >= 1);
    assert!(mv.items_to_remove <= stacks[mv.stack_index]);
}

proptest! {
    #[test]
    fn prop_random_moves_are_legal(stacks in arb_stacks(), seed in any::<u64>()) {
        let mut strategy = RandomStrategy::with_rng(ChaCha8Rng::seed_from_u64(seed));
        let mv = strategy.get_move(&stacks, 0).unwrap();
        assert_legal(&stacks, mv);
    }

    #[test]
    fn prop_optimal_moves_are_legal(stacks in arb_stacks()) {
        let mv = OptimalStrategy.get_move(&stacks, 0).unwrap();
        assert_legal(&stacks, mv);
    }

    #[test]
    fn prop_alphabeta_moves_are_legal(stacks in arb_stacks(), depth in 0u32..8) {
        let mv = AlphaBetaStrategy.get_move(&stacks, depth).unwrap();
        assert_legal(&stacks, mv);
    }

    /// At depth >= total items the alpha-beta search is exact and must
    /// preserve the theoretical outcome, matching the closed form: from a
    /// winning position both leave the opponent in a lost one.
    #[test]
    fn prop_alphabeta_agrees_with_optimal_at_full_depth(stacks in arb_stacks()) {
        if state::is_misere_loss(&stacks) {
            return Ok(());
        }
        let depth = stacks.iter().sum::<u32>();

        let ab = AlphaBetaStrategy.get_move(&stacks, depth).unwrap();
        let mut after_ab = stacks.clone();
        state::apply_move(&mut after_ab, &ab).unwrap();

        let opt = OptimalStrategy.get_move(&stacks, 0).unwrap();
        let mut after_opt = stacks.clone();
        state::apply_move(&mut after_opt, &opt).unwrap();

        prop_assert!(state::is_misere_loss(&after_ab),
            "alpha-beta left a winnable position {:?} from {:?}", after_ab, stacks);
        prop_assert!(state::is_misere_loss(&after_opt),
            "optimal left a winnable position {:?} from {:?}", after_opt, stacks);
    }
}

/// Concrete scenario: with `[1, 1]` every strategy can only remove one
/// item from one of the stacks.
#[test]
fn test_only_legal_moves_from_one_one() {
    let stacks = [1u32, 1];

    let mut random = RandomStrategy::with_rng(ChaCha8Rng::seed_from_u64(3));
    for mv in [
        random.get_move(&stacks, 0).unwrap(),
        OptimalStrategy.get_move(&stacks, 0).unwrap(),
        AlphaBetaStrategy.get_move(&stacks, 4).unwrap(),
    ] {
        assert_legal(&stacks, mv);
        assert_eq!(mv.items_to_remove, 1);
    }
}
