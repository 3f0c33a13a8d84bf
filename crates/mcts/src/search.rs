//! Persistent-tree Monte Carlo Tree Search for Misère Nim.
//!
//! Each decision runs the classic four phases (selection, expansion,
//! simulation, backpropagation) for `depth` iterations, then commits to the
//! most-visited root child. The chosen child is promoted to root so its
//! accumulated statistics carry over to the next decision; an opponent
//! reply is found again by discriminator matching inside the retained
//! subtree.

use nim_core::{state, MctsConfig, Move, Result, SelectionPolicy, Strategy, StrategyConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::node::{Node, NodeId, SearchAction};
use crate::tree::{discriminator, SearchTree};

/// Floor added to the empirical variance in UCB-Tuned, guarding against a
/// slightly negative variance from floating-point error.
const VARIANCE_FLOOR: f64 = 1e-9;

/// Winner label for a playout: 0 is the player to move at the playout's
/// starting state, 1 the other side.
type PlayerTag = u8;

/// The MCTS strategy. Stateful: the search tree persists across calls on
/// one instance, so a single engine must never serve two concurrent
/// decisions (exclusive ownership is the caller's responsibility).
pub struct MctsStrategy<R: Rng = StdRng> {
    config: MctsConfig,
    rng: R,
    tree: Option<SearchTree>,
}

impl MctsStrategy<StdRng> {
    pub fn new(config: MctsConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> MctsStrategy<R> {
    /// Construct with an explicit generator for reproducible search.
    pub fn with_rng(config: MctsConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            tree: None,
        })
    }

    /// Discriminator of the persistent root, if a tree is retained.
    /// Exposed for the tree-reuse invariant: after a decision this equals
    /// the canonical key of the post-move state.
    pub fn root_discriminator(&self) -> Option<Vec<u32>> {
        self.tree
            .as_ref()
            .map(|t| t.get(t.root_id()).state.clone())
    }

    /// Number of retained nodes, for diagnostics and tests.
    pub fn tree_size(&self) -> usize {
        self.tree.as_ref().map_or(0, SearchTree::len)
    }

    /// Reclaim the retained tree for the current state: reuse the root if
    /// it matches, otherwise hunt the subtree depth-first, otherwise start
    /// fresh.
    fn tree_for(&mut self, internal: &[u32]) -> SearchTree {
        if let Some(mut tree) = self.tree.take() {
            if let Some(id) = tree.find_by_state(internal) {
                if id != tree.root_id() {
                    tree.promote(id);
                }
                return tree;
            }
        }
        SearchTree::new(Node::new(
            internal.to_vec(),
            None,
            None,
            possible_actions(internal, self.config.hash_states),
        ))
    }

    /// Selection and expansion: descend while fully expanded, then
    /// materialize one untried action picked uniformly at random.
    fn select_and_expand(&mut self, tree: &mut SearchTree) -> NodeId {
        let mut current = tree.root_id();
        loop {
            let node = tree.get(current);
            if !node.fully_expanded() || node.children.is_empty() || node.is_terminal() {
                break;
            }
            current = self.best_child(tree, current);
        }

        let node = tree.get(current);
        if !node.untried.is_empty() && !node.is_terminal() {
            let pick = self.rng.gen_range(0..node.untried.len());
            current = self.expand(tree, current, pick);
        }
        current
    }

    fn expand(&mut self, tree: &mut SearchTree, parent: NodeId, pick: usize) -> NodeId {
        let hash_states = self.config.hash_states;
        let action = tree.get_mut(parent).untried.swap_remove(pick);
        let child_state = apply_action(&tree.get(parent).state, action, hash_states);
        let untried = possible_actions(&child_state, hash_states);
        let child = tree.add(Node::new(child_state, Some(parent), Some(action), untried));
        tree.get_mut(parent).children.push(child);
        child
    }

    /// Child maximizing the configured selection score; ties keep the
    /// first-enumerated child (stable).
    fn best_child(&self, tree: &SearchTree, id: NodeId) -> NodeId {
        let parent_visits = tree.get(id).visits;
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &child_id in &tree.get(id).children {
            let score = self.selection_score(tree.get(child_id), parent_visits);
            if best.is_none() || score > best_score {
                best = Some(child_id);
                best_score = score;
            }
        }
        best.expect("BUG: best_child called on node without children")
    }

    /// The configured selection-score formula. Unvisited children score
    /// +infinity so they are explored before any formula applies.
    fn selection_score(&self, node: &Node, parent_visits: u32) -> f64 {
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let visits = f64::from(node.visits);
        let mean = f64::from(node.wins) / visits;
        let explore = (f64::from(parent_visits.max(1)).ln() / visits).sqrt();

        match self.config.selection {
            SelectionPolicy::Ucb1 => mean + self.config.exploration_constant * explore,
            SelectionPolicy::UcbTuned => {
                // Outcomes are 0/1, so the mean of squared outcomes equals
                // the mean itself.
                let variance = mean - mean * mean + VARIANCE_FLOOR;
                let scaled = f64::from(parent_visits.max(1)).ln() / visits * variance.min(0.25);
                mean + scaled.sqrt()
            }
            SelectionPolicy::Rave => {
                let rave_visits = f64::from(node.rave_visits);
                let beta = rave_visits / (visits + rave_visits + self.config.beta);
                let rave_mean = if node.rave_visits == 0 {
                    0.0
                } else {
                    f64::from(node.rave_wins) / rave_visits
                };
                (1.0 - beta) * mean + beta * rave_mean + explore
            }
        }
    }

    /// Random playout to the end of the game. Returns the winner (the side
    /// to move once the board empties: misère, last-to-remove loses) and,
    /// for RAVE, every action played.
    fn simulate(&mut self, mut playout: Vec<u32>) -> (PlayerTag, Vec<SearchAction>) {
        let hash_states = self.config.hash_states;
        let record = self.config.selection == SelectionPolicy::Rave;
        let mut played = Vec::new();
        let mut current_player: PlayerTag = 0;

        while playout.iter().any(|&s| s > 0) {
            let actions = possible_actions(&playout, hash_states);
            let action = actions[self.rng.gen_range(0..actions.len())];
            if record {
                played.push(action);
            }
            playout = apply_action(&playout, action, hash_states);
            current_player = 1 - current_player;
        }

        (current_player, played)
    }

    /// Walk from the expanded node to the root, crediting each node whose
    /// associated mover matches the winner. Movers alternate up the path,
    /// starting from the mover who produced the expanded node's state.
    ///
    /// RAVE update (all-moves-as-first): children of each on-path node
    /// whose action occurred in the playout, or deeper on the tree path,
    /// also receive action-level credit.
    fn backpropagate(
        &mut self,
        tree: &mut SearchTree,
        leaf: NodeId,
        winner: PlayerTag,
        playout_actions: &[SearchAction],
    ) {
        let rave = self.config.selection == SelectionPolicy::Rave;
        let mut seen: Vec<SearchAction> = playout_actions.to_vec();

        let mut current = Some(leaf);
        let mut player: PlayerTag = 1;
        while let Some(id) = current {
            {
                let node = tree.get_mut(id);
                node.visits += 1;
                if player == winner {
                    node.wins += 1;
                }
            }

            if rave {
                // Children of this node are moves made by the opposite
                // mover of `player`'s parity at this depth.
                let child_mover = 1 - player;
                let children = tree.get(id).children.clone();
                for child_id in children {
                    let Some(action) = tree.get(child_id).action else {
                        continue;
                    };
                    if seen.contains(&action) {
                        let child = tree.get_mut(child_id);
                        child.rave_visits += 1;
                        if child_mover == winner {
                            child.rave_wins += 1;
                        }
                    }
                }
                // Ancestors treat the step into this node as played too.
                if let Some(action) = tree.get(id).action {
                    seen.push(action);
                }
            }

            player = 1 - player;
            current = tree.get(id).parent;
        }
    }

    /// Most-visited root child; visit count is a more robust commitment
    /// criterion than win rate. First-maximal tie-break.
    fn most_visited_child(&self, tree: &SearchTree) -> Option<NodeId> {
        let root = tree.get(tree.root_id());
        let mut best: Option<NodeId> = None;
        let mut best_visits = 0;
        for &child_id in &root.children {
            let visits = tree.get(child_id).visits;
            if best.is_none() || visits > best_visits {
                best = Some(child_id);
                best_visits = visits;
            }
        }
        best
    }

    /// Map an internal action back to the caller's original indexing.
    fn translate(
        &self,
        action: SearchAction,
        indices: &[usize],
        sizes: &[u32],
    ) -> Move {
        let position = if self.config.hash_states {
            // Keyed by size: the first stack of that size is the one moved.
            sizes
                .iter()
                .position(|&s| s as usize == action.key)
                .expect("BUG: action keyed by a size absent from the state")
        } else {
            action.key
        };
        Move {
            stack_index: indices[position],
            items_to_remove: action.take,
        }
    }
}

impl<R: Rng> Strategy for MctsStrategy<R> {
    /// `depth` is the iteration budget for this decision.
    fn get_move(&mut self, stacks: &[u32], depth: u32) -> Result<Move> {
        state::ensure_playable(stacks)?;
        let (indices, sizes) = state::non_zero(stacks);
        let internal = discriminator(&sizes, self.config.hash_states);

        let mut tree = self.tree_for(&internal);

        for _ in 0..depth {
            let leaf = self.select_and_expand(&mut tree);
            let (winner, playout_actions) = self.simulate(tree.get(leaf).state.clone());
            self.backpropagate(&mut tree, leaf, winner, &playout_actions);
        }

        match self.most_visited_child(&tree) {
            Some(child) => {
                let action = tree
                    .get(child)
                    .action
                    .expect("BUG: non-root node without an action");
                let mv = self.translate(action, &indices, &sizes);
                tree.promote(child);
                self.tree = Some(tree);
                Ok(mv)
            }
            None => {
                // Only reachable with a zero-iteration budget (or a
                // corrupted state): fall back to a random legal action and
                // say so loudly.
                warn!(
                    iterations = depth,
                    "MCTS root has no children after search; falling back to a random move"
                );
                self.tree = Some(tree);
                let actions = possible_actions(&internal, self.config.hash_states);
                if actions.is_empty() {
                    // ensure_playable rules this out; defensive placeholder.
                    return Ok(Move {
                        stack_index: indices[0],
                        items_to_remove: 1,
                    });
                }
                let action = actions[self.rng.gen_range(0..actions.len())];
                Ok(self.translate(action, &indices, &sizes))
            }
        }
    }

    fn uses_depth(&self) -> bool {
        true
    }

    /// Adopt a new configuration. The retained tree is discarded because
    /// the discriminator and action keying may have changed with it.
    fn configure(&mut self, config: &StrategyConfig) -> Result<()> {
        if let StrategyConfig::Mcts(mcts) = config {
            mcts.validate()?;
            self.config = mcts.clone();
            self.tree = None;
        }
        Ok(())
    }
}

/// Enumerate the internal actions available from a state. In hashed mode
/// actions are keyed by stack size and deduplicated across equal stacks
/// (the state is sorted, so equal sizes are adjacent).
fn possible_actions(stacks: &[u32], hash_states: bool) -> Vec<SearchAction> {
    let mut actions = Vec::new();
    if hash_states {
        let mut previous = None;
        for &size in stacks {
            if previous == Some(size) {
                continue;
            }
            previous = Some(size);
            for take in 1..=size {
                actions.push(SearchAction {
                    key: size as usize,
                    take,
                });
            }
        }
    } else {
        for (index, &size) in stacks.iter().enumerate() {
            for take in 1..=size {
                actions.push(SearchAction { key: index, take });
            }
        }
    }
    actions
}

/// Apply an internal action, producing the child state in canonical form
/// (zero-free; sorted when hashed).
fn apply_action(stacks: &[u32], action: SearchAction, hash_states: bool) -> Vec<u32> {
    let mut next = stacks.to_vec();
    if hash_states {
        let index = next
            .iter()
            .position(|&s| s as usize == action.key)
            .expect("BUG: action keyed by a size absent from the state");
        next[index] -= action.take;
    } else {
        next[action.key] -= action.take;
    }
    next.retain(|&s| s > 0);
    if hash_states {
        next.sort_unstable();
    }
    next
}
