//! MCTS node types for tree storage.
//!
//! Nodes live in an arena and reference each other by index; parent links
//! are plain back-references, ownership flows top-down through `children`.

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(pub(crate) usize);

/// An action in the internal search space.
///
/// `key` is a position in the node's stack list in exact mode, and a stack
/// *size* in hashed mode (the first stack of that size is the one mutated).
/// `take` is the item count removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchAction {
    pub key: usize,
    pub take: u32,
}

/// One reachable state in the persistent search tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// Stack sizes at this node. Always zero-free; additionally sorted in
    /// hashed mode so the state doubles as its canonical form.
    pub state: Vec<u32>,

    /// Back-reference for backpropagation; `None` for the root.
    pub parent: Option<NodeId>,

    /// Action that produced this node from its parent (`None` for root).
    pub action: Option<SearchAction>,

    /// Owned children, populated lazily by expansion.
    pub children: Vec<NodeId>,

    /// Simulation statistics, mutated only during backpropagation.
    pub visits: u32,
    pub wins: u32,

    /// All-moves-as-first statistics, used only by RAVE selection.
    pub rave_visits: u32,
    pub rave_wins: u32,

    /// Actions not yet expanded into children; shrinks monotonically.
    pub untried: Vec<SearchAction>,
}

impl Node {
    pub fn new(
        state: Vec<u32>,
        parent: Option<NodeId>,
        action: Option<SearchAction>,
        untried: Vec<SearchAction>,
    ) -> Self {
        Self {
            state,
            parent,
            action,
            children: Vec::new(),
            visits: 0,
            wins: 0,
            rave_visits: 0,
            rave_wins: 0,
            untried,
        }
    }

    /// All items gone: the mover here has won (the opponent took last).
    pub fn is_terminal(&self) -> bool {
        self.state.iter().all(|&s| s == 0)
    }

    /// Empty untried set means every action has a child node.
    pub fn fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}
