//! Arena-allocated persistent search tree.
//!
//! Nodes are stored in a contiguous vector and referenced by index; parent
//! back-references are indices too, so "detach and promote to root" is just
//! clearing the promoted entry's parent field. Promotion compacts the arena
//! to the surviving subtree, dropping the discarded siblings wholesale.

use crate::node::{Node, NodeId};

/// Canonical key identifying a game state for node matching and reuse.
///
/// Exact mode keeps the non-empty stacks in caller order; hashed mode sorts
/// them, so `[3, 1, 2]` and `[1, 2, 3]` share one discriminator.
pub fn discriminator(stacks: &[u32], hash_states: bool) -> Vec<u32> {
    let mut key: Vec<u32> = stacks.iter().copied().filter(|&s| s > 0).collect();
    if hash_states {
        key.sort_unstable();
    }
    key
}

/// The persistent MCTS tree.
///
/// Node states are stored in canonical form (zero-free, and sorted when
/// hashed), so a node's state *is* its discriminator.
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SearchTree {
    /// Create a tree holding only the given root.
    pub fn new(root: Node) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// # Panics
    /// Panics if the NodeId is stale (only possible across a `promote`).
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Add a node to the arena, returning its ID. The caller links it into
    /// its parent's child list.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first search of the current subtree for a node whose state
    /// matches the discriminator; first match wins.
    pub fn find_by_state(&self, disc: &[u32]) -> Option<NodeId> {
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            let node = &self.nodes[id.0];
            if node.state == disc {
                return Some(id);
            }
            // Reversed push keeps the visit order first-child-first.
            for &child in node.children.iter().rev() {
                pending.push(child);
            }
        }
        None
    }

    /// Promote `id` to root: detach it from its parent and compact the
    /// arena down to its subtree. Every NodeId issued before this call is
    /// invalidated.
    pub fn promote(&mut self, id: NodeId) {
        let mut order = Vec::new();
        let mut pending = vec![id];
        while let Some(n) = pending.pop() {
            order.push(n);
            pending.extend(self.nodes[n.0].children.iter().copied());
        }

        let mut remap = vec![usize::MAX; self.nodes.len()];
        for (new_index, old) in order.iter().enumerate() {
            remap[old.0] = new_index;
        }

        let mut nodes = Vec::with_capacity(order.len());
        for &old in &order {
            let mut node = self.nodes[old.0].clone();
            // The promoted node's parent falls outside the subtree and is
            // cleared; everything else is remapped.
            node.parent = node.parent.and_then(|p| match remap[p.0] {
                usize::MAX => None,
                new => Some(NodeId(new)),
            });
            for child in &mut node.children {
                *child = NodeId(remap[child.0]);
            }
            nodes.push(node);
        }

        self.nodes = nodes;
        self.root = NodeId(0);
    }
}
