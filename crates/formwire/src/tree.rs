#![forbid(unsafe_code)]

//! Owned form tree: depth-first walking and address resolution.
//!
//! [`FormTree`] wraps the root [`Node`] of one request-scoped snapshot. The
//! engine never persists a tree across requests; the external build pipeline
//! constructs a fresh one per request and hands it in by value or reference.
//!
//! # Invariants
//!
//! 1. [`walk`](FormTree::walk) visits every reachable node exactly once, in
//!    depth-first pre-order, children in insertion order. Repeated walks of
//!    the same tree visit in the same order.
//! 2. Resolution is pure: `get`/`get_mut` follow child-keys only and never
//!    allocate new nodes.
//! 3. Mutation goes through resolve → transform → write-back
//!    ([`update_at`](FormTree::update_at)); there are no aliased in-place
//!    references handed out across calls.

use crate::address::Address;
use crate::node::Node;

/// One request-scoped tree snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormTree {
    root: Node,
}

impl FormTree {
    /// Wrap a fully built root node.
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The root node, mutably.
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Depth-first pre-order walk over every node in the tree.
    ///
    /// The visitor receives each node together with its address. The root is
    /// visited first (with the root address), then each named child subtree
    /// in insertion order. A node without children contributes zero
    /// recursions; there is no failure mode.
    pub fn walk(&self, mut visitor: impl FnMut(&Address, &Node)) {
        let mut path: Vec<String> = Vec::new();
        walk_node(&self.root, &mut path, &mut visitor);
    }

    /// Resolve an address to a node, or `None` if any segment is missing.
    #[must_use]
    pub fn get(&self, address: &Address) -> Option<&Node> {
        let mut node = &self.root;
        for key in address.segments() {
            node = node.get_child(key)?;
        }
        Some(node)
    }

    /// Resolve an address to a node, mutably.
    pub fn get_mut(&mut self, address: &Address) -> Option<&mut Node> {
        let mut node = &mut self.root;
        for key in address.segments() {
            node = node.get_child_mut(key)?;
        }
        Some(node)
    }

    /// Whether the address resolves within this snapshot.
    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.get(address).is_some()
    }

    /// Resolve → transform → write-back.
    ///
    /// Applies `transform` to the node at `address` and returns `true`, or
    /// returns `false` without calling it when the address does not resolve.
    pub fn update_at(&mut self, address: &Address, transform: impl FnOnce(&mut Node)) -> bool {
        match self.get_mut(address) {
            Some(node) => {
                transform(node);
                true
            }
            None => false,
        }
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }
}

fn walk_node(node: &Node, path: &mut Vec<String>, visitor: &mut impl FnMut(&Address, &Node)) {
    let address = Address::new(path.iter().cloned());
    visitor(&address, node);
    for (key, child) in node.children() {
        path.push(key.clone());
        walk_node(child, path, visitor);
        path.pop();
    }
}

impl From<Node> for FormTree {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
