#![forbid(unsafe_code)]

//! The form node data model.
//!
//! A [`Node`] is one element of a request-scoped form tree: a small set of
//! properties the engine understands (dependency declaration, visual group,
//! stable identifier, interactivity state, handler slots) plus an opaque
//! attribute bag for renderer-specific data and an ordered mapping of named
//! children. Everything else about a widget — its type, its value, its
//! validation — belongs to the external build pipeline and renderer.
//!
//! # Invariants
//!
//! 1. A node's address is the path of child-keys from the tree root to it;
//!    addresses are unique within one tree snapshot.
//! 2. Children iterate in insertion order, which fixes the deterministic
//!    walk order of the whole tree.
//! 3. [`HandlerState`] transitions at most once per wiring pass:
//!    `Unwired → WiredFresh` or `Unwired → WiredChained`, then terminal for
//!    the life of the snapshot.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::address::Address;
use crate::handler::HandlerRef;

/// Declares that the carrying node must be refreshed whenever the node at
/// any of the listed trigger addresses changes value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDeclaration {
    triggers: Vec<Address>,
}

impl UpdateDeclaration {
    /// Declare dependence on the given trigger addresses.
    pub fn new<I>(triggers: I) -> Self
    where
        I: IntoIterator<Item = Address>,
    {
        Self {
            triggers: triggers.into_iter().collect(),
        }
    }

    /// The declared trigger addresses, in declaration order.
    #[must_use]
    pub fn triggers(&self) -> &[Address] {
        &self.triggers
    }

    /// Whether nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

/// Wiring state of a trigger node.
///
/// Transitions exactly once during a wiring pass and is terminal afterwards,
/// which is what makes re-running the pass idempotent: an already-wired node
/// is skipped instead of being chained onto itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HandlerState {
    /// No wiring has touched this node.
    #[default]
    Unwired,
    /// The shared handler was installed on a node that had none.
    WiredFresh,
    /// The shared handler was installed and the node's previous handler was
    /// preserved as its chained prior handler.
    WiredChained,
}

impl HandlerState {
    /// Whether a wiring pass already assigned the shared handler.
    #[must_use]
    pub fn is_wired(self) -> bool {
        !matches!(self, Self::Unwired)
    }
}

/// One element of a form tree.
///
/// Cloning a node clones its whole subtree; handler slots are shared
/// callables (`Rc`), so clones keep pointing at the same behavior. That is
/// exactly what the private tree copies handed to prior handlers need.
#[derive(Clone, Default)]
pub struct Node {
    /// Dependency declaration: which triggers refresh this node.
    pub update: Option<UpdateDeclaration>,
    /// Visual group membership. Group members are not rendered directly by
    /// the external renderer; the update handler strips this before
    /// rendering a dependent.
    pub group: Option<String>,
    /// Externally assigned stable identifier, used to build the patch
    /// target selector.
    pub stable_id: Option<String>,
    /// Whether the external interactivity step has processed this node.
    pub processed: bool,
    /// Active update handler.
    pub handler: Option<HandlerRef>,
    /// Handler that was active before the wiring pass replaced it; invoked
    /// first by the shared handler so its behavior is preserved.
    pub prior_handler: Option<HandlerRef>,
    /// Wiring state; see [`HandlerState`].
    pub wiring: HandlerState,
    /// Opaque renderer-specific attributes.
    pub attrs: Map<String, Value>,
    children: IndexMap<String, Node>,
}

impl Node {
    /// Create an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Builder-style construction ───────────────────────────────────

    /// Declare the trigger addresses this node is updated by.
    #[must_use]
    pub fn updated_by<I>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = Address>,
    {
        self.update = Some(UpdateDeclaration::new(triggers));
        self
    }

    /// Set the visual group this node belongs to.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the externally assigned stable identifier.
    #[must_use]
    pub fn with_stable_id(mut self, id: impl Into<String>) -> Self {
        self.stable_id = Some(id.into());
        self
    }

    /// Mark the node as having been processed for interactivity.
    #[must_use]
    pub fn processed(mut self) -> Self {
        self.processed = true;
        self
    }

    /// Set the active update handler.
    #[must_use]
    pub fn with_handler(mut self, handler: HandlerRef) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Set a renderer-specific attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    /// Append a named child. Children keep insertion order.
    #[must_use]
    pub fn child(mut self, key: impl Into<String>, node: Node) -> Self {
        self.children.insert(key.into(), node);
        self
    }

    // ── Children ─────────────────────────────────────────────────────

    /// Insert or replace a named child.
    pub fn insert_child(&mut self, key: impl Into<String>, node: Node) {
        self.children.insert(key.into(), node);
    }

    /// Look up a direct child by key.
    #[must_use]
    pub fn get_child(&self, key: &str) -> Option<&Node> {
        self.children.get(key)
    }

    /// Look up a direct child by key, mutably.
    pub fn get_child_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.children.get_mut(key)
    }

    /// Iterate named children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.children.iter()
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The declared trigger addresses, or an empty slice.
    #[must_use]
    pub fn declared_triggers(&self) -> &[Address] {
        self.update.as_ref().map_or(&[], UpdateDeclaration::triggers)
    }

    /// Whether an update handler is currently installed.
    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Whether a prior handler is chained behind the active one.
    #[must_use]
    pub fn has_prior_handler(&self) -> bool {
        self.prior_handler.is_some()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("update", &self.update)
            .field("group", &self.group)
            .field("stable_id", &self.stable_id)
            .field("processed", &self.processed)
            .field("handler", &self.handler.is_some())
            .field("prior_handler", &self.prior_handler.is_some())
            .field("wiring", &self.wiring)
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .finish()
    }
}

impl PartialEq for Node {
    /// Structural equality. Handler slots are callables without identity,
    /// so only their presence participates.
    fn eq(&self, other: &Self) -> bool {
        self.update == other.update
            && self.group == other.group
            && self.stable_id == other.stable_id
            && self.processed == other.processed
            && self.handler.is_some() == other.handler.is_some()
            && self.prior_handler.is_some() == other.prior_handler.is_some()
            && self.wiring == other.wiring
            && self.attrs == other.attrs
            && self.children == other.children
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_keep_insertion_order() {
        let node = Node::new()
            .child("zeta", Node::new())
            .child("alpha", Node::new())
            .child("mid", Node::new());
        let keys: Vec<&str> = node.children().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn declared_triggers_empty_without_declaration() {
        assert!(Node::new().declared_triggers().is_empty());
        let node = Node::new().updated_by([Address::new(["select"])]);
        assert_eq!(node.declared_triggers(), [Address::new(["select"])]);
    }

    #[test]
    fn handler_state_default_is_unwired() {
        let node = Node::new();
        assert_eq!(node.wiring, HandlerState::Unwired);
        assert!(!node.wiring.is_wired());
        assert!(HandlerState::WiredFresh.is_wired());
        assert!(HandlerState::WiredChained.is_wired());
    }

    #[test]
    fn structural_equality_ignores_handler_identity() {
        use crate::handler::{HandlerOutcome, handler_fn};
        use crate::response::UpdateResponse;

        let a = Node::new().with_handler(handler_fn(|_, _, _| {
            HandlerOutcome::Response(UpdateResponse::new())
        }));
        let b = Node::new().with_handler(handler_fn(|_, _, _| {
            HandlerOutcome::Response(UpdateResponse::new())
        }));
        assert_eq!(a, b);
        assert_ne!(a, Node::new());
    }

    #[test]
    fn clone_shares_handler() {
        use crate::handler::{HandlerOutcome, handler_fn};
        use crate::response::UpdateResponse;

        let node = Node::new().with_handler(handler_fn(|_, _, _| {
            HandlerOutcome::Response(UpdateResponse::new())
        }));
        let copy = node.clone();
        assert!(copy.has_handler());
    }
}
