#![forbid(unsafe_code)]

//! Dependency index: trigger address → declared dependents.
//!
//! Built by walking the tree exactly once, recording every node that carries
//! an update declaration under each trigger address it names. The index is a
//! per-snapshot derivation, never persisted: the update handler rebuilds it
//! from the request's own tree because declarations may have changed shape
//! between form build and request time.
//!
//! # Invariants
//!
//! 1. `dependents_of(T)` is exactly the set of node addresses whose
//!    declaration lists `T` — no more, no fewer — in tree walk order.
//!    Lookup is by address value (element-wise segment equality), never by
//!    a flattened string form, so segments that happen to contain the
//!    separator character cannot conflate two distinct triggers.
//! 2. `triggers()` yields distinct trigger addresses in first-seen walk
//!    order.
//! 3. A trigger address that resolves to no node is still retained here;
//!    reporting that is the wiring pass's job, not the index's.
//! 4. Rebuilding from an unmodified snapshot yields an identical index.

use ahash::AHashMap;

use crate::address::Address;
use crate::tree::FormTree;

/// Mapping from trigger address to the dependents declared against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyIndex {
    dependents: AHashMap<Address, Vec<Address>>,
    triggers: Vec<Address>,
}

impl DependencyIndex {
    /// Build the index from one tree snapshot with a single walk.
    #[must_use]
    pub fn build(tree: &FormTree) -> Self {
        let mut index = Self::default();
        tree.walk(|address, node| {
            for trigger in node.declared_triggers() {
                index.record(trigger, address.clone());
            }
        });
        index
    }

    fn record(&mut self, trigger: &Address, dependent: Address) {
        let entry = self.dependents.entry(trigger.clone()).or_default();
        if entry.is_empty() {
            self.triggers.push(trigger.clone());
        }
        entry.push(dependent);
    }

    /// Distinct trigger addresses in first-seen walk order.
    #[must_use]
    pub fn triggers(&self) -> &[Address] {
        &self.triggers
    }

    /// Dependent node addresses declared against `trigger`, in discovery
    /// (walk) order. Empty for an unknown trigger.
    #[must_use]
    pub fn dependents_of(&self, trigger: &Address) -> &[Address] {
        self.dependents.get(trigger).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct triggers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Whether no dependencies are declared anywhere in the tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
