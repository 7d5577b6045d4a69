#![forbid(unsafe_code)]

//! Per-request context.
//!
//! [`RequestCx`] carries the decoded triggering address and, when the
//! transport captured it before the wiring pass ran, a copy of the
//! triggering node itself. That captured copy may be distinct from the node
//! in the tree — it was taken too early in the request pipeline — so the
//! wiring pass re-applies its handler assignment to it explicitly.

use crate::address::Address;
use crate::node::Node;

/// Context for one update request (or one wiring-only pass).
#[derive(Debug, Clone, Default)]
pub struct RequestCx {
    trigger: Option<Address>,
    captured: Option<Node>,
}

impl RequestCx {
    /// A context with no triggering address, for wiring outside a triggered
    /// request (e.g. the initial form build).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context for a request triggered at `address`.
    #[must_use]
    pub fn for_trigger(address: Address) -> Self {
        Self {
            trigger: Some(address),
            captured: None,
        }
    }

    /// Record the copy of the triggering node the transport captured before
    /// wiring ran.
    #[must_use]
    pub fn with_captured(mut self, node: Node) -> Self {
        self.captured = Some(node);
        self
    }

    /// The triggering address, if this is a triggered request.
    #[must_use]
    pub fn trigger(&self) -> Option<&Address> {
        self.trigger.as_ref()
    }

    /// The captured triggering-node copy, if any.
    #[must_use]
    pub fn captured(&self) -> Option<&Node> {
        self.captured.as_ref()
    }

    /// The captured copy together with the trigger address, mutably.
    ///
    /// Returns `None` unless both are present. Used by the wiring pass to
    /// re-apply handler assignments to the early-captured copy.
    pub fn captured_with_trigger_mut(&mut self) -> Option<(&Address, &mut Node)> {
        match (&self.trigger, &mut self.captured) {
            (Some(trigger), Some(node)) => Some((trigger, node)),
            _ => None,
        }
    }
}
