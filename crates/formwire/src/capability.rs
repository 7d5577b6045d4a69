#![forbid(unsafe_code)]

//! External capabilities, injected explicitly rather than looked up from
//! ambient global state.
//!
//! The engine only orchestrates: turning a node into markup, and preparing a
//! node for interactivity, are the host's concern. Both capabilities are
//! passed into the wiring pass and the update handler as trait objects, so
//! tests can substitute deterministic in-memory implementations.

use crate::error::RenderError;
use crate::node::Node;
use crate::request::RequestCx;
use crate::response::AttachmentSet;
use crate::tree::FormTree;

/// Markup plus side-effect attachments produced by rendering one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    pub html: String,
    pub attachments: AttachmentSet,
}

impl RenderOutput {
    /// Markup-only output with no attachments.
    #[must_use]
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            attachments: AttachmentSet::new(),
        }
    }
}

/// The external HTML rendering engine.
pub trait Renderer {
    /// Render one node to markup and attachments.
    ///
    /// Must be idempotent for a given node value. Group-suppression
    /// semantics live here: the engine strips a dependent's group membership
    /// before rendering, but what a group *means* is the renderer's call.
    ///
    /// # Errors
    ///
    /// Renderer failures are recoverable at the engine level; a failed
    /// dependent contributes no patch.
    fn render(&self, node: &Node) -> Result<RenderOutput, RenderError>;

    /// Render the status-messages surface, if it has anything to show.
    ///
    /// `None` (or empty markup) means no global message patch is emitted.
    fn render_status(&self) -> Option<RenderOutput> {
        None
    }
}

/// The external "process for interactivity" step.
pub trait Interactivity {
    /// Re-process a node so the handler just installed on it becomes
    /// effective. Invoked by the wiring pass for trigger nodes that were
    /// processed before any handler existed.
    fn process(&self, node: Node, cx: &RequestCx, tree: &FormTree) -> Node;
}
