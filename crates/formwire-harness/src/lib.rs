#![forbid(unsafe_code)]

//! Reference collaborators and fixtures for exercising the formwire engine.
//!
//! The engine treats rendering and interactivity processing as external
//! capabilities. [`StaticRenderer`] and [`RecordingProcessor`] are
//! deterministic in-memory implementations of those capabilities, good
//! enough to assert every observable behavior of the wiring pass and the
//! update handler without a real HTML pipeline. [`select_scenario`] builds
//! the canonical three-node demo form used across the integration suites.

use std::cell::Cell;

use serde_json::Value;
use tracing::debug;

use formwire::{
    Address, AttachmentSet, FormTree, Interactivity, Node, RenderError, RenderOutput, Renderer,
    RequestCx,
};

/// Deterministic in-memory renderer.
///
/// Markup shape: `<div data-stable-id="ID">BODY</div>`, where `BODY` comes
/// from the node's `value` attribute (HTML-escaped) or its `markup`
/// attribute (taken verbatim). Nodes that belong to a visual group render
/// to empty markup — the group-suppression rule the real renderer applies —
/// so tests can prove the engine stripped the membership before rendering.
///
/// Attachments are read from the node's `scripts` / `styles` attributes
/// (arrays of strings).
#[derive(Debug, Default)]
pub struct StaticRenderer {
    status_messages: Vec<String>,
    renders: Cell<usize>,
}

impl StaticRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a status message for the status-messages surface.
    #[must_use]
    pub fn with_status(mut self, message: impl Into<String>) -> Self {
        self.status_messages.push(message.into());
        self
    }

    /// How many nodes have been rendered so far (status surface excluded).
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }
}

impl Renderer for StaticRenderer {
    fn render(&self, node: &Node) -> Result<RenderOutput, RenderError> {
        self.renders.set(self.renders.get() + 1);

        // Members of a visual group are not rendered directly.
        if node.group.is_some() {
            debug!(group = ?node.group, "suppressing direct render of group member");
            return Ok(RenderOutput::default());
        }

        if let Some(Value::String(message)) = node.attrs.get("fail") {
            return Err(RenderError::new(message.clone()));
        }

        let body = match (node.attrs.get("markup"), node.attrs.get("value")) {
            (Some(Value::String(markup)), _) => markup.clone(),
            (_, Some(Value::String(value))) => v_htmlescape::escape(value).to_string(),
            _ => String::new(),
        };

        let html = match node.stable_id.as_deref() {
            Some(id) => format!("<div data-stable-id=\"{id}\">{body}</div>"),
            None => format!("<div>{body}</div>"),
        };

        let mut attachments = AttachmentSet::new();
        if let Some(Value::Array(scripts)) = node.attrs.get("scripts") {
            for script in scripts.iter().filter_map(Value::as_str) {
                attachments.add_script(script);
            }
        }
        if let Some(Value::Array(styles)) = node.attrs.get("styles") {
            for style in styles.iter().filter_map(Value::as_str) {
                attachments.add_style(style);
            }
        }

        Ok(RenderOutput { html, attachments })
    }

    fn render_status(&self) -> Option<RenderOutput> {
        if self.status_messages.is_empty() {
            return None;
        }
        let items: String = self
            .status_messages
            .iter()
            .map(|m| format!("<li>{}</li>", v_htmlescape::escape(m)))
            .collect();
        Some(RenderOutput::html(format!(
            "<ul class=\"status-messages\">{items}</ul>"
        )))
    }
}

/// Interactivity stub: marks nodes as processed and counts invocations, so
/// tests can assert exactly when the wiring pass re-runs processing.
#[derive(Debug, Default)]
pub struct RecordingProcessor {
    calls: Cell<usize>,
}

impl RecordingProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `process` ran.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Interactivity for RecordingProcessor {
    fn process(&self, mut node: Node, _cx: &RequestCx, _tree: &FormTree) -> Node {
        self.calls.set(self.calls.get() + 1);
        node.processed = true;
        node
    }
}

/// Address of the trigger node in [`select_scenario`].
#[must_use]
pub fn select_address() -> Address {
    Address::new(["select"])
}

/// The canonical demo form: a `select` trigger plus two dependents that
/// each declare `updated_by: [[select]]`.
#[must_use]
pub fn select_scenario() -> FormTree {
    let select = select_address();
    FormTree::new(
        Node::new()
            .child(
                "select",
                Node::new()
                    .processed()
                    .with_stable_id("edit-select")
                    .with_attr("value", Value::String("first".to_string())),
            )
            .child(
                "replace-container",
                Node::new()
                    .updated_by([select.clone()])
                    .with_stable_id("edit-replace-container")
                    .with_attr("value", Value::String("container for first".to_string())),
            )
            .child(
                "replace-details",
                Node::new()
                    .updated_by([select])
                    .with_stable_id("edit-replace-details")
                    .with_attr("value", Value::String("details for first".to_string())),
            ),
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_is_deterministic_for_a_node_value() {
        let renderer = StaticRenderer::new();
        let node = Node::new()
            .with_stable_id("edit-x")
            .with_attr("value", Value::String("abc".to_string()));
        let first = renderer.render(&node).expect("render");
        let second = renderer.render(&node).expect("render");
        assert_eq!(first, second);
        assert_eq!(first.html, "<div data-stable-id=\"edit-x\">abc</div>");
        assert_eq!(renderer.render_count(), 2);
    }

    #[test]
    fn renderer_escapes_values() {
        let renderer = StaticRenderer::new();
        let node = Node::new()
            .with_stable_id("edit-x")
            .with_attr("value", Value::String("<b>&".to_string()));
        let out = renderer.render(&node).expect("render");
        assert_eq!(out.html, "<div data-stable-id=\"edit-x\">&lt;b&gt;&amp;</div>");
    }

    #[test]
    fn renderer_suppresses_group_members() {
        let renderer = StaticRenderer::new();
        let node = Node::new()
            .with_stable_id("edit-x")
            .with_group("advanced")
            .with_attr("value", Value::String("hidden".to_string()));
        let out = renderer.render(&node).expect("render");
        assert!(out.html.is_empty());
    }

    #[test]
    fn renderer_collects_attachments() {
        let renderer = StaticRenderer::new();
        let node = Node::new().with_stable_id("edit-x").with_attr(
            "scripts",
            Value::Array(vec![Value::String("widget/picker.js".to_string())]),
        );
        let out = renderer.render(&node).expect("render");
        let scripts: Vec<&str> = out.attachments.scripts().collect();
        assert_eq!(scripts, ["widget/picker.js"]);
    }

    #[test]
    fn status_surface_renders_queued_messages() {
        let renderer = StaticRenderer::new().with_status("saved & applied");
        let out = renderer.render_status().expect("has messages");
        assert_eq!(
            out.html,
            "<ul class=\"status-messages\"><li>saved &amp; applied</li></ul>"
        );
        assert!(StaticRenderer::new().render_status().is_none());
    }

    #[test]
    fn processor_marks_and_counts() {
        let processor = RecordingProcessor::new();
        let tree = select_scenario();
        let node = processor.process(Node::new(), &RequestCx::new(), &tree);
        assert!(node.processed);
        assert_eq!(processor.calls(), 1);
    }
}
