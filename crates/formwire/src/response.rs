#![forbid(unsafe_code)]

//! Patch commands, attachment merging, and the assembled update response.
//!
//! An [`UpdateResponse`] is built fresh for each update request, handed to
//! the transport layer, and discarded. It is an ordered list of [`Patch`]
//! commands plus a deduplicated [`AttachmentSet`] of scripts and styles the
//! renderer wants delivered alongside the markup, plus any recoverable
//! issues collected while assembling it.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::UpdateIssue;

/// Build the patch target selector for a node's stable identifier.
#[must_use]
pub fn stable_id_selector(id: &str) -> String {
    format!("*[data-stable-id=\"{id}\"]")
}

/// One transport-level patch command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Patch {
    /// Replace or insert content at the node matching `selector`.
    Insert { selector: String, html: String },
    /// Insert content before everything under `target`, or at the
    /// well-known global insertion point when `target` is unset.
    Prepend { target: Option<String>, html: String },
}

impl Patch {
    /// The rendered markup carried by this patch.
    #[must_use]
    pub fn html(&self) -> &str {
        match self {
            Self::Insert { html, .. } | Self::Prepend { html, .. } => html,
        }
    }

    /// The target selector, or `None` for a global prepend.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Insert { selector, .. } => Some(selector),
            Self::Prepend { target, .. } => target.as_deref(),
        }
    }
}

/// Scripts and styles to be merged into the page alongside the patches.
///
/// Both sets are deduplicated while preserving first-seen order, so merging
/// the same renderer output twice is harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentSet {
    scripts: IndexSet<String>,
    styles: IndexSet<String>,
}

impl AttachmentSet {
    /// An empty attachment set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a script attachment.
    pub fn add_script(&mut self, script: impl Into<String>) {
        self.scripts.insert(script.into());
    }

    /// Record a style attachment.
    pub fn add_style(&mut self, style: impl Into<String>) {
        self.styles.insert(style.into());
    }

    /// Union `other` into `self`, keeping first-seen order.
    pub fn merge(&mut self, other: &AttachmentSet) {
        for script in &other.scripts {
            self.scripts.insert(script.clone());
        }
        for style in &other.styles {
            self.styles.insert(style.clone());
        }
    }

    /// Scripts in first-seen order.
    pub fn scripts(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(String::as_str)
    }

    /// Styles in first-seen order.
    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(String::as_str)
    }

    /// Whether no attachments are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty() && self.styles.is_empty()
    }
}

/// The assembled answer to one update request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateResponse {
    patches: Vec<Patch>,
    attachments: AttachmentSet,
    issues: Vec<UpdateIssue>,
}

impl UpdateResponse {
    /// An empty response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a patch at the end of the command list.
    pub fn push_patch(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    /// Insert a patch in front of every existing command.
    pub fn prepend_patch(&mut self, patch: Patch) {
        self.patches.insert(0, patch);
    }

    /// Merge renderer attachments into this response.
    pub fn merge_attachments(&mut self, attachments: &AttachmentSet) {
        self.attachments.merge(attachments);
    }

    /// Record a recoverable per-node issue.
    pub fn push_issue(&mut self, issue: UpdateIssue) {
        self.issues.push(issue);
    }

    /// Absorb another response: its patches are appended after ours, its
    /// attachments and issues merged in.
    pub fn extend(&mut self, other: UpdateResponse) {
        self.patches.extend(other.patches);
        self.attachments.merge(&other.attachments);
        self.issues.extend(other.issues);
    }

    /// Patch commands in application order.
    #[must_use]
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// The merged attachment set.
    #[must_use]
    pub fn attachments(&self) -> &AttachmentSet {
        &self.attachments
    }

    /// Recoverable issues collected while assembling this response.
    #[must_use]
    pub fn issues(&self) -> &[UpdateIssue] {
        &self.issues
    }

    /// Whether the response carries no patches and no attachments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty() && self.attachments.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
