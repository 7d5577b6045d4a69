#![forbid(unsafe_code)]

//! Address value type: an ordered sequence of child-keys locating a node.
//!
//! An [`Address`] is a pure value, never a reference into the tree. Two
//! addresses are equal iff their segment sequences are equal element-wise.
//! Dependency declarations, the dependency index, and the update request all
//! speak in addresses, which keeps the node graph free of cyclic ownership.
//!
//! # Invariants
//!
//! 1. Equality is exactly element-wise sequence equality:
//!    `[a,b] != [a,b,c]` and `[a,b] != [b,a]`.
//! 2. Equality and hashing operate on the segment sequence, never on the
//!    joined canonical key. [`Address::new`] and [`Address::child`] accept
//!    arbitrary keys, including keys containing [`SEPARATOR`], so two
//!    distinct addresses may share a canonical key; only request-decoded
//!    addresses ([`Address::from_request`]) have sanitized segments.
//! 3. `parent()` of the root is `None`; `root().is_root()` is `true`.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::AddressError;

/// Fixed separator used for the canonical key and the request wire encoding.
pub const SEPARATOR: char = '/';

/// Ordered sequence of child-keys from the tree root to a node.
///
/// Cheap to clone for typical form depths; segments are inlined up to a
/// depth of four before spilling to the heap.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    segments: SmallVec<[String; 4]>,
}

impl Address {
    /// The root address (empty segment sequence).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build an address from an ordered sequence of child-keys.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Decode an address from the raw request path parameter.
    ///
    /// The transport encodes the triggering node's path as segments joined
    /// by [`SEPARATOR`]. Segments are sanitized before resolution: empty
    /// segments, `.`/`..`, and property-style keys starting with `#` are
    /// not child keys and are rejected.
    ///
    /// # Errors
    ///
    /// [`AddressError::Empty`] for an empty or all-separator input;
    /// [`AddressError::InvalidSegment`] for a rejected segment.
    pub fn from_request(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim_matches(SEPARATOR);
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        let mut segments = SmallVec::new();
        for segment in trimmed.split(SEPARATOR) {
            if !is_child_key(segment) {
                return Err(AddressError::InvalidSegment {
                    segment: segment.to_string(),
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Child address formed by appending one key.
    #[must_use]
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.into());
        Self { segments }
    }

    /// Append a key in place.
    pub fn push(&mut self, key: impl Into<String>) {
        self.segments.push(key.into());
    }

    /// Parent address, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    /// The ordered child-key segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root address.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether this is the root address.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Canonical string form: segments joined by [`SEPARATOR`].
    ///
    /// A display and log-field form, not an identity: segments may themselves
    /// contain the separator, so lookups always compare segment sequences.
    /// The root address canonicalizes to the empty string.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.segments.join(&SEPARATOR.to_string())
    }
}

/// Whether `segment` is a plausible child key rather than a property key or
/// path-traversal noise.
fn is_child_key(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.starts_with('#')
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.canonical())
    }
}

impl<S: Into<String>> FromIterator<S> for Address {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
