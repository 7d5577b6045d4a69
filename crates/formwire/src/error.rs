#![forbid(unsafe_code)]

//! Error and issue types for the partial re-render engine.
//!
//! The propagation policy is deliberately lopsided: almost everything that
//! can go wrong is local to a single trigger or a single dependent and is
//! *collected* (and logged) rather than thrown, so one misdeclared node
//! never takes down the whole wiring pass or update response. The single
//! request-fatal condition is a triggering address that does not resolve in
//! the request's own tree snapshot.

use thiserror::Error;

use crate::address::Address;

/// Crate-wide result alias for request-fatal failures.
pub type Result<T> = std::result::Result<T, UpdateError>;

/// A request path parameter that cannot be decoded into an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("empty address path")]
    Empty,

    #[error("invalid path segment: {segment:?}")]
    InvalidSegment { segment: String },
}

/// A recoverable condition observed during the wiring pass.
///
/// Recorded in the [`WiringReport`](crate::wiring::WiringReport) and logged;
/// never aborts the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringIssue {
    /// A declared trigger address resolves to no node in this tree snapshot.
    /// The dependents stay recorded in the index; only the wiring is skipped.
    #[error("trigger address does not resolve: {address}")]
    UnresolvableTrigger { address: Address },

    /// The trigger node was never run through the external interactivity
    /// step, so it cannot become interactive. A configuration error on the
    /// integrator's side; surfaced instead of silently skipped.
    #[error("trigger node was never processed for interactivity: {address}")]
    NotProcessed { address: Address },
}

/// A recoverable condition observed while assembling one update response.
///
/// Collected on the [`UpdateResponse`](crate::response::UpdateResponse);
/// the affected dependent simply contributes no patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateIssue {
    /// A dependent address no longer resolves in the request snapshot.
    #[error("dependent address does not resolve: {address}")]
    UnresolvableDependent { address: Address },

    /// The dependent lacks the stable identifying attribute needed to build
    /// its patch target selector.
    #[error("dependent has no stable identifier: {address}")]
    MissingStableId { address: Address },

    /// The external renderer failed for this dependent.
    #[error("render failed for {address}: {message}")]
    RenderFailed { address: Address, message: String },
}

/// Request-fatal failure of the shared update handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// The triggering node's own address does not resolve in the request's
    /// tree snapshot. Nothing can be updated; the transport should answer
    /// with an empty or error response.
    #[error("triggering address does not resolve: {address}")]
    UnresolvableTrigger { address: Address },
}

/// Failure reported by an external [`Renderer`](crate::capability::Renderer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

impl RenderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
