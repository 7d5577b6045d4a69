#![forbid(unsafe_code)]

//! Dependency-driven partial re-render engine for declarative form trees.
//!
//! A form tree can declare, per node, that it must be refreshed whenever
//! some other node in the same tree changes value — `updated_by` a trigger
//! address — with no per-widget event wiring. This crate discovers those
//! declarations by walking the tree, wires every trigger node through one
//! shared update handler (preserving any handler the node already had as a
//! chained prior handler), and at request time recomputes the dependent
//! set, renders each dependent, and assembles a patch response addressed by
//! stable per-node selectors.
//!
//! # Architecture
//!
//! - [`address`] / [`tree`]: pure utilities — the [`Address`] value type and
//!   depth-first tree walking/resolution.
//! - [`index`]: the per-snapshot [`DependencyIndex`], trigger → dependents.
//! - [`wiring`]: the one-time post-build pass installing [`SharedHandler`]
//!   on trigger nodes.
//! - [`handler`]: the per-request [`respond`] algorithm and the callable
//!   handler model.
//! - [`response`] / [`capability`] / [`request`]: the patch protocol, the
//!   injected external interfaces, and the per-request context.
//!
//! The engine is single-threaded, synchronous, and request-scoped: every
//! request supplies its own tree snapshot, and nothing here persists across
//! requests. Rendering and interactivity processing are external
//! capabilities passed in explicitly.

pub mod address;
pub mod capability;
pub mod error;
pub mod handler;
pub mod index;
pub mod node;
pub mod request;
pub mod response;
pub mod tree;
pub mod wiring;

pub use address::{Address, SEPARATOR};
pub use capability::{Interactivity, RenderOutput, Renderer};
pub use error::{
    AddressError, RenderError, Result, UpdateError, UpdateIssue, WiringIssue,
};
pub use handler::{
    HandlerOutcome, HandlerRef, SharedHandler, UpdateCallback, handler_fn, respond,
    shared_handler,
};
pub use index::DependencyIndex;
pub use node::{HandlerState, Node, UpdateDeclaration};
pub use request::RequestCx;
pub use response::{AttachmentSet, Patch, UpdateResponse, stable_id_selector};
pub use tree::FormTree;
pub use wiring::{WiringReport, wire};
