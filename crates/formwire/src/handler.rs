#![forbid(unsafe_code)]

//! The shared update handler and the callable handler model.
//!
//! Handlers are first-class values ([`HandlerRef`]) held directly in a
//! node's handler slots, not string-identified callbacks resolved at
//! dispatch time. A handler receives its own [`FormTree`] value, so whatever
//! it mutates stays private to it.
//!
//! [`respond`] is the engine's per-request entry point: given the request's
//! tree snapshot and the triggering address, it chains the trigger's prior
//! handler (if any), recomputes the dependent set from a fresh
//! [`DependencyIndex`], renders every dependent, and assembles the patch
//! response. [`SharedHandler`] is the same algorithm packaged as a
//! [`HandlerRef`] for installation on trigger nodes by the wiring pass.
//!
//! # Failure Modes
//!
//! - The triggering address not resolving is the only request-fatal error.
//! - An unresolvable dependent, a missing stable identifier, or a renderer
//!   failure each cost that one node its patch; the response survives and
//!   records the issue.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::address::Address;
use crate::capability::Renderer;
use crate::error::{Result, UpdateError, UpdateIssue};
use crate::index::DependencyIndex;
use crate::node::Node;
use crate::request::RequestCx;
use crate::response::{Patch, UpdateResponse, stable_id_selector};
use crate::tree::FormTree;

/// A callable update handler.
///
/// The tree is passed by value: every invocation owns a private copy and is
/// free to mutate it without corrupting the caller's snapshot.
pub trait UpdateCallback {
    fn call(&self, tree: FormTree, cx: &RequestCx, renderer: &dyn Renderer) -> HandlerOutcome;
}

/// Shared, cheaply clonable reference to an update handler.
///
/// `Rc` rather than `Arc`: the engine is single-threaded and
/// request-scoped.
pub type HandlerRef = Rc<dyn UpdateCallback>;

/// What a handler produced.
#[derive(Debug, Clone)]
pub enum HandlerOutcome {
    /// A complete response, used as-is.
    Response(UpdateResponse),
    /// A renderable value; the engine renders it into a one-patch response.
    Renderable(Node),
}

impl<F> UpdateCallback for F
where
    F: Fn(FormTree, &RequestCx, &dyn Renderer) -> HandlerOutcome,
{
    fn call(&self, tree: FormTree, cx: &RequestCx, renderer: &dyn Renderer) -> HandlerOutcome {
        self(tree, cx, renderer)
    }
}

/// Wrap a closure as a [`HandlerRef`].
pub fn handler_fn<F>(f: F) -> HandlerRef
where
    F: Fn(FormTree, &RequestCx, &dyn Renderer) -> HandlerOutcome + 'static,
{
    Rc::new(f)
}

/// The shared update handler installed on every wired trigger node.
///
/// Delegates to [`respond`] using the triggering address carried by the
/// request context. Without a triggering address there is nothing to
/// update, so the outcome is an empty response.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedHandler;

impl UpdateCallback for SharedHandler {
    fn call(&self, tree: FormTree, cx: &RequestCx, renderer: &dyn Renderer) -> HandlerOutcome {
        let Some(trigger) = cx.trigger() else {
            debug!("shared handler invoked without a triggering address");
            return HandlerOutcome::Response(UpdateResponse::new());
        };
        match respond(&tree, trigger, renderer, cx) {
            Ok(response) => HandlerOutcome::Response(response),
            Err(err) => {
                warn!(trigger = %trigger, error = %err, "update request failed");
                HandlerOutcome::Response(UpdateResponse::new())
            }
        }
    }
}

/// A [`HandlerRef`] to the shared handler.
#[must_use]
pub fn shared_handler() -> HandlerRef {
    Rc::new(SharedHandler)
}

/// Assemble the update response for a request triggered at `trigger`.
///
/// Steps, in order: chain the trigger's prior handler on a private tree
/// copy; rebuild the dependency index from this snapshot (declarations may
/// have changed shape since wiring — a stale index is never reused); render
/// each dependent in discovery order with its group membership stripped;
/// prepend the status-message surface if it has output.
///
/// # Errors
///
/// [`UpdateError::UnresolvableTrigger`] when `trigger` does not resolve in
/// `tree`. Everything else is recorded on the response and logged.
pub fn respond(
    tree: &FormTree,
    trigger: &Address,
    renderer: &dyn Renderer,
    cx: &RequestCx,
) -> Result<UpdateResponse> {
    let trigger_node = tree.get(trigger).ok_or_else(|| UpdateError::UnresolvableTrigger {
        address: trigger.clone(),
    })?;

    // 1. Prior handler first, on its own copy of the tree: its mutations
    //    must not reach the dependents rendered below.
    let mut response = match trigger_node.prior_handler.clone() {
        Some(prior) => match prior.call(tree.clone(), cx, renderer) {
            HandlerOutcome::Response(base) => base,
            HandlerOutcome::Renderable(node) => render_ad_hoc(&node, renderer),
        },
        None => UpdateResponse::new(),
    };

    // 2. Fresh index for this snapshot.
    let index = DependencyIndex::build(tree);

    // 3. Render dependents in discovery order.
    for dependent in index.dependents_of(trigger) {
        let Some(node) = tree.get(dependent) else {
            warn!(dependent = %dependent, "dependent address does not resolve");
            response.push_issue(UpdateIssue::UnresolvableDependent {
                address: dependent.clone(),
            });
            continue;
        };

        let Some(id) = node.stable_id.clone() else {
            warn!(dependent = %dependent, "dependent has no stable identifier");
            response.push_issue(UpdateIssue::MissingStableId {
                address: dependent.clone(),
            });
            continue;
        };

        // Group membership suppresses direct rendering in the external
        // renderer; strip it from the render copy.
        let mut render_copy = node.clone();
        render_copy.group = None;

        match renderer.render(&render_copy) {
            Ok(output) => {
                response.push_patch(Patch::Insert {
                    selector: stable_id_selector(&id),
                    html: output.html,
                });
                response.merge_attachments(&output.attachments);
            }
            Err(err) => {
                warn!(dependent = %dependent, error = %err, "dependent render failed");
                response.push_issue(UpdateIssue::RenderFailed {
                    address: dependent.clone(),
                    message: err.0,
                });
            }
        }
    }

    // 4. Status messages, best-effort, at the global insertion point.
    if let Some(status) = renderer.render_status() {
        if !status.html.is_empty() {
            response.merge_attachments(&status.attachments);
            response.prepend_patch(Patch::Prepend {
                target: None,
                html: status.html,
            });
        }
    }

    Ok(response)
}

/// Render a handler-returned value into a one-patch base response.
///
/// Targets the value's stable identifier when it has one; otherwise the
/// patch goes to the global insertion point.
fn render_ad_hoc(node: &Node, renderer: &dyn Renderer) -> UpdateResponse {
    let mut response = UpdateResponse::new();
    match renderer.render(node) {
        Ok(output) => {
            let patch = match node.stable_id.as_deref() {
                Some(id) => Patch::Insert {
                    selector: stable_id_selector(id),
                    html: output.html,
                },
                None => Patch::Prepend {
                    target: None,
                    html: output.html,
                },
            };
            response.push_patch(patch);
            response.merge_attachments(&output.attachments);
        }
        Err(err) => {
            warn!(error = %err, "prior handler renderable failed to render");
            response.push_issue(UpdateIssue::RenderFailed {
                address: Address::root(),
                message: err.0,
            });
        }
    }
    response
}
