#![forbid(unsafe_code)]

//! Trigger wiring: the one-time, post-build pass that routes every
//! discovered trigger node through the shared update handler.
//!
//! # Design
//!
//! For each distinct trigger address in the [`DependencyIndex`]:
//!
//! 1. Resolve the node. An unresolvable trigger is recorded and skipped;
//!    the rest of the pass continues.
//! 2. A node never processed for interactivity cannot become interactive —
//!    that is a configuration error, recorded rather than silently skipped.
//! 3. An already-wired node is skipped outright; wiring is applied at most
//!    once per trigger address, so running the pass twice never chains the
//!    shared handler onto itself.
//! 4. No handler present: install the shared handler and re-run the
//!    external interactivity step — the node was processed earlier under
//!    the assumption of having no handler.
//! 5. Handler present: preserve it as the node's prior handler, then
//!    install the shared handler in its place.
//! 6. If the request captured a copy of this node as its triggering element
//!    before wiring ran, apply the same assignment to that copy too; it may
//!    be distinct from the tree node and would otherwise miss the routing.

use tracing::{debug, warn};

use crate::address::Address;
use crate::capability::Interactivity;
use crate::error::WiringIssue;
use crate::handler::shared_handler;
use crate::index::DependencyIndex;
use crate::node::HandlerState;
use crate::request::RequestCx;
use crate::tree::FormTree;

/// Outcome of one wiring pass.
#[derive(Debug, Clone, Default)]
pub struct WiringReport {
    outcomes: Vec<(Address, HandlerState)>,
    issues: Vec<WiringIssue>,
}

impl WiringReport {
    /// Per-trigger final handler states, in index order.
    #[must_use]
    pub fn outcomes(&self) -> &[(Address, HandlerState)] {
        &self.outcomes
    }

    /// Recoverable issues encountered during the pass.
    #[must_use]
    pub fn issues(&self) -> &[WiringIssue] {
        &self.issues
    }

    /// The recorded state for a trigger address, if it was wired.
    #[must_use]
    pub fn state_of(&self, trigger: &Address) -> Option<HandlerState> {
        self.outcomes
            .iter()
            .find(|(addr, _)| addr == trigger)
            .map(|(_, state)| *state)
    }

    /// Whether the pass completed without issues.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Run the wiring pass over a fully built tree.
///
/// `index` must have been built from `tree`; `interactivity` is the external
/// processing capability re-invoked for freshly wired triggers; `cx` is the
/// in-flight request context whose captured triggering-node copy (if any)
/// receives the same handler assignment as the tree node.
pub fn wire(
    tree: &mut FormTree,
    index: &DependencyIndex,
    interactivity: &dyn Interactivity,
    cx: &mut RequestCx,
) -> WiringReport {
    let mut report = WiringReport::default();

    // `index.triggers()` is already distinct per address, and the
    // wiring-state check below guards against a repeated pass.
    for trigger in index.triggers() {
        let Some(node) = tree.get(trigger) else {
            warn!(trigger = %trigger, "trigger address does not resolve; wiring skipped");
            report.issues.push(WiringIssue::UnresolvableTrigger {
                address: trigger.clone(),
            });
            continue;
        };

        if !node.processed {
            warn!(trigger = %trigger, "trigger never processed for interactivity");
            report.issues.push(WiringIssue::NotProcessed {
                address: trigger.clone(),
            });
            continue;
        }

        if node.wiring.is_wired() {
            debug!(trigger = %trigger, state = ?node.wiring, "trigger already wired");
            report.outcomes.push((trigger.clone(), node.wiring));
            continue;
        }

        let chained = node.has_handler();
        let state = if chained {
            HandlerState::WiredChained
        } else {
            HandlerState::WiredFresh
        };

        tree.update_at(trigger, |node| {
            if chained {
                node.prior_handler = node.handler.take();
            }
            node.handler = Some(shared_handler());
            node.wiring = state;
        });

        if state == HandlerState::WiredFresh {
            // The earlier processing ran with no handler on the node, so its
            // interactivity setup is incomplete. Send it through again.
            let snapshot = tree.clone();
            if let Some(node) = tree.get_mut(trigger) {
                node.processed = false;
                let reprocessed = interactivity.process(node.clone(), cx, &snapshot);
                *node = reprocessed;
            }
        }

        if let Some((captured_addr, captured)) = cx.captured_with_trigger_mut() {
            if captured_addr == trigger {
                debug!(trigger = %trigger, "re-routing captured triggering element");
                if chained && captured.handler.is_some() {
                    captured.prior_handler = captured.handler.take();
                }
                captured.handler = Some(shared_handler());
                captured.wiring = state;
            }
        }

        report.outcomes.push((trigger.clone(), state));
    }

    report
}

// ─── Tests ───────────────────────────────────────────────────────────────────
