#![forbid(unsafe_code)]

//! End-to-end scenarios for the declarative update pipeline: build a form
//! tree, run the wiring pass, fire an update request at the trigger, and
//! assert the assembled patch response.

use serde_json::Value;

use formwire::{
    Address, DependencyIndex, FormTree, HandlerOutcome, HandlerState, Node, Patch, RequestCx,
    UpdateCallback, UpdateError, UpdateIssue, UpdateResponse, handler_fn, respond,
    stable_id_selector, wire,
};
use formwire_harness::{RecordingProcessor, StaticRenderer, select_address, select_scenario};

fn wired_scenario() -> (FormTree, RequestCx) {
    let mut tree = select_scenario();
    let index = DependencyIndex::build(&tree);
    let processor = RecordingProcessor::new();
    let mut cx = RequestCx::for_trigger(select_address());
    let report = wire(&mut tree, &index, &processor, &mut cx);
    assert!(report.is_clean());
    (tree, cx)
}

#[test]
fn select_change_patches_both_dependents_in_discovery_order() {
    let (tree, cx) = wired_scenario();
    let renderer = StaticRenderer::new();

    let response = respond(&tree, &select_address(), &renderer, &cx).expect("respond");

    let patches = response.patches();
    assert_eq!(patches.len(), 2);
    assert_eq!(
        patches[0],
        Patch::Insert {
            selector: stable_id_selector("edit-replace-container"),
            html: "<div data-stable-id=\"edit-replace-container\">container for first</div>"
                .to_string(),
        }
    );
    assert_eq!(
        patches[1],
        Patch::Insert {
            selector: stable_id_selector("edit-replace-details"),
            html: "<div data-stable-id=\"edit-replace-details\">details for first</div>"
                .to_string(),
        }
    );
    assert!(response.issues().is_empty());
}

#[test]
fn wired_trigger_handler_is_the_shared_handler() {
    let (tree, cx) = wired_scenario();
    let renderer = StaticRenderer::new();

    let node = tree.get(&select_address()).expect("select exists");
    assert_eq!(node.wiring, HandlerState::WiredFresh);
    let handler = node.handler.clone().expect("handler installed");

    // Invoking the node's own handler routes through the same algorithm as
    // calling respond() directly.
    let outcome = handler.call(tree.clone(), &cx, &renderer);
    let HandlerOutcome::Response(via_handler) = outcome else {
        panic!("shared handler must produce a full response");
    };
    let direct = respond(&tree, &select_address(), &StaticRenderer::new(), &cx).expect("respond");
    assert_eq!(via_handler.patches(), direct.patches());
}

#[test]
fn status_messages_prepend_a_global_patch() {
    let (tree, cx) = wired_scenario();
    let renderer = StaticRenderer::new().with_status("settings updated");

    let response = respond(&tree, &select_address(), &renderer, &cx).expect("respond");

    let patches = response.patches();
    assert_eq!(patches.len(), 3);
    assert_eq!(
        patches[0],
        Patch::Prepend {
            target: None,
            html: "<ul class=\"status-messages\"><li>settings updated</li></ul>".to_string(),
        }
    );
    assert!(matches!(patches[1], Patch::Insert { .. }));
    assert!(matches!(patches[2], Patch::Insert { .. }));
}

#[test]
fn group_membership_is_stripped_before_rendering() {
    let mut tree = select_scenario();
    tree.update_at(&Address::new(["replace-container"]), |node| {
        node.group = Some("advanced".to_string());
    });
    let index = DependencyIndex::build(&tree);
    let processor = RecordingProcessor::new();
    let mut cx = RequestCx::for_trigger(select_address());
    wire(&mut tree, &index, &processor, &mut cx);
    let renderer = StaticRenderer::new();

    let response = respond(&tree, &select_address(), &renderer, &cx).expect("respond");

    // The renderer suppresses group members; non-empty markup proves the
    // engine rendered the dependent as if the membership were absent.
    let container = &response.patches()[0];
    assert_eq!(
        container.html(),
        "<div data-stable-id=\"edit-replace-container\">container for first</div>"
    );
    // The tree itself keeps the membership; only the render copy loses it.
    let node = tree
        .get(&Address::new(["replace-container"]))
        .expect("exists");
    assert_eq!(node.group.as_deref(), Some("advanced"));
}

#[test]
fn prior_handler_runs_first_on_an_isolated_copy() {
    let mut tree = select_scenario();
    // The select node already had its own handler before wiring: it emits
    // one patch and mutates its private tree copy.
    tree.update_at(&select_address(), |node| {
        node.handler = Some(handler_fn(|mut private, _cx, _renderer| {
            private.update_at(&Address::new(["replace-container"]), |dep| {
                dep.attrs.insert(
                    "value".to_string(),
                    Value::String("mutated by prior".to_string()),
                );
            });
            let mut base = UpdateResponse::new();
            base.push_patch(Patch::Insert {
                selector: stable_id_selector("edit-prior"),
                html: "<div data-stable-id=\"edit-prior\">prior ran</div>".to_string(),
            });
            HandlerOutcome::Response(base)
        }));
    });

    let index = DependencyIndex::build(&tree);
    let processor = RecordingProcessor::new();
    let mut cx = RequestCx::for_trigger(select_address());
    let report = wire(&mut tree, &index, &processor, &mut cx);
    assert_eq!(
        report.state_of(&select_address()),
        Some(HandlerState::WiredChained)
    );

    let renderer = StaticRenderer::new();
    let response = respond(&tree, &select_address(), &renderer, &cx).expect("respond");

    // Prior handler's patch first, then the dependents' patches rendered
    // from the unmutated snapshot.
    let targets: Vec<_> = response
        .patches()
        .iter()
        .filter_map(Patch::target)
        .collect();
    assert_eq!(
        targets,
        [
            r#"*[data-stable-id="edit-prior"]"#,
            r#"*[data-stable-id="edit-replace-container"]"#,
            r#"*[data-stable-id="edit-replace-details"]"#,
        ]
    );
    assert_eq!(
        response.patches()[1].html(),
        "<div data-stable-id=\"edit-replace-container\">container for first</div>",
        "prior handler mutations must not leak into dependent rendering"
    );
}

#[test]
fn prior_handler_renderable_becomes_the_base_patch() {
    let mut tree = select_scenario();
    tree.update_at(&select_address(), |node| {
        node.handler = Some(handler_fn(|_private, _cx, _renderer| {
            HandlerOutcome::Renderable(
                Node::new()
                    .with_stable_id("edit-extra")
                    .with_attr("value", Value::String("ad hoc".to_string())),
            )
        }));
    });
    let index = DependencyIndex::build(&tree);
    let processor = RecordingProcessor::new();
    let mut cx = RequestCx::for_trigger(select_address());
    wire(&mut tree, &index, &processor, &mut cx);

    let renderer = StaticRenderer::new();
    let response = respond(&tree, &select_address(), &renderer, &cx).expect("respond");

    assert_eq!(response.patches().len(), 3);
    assert_eq!(
        response.patches()[0],
        Patch::Insert {
            selector: stable_id_selector("edit-extra"),
            html: "<div data-stable-id=\"edit-extra\">ad hoc</div>".to_string(),
        }
    );
}

#[test]
fn missing_stable_id_costs_only_that_patch() {
    let mut tree = select_scenario();
    tree.update_at(&Address::new(["replace-container"]), |node| {
        node.stable_id = None;
    });
    let index = DependencyIndex::build(&tree);
    let processor = RecordingProcessor::new();
    let mut cx = RequestCx::for_trigger(select_address());
    wire(&mut tree, &index, &processor, &mut cx);

    let renderer = StaticRenderer::new();
    let response = respond(&tree, &select_address(), &renderer, &cx).expect("respond");

    assert_eq!(response.patches().len(), 1);
    assert_eq!(
        response.patches()[0].target(),
        Some(r#"*[data-stable-id="edit-replace-details"]"#)
    );
    assert_eq!(
        response.issues(),
        [UpdateIssue::MissingStableId {
            address: Address::new(["replace-container"]),
        }]
    );
}

#[test]
fn render_failure_is_per_dependent_not_fatal() {
    let mut tree = select_scenario();
    tree.update_at(&Address::new(["replace-container"]), |node| {
        node.attrs.insert(
            "fail".to_string(),
            Value::String("renderer exploded".to_string()),
        );
    });
    let index = DependencyIndex::build(&tree);
    let processor = RecordingProcessor::new();
    let mut cx = RequestCx::for_trigger(select_address());
    wire(&mut tree, &index, &processor, &mut cx);

    let renderer = StaticRenderer::new();
    let response = respond(&tree, &select_address(), &renderer, &cx).expect("respond");

    assert_eq!(response.patches().len(), 1);
    assert_eq!(
        response.issues(),
        [UpdateIssue::RenderFailed {
            address: Address::new(["replace-container"]),
            message: "renderer exploded".to_string(),
        }]
    );
}

#[test]
fn unresolvable_trigger_address_is_request_fatal() {
    let (tree, cx) = wired_scenario();
    let renderer = StaticRenderer::new();
    let ghost = Address::new(["no-such-node"]);

    let err = respond(&tree, &ghost, &renderer, &cx).unwrap_err();
    assert_eq!(err, UpdateError::UnresolvableTrigger { address: ghost });
}

#[test]
fn attachments_merge_across_dependents() {
    let mut tree = select_scenario();
    let shared_script = Value::Array(vec![Value::String("core/ajax.js".to_string())]);
    tree.update_at(&Address::new(["replace-container"]), |node| {
        node.attrs.insert("scripts".to_string(), shared_script.clone());
    });
    tree.update_at(&Address::new(["replace-details"]), |node| {
        node.attrs.insert("scripts".to_string(), shared_script);
        node.attrs.insert(
            "styles".to_string(),
            Value::Array(vec![Value::String("theme/details.css".to_string())]),
        );
    });
    let index = DependencyIndex::build(&tree);
    let processor = RecordingProcessor::new();
    let mut cx = RequestCx::for_trigger(select_address());
    wire(&mut tree, &index, &processor, &mut cx);

    let renderer = StaticRenderer::new();
    let response = respond(&tree, &select_address(), &renderer, &cx).expect("respond");

    let scripts: Vec<&str> = response.attachments().scripts().collect();
    let styles: Vec<&str> = response.attachments().styles().collect();
    assert_eq!(scripts, ["core/ajax.js"], "shared script deduplicated");
    assert_eq!(styles, ["theme/details.css"]);
}

#[test]
fn request_path_decodes_to_the_trigger_address() {
    let (tree, _) = wired_scenario();
    let trigger = Address::from_request("select").expect("valid request path");
    let cx = RequestCx::for_trigger(trigger.clone());
    let renderer = StaticRenderer::new();

    let response = respond(&tree, &trigger, &renderer, &cx).expect("respond");
    assert_eq!(response.patches().len(), 2);
}
