use pretty_assertions::assert_eq;
use protoloom_weave::node::*;
use protoloom_weave::{html, tailwind, validate_tree, Node, WeaveError};

fn card() -> Node {
    Node::Container(Container {
        id: Some("card".into()),
        class: Some("flex flex-col gap-4 p-6 bg-white rounded-lg shadow-md".into()),
        children: vec![
            Node::Text(Text {
                id: None,
                class: Some("text-xl font-semibold text-gray-900".into()),
                text: "Pricing".into(),
            }),
            Node::Badge(Badge {
                id: None,
                class: Some("bg-emerald-100 text-emerald-700".into()),
                text: "Popular".into(),
            }),
            Node::Divider(Divider {
                id: None,
                class: None,
            }),
            Node::Button(Button {
                id: Some("cta".into()),
                class: Some("bg-blue-500 text-white rounded-md px-4 py-2".into()),
                label: "Choose plan".into(),
                handler: Some(1),
                disabled: false,
            }),
        ],
    })
}

#[test]
fn full_document_round_trip() {
    let tree = card();
    validate_tree(&tree).expect("card tree should validate");

    let doc = html::render_preview_document(&tree, Some((768, 1024)), ".custom{color:red}");

    // Structure
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("id=\"card\""));
    assert!(doc.contains(">Choose plan</button>"));
    assert!(doc.contains("data-handler=\"1\""));
    assert!(doc.contains("width:768px;min-height:1024px"));

    // Utility CSS is generated for classes the tree uses, and only those
    assert!(doc.contains(".flex { display: flex; }"));
    assert!(doc.contains(".bg-blue-500 { background-color: #3b82f6; }"));
    assert!(!doc.contains(".bg-red-500"));

    // Unit CSS rides last, verbatim
    assert!(doc.contains(".custom{color:red}"));
}

#[test]
fn utility_engine_ignores_unknown_and_deduplicates() {
    let css = tailwind::generate_css_for_classes(&["flex", "flex", "no-such-utility", "p-4"]);
    assert_eq!(css.matches(".flex {").count(), 1);
    assert!(!css.contains("no-such-utility"));
    assert!(css.contains(".p-4 { padding: 1rem; }"));
}

#[test]
fn serialization_shape_is_tagged() {
    let tree = Node::Text(Text {
        id: None,
        class: None,
        text: "hi".into(),
    });
    let json = serde_json::to_string(&tree).unwrap();
    assert_eq!(json, r#"{"tag":"text","text":"hi"}"#);
}

#[test]
fn duplicate_ids_rejected_across_nesting_levels() {
    let tree = Node::Container(Container {
        id: Some("a".into()),
        class: None,
        children: vec![Node::Container(Container {
            id: None,
            class: None,
            children: vec![Node::Text(Text {
                id: Some("a".into()),
                class: None,
                text: "inner".into(),
            })],
        })],
    });
    assert!(matches!(
        validate_tree(&tree),
        Err(WeaveError::DuplicateId { id }) if id == "a"
    ));
}

#[test]
fn attribute_injection_is_neutralized() {
    let tree = Node::Container(Container {
        id: Some("x\" onmouseover=\"steal()".into()),
        class: None,
        children: vec![],
    });
    let mut out = String::new();
    html::node_to_html(&tree, &mut out);
    assert!(!out.contains("onmouseover=\"steal"));
    assert!(out.contains("&quot;"));
}
