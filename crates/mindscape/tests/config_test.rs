use mindscape::{Error, LayoutOptions, LayoutType, MindmapData, Node, OrphanPolicy, OverlapOptions};
use serde_json::json;

#[test]
fn layout_options_read_top_level_keys() {
    let cfg = json!({
        "nodeWidth": 120,
        "verticalSpacing": 10.5,
        "centerX": 0,
        "orphanPolicy": "attach-to-root"
    });
    let opts = LayoutOptions::from_config(&cfg);
    assert_eq!(opts.node_width, 120.0);
    assert_eq!(opts.vertical_spacing, 10.5);
    assert_eq!(opts.center_x, Some(0.0));
    assert_eq!(opts.center_y, None);
    assert_eq!(opts.node_height, 80.0);
    assert_eq!(opts.orphan_policy, OrphanPolicy::AttachToRoot);
}

#[test]
fn layout_options_prefer_a_nested_layout_object() {
    let cfg = json!({
        "nodeWidth": 1,
        "layout": { "radiusStep": 400, "horizontalSpacing": "wide" }
    });
    let opts = LayoutOptions::from_config(&cfg);
    assert_eq!(opts.radius_step, 400.0);
    // Mistyped and out-of-scope keys keep their defaults.
    assert_eq!(opts.horizontal_spacing, 100.0);
    assert_eq!(opts.node_width, 200.0);
}

#[test]
fn empty_config_is_the_default() {
    assert_eq!(LayoutOptions::from_config(&json!({})), LayoutOptions::default());
    assert_eq!(OverlapOptions::from_config(&json!(null)), OverlapOptions::default());
}

#[test]
fn resolve_centres_on_the_canvas() {
    let params = LayoutOptions::default().resolve(1200.0, 800.0).unwrap();
    assert_eq!(params.center(), (600.0, 400.0));
    assert_eq!(params.node_size(), (200.0, 80.0));
    assert_eq!(params.level_step(), 300.0);
    assert_eq!(params.orphan_policy(), OrphanPolicy::KeepPosition);

    let pinned = LayoutOptions {
        center_x: Some(-5.0),
        ..Default::default()
    };
    let params = pinned.resolve(1200.0, 800.0).unwrap();
    assert_eq!(params.center(), (-5.0, 400.0));
}

#[test]
fn resolve_rejects_unusable_values() {
    let cases = [
        ("nodeWidth", LayoutOptions { node_width: 0.0, ..Default::default() }),
        ("nodeHeight", LayoutOptions { node_height: f64::NAN, ..Default::default() }),
        ("verticalSpacing", LayoutOptions { vertical_spacing: -0.5, ..Default::default() }),
        ("radiusStep", LayoutOptions { radius_step: f64::INFINITY, ..Default::default() }),
    ];
    for (expected, opts) in cases {
        match opts.resolve(100.0, 100.0) {
            Err(Error::InvalidConfig { field, .. }) => assert_eq!(field, expected),
            other => panic!("{expected}: unexpected {other:?}"),
        }
    }
    // Zero spacing is allowed.
    let tight = LayoutOptions {
        horizontal_spacing: 0.0,
        vertical_spacing: 0.0,
        ..Default::default()
    };
    assert!(tight.resolve(100.0, 100.0).is_ok());
}

#[test]
fn overlap_options_from_config() {
    let cfg = json!({ "overlap": { "padding": 8, "passes": 5 } });
    let opts = OverlapOptions::from_config(&cfg);
    assert_eq!(opts.padding, 8.0);
    assert_eq!(opts.passes, 5);
    assert_eq!(opts.node_width, 200.0);
    assert!(opts.validate().is_ok());
}

#[test]
fn layout_type_names() {
    for (name, expected) in [
        ("radial", LayoutType::Radial),
        ("Tree", LayoutType::Tree),
        ("hierarchical", LayoutType::Tree),
        (" balanced ", LayoutType::Balanced),
    ] {
        assert_eq!(name.parse::<LayoutType>().unwrap(), expected);
    }
    let err = "spiral".parse::<LayoutType>().unwrap_err();
    assert_eq!(err.to_string(), "unknown layout type: spiral");
    assert_eq!(LayoutType::Tree.to_string(), "tree");

    let from_json: LayoutType = serde_json::from_value(json!("hierarchical")).unwrap();
    assert_eq!(from_json, LayoutType::Tree);
    assert_eq!(serde_json::to_value(LayoutType::Radial).unwrap(), json!("radial"));
}

#[test]
fn orphan_policy_names() {
    assert_eq!("keep".parse::<OrphanPolicy>().unwrap(), OrphanPolicy::KeepPosition);
    assert_eq!(
        "attach_to_root".parse::<OrphanPolicy>().unwrap(),
        OrphanPolicy::AttachToRoot
    );
    assert!("drop".parse::<OrphanPolicy>().is_err());
    assert_eq!(
        serde_json::to_value(OrphanPolicy::KeepPosition).unwrap(),
        json!("keepPosition")
    );
}

#[test]
fn node_json_uses_camel_case_and_keeps_unknown_fields() {
    let input = json!({
        "id": "a",
        "parentId": "root",
        "depth": 1,
        "x": 10,
        "y": -2.5,
        "width": 150,
        "label": "Idea",
        "style": { "fill": "#eee" }
    });
    let node: Node = serde_json::from_value(input.clone()).unwrap();
    assert_eq!(node.parent(), Some("root"));
    assert_eq!(node.width, Some(150.0));
    assert_eq!(node.height, None);
    assert_eq!(node.extra["style"]["fill"], "#eee");

    let out = serde_json::to_value(&node).unwrap();
    assert_eq!(out["parentId"], "root");
    assert_eq!(out["label"], "Idea");
    assert_eq!(out["style"], input["style"]);
    assert!(out.get("height").is_none());
}

#[test]
fn minimal_node_json_gets_defaults() {
    let node: Node = serde_json::from_value(json!({ "id": "root" })).unwrap();
    assert_eq!(node.depth, None);
    assert_eq!((node.x, node.y, node.width), (0.0, 0.0, None));
    // Root by virtue of having no parent.
    assert!(node.is_root_candidate());
    assert!(serde_json::to_value(&node).unwrap().get("depth").is_none());

    let data: MindmapData = serde_json::from_value(json!({ "nodes": [{ "id": "r" }] })).unwrap();
    assert!(data.edges.is_empty());
}
