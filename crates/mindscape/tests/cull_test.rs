use mindscape::{
    Bounds, DEFAULT_CULL_PADDING, Dimensions, Error, Node, SpatialIndex, Viewport, build_index,
    cull, visible_rect,
};
use proptest::prelude::*;
use std::borrow::Cow;

/// Deterministic scatter over `[0, extent)^2`.
fn scatter(count: usize, extent: f64, seed: u64) -> Vec<Node> {
    let mut state = seed;
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..count)
        .map(|i| Node::root(format!("n{i}")).at(next() * extent, next() * extent))
        .collect()
}

fn brute_force<'a>(nodes: &'a [Node], window: &Bounds) -> Vec<&'a str> {
    nodes
        .iter()
        .filter(|n| n.rect_or(200.0, 80.0).intersects(window))
        .map(|n| n.id.as_str())
        .collect()
}

fn ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

const SCREEN: Dimensions = Dimensions {
    width: 1000.0,
    height: 1000.0,
};

#[test]
fn culls_to_the_padded_window() {
    let nodes = scatter(100, 10_000.0, 7);
    let index = build_index(&nodes);
    let viewport = Viewport::default();

    let window = visible_rect(&viewport, &SCREEN, DEFAULT_CULL_PADDING).unwrap();
    assert_eq!(window, Bounds::new(-200.0, -200.0, 1200.0, 1200.0));

    let visible = cull(&viewport, &SCREEN, &index, &nodes, DEFAULT_CULL_PADDING).unwrap();
    assert!(matches!(visible, Cow::Owned(_)));
    assert_eq!(ids(&visible), brute_force(&nodes, &window));
    assert!(visible.len() < nodes.len());
}

#[test]
fn visible_rect_accounts_for_pan_and_zoom() {
    let viewport = Viewport {
        x: -500.0,
        y: -300.0,
        scale: 2.0,
    };
    let screen = Dimensions {
        width: 800.0,
        height: 600.0,
    };
    let window = visible_rect(&viewport, &screen, 0.0).unwrap();
    assert_eq!(window, Bounds::new(250.0, 150.0, 650.0, 450.0));

    let padded = visible_rect(&viewport, &screen, 50.0).unwrap();
    assert_eq!(padded, Bounds::new(200.0, 100.0, 700.0, 500.0));
}

#[test]
fn edge_touching_nodes_are_visible() {
    let nodes = vec![
        Node::root("left").at(-400.0, 0.0),
        Node::root("right").at(1000.0, 500.0),
        Node::root("away").at(1000.5, 0.0),
    ];
    let index = build_index(&nodes);
    let visible = cull(&Viewport::default(), &SCREEN, &index, &nodes, 0.0).unwrap();
    // "left" spans [-400, -200]: no overlap. "right" touches the window's right edge.
    assert_eq!(ids(&visible), vec!["right"]);
}

#[test]
fn nodes_with_nan_coordinates_are_never_visible() {
    let mut nodes: Vec<Node> = (0..30)
        .map(|i| Node::root(format!("n{i}")).at((i % 6) as f64 * 150.0, (i / 6) as f64 * 150.0))
        .collect();
    nodes[3].x = f64::NAN;
    let index = build_index(&nodes);
    let viewport = Viewport::default();

    let window = visible_rect(&viewport, &SCREEN, 200.0).unwrap();
    let visible = cull(&viewport, &SCREEN, &index, &nodes, 200.0).unwrap();
    assert_eq!(visible.len(), 29);
    assert_eq!(ids(&visible), brute_force(&nodes, &window));
    assert!(!ids(&visible).contains(&"n3"));
}

#[test]
fn fully_visible_input_is_borrowed() {
    let nodes = scatter(50, 500.0, 3);
    let index = build_index(&nodes);
    let visible = cull(&Viewport::default(), &SCREEN, &index, &nodes, 200.0).unwrap();
    assert!(matches!(visible, Cow::Borrowed(_)));
    assert_eq!(visible.len(), nodes.len());
}

#[test]
fn output_keeps_input_order() {
    let mut nodes = scatter(40, 800.0, 11);
    nodes.push(Node::root("far").at(50_000.0, 50_000.0));
    nodes.reverse();
    let index = build_index(&nodes);
    let visible = cull(&Viewport::default(), &SCREEN, &index, &nodes, 200.0).unwrap();
    let expected: Vec<&str> = ids(&nodes).into_iter().filter(|id| *id != "far").collect();
    assert_eq!(ids(&visible), expected);
}

#[test]
fn empty_input_culls_to_nothing() {
    let index = SpatialIndex::default();
    assert!(index.is_empty());
    assert_eq!(index.bounds(), None);
    let visible = cull(&Viewport::default(), &SCREEN, &index, &[], 200.0).unwrap();
    assert!(visible.is_empty());
}

#[test]
fn invalid_viewports_are_rejected() {
    let nodes = scatter(5, 100.0, 1);
    let index = build_index(&nodes);
    for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let viewport = Viewport {
            scale,
            ..Default::default()
        };
        let err = cull(&viewport, &SCREEN, &index, &nodes, 200.0).unwrap_err();
        assert!(matches!(err, Error::InvalidViewport { .. }), "scale {scale}");
    }

    let viewport = Viewport {
        x: f64::NAN,
        ..Default::default()
    };
    assert!(visible_rect(&viewport, &SCREEN, 0.0).is_err());
    assert!(visible_rect(&Viewport::default(), &SCREEN, -1.0).is_err());
    let negative = Dimensions {
        width: -1.0,
        height: 10.0,
    };
    assert!(visible_rect(&Viewport::default(), &negative, 0.0).is_err());
}

#[test]
fn index_goes_stale_when_nodes_move() {
    let mut nodes = scatter(20, 1000.0, 5);
    let index = build_index(&nodes);
    assert!(index.is_current_for(&nodes));

    nodes[3].x += 1.0;
    assert!(!index.is_current_for(&nodes));

    nodes[3].x -= 1.0;
    assert!(index.is_current_for(&nodes));
    nodes.pop();
    assert!(!index.is_current_for(&nodes));
}

#[test]
fn index_uses_node_sizes_and_fallbacks() {
    let nodes = vec![
        Node::root("sized").at(10.0, 20.0).with_size(30.0, 40.0),
        Node::root("plain").at(100.0, 100.0),
    ];
    let index = SpatialIndex::build_with_defaults(&nodes, 50.0, 60.0);
    let mut items: Vec<_> = index.items().cloned().collect();
    items.sort_by(|a, b| a.node_id.cmp(&b.node_id));

    assert_eq!(items[0].node_id, "plain");
    assert_eq!(items[0].bounds(), Bounds::new(100.0, 100.0, 150.0, 160.0));
    assert_eq!(items[1].bounds(), Bounds::new(10.0, 20.0, 40.0, 60.0));
    assert_eq!(index.bounds(), Some(Bounds::new(10.0, 20.0, 150.0, 160.0)));

    let json = serde_json::to_value(&items[1]).unwrap();
    assert_eq!(json["nodeId"], "sized");
    assert_eq!(json["maxY"], 60.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cull_matches_brute_force(
        count in 0usize..3000,
        seed in any::<u64>(),
        x in -5000.0f64..5000.0,
        y in -5000.0f64..5000.0,
        scale in 0.1f64..4.0,
        padding in 0.0f64..400.0,
    ) {
        let nodes = scatter(count, 8000.0, seed);
        let index = build_index(&nodes);
        let viewport = Viewport { x, y, scale };
        let window = visible_rect(&viewport, &SCREEN, padding).unwrap();
        let visible = cull(&viewport, &SCREEN, &index, &nodes, padding).unwrap();
        prop_assert_eq!(ids(&visible), brute_force(&nodes, &window));
    }
}
