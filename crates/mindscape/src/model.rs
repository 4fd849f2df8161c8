use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use remora::Aabb as Bounds;

/// Engine fallback width for nodes without a usable `width`.
pub const DEFAULT_NODE_WIDTH: f64 = 200.0;
/// Engine fallback height for nodes without a usable `height`.
pub const DEFAULT_NODE_HEIGHT: f64 = 80.0;

/// One mindmap concept: a rectangle whose top-left corner is `(x, y)`.
///
/// Fields the engine does not understand (labels, colours, ...) are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Caller-supplied distance from the root. Missing is not the same as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            depth: Some(0),
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            extra: Map::new(),
        }
    }

    pub fn child(id: impl Into<String>, parent_id: impl Into<String>, depth: u32) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            depth: Some(depth),
            ..Self::root(id)
        }
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// The parent id, treating an empty string like a missing one.
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether this node may act as the tree root (`depth` present and 0, or no parent).
    pub fn is_root_candidate(&self) -> bool {
        self.depth == Some(0) || self.parent().is_none()
    }

    /// Effective size: the node's own dimensions when finite and positive, else the fallbacks.
    pub fn size_or(&self, default_width: f64, default_height: f64) -> (f64, f64) {
        (
            usable_dimension(self.width).unwrap_or(default_width),
            usable_dimension(self.height).unwrap_or(default_height),
        )
    }

    pub fn rect_or(&self, default_width: f64, default_height: f64) -> Bounds {
        let (w, h) = self.size_or(default_width, default_height);
        Bounds::from_rect(self.x, self.y, w, h)
    }

    pub fn center_or(&self, default_width: f64, default_height: f64) -> (f64, f64) {
        let (w, h) = self.size_or(default_width, default_height);
        (self.x + w / 2.0, self.y + h / 2.0)
    }
}

fn usable_dimension(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite() && *v > 0.0)
}

/// Parent-to-child connector. Redundant with `parentId`; carried for the render layer only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindmapData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl MindmapData {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            edges: Vec::new(),
        }
    }

    /// Derives one edge per resolvable `parentId` link, in node order.
    pub fn edges_from_parents(nodes: &[Node]) -> Vec<Edge> {
        let ids: rustc_hash::FxHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        nodes
            .iter()
            .filter_map(|n| {
                let parent = n.parent()?;
                if !ids.contains(parent) || parent == n.id {
                    return None;
                }
                Some(Edge {
                    id: format!("{parent}->{}", n.id),
                    source: parent.to_string(),
                    target: n.id.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub nodes: Vec<Node>,
    pub bounds: Bounds,
}

impl LayoutResult {
    /// Input returned as-is with a degenerate bounding box.
    pub fn unchanged(nodes: &[Node]) -> Self {
        Self {
            nodes: nodes.to_vec(),
            bounds: Bounds::ZERO,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Bounding box of every finite node rectangle, or [`Bounds::ZERO`] when there is none.
pub fn bounds_of(nodes: &[Node], default_width: f64, default_height: f64) -> Bounds {
    let b = nodes
        .iter()
        .map(|n| n.rect_or(default_width, default_height))
        .filter(Bounds::is_finite)
        .fold(Bounds::EMPTY, |acc, r| acc.union(&r));
    if b.is_empty() {
        Bounds::ZERO
    } else {
        b
    }
}
