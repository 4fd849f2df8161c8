//! R-tree over node rectangles.
//!
//! The index is a plain value built from a node slice; it is never updated in place. Callers
//! rebuild it whenever the node set or any position changes, and can use
//! [`SpatialIndex::is_current_for`] to find out whether that is needed.

use crate::model::{Bounds, DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, Node};
use remora::RTree;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// One indexed node rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialItem {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub node_id: String,
}

impl SpatialItem {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: RTree<SpatialItem>,
    default_width: f64,
    default_height: f64,
    fingerprint: u64,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        build_index(&[])
    }
}

/// Indexes every node with the engine's default fallback size.
pub fn build_index(nodes: &[Node]) -> SpatialIndex {
    SpatialIndex::build_with_defaults(nodes, DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT)
}

impl SpatialIndex {
    /// Indexes every node, using `default_width`/`default_height` for nodes without a size.
    pub fn build_with_defaults(nodes: &[Node], default_width: f64, default_height: f64) -> Self {
        let _span = tracing::debug_span!("build_index", nodes = nodes.len()).entered();
        let items: Vec<(Bounds, SpatialItem)> = nodes
            .iter()
            .map(|n| {
                let b = n.rect_or(default_width, default_height);
                (
                    b,
                    SpatialItem {
                        min_x: b.min_x,
                        min_y: b.min_y,
                        max_x: b.max_x,
                        max_y: b.max_y,
                        node_id: n.id.clone(),
                    },
                )
            })
            .collect();
        let tree = RTree::bulk_load(items);
        tracing::debug!(height = tree.height(), "spatial index built");
        Self {
            tree,
            default_width,
            default_height,
            fingerprint: fingerprint(nodes, default_width, default_height),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Bounding box of every indexed rectangle.
    pub fn bounds(&self) -> Option<Bounds> {
        self.tree.bounds()
    }

    /// Every item whose rectangle intersects `query` (edges inclusive).
    pub fn search(&self, query: &Bounds) -> Vec<&SpatialItem> {
        self.tree.search(query)
    }

    pub fn items(&self) -> impl Iterator<Item = &SpatialItem> + '_ {
        self.tree.iter().map(|(_, item)| item)
    }

    /// Whether this index was built from nodes with the same ids, order, positions and sizes.
    pub fn is_current_for(&self, nodes: &[Node]) -> bool {
        nodes.len() == self.tree.len()
            && fingerprint(nodes, self.default_width, self.default_height) == self.fingerprint
    }
}

fn fingerprint(nodes: &[Node], default_width: f64, default_height: f64) -> u64 {
    let mut h = FxHasher::default();
    nodes.len().hash(&mut h);
    for n in nodes {
        n.id.hash(&mut h);
        let b = n.rect_or(default_width, default_height);
        for v in [b.min_x, b.min_y, b.max_x, b.max_y] {
            v.to_bits().hash(&mut h);
        }
    }
    h.finish()
}
