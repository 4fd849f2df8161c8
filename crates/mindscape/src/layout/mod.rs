//! Layout strategies.
//!
//! Each strategy computes node centres on a [`MindmapTree`]; [`finish`] turns centres into
//! top-left positions on a fresh copy of the input and computes the bounding box. Nodes a
//! strategy does not reach keep their input coordinates.

pub(crate) mod balanced;
pub(crate) mod hierarchical;
pub(crate) mod radial;

use crate::config::{LayoutParams, LayoutType, OrphanPolicy};
use crate::model::{LayoutResult, Node, bounds_of};
use crate::tree::MindmapTree;

/// Node centres indexed like the input slice; `None` for nodes left in place.
pub(crate) type Centres = Vec<Option<(f64, f64)>>;

pub(crate) fn layout_nodes(nodes: &[Node], layout_type: LayoutType, params: &LayoutParams) -> LayoutResult {
    match layout_type {
        LayoutType::Radial => radial::layout(nodes, params),
        LayoutType::Tree => hierarchical::layout(nodes, params),
        LayoutType::Balanced => balanced::layout(nodes, params),
    }
}

/// Builds the tree and applies the orphan policy. `None` when there is no root.
pub(crate) fn prepare<'a>(nodes: &'a [Node], params: &LayoutParams) -> Option<MindmapTree<'a>> {
    if nodes.is_empty() {
        return None;
    }
    let mut tree = MindmapTree::build(nodes);
    if tree.root().is_none() {
        tracing::warn!(nodes = nodes.len(), "no root node found; layout skipped");
        return None;
    }

    let orphans = tree.orphans();
    if !orphans.is_empty() {
        let ids: Vec<&str> = orphans.iter().map(|&i| nodes[i].id.as_str()).collect();
        match params.orphan_policy {
            OrphanPolicy::KeepPosition => {
                tracing::warn!(count = ids.len(), ?ids, "orphan nodes keep their position");
            }
            OrphanPolicy::AttachToRoot => {
                tracing::warn!(count = ids.len(), ?ids, "orphan nodes attached to root");
                tree.attach_orphans_to_root();
            }
        }
    }
    Some(tree)
}

pub(crate) fn finish(nodes: &[Node], centres: &Centres, params: &LayoutParams) -> LayoutResult {
    let mut out = nodes.to_vec();
    for (n, c) in out.iter_mut().zip(centres) {
        let Some((cx, cy)) = *c else {
            continue;
        };
        let (w, h) = n.size_or(params.node_width, params.node_height);
        n.x = cx - w / 2.0;
        n.y = cy - h / 2.0;
    }
    let bounds = bounds_of(&out, params.node_width, params.node_height);
    LayoutResult { nodes: out, bounds }
}
