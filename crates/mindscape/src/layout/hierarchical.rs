//! Left-to-right layered ("tree") layout.
//!
//! Subtree heights are accumulated bottom-up: a leaf is `node_height` tall, an inner node is the
//! sum of its children's subtree heights plus `vertical_spacing` between them, floored at
//! `node_height`. Positions are then assigned top-down: children stack in contiguous vertical
//! bands sized to their subtree heights, centred on the parent, one level step to the side.

use super::{Centres, finish, prepare};
use crate::config::LayoutParams;
use crate::model::{LayoutResult, Node};
use crate::tree::MindmapTree;

/// Horizontal growth direction of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Right,
    Left,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }
}

pub(crate) fn layout(nodes: &[Node], params: &LayoutParams) -> LayoutResult {
    let _span = tracing::debug_span!("tree_layout", nodes = nodes.len()).entered();
    let Some(tree) = prepare(nodes, params) else {
        return LayoutResult::unchanged(nodes);
    };
    let Some(root) = tree.root() else {
        return LayoutResult::unchanged(nodes);
    };

    let heights = subtree_heights(&tree, root, params);
    let mut centres: Centres = vec![None; nodes.len()];
    centres[root] = Some((params.center_x, params.center_y));
    place_branches(
        &tree,
        &heights,
        &mut centres,
        root,
        tree.children(root),
        Direction::Right,
        params,
    );
    finish(nodes, &centres, params)
}

/// Subtree height per node index (0 for nodes outside `root`'s subtree).
pub(crate) fn subtree_heights(tree: &MindmapTree<'_>, root: usize, params: &LayoutParams) -> Vec<f64> {
    let mut heights = vec![0.0; tree.len()];
    for idx in tree.post_order(root) {
        heights[idx] = stacked_height(tree.children(idx), &heights, params);
    }
    heights
}

/// Height of a band holding `children`, floored at one node.
pub(crate) fn stacked_height(children: &[usize], heights: &[f64], params: &LayoutParams) -> f64 {
    if children.is_empty() {
        return params.node_height;
    }
    let sum: f64 = children.iter().map(|&c| heights[c]).sum();
    let gaps = params.vertical_spacing * (children.len() - 1) as f64;
    (sum + gaps).max(params.node_height)
}

/// Places `children` of `parent` (already placed) and everything below them, growing in `dir`.
pub(crate) fn place_branches(
    tree: &MindmapTree<'_>,
    heights: &[f64],
    centres: &mut Centres,
    parent: usize,
    children: &[usize],
    dir: Direction,
    params: &LayoutParams,
) {
    let mut stack: Vec<(usize, Vec<usize>)> = vec![(parent, children.to_vec())];
    while let Some((p, kids)) = stack.pop() {
        let Some((px, py)) = centres[p] else {
            continue;
        };
        let x = px + dir.sign() * params.level_step();
        let mut top = py - stacked_height(&kids, heights, params) / 2.0;
        for c in kids {
            if centres[c].is_some() {
                continue;
            }
            let h = heights[c];
            centres[c] = Some((x, top + h / 2.0));
            top += h + params.vertical_spacing;
            stack.push((c, tree.children(c).to_vec()));
        }
    }
}
