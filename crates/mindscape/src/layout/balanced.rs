//! Balanced layout: the root's children alternate sides.
//!
//! Children at even indices grow to the right, odd indices to the left. Each side is stacked and
//! centred on the root with the same subtree-height bands as the tree layout.

use super::hierarchical::{Direction, place_branches, subtree_heights};
use super::{Centres, finish, prepare};
use crate::config::LayoutParams;
use crate::model::{LayoutResult, Node};

pub(crate) fn layout(nodes: &[Node], params: &LayoutParams) -> LayoutResult {
    let _span = tracing::debug_span!("balanced_layout", nodes = nodes.len()).entered();
    let Some(tree) = prepare(nodes, params) else {
        return LayoutResult::unchanged(nodes);
    };
    let Some(root) = tree.root() else {
        return LayoutResult::unchanged(nodes);
    };

    let heights = subtree_heights(&tree, root, params);
    let (right, left): (Vec<(usize, usize)>, Vec<(usize, usize)>) = tree
        .children(root)
        .iter()
        .copied()
        .enumerate()
        .partition(|(i, _)| i % 2 == 0);
    let right: Vec<usize> = right.into_iter().map(|(_, c)| c).collect();
    let left: Vec<usize> = left.into_iter().map(|(_, c)| c).collect();
    tracing::debug!(right = right.len(), left = left.len(), "balanced split");

    let mut centres: Centres = vec![None; nodes.len()];
    centres[root] = Some((params.center_x, params.center_y));
    place_branches(&tree, &heights, &mut centres, root, &right, Direction::Right, params);
    place_branches(&tree, &heights, &mut centres, root, &left, Direction::Left, params);
    finish(nodes, &centres, params)
}
