//! Radial layout: the root at the centre, each level on a ring `radius_step` further out.
//!
//! The root's children split the full circle evenly, the first one pointing north and the rest
//! following clockwise (screen coordinates, y down). Every other node inherits a slice of its
//! parent's sector, split evenly among siblings, and sits on the bisector of its slice.

use super::{Centres, finish, prepare};
use crate::config::LayoutParams;
use crate::model::{LayoutResult, Node};
use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone, Copy)]
struct Sector {
    start: f64,
    width: f64,
}

pub(crate) fn layout(nodes: &[Node], params: &LayoutParams) -> LayoutResult {
    let _span = tracing::debug_span!("radial_layout", nodes = nodes.len()).entered();
    let Some(tree) = prepare(nodes, params) else {
        return LayoutResult::unchanged(nodes);
    };
    let Some(root) = tree.root() else {
        return LayoutResult::unchanged(nodes);
    };

    let mut centres: Centres = vec![None; nodes.len()];
    centres[root] = Some((params.center_x, params.center_y));

    // Centre the first child's slice on north.
    let root_children = tree.children(root).len().max(1);
    let first_slice = TAU / root_children as f64;
    let root_sector = Sector {
        start: -FRAC_PI_2 - first_slice / 2.0,
        width: TAU,
    };

    let mut queue: VecDeque<(usize, usize, Sector)> = VecDeque::from([(root, 0, root_sector)]);
    while let Some((idx, level, sector)) = queue.pop_front() {
        let children = tree.children(idx);
        if children.is_empty() {
            continue;
        }
        let slice = sector.width / children.len() as f64;
        let radius = params.radius_step * (level + 1) as f64;
        for (i, &c) in children.iter().enumerate() {
            if centres[c].is_some() {
                continue;
            }
            let child_sector = Sector {
                start: sector.start + slice * i as f64,
                width: slice,
            };
            let angle = child_sector.start + slice / 2.0;
            centres[c] = Some((
                params.center_x + angle.cos() * radius,
                params.center_y + angle.sin() * radius,
            ));
            queue.push_back((c, level + 1, child_sector));
        }
    }

    tracing::debug!(
        positioned = centres.iter().filter(|c| c.is_some()).count(),
        "radial layout placed nodes"
    );
    finish(nodes, &centres, params)
}
