//! Local overlap repair after a manual drag.
//!
//! The dragged node stays where the user dropped it. Any node whose padded box overlaps the
//! dragged node's padded box is pushed away along the dominant axis of the centre-to-centre
//! vector, together with its whole subtree. The push is the minimal separating translation
//! scaled by [`PUSH_SCALE`]; coincident centres get a fixed downward push.
//!
//! The scan runs a fixed number of passes (two by default) and then stops, so cascades longer
//! than that, or collisions between two pushed nodes, may remain.

use crate::config::OverlapOptions;
use crate::error::Result;
use crate::model::{Bounds, Node};
use crate::tree::MindmapTree;

/// Extra breathing room applied to the minimal separating translation.
pub const PUSH_SCALE: f64 = 1.2;

pub fn resolve_overlaps(nodes: &[Node], moved_id: &str, opts: &OverlapOptions) -> Result<Vec<Node>> {
    opts.validate()?;
    let _span = tracing::debug_span!(
        "resolve_overlaps",
        nodes = nodes.len(),
        moved = moved_id,
        passes = opts.passes
    )
    .entered();

    let mut out = nodes.to_vec();
    let tree = MindmapTree::build(nodes);
    let Some(moved) = tree.index_of(moved_id) else {
        tracing::warn!(moved = moved_id, "moved node not found; nothing to resolve");
        return Ok(out);
    };

    for pass in 0..opts.passes {
        let mut pushes = 0usize;
        for other in 0..out.len() {
            if other == moved {
                continue;
            }
            let anchor = padded(&out[moved], opts);
            let target = padded(&out[other], opts);
            if !overlaps_strictly(&anchor, &target) {
                continue;
            }

            let (dx, dy) = push_vector(&anchor, &target, opts);
            let branch = tree.subtree(other);
            if branch.contains(&moved) {
                // An ancestor of the dragged node moves alone.
                shift(&mut out[other], dx, dy);
            } else {
                for i in branch {
                    shift(&mut out[i], dx, dy);
                }
            }
            pushes += 1;
            tracing::trace!(pass, node = %out[other].id, dx, dy, "pushed overlapping node");
        }
        tracing::debug!(pass, pushes, "overlap pass finished");
        if pushes == 0 {
            break;
        }
    }

    Ok(out)
}

fn padded(n: &Node, opts: &OverlapOptions) -> Bounds {
    n.rect_or(opts.node_width, opts.node_height)
        .inflate(opts.padding)
}

fn overlaps_strictly(a: &Bounds, b: &Bounds) -> bool {
    a.min_x < b.max_x && b.min_x < a.max_x && a.min_y < b.max_y && b.min_y < a.max_y
}

/// Translation for `target` that clears `anchor` along the dominant axis.
fn push_vector(anchor: &Bounds, target: &Bounds, opts: &OverlapOptions) -> (f64, f64) {
    let (ax, ay) = anchor.center();
    let (tx, ty) = target.center();
    let dx = tx - ax;
    let dy = ty - ay;

    if dx == 0.0 && dy == 0.0 {
        return (0.0, opts.node_height + opts.padding);
    }

    if dx.abs() >= dy.abs() {
        let needed = (anchor.width() + target.width()) / 2.0 - dx.abs();
        (needed * PUSH_SCALE * dx.signum(), 0.0)
    } else {
        let needed = (anchor.height() + target.height()) / 2.0 - dy.abs();
        (0.0, needed * PUSH_SCALE * dy.signum())
    }
}

fn shift(n: &mut Node, dx: f64, dy: f64) {
    n.x += dx;
    n.y += dy;
}
