//! Viewport culling.
//!
//! A pan/zoom viewport plus the screen size maps to a canvas-space window:
//! `minX = -x / scale`, `maxX = (-x + width) / scale` (same for y), padded on every edge so
//! nodes entering during a fast pan are already there. The spatial index answers which nodes
//! intersect that window.

use crate::error::{Error, Result};
use crate::model::{Bounds, Node};
use crate::spatial::SpatialIndex;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Default padding around the visible window, in canvas units.
pub const DEFAULT_CULL_PADDING: f64 = 200.0;

/// Canvas pan offset in screen pixels and zoom factor (content to screen).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

/// Screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// The padded canvas-space window visible through `viewport`.
pub fn visible_rect(viewport: &Viewport, dimensions: &Dimensions, padding: f64) -> Result<Bounds> {
    if !(viewport.x.is_finite() && viewport.y.is_finite()) {
        return Err(Error::InvalidViewport {
            reason: format!("non-finite pan offset ({}, {})", viewport.x, viewport.y),
        });
    }
    if !(viewport.scale.is_finite() && viewport.scale > 0.0) {
        return Err(Error::InvalidViewport {
            reason: format!("scale must be finite and positive, got {}", viewport.scale),
        });
    }
    if !(dimensions.width.is_finite()
        && dimensions.height.is_finite()
        && dimensions.width >= 0.0
        && dimensions.height >= 0.0)
    {
        return Err(Error::InvalidViewport {
            reason: format!(
                "invalid screen size {}x{}",
                dimensions.width, dimensions.height
            ),
        });
    }
    if !(padding.is_finite() && padding >= 0.0) {
        return Err(Error::InvalidViewport {
            reason: format!("padding must be finite and non-negative, got {padding}"),
        });
    }

    let s = viewport.scale;
    Ok(Bounds::new(
        -viewport.x / s,
        -viewport.y / s,
        (-viewport.x + dimensions.width) / s,
        (-viewport.y + dimensions.height) / s,
    )
    .inflate(padding))
}

/// Nodes whose rectangle intersects the padded window, in input order.
///
/// Borrows `nodes` unchanged when every node is visible.
pub fn cull<'a>(
    viewport: &Viewport,
    dimensions: &Dimensions,
    index: &SpatialIndex,
    nodes: &'a [Node],
    padding: f64,
) -> Result<Cow<'a, [Node]>> {
    let window = visible_rect(viewport, dimensions, padding)?;
    let _span = tracing::debug_span!("cull", nodes = nodes.len(), indexed = index.len()).entered();

    let hits = index.search(&window);
    if hits.len() == nodes.len() {
        tracing::trace!(visible = hits.len(), "every node visible");
        return Ok(Cow::Borrowed(nodes));
    }

    let visible: FxHashSet<&str> = hits.iter().map(|item| item.node_id.as_str()).collect();
    let out: Vec<Node> = nodes
        .iter()
        .filter(|n| visible.contains(n.id.as_str()))
        .cloned()
        .collect();
    tracing::trace!(visible = out.len(), "culled");
    Ok(Cow::Owned(out))
}
