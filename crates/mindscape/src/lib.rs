#![forbid(unsafe_code)]

//! Headless mindmap layout and viewport culling.
//!
//! Four entry points cover the life of a mindmap canvas:
//!
//! - [`apply_layout`] positions every node with one of the [`LayoutType`] strategies (on data
//!   load, or once a streamed batch of nodes is complete),
//! - [`resolve_overlaps`] pushes nodes out of the way of a node the user just dragged,
//! - [`build_index`] packs node rectangles into an R-tree,
//! - [`cull`] keeps only the nodes visible through a pan/zoom viewport.
//!
//! Every call is a pure function of its inputs: results are freshly allocated and no state is
//! kept between calls. The engine performs no I/O.

pub mod config;
pub mod cull;
pub mod error;
pub(crate) mod layout;
pub mod model;
pub mod overlap;
pub mod spatial;
pub mod tree;

pub use config::{LayoutOptions, LayoutParams, LayoutType, OrphanPolicy, OverlapOptions};
pub use cull::{DEFAULT_CULL_PADDING, Dimensions, Viewport, cull, visible_rect};
pub use error::{Error, Result};
pub use model::{Bounds, Edge, LayoutResult, MindmapData, Node};
pub use overlap::resolve_overlaps;
pub use spatial::{SpatialIndex, SpatialItem, build_index};
pub use tree::MindmapTree;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays out `data.nodes` with default spacing, centred on the canvas.
pub fn apply_layout(
    data: &MindmapData,
    layout_type: LayoutType,
    canvas_width: f64,
    canvas_height: f64,
) -> Result<LayoutResult> {
    apply_layout_with_options(
        data,
        layout_type,
        canvas_width,
        canvas_height,
        &LayoutOptions::default(),
    )
}

pub fn apply_layout_with_options(
    data: &MindmapData,
    layout_type: LayoutType,
    canvas_width: f64,
    canvas_height: f64,
    options: &LayoutOptions,
) -> Result<LayoutResult> {
    let params = options.resolve(canvas_width, canvas_height)?;
    let _span = tracing::debug_span!(
        "apply_layout",
        layout = %layout_type,
        nodes = data.nodes.len(),
        edges = data.edges.len()
    )
    .entered();
    Ok(layout::layout_nodes(&data.nodes, layout_type, &params))
}
