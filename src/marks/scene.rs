//! Visual marks and the render operations that move them
//!
//! Marks are plain data; the host draws them. Three families share one
//! canvas, each reconciled independently: scatter points (segment index vs
//! similarity), legend rows (one per similar document), and time-axis points
//! (publication years on the axis baseline). A `RenderOp` stream tells the
//! host exactly what to create, animate, or remove.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

use crate::dataset::{Alignment, AlignmentKey, DocId, TimeAxisKey, Year};
use crate::plot::config::PlotConfig;
use crate::reconcile::Delta;
use crate::scale::LinearScale;

// =============================================================================
// Legend geometry constants
// =============================================================================

/// Vertical distance between legend rows
const LEGEND_ROW_PITCH: f32 = 20.0;
/// Swatch circle x offset from the plot box right edge
const LEGEND_SWATCH_OFFSET_X: f32 = 24.0;
/// Label text x offset from the plot box right edge
const LEGEND_TEXT_OFFSET_X: f32 = 32.0;
/// Swatch circle y for row 0
const LEGEND_SWATCH_BASELINE: f32 = 15.0;
/// Label baseline y for row 0
const LEGEND_TEXT_BASELINE: f32 = 20.0;

// =============================================================================
// Mark types
// =============================================================================

/// One scatter point, carrying its alignment so a click resolves back to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterMark {
    pub key: AlignmentKey,
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: String,
    pub alignment: Alignment,
}

/// One legend row: swatch circle plus label text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendMark {
    pub similar_id: DocId,
    pub row: usize,
    pub label: String,
    /// Publication year, when known (shown in the richer legend)
    pub year: Option<Year>,
    pub color: String,
    pub swatch_cx: f32,
    pub swatch_cy: f32,
    pub text_x: f32,
    pub text_y: f32,
    pub radius: f32,
}

/// One publication-year point on the time axis baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAxisMark {
    pub key: TimeAxisKey,
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: String,
}

// =============================================================================
// RenderOp
// =============================================================================

/// One visual state change for the host to apply.
///
/// `Enter` places a new mark at its final position immediately; only
/// `Update` and `Exit` carry a transition duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum RenderOp<M> {
    #[serde(rename_all = "camelCase")]
    Enter { mark: M },
    #[serde(rename_all = "camelCase")]
    Update {
        from: M,
        mark: M,
        transition_ms: u32,
    },
    #[serde(rename_all = "camelCase")]
    Exit { mark: M, transition_ms: u32 },
}

impl<M> RenderOp<M> {
    /// The mark this op leaves on screen, if any
    pub fn mark(&self) -> Option<&M> {
        match self {
            RenderOp::Enter { mark } => Some(mark),
            RenderOp::Update { mark, .. } => Some(mark),
            RenderOp::Exit { .. } => None,
        }
    }
}

/// Turn a reconciliation delta into render ops, looking entered and updated
/// marks up in the already-built next mark set. Op order is updates, enters,
/// exits, the order a d3 data join applies them.
pub fn render_ops<K, R, M>(
    delta: &Delta<K, R, M>,
    next_marks: &IndexMap<K, M>,
    transition_ms: u32,
) -> Vec<RenderOp<M>>
where
    K: Eq + Hash,
    M: Clone,
{
    let mut ops =
        Vec::with_capacity(delta.enter.len() + delta.update.len() + delta.exit.len());

    for (key, _record, old_mark) in &delta.update {
        if let Some(mark) = next_marks.get(key) {
            ops.push(RenderOp::Update {
                from: old_mark.clone(),
                mark: mark.clone(),
                transition_ms,
            });
        }
    }
    for (key, _record) in &delta.enter {
        if let Some(mark) = next_marks.get(key) {
            ops.push(RenderOp::Enter { mark: mark.clone() });
        }
    }
    for (_key, mark) in &delta.exit {
        ops.push(RenderOp::Exit {
            mark: mark.clone(),
            transition_ms,
        });
    }

    ops
}

// =============================================================================
// Mark builders
// =============================================================================

/// Position an alignment in the scatter: x by source segment, y by similarity
pub fn scatter_mark(
    alignment: &Alignment,
    x: &LinearScale,
    y: &LinearScale,
    color: &str,
    config: &PlotConfig,
) -> ScatterMark {
    ScatterMark {
        key: alignment.key(),
        cx: x.scale(alignment.source_segment as f32) + config.margins.left,
        cy: y.scale(alignment.similarity) + config.margins.top,
        radius: config.point_radius,
        color: color.to_string(),
        alignment: alignment.clone(),
    }
}

/// Lay out one legend row in the right margin
pub fn legend_mark(
    similar_id: DocId,
    label: &str,
    year: Option<Year>,
    row: usize,
    color: &str,
    config: &PlotConfig,
) -> LegendMark {
    let box_right = config.inner_width() + config.margins.left;
    let pitch = LEGEND_ROW_PITCH * row as f32;
    LegendMark {
        similar_id,
        row,
        label: label.to_string(),
        year,
        color: color.to_string(),
        swatch_cx: box_right + LEGEND_SWATCH_OFFSET_X,
        swatch_cy: pitch + LEGEND_SWATCH_BASELINE,
        text_x: box_right + LEGEND_TEXT_OFFSET_X,
        text_y: pitch + LEGEND_TEXT_BASELINE,
        radius: config.point_radius,
    }
}

/// Place a publication year on the time axis baseline
pub fn time_axis_mark(
    key: TimeAxisKey,
    time: &LinearScale,
    color: &str,
    config: &PlotConfig,
) -> TimeAxisMark {
    TimeAxisMark {
        key,
        cx: time.scale(key.year as f32) + config.margins.left,
        cy: config.margins.top + config.inner_height(),
        radius: config.point_radius,
        color: color.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
