//! Tick generation and label formatting
//!
//! Segment and similarity axes use "nice" linear ticks on the 1/2/5 step
//! ladder. Axes carrying integer quantities (segment index, year) suppress
//! fractional tick labels instead of rounding them, so a domain like 0..3
//! never shows "1.5" as if it were a real segment. The time axis bypasses
//! tick generation entirely with an explicit value set, because year ticks
//! must align exactly with plotted points.

use serde::{Deserialize, Serialize};

use super::linear::LinearScale;

/// Target tick count for auto-generated axes (the d3 default)
pub const DEFAULT_TICK_COUNT: usize = 10;

// =============================================================================
// Tick
// =============================================================================

/// One axis tick: data value, pixel position, optional label.
///
/// `label` is `None` when the axis format suppresses this value (fractional
/// value on an integer-only axis); the tick line still renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub value: f32,
    pub position: f32,
    pub label: Option<String>,
}

/// Label policy for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TickFormat {
    /// Decimal label with precision chosen from the step size
    Decimal,
    /// Integer labels only; fractional tick values get no label
    IntegerOnly,
    /// Plain integer rendering of year values
    Year,
}

// =============================================================================
// Tick value generation
// =============================================================================

/// Compute "nice" tick values and the step between them for an axis range
pub fn nice_ticks(min: f32, max: f32, target_count: usize) -> (Vec<f32>, f32) {
    let range = max - min;
    if range.abs() < 1e-10 || target_count == 0 {
        return (vec![], 1.0);
    }
    let rough_step = range / target_count as f32;
    let mag = 10.0f32.powf(rough_step.log10().floor());
    let normalized = rough_step / mag;
    let nice_step = if normalized < 1.5 {
        mag
    } else if normalized < 3.5 {
        mag * 2.0
    } else if normalized < 7.5 {
        mag * 5.0
    } else {
        mag * 10.0
    };
    let start = (min / nice_step).ceil() * nice_step;
    let mut ticks = Vec::new();
    let mut v = start;
    while v <= max + nice_step * 0.01 {
        if v >= min - nice_step * 0.01 {
            ticks.push(v);
        }
        v += nice_step;
    }
    (ticks, nice_step)
}

/// Format a tick value with decimal places appropriate to the step
fn decimal_label(v: f32, step: f32) -> String {
    if step >= 0.95 {
        format!("{:.0}", v)
    } else if step >= 0.095 {
        format!("{:.1}", v)
    } else if step >= 0.0095 {
        format!("{:.2}", v)
    } else {
        format!("{:.3}", v)
    }
}

/// Integer label, or `None` for a fractional value (suppressed, not rounded)
pub fn integer_label(value: f32) -> Option<String> {
    if value.floor() != value {
        return None;
    }
    Some(format!("{:.0}", value))
}

fn label_for(value: f32, step: f32, format: TickFormat) -> Option<String> {
    match format {
        TickFormat::Decimal => Some(decimal_label(value, step)),
        TickFormat::IntegerOnly => integer_label(value),
        TickFormat::Year => Some(format!("{:.0}", value)),
    }
}

// =============================================================================
// Axis tick sets
// =============================================================================

/// Auto-generated ticks for a scale, positioned and labeled
pub fn ticks_for(scale: &LinearScale, target_count: usize, format: TickFormat) -> Vec<Tick> {
    let (d0, d1) = scale.domain;
    let (values, step) = nice_ticks(d0, d1, target_count);
    values
        .into_iter()
        .map(|value| Tick {
            value,
            position: scale.scale(value),
            label: label_for(value, step, format),
        })
        .collect()
}

/// Explicitly chosen tick values (time axis), positioned and labeled.
/// Values are used exactly as given, in the given order.
pub fn explicit_ticks(scale: &LinearScale, values: &[f32], format: TickFormat) -> Vec<Tick> {
    values
        .iter()
        .map(|&value| Tick {
            value,
            position: scale.scale(value),
            label: label_for(value, 1.0, format),
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
