//! Corpus trend view: one point per document, year against a chosen
//! similarity metric.
//!
//! Runs on the same reconcile/scale machinery as the alignment scatter, with
//! the corpus layout preset. The join is keyed by `(name, year)` so switching
//! metrics animates each document's point to its new height instead of
//! reassigning points positionally.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use wasm_bindgen::prelude::*;

use crate::dataset::loader::json_type_name;
use crate::dataset::{LoadError, RecordError, Year};
use crate::marks::{render_ops, ColorAssigner, RenderOp};
use crate::plot::config::{ConfigError, PlotConfig};
use crate::reconcile::{dedup_by_key, reconcile, DeltaStats};
use crate::scale::{extent, ticks_for, LinearScale, Tick, TickFormat};

/// The y axis re-describes itself slowly when the metric changes
pub const Y_AXIS_TRANSITION_MS: u32 = 1000;

pub const X_AXIS_LABEL: &str = "Year";
pub const Y_AXIS_LABEL: &str = "Similarity to other Documents";

// =============================================================================
// Records and keys
// =============================================================================

/// One document of `corpus.json` with its similarity metrics.
///
/// Any metric may be absent; a point only plots under metrics it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub name: String,
    pub year: Year,
    #[serde(default)]
    pub similarity_all: Option<f32>,
    #[serde(default)]
    pub similarity_earlier: Option<f32>,
    #[serde(default)]
    pub similarity_later: Option<f32>,
}

impl TrendPoint {
    pub fn key(&self) -> TrendKey {
        TrendKey {
            name: self.name.clone(),
            year: self.year,
        }
    }

    pub fn metric(&self, metric: SimilarityMetric) -> Option<f32> {
        match metric {
            SimilarityMetric::All => self.similarity_all,
            SimilarityMetric::Earlier => self.similarity_earlier,
            SimilarityMetric::Later => self.similarity_later,
        }
    }
}

/// Identity key for a trend point: `(name, year)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendKey {
    pub name: String,
    pub year: Year,
}

impl fmt::Display for TrendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.year)
    }
}

/// Which similarity column the y axis plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimilarityMetric {
    All,
    Earlier,
    Later,
}

impl SimilarityMetric {
    /// The payload field this metric reads
    pub fn field_name(&self) -> &'static str {
        match self {
            SimilarityMetric::All => "similarityAll",
            SimilarityMetric::Earlier => "similarityEarlier",
            SimilarityMetric::Later => "similarityLater",
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

// =============================================================================
// Marks and frames
// =============================================================================

/// One plotted document, carrying its name as the tooltip payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendMark {
    pub key: TrendKey,
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub color: String,
    pub name: String,
    pub year: Year,
    pub value: f32,
}

/// Position a document in the trend plot: x by year, y by metric value
pub fn trend_mark(
    point: &TrendPoint,
    value: f32,
    x: &LinearScale,
    y: &LinearScale,
    color: &str,
    config: &PlotConfig,
) -> TrendMark {
    TrendMark {
        key: point.key(),
        cx: x.scale(point.year as f32) + config.margins.left,
        cy: y.scale(value) + config.margins.top,
        radius: config.point_radius,
        color: color.to_string(),
        name: point.name.clone(),
        year: point.year,
        value,
    }
}

/// Counters for one trend render
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStats {
    pub records_in: usize,
    pub records_dropped: usize,
    pub points: DeltaStats,
    pub was_noop: bool,
    pub total_us: u64,
}

/// Everything the host needs to redraw the trend view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusFrame {
    pub metric: SimilarityMetric,
    pub points: Vec<RenderOp<TrendMark>>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub x_label: String,
    pub y_label: String,
    pub y_axis_transition_ms: u32,
}

/// Result of one load or metric switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusOutcome {
    pub frame: CorpusFrame,
    /// Points unusable under the active metric, plus duplicate keys
    pub record_errors: Vec<RecordError>,
    pub stats: TrendStats,
}

// =============================================================================
// CorpusEngine
// =============================================================================

/// The corpus trend engine
pub struct CorpusEngine {
    config: PlotConfig,
    points: Vec<TrendPoint>,
    metric: SimilarityMetric,
    marks: IndexMap<TrendKey, TrendMark>,
    colors: ColorAssigner<Year>,
    renders: u64,
}

impl Default for CorpusEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusEngine {
    pub fn new() -> Self {
        Self {
            config: PlotConfig::corpus(),
            points: Vec::new(),
            metric: SimilarityMetric::All,
            marks: IndexMap::new(),
            colors: ColorAssigner::new(),
            renders: 0,
        }
    }

    pub fn with_config(config: PlotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Replace the corpus dataset and render under the active metric.
    ///
    /// A payload that fails to parse leaves the previous dataset and marks in
    /// place.
    pub fn load_points(&mut self, payload_text: &str) -> Result<CorpusOutcome, LoadError> {
        let value: Value =
            serde_json::from_str(payload_text).map_err(|e| LoadError::Parse(e.to_string()))?;
        if !value.is_array() {
            return Err(LoadError::UnexpectedShape(format!(
                "expected array of trend points, got {}",
                json_type_name(&value)
            )));
        }
        let points: Vec<TrendPoint> =
            serde_json::from_value(value).map_err(|e| LoadError::Parse(e.to_string()))?;

        self.points = points;
        Ok(self.render())
    }

    /// Re-render the standing dataset under another metric
    pub fn switch_metric(&mut self, metric: SimilarityMetric) -> CorpusOutcome {
        self.metric = metric;
        self.render()
    }

    fn render(&mut self) -> CorpusOutcome {
        let started = instant::Instant::now();
        let mut record_errors = Vec::new();

        // A point without the active metric has no height on this axis
        let mut usable: Vec<(TrendPoint, f32)> = Vec::with_capacity(self.points.len());
        for (index, point) in self.points.iter().enumerate() {
            match point.metric(self.metric) {
                Some(value) if value.is_finite() => usable.push((point.clone(), value)),
                _ => record_errors.push(RecordError::malformed(index, self.metric.field_name())),
            }
        }

        let (unique, duplicates) =
            dedup_by_key(usable, |(point, _): &(TrendPoint, f32)| point.key());
        record_errors.extend(duplicates.iter().map(RecordError::duplicate));
        let records: Vec<(TrendPoint, f32)> =
            unique.into_iter().map(|(_, record)| record).collect();

        let x = LinearScale::new(
            extent(&records, |(point, _)| point.year as f32).unwrap_or((0.0, 0.0)),
            self.config.x_range(),
        );
        let y = LinearScale::new(
            extent(&records, |(_, value)| *value).unwrap_or((0.0, 0.0)),
            self.config.y_range(),
        );

        let mut next: IndexMap<TrendKey, TrendMark> = IndexMap::with_capacity(records.len());
        for (point, value) in &records {
            let color = self.colors.color_for(point.year);
            let mark = trend_mark(point, *value, &x, &y, color, &self.config);
            next.insert(mark.key.clone(), mark);
        }

        let marks_vec: Vec<TrendMark> = next.values().cloned().collect();
        let rec = reconcile(&self.marks, marks_vec, |mark: &TrendMark| mark.key.clone());
        let mut ops = render_ops(&rec.delta, &next, self.config.transition_ms);
        // This view drops exiting points without animating them
        for op in &mut ops {
            if let RenderOp::Exit { transition_ms, .. } = op {
                *transition_ms = 0;
            }
        }

        let stats = TrendStats {
            records_in: self.points.len(),
            records_dropped: record_errors.len(),
            points: rec.delta.stats(),
            was_noop: rec.delta.is_noop(),
            total_us: started.elapsed().as_micros() as u64,
        };

        self.marks = next;
        self.renders += 1;

        CorpusOutcome {
            frame: CorpusFrame {
                metric: self.metric,
                points: ops,
                x_ticks: ticks_for(&x, self.config.tick_count, TickFormat::Year),
                y_ticks: ticks_for(&y, self.config.tick_count, TickFormat::Decimal),
                x_label: X_AXIS_LABEL.to_string(),
                y_label: Y_AXIS_LABEL.to_string(),
                y_axis_transition_ms: Y_AXIS_TRANSITION_MS,
            },
            record_errors,
            stats,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub fn marks(&self) -> &IndexMap<TrendKey, TrendMark> {
        &self.marks
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }
}

// =============================================================================
// CorpusCortex (WASM bindings)
// =============================================================================

/// WASM facade over [`CorpusEngine`]
#[wasm_bindgen]
pub struct CorpusCortex {
    engine: CorpusEngine,
}

impl Default for CorpusCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl CorpusCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: CorpusEngine::new(),
        }
    }

    /// Build a cortex with a custom layout (JS binding)
    #[wasm_bindgen(js_name = withConfig)]
    pub fn js_with_config(config: JsValue) -> Result<CorpusCortex, JsValue> {
        let config: PlotConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?;
        let engine = CorpusEngine::with_config(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(CorpusCortex { engine })
    }

    /// Load corpus.json text and render under the active metric (JS binding)
    #[wasm_bindgen(js_name = loadPoints)]
    pub fn js_load_points(&mut self, payload_text: &str) -> Result<JsValue, JsValue> {
        let outcome = self
            .engine
            .load_points(payload_text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Re-render the standing dataset under another metric (JS binding)
    #[wasm_bindgen(js_name = switchMetric)]
    pub fn js_switch_metric(&mut self, metric: JsValue) -> Result<JsValue, JsValue> {
        let metric: SimilarityMetric = serde_wasm_bindgen::from_value(metric)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse metric: {}", e)))?;
        let outcome = self.engine.switch_metric(metric);
        serde_wasm_bindgen::to_value(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Active metric field name, e.g. "similarityAll"
    #[wasm_bindgen(js_name = activeMetric)]
    pub fn active_metric(&self) -> String {
        self.engine.metric().field_name().to_string()
    }

    /// Number of loaded corpus documents
    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.engine.point_count()
    }
}

impl CorpusCortex {
    /// The wrapped engine, for native callers
    pub fn engine(&self) -> &CorpusEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CorpusEngine {
        &mut self.engine
    }
}

// =============================================================================
// Tests
// =============================================================================
