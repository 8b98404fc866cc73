//! PlotEngine: the visualization state machine
//!
//! Owns the whole rendered view state: the three keyed mark maps
//! (scatter, legend, time axis), the palette assignments, the current
//! source document, the selection context, and the epoch counters that guard
//! against out-of-order responses. No globals; independent chart instances
//! coexist freely.
//!
//! One load is one pass: normalize the payload, reconcile each mark family
//! against what is on screen, emit a `RenderFrame` of ops and ticks, then
//! replace the rendered state wholesale. A failed load returns early and the
//! previous frame stays untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::{
    parse_alignments, Alignment, AlignmentKey, DocId, DocumentSummary, LoadError,
    RecordError, TimeAxisKey, Year,
};
use crate::marks::{
    build_legend, render_ops, scatter_mark, time_axis_mark, visible_years, ColorAssigner,
    LegendMark, RenderOp, ScatterMark, TimeAxisMark,
};
use crate::plot::config::{ConfigError, PlotConfig};
use crate::plot::selection::{
    DetailPanels, PanelSide, PanelUpdate, SegmentRequest, SelectionContext, SelectionUpdate,
};
use crate::plot::timeline::build_time_axis;
use crate::reconcile::{dedup_by_key, reconcile, DeltaStats};
use crate::scale::{extent, ticks_for, LinearScale, Tick, TickFormat};

// =============================================================================
// Load results
// =============================================================================

/// Handle for one in-flight payload fetch.
///
/// Issued when the host starts fetching; a ticket from a superseded load no
/// longer matches the engine's epoch and its payload is discarded on
/// delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTicket {
    pub source_id: DocId,
    pub epoch: u64,
}

/// Counters and timings for one load pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    /// Records in the payload, valid or not
    pub records_in: usize,
    /// Records dropped as malformed or duplicate
    pub records_dropped: usize,
    pub scatter: DeltaStats,
    pub legend: DeltaStats,
    pub time_axis: DeltaStats,
    /// True when the reload changed nothing (no enters, no exits, anywhere)
    pub was_noop: bool,
    pub total_us: u64,
}

/// Everything the host needs to redraw after one load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub source_id: DocId,
    pub scatter: Vec<RenderOp<ScatterMark>>,
    pub legend: Vec<RenderOp<LegendMark>>,
    pub time_axis: Vec<RenderOp<TimeAxisMark>>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub time_ticks: Vec<Tick>,
    /// Reset panel state (selection clears on every load)
    pub panels: DetailPanels,
}

/// Result of delivering one payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutcome {
    /// The ticket was superseded; nothing changed and `frame` is `None`
    pub stale: bool,
    pub frame: Option<RenderFrame>,
    /// Dropped-record reports (malformed fields, duplicate keys)
    pub record_errors: Vec<RecordError>,
    pub stats: LoadStats,
}

/// Snapshot of everything currently on screen, for hosts that redraw from
/// scratch (re-attach, resize) instead of replaying the last frame's ops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleMarks {
    pub scatter: Vec<ScatterMark>,
    pub legend: Vec<LegendMark>,
    pub time_axis: Vec<TimeAxisMark>,
}

/// Lifetime counters for one engine instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub loads: u64,
    pub stale_payloads_discarded: u64,
    pub stale_segments_discarded: u64,
}

// =============================================================================
// SelectError
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SelectError {
    /// The key resolves to no rendered mark (stale key or never rendered)
    UnknownMark(String),
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::UnknownMark(key) => {
                write!(f, "No rendered mark for key {}", key)
            }
        }
    }
}

impl std::error::Error for SelectError {}

// =============================================================================
// PlotEngine
// =============================================================================

/// The alignment scatterplot engine
pub struct PlotEngine {
    config: PlotConfig,
    // Corpus knowledge
    summaries: IndexMap<DocId, DocumentSummary>,
    corpus_bookends: Option<(Year, Year)>,
    // Rendered state, replaced wholesale per load
    scatter: IndexMap<AlignmentKey, ScatterMark>,
    legend: IndexMap<DocId, LegendMark>,
    time_axis: IndexMap<TimeAxisKey, TimeAxisMark>,
    alignments: Vec<Alignment>,
    current_source: Option<DocId>,
    // Survives across loads
    colors: ColorAssigner<DocId>,
    // Interaction state
    selection: SelectionContext,
    load_epoch: u64,
    selection_epoch: u64,
    stats: EngineStats,
}

impl Default for PlotEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotEngine {
    pub fn new() -> Self {
        Self {
            config: PlotConfig::default(),
            summaries: IndexMap::new(),
            corpus_bookends: None,
            scatter: IndexMap::new(),
            legend: IndexMap::new(),
            time_axis: IndexMap::new(),
            alignments: Vec::new(),
            current_source: None,
            colors: ColorAssigner::new(),
            selection: SelectionContext::default(),
            load_epoch: 0,
            selection_epoch: 0,
            stats: EngineStats::default(),
        }
    }

    pub fn with_config(config: PlotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Hydrate the corpus document list: selector entries and time-axis bookends
    pub fn hydrate_documents(&mut self, documents: Vec<DocumentSummary>) {
        for doc in documents {
            self.summaries.insert(doc.id, doc);
        }
        self.corpus_bookends = self
            .summaries
            .values()
            .map(|s| s.year)
            .fold(None, |acc, year| match acc {
                None => Some((year, year)),
                Some((min, max)) => Some((min.min(year), max.max(year))),
            });
    }

    /// Start a load; any previously issued ticket becomes stale
    pub fn begin_load(&mut self, source_id: DocId) -> LoadTicket {
        self.load_epoch += 1;
        LoadTicket {
            source_id,
            epoch: self.load_epoch,
        }
    }

    /// Single-shot load for hosts that fetch synchronously
    pub fn load_alignments(
        &mut self,
        source_id: DocId,
        payload_text: &str,
    ) -> Result<LoadOutcome, LoadError> {
        let ticket = self.begin_load(source_id);
        self.deliver_payload(&ticket, payload_text)
    }

    /// Deliver a fetched payload for a ticket.
    ///
    /// A stale ticket is discarded without touching rendered state. A payload
    /// that fails to parse returns `Err` and also leaves everything in place:
    /// the previous frame stays on screen until a valid replacement arrives.
    pub fn deliver_payload(
        &mut self,
        ticket: &LoadTicket,
        payload_text: &str,
    ) -> Result<LoadOutcome, LoadError> {
        let started = instant::Instant::now();

        if ticket.epoch != self.load_epoch {
            self.stats.stale_payloads_discarded += 1;
            return Ok(LoadOutcome {
                stale: true,
                frame: None,
                record_errors: Vec::new(),
                stats: LoadStats {
                    total_us: started.elapsed().as_micros() as u64,
                    ..LoadStats::default()
                },
            });
        }

        let payload = parse_alignments(payload_text)?;
        let records_in = payload.alignments.len() + payload.record_errors.len();
        let mut record_errors = payload.record_errors;

        // Keep-first deduplication under the identity key
        let (unique, duplicates) =
            dedup_by_key(payload.alignments, |a: &Alignment| a.key());
        record_errors.extend(duplicates.iter().map(RecordError::duplicate));
        let records: Vec<Alignment> = unique.into_iter().map(|(_, a)| a).collect();

        // Scales from the current record extents
        let x = LinearScale::new(
            extent(&records, |a| a.source_segment as f32).unwrap_or((0.0, 0.0)),
            self.config.x_range(),
        );
        let y = LinearScale::new(
            extent(&records, |a| a.similarity).unwrap_or((0.0, 0.0)),
            self.config.y_range(),
        );

        // Scatter marks in record order; palette slots assigned on first sight
        let mut next_scatter: IndexMap<AlignmentKey, ScatterMark> =
            IndexMap::with_capacity(records.len());
        for alignment in &records {
            let color = self.colors.color_for(alignment.similar_id);
            let mark = scatter_mark(alignment, &x, &y, color, &self.config);
            next_scatter.insert(mark.key, mark);
        }
        let scatter_rec = reconcile(&self.scatter, records.clone(), |a| a.key());
        let scatter_ops =
            render_ops(&scatter_rec.delta, &next_scatter, self.config.transition_ms);

        // Legend rows, source entry first
        let legend_rows =
            build_legend(&records, &self.summaries, &mut self.colors, &self.config);
        let next_legend: IndexMap<DocId, LegendMark> = legend_rows
            .iter()
            .map(|row| (row.similar_id, row.clone()))
            .collect();
        let legend_rec =
            reconcile(&self.legend, legend_rows, |row: &LegendMark| row.similar_id);
        let legend_ops =
            render_ops(&legend_rec.delta, &next_legend, self.config.transition_ms);

        // Time axis: bookends from the envelope, else from the corpus list
        let years = visible_years(&records);
        let bookends = payload.bookend_years.or(self.corpus_bookends);
        let (time_marks, time_ticks) =
            match build_time_axis(bookends, &years, &self.config) {
                Some(axis) => {
                    let marks: Vec<TimeAxisMark> = years
                        .iter()
                        .map(|&(similar_id, year)| {
                            let key = TimeAxisKey { similar_id, year };
                            let color = self.colors.color_for(similar_id);
                            time_axis_mark(key, &axis.scale, color, &self.config)
                        })
                        .collect();
                    (marks, axis.ticks)
                }
                None => (Vec::new(), Vec::new()),
            };
        let next_time: IndexMap<TimeAxisKey, TimeAxisMark> = time_marks
            .iter()
            .map(|mark| (mark.key, mark.clone()))
            .collect();
        let time_rec =
            reconcile(&self.time_axis, time_marks, |mark: &TimeAxisMark| mark.key);
        let time_ops =
            render_ops(&time_rec.delta, &next_time, self.config.transition_ms);

        let stats = LoadStats {
            records_in,
            records_dropped: record_errors.len(),
            scatter: scatter_rec.delta.stats(),
            legend: legend_rec.delta.stats(),
            time_axis: time_rec.delta.stats(),
            was_noop: scatter_rec.delta.is_noop()
                && legend_rec.delta.is_noop()
                && time_rec.delta.is_noop(),
            total_us: started.elapsed().as_micros() as u64,
        };

        // Replace rendered state wholesale and clear the selection
        self.scatter = next_scatter;
        self.legend = next_legend;
        self.time_axis = next_time;
        self.alignments = records;
        self.current_source = Some(ticket.source_id);
        self.selection.reset();
        self.selection_epoch += 1;
        self.stats.loads += 1;

        Ok(LoadOutcome {
            stale: false,
            frame: Some(RenderFrame {
                source_id: ticket.source_id,
                scatter: scatter_ops,
                legend: legend_ops,
                time_axis: time_ops,
                x_ticks: ticks_for(&x, self.config.tick_count, TickFormat::IntegerOnly),
                y_ticks: ticks_for(&y, self.config.tick_count, TickFormat::Decimal),
                time_ticks,
                panels: self.selection.panels(),
            }),
            record_errors,
            stats,
        })
    }

    /// Activate the mark under a key and issue its two segment lookups
    pub fn select_mark(&mut self, key: &AlignmentKey) -> Result<SelectionUpdate, SelectError> {
        let alignment = self
            .scatter
            .get(key)
            .map(|mark| mark.alignment.clone())
            .ok_or_else(|| SelectError::UnknownMark(key.to_string()))?;

        self.selection_epoch += 1;
        self.selection.select(alignment.clone());

        let requests = vec![
            SegmentRequest {
                epoch: self.selection_epoch,
                side: PanelSide::Source,
                document_id: alignment.source_id,
                segment: alignment.source_segment,
            },
            SegmentRequest {
                epoch: self.selection_epoch,
                side: PanelSide::Similar,
                document_id: alignment.similar_id,
                segment: alignment.similar_segment,
            },
        ];

        Ok(SelectionUpdate {
            panels: self.selection.panels(),
            requests,
        })
    }

    /// Deliver one resolved segment text. Stale responses are discarded.
    pub fn resolve_segment(&mut self, request: &SegmentRequest, text: &str) -> PanelUpdate {
        if request.epoch != self.selection_epoch {
            self.stats.stale_segments_discarded += 1;
            return PanelUpdate {
                panels: self.selection.panels(),
                stale: true,
                error: None,
            };
        }
        self.selection.resolve(request.side, text.to_string());
        PanelUpdate {
            panels: self.selection.panels(),
            stale: false,
            error: None,
        }
    }

    /// Deliver a whole `segments_<id>.json` store file and index the
    /// requested passage out of it. Parse and lookup failures degrade to a
    /// failed panel, never an aborted selection.
    pub fn resolve_segment_store(
        &mut self,
        request: &SegmentRequest,
        store_json: &str,
    ) -> PanelUpdate {
        if request.epoch != self.selection_epoch {
            self.stats.stale_segments_discarded += 1;
            return PanelUpdate {
                panels: self.selection.panels(),
                stale: true,
                error: None,
            };
        }

        let segments: Vec<String> = match serde_json::from_str(store_json) {
            Ok(segments) => segments,
            Err(e) => {
                return PanelUpdate {
                    panels: self.selection.panels(),
                    stale: false,
                    error: Some(format!("Segment store parse failed: {}", e)),
                }
            }
        };

        match segments.get(request.segment as usize) {
            Some(text) => {
                self.selection.resolve(request.side, text.clone());
                PanelUpdate {
                    panels: self.selection.panels(),
                    stale: false,
                    error: None,
                }
            }
            None => PanelUpdate {
                panels: self.selection.panels(),
                stale: false,
                error: Some(format!(
                    "No segment {} in {}",
                    request.segment,
                    request.file_name()
                )),
            },
        }
    }

    /// Record a failed segment fetch; the panel stays empty, the view stays up
    pub fn fail_segment(&mut self, request: &SegmentRequest, message: &str) -> PanelUpdate {
        if request.epoch != self.selection_epoch {
            self.stats.stale_segments_discarded += 1;
            return PanelUpdate {
                panels: self.selection.panels(),
                stale: true,
                error: None,
            };
        }
        PanelUpdate {
            panels: self.selection.panels(),
            stale: false,
            error: Some(message.to_string()),
        }
    }

    /// Drop the selection and show the placeholder hint again
    pub fn clear_selection(&mut self) -> DetailPanels {
        self.selection_epoch += 1;
        self.selection.reset();
        self.selection.panels()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn current_source(&self) -> Option<DocId> {
        self.current_source
    }

    pub fn document_count(&self) -> usize {
        self.summaries.len()
    }

    pub fn scatter_marks(&self) -> &IndexMap<AlignmentKey, ScatterMark> {
        &self.scatter
    }

    pub fn legend_marks(&self) -> &IndexMap<DocId, LegendMark> {
        &self.legend
    }

    pub fn time_axis_marks(&self) -> &IndexMap<TimeAxisKey, TimeAxisMark> {
        &self.time_axis
    }

    /// Clone the rendered mark sets in their on-screen order
    pub fn visible_marks(&self) -> VisibleMarks {
        VisibleMarks {
            scatter: self.scatter.values().cloned().collect(),
            legend: self.legend.values().cloned().collect(),
            time_axis: self.time_axis.values().cloned().collect(),
        }
    }

    pub fn selection(&self) -> &SelectionContext {
        &self.selection
    }

    pub fn engine_stats(&self) -> &EngineStats {
        &self.stats
    }
}

// =============================================================================
// Tests
// =============================================================================
