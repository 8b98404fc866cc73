//! Legend assembly
//!
//! One row per distinct similar document, ordered by first appearance in the
//! record list (keep-first deduplication).
//! The source document itself is injected as entry zero with its own
//! publication year, so the legend reads source-first. An empty record set
//! produces an empty legend.

use indexmap::IndexMap;

use crate::dataset::{Alignment, DocId, DocumentSummary, Year};
use crate::marks::palette::ColorAssigner;
use crate::marks::scene::{legend_mark, LegendMark};
use crate::plot::config::PlotConfig;
use crate::reconcile::dedup_by_key;

/// Build the legend rows for the current alignment set.
///
/// Labels prefer the record's title and fall back to the hydrated corpus
/// summary; a similar document equal to the source is not listed twice.
pub fn build_legend(
    alignments: &[Alignment],
    summaries: &IndexMap<DocId, DocumentSummary>,
    colors: &mut ColorAssigner<DocId>,
    config: &PlotConfig,
) -> Vec<LegendMark> {
    if alignments.is_empty() {
        return Vec::new();
    }

    let source_id = alignments[0].source_id;
    let mut rows = Vec::new();

    let source_label = pick_label(&alignments[0].source_title, source_id, summaries);
    let source_year = summaries.get(&source_id).map(|s| s.year);
    let source_color = colors.color_for(source_id);
    rows.push(legend_mark(
        source_id,
        &source_label,
        source_year,
        0,
        source_color,
        config,
    ));

    let (unique, _duplicates) =
        dedup_by_key(alignments.to_vec(), |a: &Alignment| a.similar_id);

    for (similar_id, alignment) in unique {
        if similar_id == source_id {
            continue;
        }
        let label = pick_label(&alignment.similar_title, similar_id, summaries);
        let year = alignment
            .similar_year
            .or_else(|| summaries.get(&similar_id).map(|s| s.year));
        let color = colors.color_for(similar_id);
        let row = rows.len();
        rows.push(legend_mark(similar_id, &label, year, row, color, config));
    }

    rows
}

fn pick_label(
    title: &str,
    id: DocId,
    summaries: &IndexMap<DocId, DocumentSummary>,
) -> String {
    if !title.is_empty() {
        return title.to_string();
    }
    match summaries.get(&id) {
        Some(summary) => summary.name.clone(),
        None => format!("Document {}", id),
    }
}

/// Years of the currently visible similar documents, one per distinct
/// `similarId`, first-appearance order
pub fn visible_years(alignments: &[Alignment]) -> Vec<(DocId, Year)> {
    let (unique, _) = dedup_by_key(alignments.to_vec(), |a: &Alignment| a.similar_id);
    unique
        .into_iter()
        .filter_map(|(id, a)| a.similar_year.map(|year| (id, year)))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
