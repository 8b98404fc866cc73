//! Selection context and detail panels
//!
//! Clicking a mark resolves it to its alignment and issues two independent
//! segment lookups against the external store, one per panel. The two texts
//! arrive in either order and fill their panels independently. Loading a new
//! dataset resets everything to the placeholder hint.
//!
//! Requests are tagged with the selection epoch they were issued under; a
//! response whose epoch no longer matches is stale and must be discarded, so
//! a late fetch for a previous selection can never overwrite the current one.

use serde::{Deserialize, Serialize};

use crate::dataset::{Alignment, DocId, SegmentIndex};

/// Placeholder shown in the detail area before any mark is clicked
pub const HINT_TEXT: &str = "Hint: You can click on the dots.";

// =============================================================================
// Segment requests
// =============================================================================

/// Which detail panel a segment request fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelSide {
    /// Left panel: the source document's segment
    Source,
    /// Right panel: the similar document's segment
    Similar,
}

/// One pending lookup against the external segment store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRequest {
    /// Selection epoch this request belongs to
    pub epoch: u64,
    pub side: PanelSide,
    pub document_id: DocId,
    pub segment: SegmentIndex,
}

impl SegmentRequest {
    /// Conventional store file for this document
    pub fn file_name(&self) -> String {
        format!("segments_{}.json", self.document_id)
    }
}

// =============================================================================
// Detail panels
// =============================================================================

/// Host-facing snapshot of the two text panels and title slots.
///
/// `hint` is `Some` only in the reset state; once a mark is selected the
/// titles take over and the hint clears.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPanels {
    pub title_left: String,
    pub title_right: String,
    pub text_left: String,
    pub text_right: String,
    pub hint: Option<String>,
}

impl DetailPanels {
    fn reset() -> Self {
        Self {
            hint: Some(HINT_TEXT.to_string()),
            ..Self::default()
        }
    }
}

// =============================================================================
// SelectionContext
// =============================================================================

/// The currently selected alignment plus its resolved segment texts
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionContext {
    pub alignment: Option<Alignment>,
    pub source_text: Option<String>,
    pub similar_text: Option<String>,
}

impl SelectionContext {
    /// Back to the no-selection state (new dataset loaded)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Select an alignment; texts start unresolved
    pub fn select(&mut self, alignment: Alignment) {
        self.alignment = Some(alignment);
        self.source_text = None;
        self.similar_text = None;
    }

    /// Fill one panel's text as its fetch resolves
    pub fn resolve(&mut self, side: PanelSide, text: String) {
        match side {
            PanelSide::Source => self.source_text = Some(text),
            PanelSide::Similar => self.similar_text = Some(text),
        }
    }

    /// Panel snapshot for the host
    pub fn panels(&self) -> DetailPanels {
        match &self.alignment {
            None => DetailPanels::reset(),
            Some(alignment) => DetailPanels {
                title_left: alignment.source_title.clone(),
                title_right: alignment.similar_title.clone(),
                text_left: self.source_text.clone().unwrap_or_default(),
                text_right: self.similar_text.clone().unwrap_or_default(),
                hint: None,
            },
        }
    }
}

// =============================================================================
// Boundary results
// =============================================================================

/// Result of selecting a mark: new panel state plus the two lookups to run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionUpdate {
    pub panels: DetailPanels,
    pub requests: Vec<SegmentRequest>,
}

/// Result of delivering one segment response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelUpdate {
    pub panels: DetailPanels,
    /// The response belonged to a superseded selection and was discarded
    pub stale: bool,
    /// Failure note for this request, when the store lookup went wrong
    pub error: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn alignment() -> Alignment {
        Alignment {
            source_id: 1,
            source_segment: 2,
            source_title: "An Essay upon Projects".to_string(),
            similar_id: 2,
            similar_segment: 5,
            similar_title: "Jure Divino".to_string(),
            similarity: 0.8,
            similar_year: Some(1706),
        }
    }

    #[test]
    fn test_reset_panels_carry_the_hint() {
        let context = SelectionContext::default();
        let panels = context.panels();

        assert_eq!(panels.hint.as_deref(), Some(HINT_TEXT));
        assert_eq!(panels.title_left, "");
        assert_eq!(panels.text_right, "");
    }

    #[test]
    fn test_select_fills_titles_and_clears_hint() {
        let mut context = SelectionContext::default();
        context.select(alignment());
        let panels = context.panels();

        assert_eq!(panels.title_left, "An Essay upon Projects");
        assert_eq!(panels.title_right, "Jure Divino");
        assert_eq!(panels.hint, None);
        assert_eq!(panels.text_left, "");
    }

    #[test]
    fn test_panels_fill_independently_in_any_order() {
        let mut context = SelectionContext::default();
        context.select(alignment());

        context.resolve(PanelSide::Similar, "similar passage".to_string());
        assert_eq!(context.panels().text_right, "similar passage");
        assert_eq!(context.panels().text_left, "");

        context.resolve(PanelSide::Source, "source passage".to_string());
        assert_eq!(context.panels().text_left, "source passage");
        assert_eq!(context.panels().text_right, "similar passage");
    }

    #[test]
    fn test_reselect_clears_previous_texts() {
        let mut context = SelectionContext::default();
        context.select(alignment());
        context.resolve(PanelSide::Source, "old text".to_string());

        context.select(alignment());
        assert_eq!(context.panels().text_left, "");
    }

    #[test]
    fn test_segment_request_file_name() {
        let request = SegmentRequest {
            epoch: 1,
            side: PanelSide::Similar,
            document_id: 12,
            segment: 5,
        };
        assert_eq!(request.file_name(), "segments_12.json");
    }
}
