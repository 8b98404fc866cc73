//! Alignment records and their identity keys
//!
//! An `Alignment` is one observed correspondence between a segment of the
//! source document and a segment of a similar document, as emitted by the
//! external reuse-detection pipeline. Identity keys are derived only from
//! semantic fields (never array position) so a mark keeps its identity when
//! the backing array is reordered between loads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type aliases for clarity
pub type DocId = u32;
pub type SegmentIndex = u32;
pub type Year = i32;
pub type Similarity = f32;

// =============================================================================
// Alignment
// =============================================================================

/// One source-segment/similar-segment correspondence with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    pub source_id: DocId,
    pub source_segment: SegmentIndex,
    #[serde(default)]
    pub source_title: String,
    pub similar_id: DocId,
    pub similar_segment: SegmentIndex,
    #[serde(default)]
    pub similar_title: String,
    pub similarity: Similarity,
    /// Publication year of the similar document (absent in older payloads)
    #[serde(default)]
    pub similar_year: Option<Year>,
}

impl Alignment {
    /// Identity key for this alignment
    pub fn key(&self) -> AlignmentKey {
        AlignmentKey::of(self)
    }
}

// =============================================================================
// Identity Keys
// =============================================================================

/// Identity key for a scatter mark: `(sourceId, similarId, similarity)`.
///
/// The similarity score participates via its bit pattern so the key is
/// `Eq + Hash` without comparing floats. Two alignments between the same
/// document pair with an identical score collide under this key; the load
/// path keeps the first and reports a duplicate-key record error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentKey {
    pub source_id: DocId,
    pub similar_id: DocId,
    pub similarity_bits: u32,
}

impl AlignmentKey {
    pub fn of(alignment: &Alignment) -> Self {
        Self {
            source_id: alignment.source_id,
            similar_id: alignment.similar_id,
            similarity_bits: alignment.similarity.to_bits(),
        }
    }

    /// Recover the similarity score carried in the key
    pub fn similarity(&self) -> Similarity {
        Similarity::from_bits(self.similarity_bits)
    }
}

impl fmt::Display for AlignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}~{}@{:.4}",
            self.source_id,
            self.similar_id,
            self.similarity()
        )
    }
}

/// Identity key for a time-axis mark: `(similarId, year)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAxisKey {
    pub similar_id: DocId,
    pub year: Year,
}

impl fmt::Display for TimeAxisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.similar_id, self.year)
    }
}

// =============================================================================
// DocumentSummary
// =============================================================================

/// One entry of the corpus document list (`dropdown.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: DocId,
    pub name: String,
    pub year: Year,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn alignment(source_id: DocId, similar_id: DocId, similarity: Similarity) -> Alignment {
        Alignment {
            source_id,
            source_segment: 0,
            source_title: String::new(),
            similar_id,
            similar_segment: 0,
            similar_title: String::new(),
            similarity,
            similar_year: None,
        }
    }

    #[test]
    fn test_key_ignores_segments_and_titles() {
        let mut a = alignment(1, 2, 0.8);
        a.source_segment = 4;
        a.similar_title = "An Essay upon Projects".to_string();
        let mut b = alignment(1, 2, 0.8);
        b.source_segment = 9;

        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_key_distinguishes_scores() {
        let a = alignment(1, 2, 0.8);
        let b = alignment(1, 2, 0.80001);

        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_key_round_trips_similarity() {
        let a = alignment(1, 2, 0.4375);
        assert_eq!(a.key().similarity(), 0.4375);
    }

    #[test]
    fn test_alignment_json_field_names_are_camel_case() {
        let json = r#"{
            "sourceId": 7,
            "sourceSegment": 2,
            "sourceTitle": "The True-Born Englishman",
            "similarId": 12,
            "similarSegment": 5,
            "similarTitle": "Jure Divino",
            "similarity": 0.82,
            "similarYear": 1706
        }"#;

        let a: Alignment = serde_json::from_str(json).unwrap();
        assert_eq!(a.source_id, 7);
        assert_eq!(a.similar_segment, 5);
        assert_eq!(a.similar_year, Some(1706));
    }

    #[test]
    fn test_titles_and_year_default_when_absent() {
        let json = r#"{
            "sourceId": 1,
            "sourceSegment": 0,
            "similarId": 2,
            "similarSegment": 3,
            "similarity": 0.5
        }"#;

        let a: Alignment = serde_json::from_str(json).unwrap();
        assert_eq!(a.source_title, "");
        assert_eq!(a.similar_year, None);
    }
}
