//! Payload normalization for alignment files
//!
//! `<sourceId>_alignments.json` ships in two shapes: older files are a bare
//! JSON array of alignment records, newer ones wrap the array in a
//! `{"bookendYears": [y0, y1], "alignments": [...]}` envelope. Both normalize
//! to one canonical `AlignmentPayload` here.
//!
//! Validation is per record: a record missing a required field is dropped and
//! reported, it never aborts the load. Only unparseable JSON or an
//! unrecognized top-level shape fails the whole payload.

use serde_json::Value;

use super::error::{LoadError, RecordError};
use super::record::{Alignment, DocId, SegmentIndex, Similarity, Year};

// =============================================================================
// AlignmentPayload
// =============================================================================

/// Canonical form of one alignments file
#[derive(Debug, Clone, Default)]
pub struct AlignmentPayload {
    /// Valid records, in payload order
    pub alignments: Vec<Alignment>,
    /// Envelope bookend years, when the payload carried them
    pub bookend_years: Option<(Year, Year)>,
    /// Dropped-record reports, in payload order
    pub record_errors: Vec<RecordError>,
}

/// Parse and normalize an alignments payload.
///
/// Accepts both payload shapes. Malformed individual records are dropped into
/// `record_errors`; an empty record list is a valid payload (it renders as a
/// pure exit of everything on screen).
pub fn parse_alignments(text: &str) -> Result<AlignmentPayload, LoadError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))?;

    let (records, bookend_years) = match &value {
        Value::Array(records) => (records.as_slice(), None),
        Value::Object(envelope) => {
            let records = envelope
                .get("alignments")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    LoadError::UnexpectedShape(
                        "envelope has no 'alignments' array".to_string(),
                    )
                })?;
            (records.as_slice(), bookends_from(envelope.get("bookendYears")))
        }
        other => {
            return Err(LoadError::UnexpectedShape(format!(
                "expected array or envelope, got {}",
                json_type_name(other)
            )))
        }
    };

    let mut payload = AlignmentPayload {
        bookend_years,
        ..Default::default()
    };

    for (index, record) in records.iter().enumerate() {
        match alignment_from_value(record, index) {
            Ok(alignment) => payload.alignments.push(alignment),
            Err(err) => payload.record_errors.push(err),
        }
    }

    Ok(payload)
}

// =============================================================================
// Field extraction
// =============================================================================

fn alignment_from_value(value: &Value, index: usize) -> Result<Alignment, RecordError> {
    let obj = value
        .as_object()
        .ok_or_else(|| RecordError::malformed(index, "record"))?;

    let source_id = required_id(obj, "sourceId", index)?;
    let source_segment = required_id(obj, "sourceSegment", index)?;
    let similar_id = required_id(obj, "similarId", index)?;
    let similar_segment = required_id(obj, "similarSegment", index)?;

    let similarity = obj
        .get("similarity")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .ok_or_else(|| RecordError::malformed(index, "similarity"))?
        as Similarity;

    let similar_year = obj
        .get("similarYear")
        .and_then(Value::as_i64)
        .and_then(|y| Year::try_from(y).ok());

    Ok(Alignment {
        source_id,
        source_segment: source_segment as SegmentIndex,
        source_title: optional_text(obj, "sourceTitle"),
        similar_id,
        similar_segment: similar_segment as SegmentIndex,
        similar_title: optional_text(obj, "similarTitle"),
        similarity,
        similar_year,
    })
}

fn required_id(
    obj: &serde_json::Map<String, Value>,
    field: &str,
    index: usize,
) -> Result<DocId, RecordError> {
    obj.get(field)
        .and_then(Value::as_u64)
        .and_then(|v| DocId::try_from(v).ok())
        .ok_or_else(|| RecordError::malformed(index, field))
}

fn optional_text(obj: &serde_json::Map<String, Value>, field: &str) -> String {
    obj.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Read `[y0, y1]` bookends; anything else is treated as absent, never fatal
fn bookends_from(value: Option<&Value>) -> Option<(Year, Year)> {
    let pair = value?.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let y0 = pair[0].as_i64().and_then(|y| Year::try_from(y).ok())?;
    let y1 = pair[1].as_i64().and_then(|y| Year::try_from(y).ok())?;
    Some((y0, y1))
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Shape normalization
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_bare_array() {
        let text = r#"[
            {"sourceId":1,"sourceSegment":2,"similarId":2,"similarSegment":5,"similarity":0.8},
            {"sourceId":1,"sourceSegment":3,"similarId":3,"similarSegment":1,"similarity":0.4}
        ]"#;

        let payload = parse_alignments(text).unwrap();
        assert_eq!(payload.alignments.len(), 2);
        assert_eq!(payload.bookend_years, None);
        assert!(payload.record_errors.is_empty());
    }

    #[test]
    fn test_parse_envelope_with_bookends() {
        let text = r#"{
            "bookendYears": [1700, 1731],
            "alignments": [
                {"sourceId":1,"sourceSegment":2,"similarId":2,"similarSegment":5,
                 "similarity":0.8,"similarYear":1710}
            ]
        }"#;

        let payload = parse_alignments(text).unwrap();
        assert_eq!(payload.alignments.len(), 1);
        assert_eq!(payload.bookend_years, Some((1700, 1731)));
        assert_eq!(payload.alignments[0].similar_year, Some(1710));
    }

    #[test]
    fn test_parse_empty_array_is_valid() {
        let payload = parse_alignments("[]").unwrap();
        assert!(payload.alignments.is_empty());
        assert!(payload.record_errors.is_empty());
    }

    #[test]
    fn test_envelope_without_alignments_is_unexpected_shape() {
        let err = parse_alignments(r#"{"bookendYears":[1700,1731]}"#).unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedShape(_)));
    }

    #[test]
    fn test_scalar_payload_is_unexpected_shape() {
        let err = parse_alignments("42").unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedShape(_)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_alignments("{not json").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_malformed_bookends_are_treated_as_absent() {
        let text = r#"{
            "bookendYears": [1700],
            "alignments": []
        }"#;

        let payload = parse_alignments(text).unwrap();
        assert_eq!(payload.bookend_years, None);
    }

    // -------------------------------------------------------------------------
    // Per-record validation
    // -------------------------------------------------------------------------

    #[test]
    fn test_record_missing_similarity_is_dropped_and_reported() {
        let text = r#"[
            {"sourceId":1,"sourceSegment":2,"similarId":2,"similarSegment":5,"similarity":0.8},
            {"sourceId":1,"sourceSegment":3,"similarId":3,"similarSegment":1}
        ]"#;

        let payload = parse_alignments(text).unwrap();
        assert_eq!(payload.alignments.len(), 1);
        assert_eq!(
            payload.record_errors,
            vec![RecordError::malformed(1, "similarity")]
        );
    }

    #[test]
    fn test_record_with_wrong_id_type_is_dropped() {
        let text = r#"[
            {"sourceId":"one","sourceSegment":2,"similarId":2,"similarSegment":5,"similarity":0.8}
        ]"#;

        let payload = parse_alignments(text).unwrap();
        assert!(payload.alignments.is_empty());
        assert_eq!(
            payload.record_errors,
            vec![RecordError::malformed(0, "sourceId")]
        );
    }

    #[test]
    fn test_non_object_record_is_dropped() {
        let text = r#"[17]"#;

        let payload = parse_alignments(text).unwrap();
        assert_eq!(
            payload.record_errors,
            vec![RecordError::malformed(0, "record")]
        );
    }

    #[test]
    fn test_titles_default_empty_and_year_optional() {
        let text = r#"[
            {"sourceId":1,"sourceSegment":0,"similarId":2,"similarSegment":3,"similarity":0.5}
        ]"#;

        let payload = parse_alignments(text).unwrap();
        let a = &payload.alignments[0];
        assert_eq!(a.source_title, "");
        assert_eq!(a.similar_title, "");
        assert_eq!(a.similar_year, None);
    }

    #[test]
    fn test_valid_records_keep_payload_order() {
        let text = r#"[
            {"sourceId":1,"sourceSegment":9,"similarId":5,"similarSegment":0,"similarity":0.3},
            {"sourceId":1,"sourceSegment":1,"similarId":4,"similarSegment":2,"similarity":0.9},
            {"sourceId":1,"sourceSegment":4,"similarId":6,"similarSegment":7,"similarity":0.6}
        ]"#;

        let payload = parse_alignments(text).unwrap();
        let ids: Vec<DocId> = payload.alignments.iter().map(|a| a.similar_id).collect();
        assert_eq!(ids, vec![5, 4, 6]);
    }
}
