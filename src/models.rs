//! Core data models for csmetrics
//!
//! These models are shared by segmentation, the metric functions and the
//! reporters.

use serde::Serialize;

/// How a single tag is treated by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagClass {
    /// Member of the recognized language set (or any non-excluded tag
    /// when no language set is configured)
    Language,
    /// Member of the excluded set; transparent to switching
    Other,
    /// Neither; dropped when a language set is configured
    Unrecognized,
}

/// A maximal run of equal language tags
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub tag: String,
    pub length: usize,
}

impl Span {
    pub fn new(tag: impl Into<String>, length: usize) -> Self {
        Self {
            tag: tag.into(),
            length,
        }
    }
}

/// One row of the span summary table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SpanFrequency {
    pub tag: String,
    pub length: usize,
    pub frequency: usize,
}

/// Result of evaluating one metric on one tag sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    Count(usize),
    Spans(Vec<Span>),
    SpanSummary(Vec<SpanFrequency>),
    Switchpoints(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_ordering_is_tag_then_length() {
        let mut spans = vec![Span::new("HI", 1), Span::new("EN", 3), Span::new("EN", 1)];
        spans.sort();
        assert_eq!(
            spans,
            vec![Span::new("EN", 1), Span::new("EN", 3), Span::new("HI", 1)]
        );
    }

    #[test]
    fn test_untagged_serialization() {
        let json = serde_json::to_string(&MetricValue::Spans(vec![Span::new("EN", 2)]))
            .expect("serialize spans");
        assert_eq!(json, r#"[{"tag":"EN","length":2}]"#);
        let json = serde_json::to_string(&MetricValue::Count(4)).expect("serialize count");
        assert_eq!(json, "4");
    }
}
