//! Error taxonomy for the metrics engine
//!
//! Every engine operation either returns a value or fails with one of
//! these kinds. Only [`MetricError::Configuration`] is fatal for a batch;
//! the others are per-record diagnostics.

use crate::metrics::MetricKind;
use thiserror::Error;

/// Errors raised by segmentation, metric evaluation and configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("{metric}: empty input (needs at least {required} language-tagged token(s))")]
    EmptyInput { metric: MetricKind, required: usize },

    #[error("{metric}: degenerate input ({reason})")]
    DegenerateInput { metric: MetricKind, reason: String },

    #[error("Unknown metric '{0}'. Run `csmetrics list` for valid names")]
    UnknownMetric(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl MetricError {
    pub(crate) fn empty(metric: MetricKind, required: usize) -> Self {
        MetricError::EmptyInput { metric, required }
    }

    pub(crate) fn degenerate(metric: MetricKind, reason: impl Into<String>) -> Self {
        MetricError::DegenerateInput {
            metric,
            reason: reason.into(),
        }
    }

    /// Stable snake_case name of the error kind (used in JSON output)
    pub fn kind(&self) -> &'static str {
        match self {
            MetricError::EmptyInput { .. } => "empty_input",
            MetricError::DegenerateInput { .. } => "degenerate_input",
            MetricError::UnknownMetric(_) => "unknown_metric",
            MetricError::Configuration(_) => "configuration",
        }
    }

    /// Whether the error must abort a batch before any record is processed
    pub fn is_fatal(&self) -> bool {
        matches!(self, MetricError::Configuration(_))
    }
}

pub type MetricResult<T> = Result<T, MetricError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MetricError::empty(MetricKind::IIndex, 2);
        assert_eq!(
            err.to_string(),
            "I-metric: empty input (needs at least 2 language-tagged token(s))"
        );

        let err = MetricError::empty(MetricKind::Cmi, 1);
        assert_eq!(
            err.to_string(),
            "CMI: empty input (needs at least 1 language-tagged token(s))"
        );

        let err = MetricError::degenerate(MetricKind::Burstiness, "fewer than 2 spans");
        assert_eq!(err.to_string(), "Burstiness: degenerate input (fewer than 2 spans)");
    }

    #[test]
    fn test_kind_and_fatality() {
        assert_eq!(MetricError::UnknownMetric("x".into()).kind(), "unknown_metric");
        assert!(!MetricError::UnknownMetric("x".into()).is_fatal());
        assert!(MetricError::Configuration("overlap".into()).is_fatal());
        assert!(!MetricError::empty(MetricKind::Memory, 1).is_fatal());
    }
}
