//! Span-based metrics and tables: burstiness, memory, spans, span summary,
//! switchpoints

use super::{language_tokens, stats, MetricKind};
use crate::config::EngineConfig;
use crate::error::{MetricError, MetricResult};
use crate::models::{Span, SpanFrequency};
use crate::segment;

fn span_lengths(spans: &[Span]) -> Vec<f64> {
    spans.iter().map(|s| s.length as f64).collect()
}

/// Burstiness of span lengths: `(σ - μ) / (σ + μ)`, population σ.
///
/// Needs at least two spans.
pub fn burstiness<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<f64> {
    let filtered = language_tokens(MetricKind::Burstiness, tags, config, 1)?;
    let lengths = span_lengths(&segment::spans_of(&filtered));
    if lengths.len() < 2 {
        return Err(MetricError::degenerate(
            MetricKind::Burstiness,
            format!("{} span(s), at least 2 needed", lengths.len()),
        ));
    }
    let mean = stats::mean(&lengths);
    let sd = stats::std_dev(&lengths);
    // every span has length >= 1, so mean > 0
    Ok((sd - mean) / (sd + mean))
}

/// Memory: lag-1 autocorrelation of span lengths.
///
/// `μ₁, σ₁` come from all spans but the last, `μ₂, σ₂` from all but the
/// first. Needs at least three spans and non-constant lengths on both sides.
pub fn memory<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<f64> {
    let filtered = language_tokens(MetricKind::Memory, tags, config, 1)?;
    let lengths = span_lengths(&segment::spans_of(&filtered));
    if lengths.len() < 3 {
        return Err(MetricError::degenerate(
            MetricKind::Memory,
            format!("{} span(s), at least 3 needed", lengths.len()),
        ));
    }

    let head = &lengths[..lengths.len() - 1];
    let tail = &lengths[1..];
    let (mean1, sd1) = (stats::mean(head), stats::std_dev(head));
    let (mean2, sd2) = (stats::mean(tail), stats::std_dev(tail));
    if sd1 == 0.0 || sd2 == 0.0 {
        return Err(MetricError::degenerate(
            MetricKind::Memory,
            "span lengths have zero variance",
        ));
    }

    let covariance: f64 = head
        .iter()
        .zip(tail)
        .map(|(a, b)| (a - mean1) * (b - mean2))
        .sum();
    Ok(covariance / ((lengths.len() - 1) as f64 * sd1 * sd2))
}

/// Spans of the filtered sequence, in order.
///
/// A non-empty sequence without language tokens gives an empty table.
pub fn spans<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<Vec<Span>> {
    if tags.is_empty() {
        return Err(MetricError::empty(MetricKind::Spans, 1));
    }
    Ok(segment::to_spans(tags, config))
}

/// Frequency of each `(tag, length)` span, sorted by tag then length
pub fn span_summary<S: AsRef<str>>(
    tags: &[S],
    config: &EngineConfig,
) -> MetricResult<Vec<SpanFrequency>> {
    if tags.is_empty() {
        return Err(MetricError::empty(MetricKind::SpanSummary, 1));
    }
    let spans = segment::to_spans(tags, config);
    let counts = stats::frequencies(spans.into_iter().map(|s| (s.tag, s.length)));
    Ok(counts
        .into_iter()
        .map(|((tag, length), frequency)| SpanFrequency {
            tag,
            length,
            frequency,
        })
        .collect())
}

/// Switch indicator (1/0) for each adjacent pair of filtered tokens
pub fn switchpoints<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<Vec<u8>> {
    if tags.is_empty() {
        return Err(MetricError::empty(MetricKind::Switchpoints, 1));
    }
    Ok(segment::switch_flags(&segment::filter_other(tags, config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en_hi() -> EngineConfig {
        EngineConfig::builder()
            .languages(["EN", "HI"])
            .excluded(["NE"])
            .build()
            .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_burstiness() {
        let config = en_hi();
        // lengths [2, 1, 1, 3]: mean 1.75, population sd sqrt(0.6875)
        let tags = ["EN", "EN", "HI", "EN", "HI", "HI", "HI"];
        let sd = 0.6875f64.sqrt();
        assert!(close(
            burstiness(&tags, &config).unwrap(),
            (sd - 1.75) / (sd + 1.75)
        ));

        // Perfectly regular alternation has sd = 0 → -1
        assert_eq!(burstiness(&["EN", "HI", "EN", "HI"], &config).unwrap(), -1.0);
    }

    #[test]
    fn test_burstiness_single_span_is_degenerate() {
        let err = burstiness(&["EN", "EN", "EN", "EN"], &en_hi()).unwrap_err();
        assert_eq!(err.kind(), "degenerate_input");
        let err = burstiness(&["NE"], &en_hi()).unwrap_err();
        assert_eq!(err.kind(), "empty_input");
    }

    #[test]
    fn test_memory() {
        let config = en_hi();
        // lengths [1, 2, 3, 4]: head [1,2,3], tail [2,3,4], perfectly correlated
        let tags = ["EN", "HI", "HI", "EN", "EN", "EN", "HI", "HI", "HI", "HI"];
        assert!(close(memory(&tags, &config).unwrap(), 1.0));

        // lengths [1, 3, 1, 3]: alternating, perfectly anti-correlated
        let tags = ["EN", "HI", "HI", "HI", "EN", "HI", "HI", "HI"];
        assert!(close(memory(&tags, &config).unwrap(), -1.0));
    }

    #[test]
    fn test_memory_degenerate_cases() {
        let config = en_hi();
        let err = memory(&["EN", "HI"], &config).unwrap_err();
        assert_eq!(err.kind(), "degenerate_input");

        // constant span lengths → zero variance
        let err = memory(&["EN", "HI", "EN", "HI"], &config).unwrap_err();
        assert_eq!(err.kind(), "degenerate_input");
    }

    #[test]
    fn test_spans_table() {
        let tags = ["NE", "EN", "HI", "NE", "EN"];
        assert_eq!(
            spans(&tags, &en_hi()).unwrap(),
            vec![Span::new("EN", 1), Span::new("HI", 1), Span::new("EN", 1)]
        );
        assert!(spans(&["NE"], &en_hi()).unwrap().is_empty());
    }

    #[test]
    fn test_span_summary_sorted() {
        let tags = ["HI", "EN", "EN", "HI", "EN", "EN", "HI", "HI", "EN"];
        let summary = span_summary(&tags, &en_hi()).unwrap();
        let rows: Vec<(&str, usize, usize)> = summary
            .iter()
            .map(|r| (r.tag.as_str(), r.length, r.frequency))
            .collect();
        assert_eq!(rows, vec![("EN", 1, 1), ("EN", 2, 2), ("HI", 1, 2), ("HI", 2, 1)]);
    }

    #[test]
    fn test_switchpoints() {
        let tags = ["EN", "EN", "HI", "NE", "HI", "EN"];
        assert_eq!(switchpoints(&tags, &en_hi()).unwrap(), vec![0, 1, 0, 1]);
        assert!(switchpoints(&["EN"], &en_hi()).unwrap().is_empty());
        assert_eq!(
            switchpoints::<&str>(&[], &en_hi()).unwrap_err().kind(),
            "empty_input"
        );
    }
}
