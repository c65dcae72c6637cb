//! Information-theoretic metrics: language, span and switch entropy

use super::{language_tokens, stats, MetricKind};
use crate::config::{EngineConfig, SwitchEntropyForm};
use crate::error::{MetricError, MetricResult};
use crate::segment;

/// Shannon entropy (base 2) of the language-tag distribution
pub fn lang_entropy<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<f64> {
    let filtered = language_tokens(MetricKind::LangEntropy, tags, config, 1)?;
    let counts = stats::frequencies(filtered.iter().map(|t| &**t));
    Ok(stats::entropy(&counts))
}

/// Shannon entropy of the span-length distribution, each distinct length
/// being one category
pub fn span_entropy<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<f64> {
    let filtered = language_tokens(MetricKind::SpanEntropy, tags, config, 1)?;
    let spans = segment::spans_of(&filtered);
    let counts = stats::frequencies(spans.iter().map(|s| s.length));
    Ok(stats::entropy(&counts))
}

/// Overall switch probability `switches / (m - 1)`.
///
/// Uses the same switch definition as the I-index; `metric` names the
/// caller in errors.
pub fn switch_probability<S: AsRef<str>>(
    metric: MetricKind,
    tags: &[S],
    config: &EngineConfig,
) -> MetricResult<f64> {
    let filtered = language_tokens(metric, tags, config, 2)?;
    Ok(segment::switch_count(&filtered) as f64 / (filtered.len() - 1) as f64)
}

/// Entropy of switching.
///
/// The configured [`SwitchEntropyForm`] selects between the full binary
/// entropy and the switching term alone. `p` of 0 or 1 gives 0.
pub fn switch_entropy<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<f64> {
    let p = switch_probability(MetricKind::SwitchEntropy, tags, config)?;
    // `0.0 - x` rather than `-x`: a zero entropy must print as 0.0, not -0.0
    let h = match config.switch_entropy() {
        SwitchEntropyForm::Binary => 0.0 - (stats::plogp(p) + stats::plogp(1.0 - p)),
        SwitchEntropyForm::SwitchTerm => 0.0 - stats::plogp(p),
    };
    Ok(h)
}

/// Surprisal of switching, `log2(1 / p)`.
///
/// A sequence without switches has unbounded surprisal and is reported as
/// degenerate.
pub fn switch_surprisal<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<f64> {
    let p = switch_probability(MetricKind::SwitchSurprisal, tags, config)?;
    if p == 0.0 {
        return Err(MetricError::degenerate(
            MetricKind::SwitchSurprisal,
            "no switches, surprisal of a zero switch probability is unbounded",
        ));
    }
    Ok((1.0 / p).log2())
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
    fn test_lang_entropy() {
        let config = en_hi();
        assert!(close(lang_entropy(&["EN", "HI", "NE"], &config).unwrap(), 1.0));
        assert_eq!(lang_entropy(&["EN", "EN"], &config).unwrap(), 0.0);

        // p = (3/4, 1/4)
        let expected = -(0.75f64 * 0.75f64.log2() + 0.25 * 0.25f64.log2());
        assert!(close(
            lang_entropy(&["EN", "EN", "EN", "HI"], &config).unwrap(),
            expected
        ));
    }

    #[test]
    fn test_span_entropy() {
        let config = en_hi();
        // spans (EN,2) (HI,1) (EN,1) (HI,3): lengths {1: 2, 2: 1, 3: 1}
        let tags = ["EN", "EN", "HI", "EN", "HI", "HI", "HI"];
        assert!(close(span_entropy(&tags, &config).unwrap(), 1.5));
        assert_eq!(span_entropy(&["EN"], &config).unwrap(), 0.0);
    }

    #[test]
    fn test_switch_entropy_binary() {
        let config = en_hi();
        let tags = ["EN", "EN", "HI", "EN", "HI", "HI", "HI"];
        // p = 0.5 → 1 bit
        assert!(close(switch_entropy(&tags, &config).unwrap(), 1.0));
        assert_eq!(switch_entropy(&["EN", "EN", "EN"], &config).unwrap(), 0.0);
        assert_eq!(switch_entropy(&["EN", "HI", "EN"], &config).unwrap(), 0.0);
        assert!(switch_entropy(&["EN", "EN", "EN"], &config)
            .unwrap()
            .is_sign_positive());
        assert!(switch_entropy(&["EN", "HI", "EN"], &config)
            .unwrap()
            .is_sign_positive());
    }

    #[test]
    fn test_switch_entropy_switch_term_only() {
        let config = EngineConfig::builder()
            .languages(["EN", "HI"])
            .switch_entropy(SwitchEntropyForm::SwitchTerm)
            .build()
            .unwrap();
        // p = 1/4
        let tags = ["EN", "EN", "EN", "HI", "HI"];
        assert!(close(switch_entropy(&tags, &config).unwrap(), 0.5));
    }

    #[test]
    fn test_switch_surprisal() {
        let config = en_hi();
        let tags = ["EN", "EN", "EN", "HI", "HI"];
        assert!(close(switch_surprisal(&tags, &config).unwrap(), 2.0));
        assert_eq!(switch_surprisal(&["EN", "HI"], &config).unwrap(), 0.0);

        let err = switch_surprisal(&["EN", "EN"], &config).unwrap_err();
        assert_eq!(err.kind(), "degenerate_input");
        let err = switch_surprisal(&["EN"], &config).unwrap_err();
        assert_eq!(err.kind(), "degenerate_input");
    }

    #[test]
    fn test_switch_probability_matches_i_index() {
        let config = en_hi();
        let tags = ["NE", "EN", "HI", "HI", "NE", "EN", "EN"];
        assert_eq!(
            switch_probability(MetricKind::SwitchEntropy, &tags, &config).unwrap(),
            super::super::i_index(&tags, &config).unwrap()
        );
    }
}
