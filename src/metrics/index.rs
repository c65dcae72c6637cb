//! Frequency and switching indices: CMI, M-index, I-index, switch count

use super::{language_tokens, stats, MetricKind};
use crate::config::EngineConfig;
use crate::error::{MetricError, MetricResult};
use crate::segment;

/// Number of adjacent language switches after removing Other tags
pub fn num_switchpoints<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<usize> {
    let filtered = language_tokens(MetricKind::NumSwitchpoints, tags, config, 1)?;
    Ok(segment::switch_count(&filtered))
}

/// Code-Mixing Index: `100 * (1 - max_count / (n - u))`.
///
/// `n` counts every known token, `u` the Other-tagged ones. A sequence with
/// no language tokens at all is monolingual by absence and scores 0.
pub fn cmi<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<f64> {
    if tags.is_empty() {
        return Err(MetricError::empty(MetricKind::Cmi, 1));
    }
    let filtered = segment::filter_other(tags, config);
    if filtered.is_empty() {
        return Ok(0.0);
    }
    let counts = stats::frequencies(filtered.iter().map(|t| &**t));
    let max_count = counts.values().copied().max().unwrap_or(0);
    Ok(100.0 * (1.0 - max_count as f64 / filtered.len() as f64))
}

/// Multilingual index: `(1 - Σp²) / ((k - 1) · Σp²)`.
///
/// Zero when `k == 1` or only one language occurs.
pub fn m_index<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<f64> {
    let filtered = language_tokens(MetricKind::MIndex, tags, config, 1)?;
    let counts = stats::frequencies(filtered.iter().map(|t| &**t));
    let k = config.resolve_k(counts.len());
    if k <= 1 || counts.len() == 1 {
        return Ok(0.0);
    }
    let total = filtered.len() as f64;
    let sum_sq: f64 = counts
        .values()
        .map(|&c| (c as f64 / total).powi(2))
        .sum();
    Ok((1.0 - sum_sq) / ((k - 1) as f64 * sum_sq))
}

/// Integration index: `switches / (m - 1)` over the filtered sequence
pub fn i_index<S: AsRef<str>>(tags: &[S], config: &EngineConfig) -> MetricResult<f64> {
    let filtered = language_tokens(MetricKind::IIndex, tags, config, 2)?;
    let switches = segment::switch_count(&filtered);
    Ok(switches as f64 / (filtered.len() - 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en_hi() -> EngineConfig {
        EngineConfig::builder()
            .languages(["EN", "HI"])
            .excluded(["NE", "UNIV", "ACRO"])
            .build()
            .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_switch_scenario() {
        let tags = ["EN", "EN", "HI", "EN", "HI", "HI", "HI"];
        let config = en_hi();
        assert_eq!(num_switchpoints(&tags, &config).unwrap(), 3);
        assert_eq!(i_index(&tags, &config).unwrap(), 0.5);
    }

    #[test]
    fn test_i_index_ignores_other_tags() {
        let tags = ["NE", "EN", "HI", "NE", "EN"];
        assert_eq!(i_index(&tags, &en_hi()).unwrap(), 1.0);
    }

    #[test]
    fn test_i_index_needs_two_tokens() {
        let config = en_hi();
        let err = i_index(&["EN"], &config).unwrap_err();
        assert_eq!(err.kind(), "degenerate_input");
        let err = i_index(&["NE", "NE"], &config).unwrap_err();
        assert_eq!(err.kind(), "empty_input");
    }

    #[test]
    fn test_cmi() {
        let config = en_hi();
        // 4 EN, 3 HI, 1 NE: n - u = 7, max = 4
        let tags = ["EN", "EN", "HI", "NE", "EN", "HI", "HI", "EN"];
        assert!(close(cmi(&tags, &config).unwrap(), 100.0 * (1.0 - 4.0 / 7.0)));

        assert_eq!(cmi(&["EN", "EN"], &config).unwrap(), 0.0);
        assert_eq!(cmi(&["NE", "UNIV"], &config).unwrap(), 0.0);
        assert_eq!(cmi(&["EN", "HI"], &config).unwrap(), 50.0);
    }

    #[test]
    fn test_cmi_other_tag_never_counts_as_majority() {
        let config = en_hi();
        let tags = ["NE", "NE", "NE", "EN", "HI"];
        assert_eq!(cmi(&tags, &config).unwrap(), 50.0);
    }

    #[test]
    fn test_m_index() {
        let config = en_hi();
        assert_eq!(m_index(&["EN", "HI"], &config).unwrap(), 1.0);
        assert_eq!(m_index(&["EN", "EN", "EN"], &config).unwrap(), 0.0);

        // p = (3/4, 1/4): Σp² = 10/16, M = (6/16) / (10/16) = 0.6
        let tags = ["EN", "EN", "EN", "HI"];
        assert!(close(m_index(&tags, &config).unwrap(), 0.6));
    }

    #[test]
    fn test_m_index_with_single_language_k() {
        let config = EngineConfig::builder().k(1).build().unwrap();
        assert_eq!(m_index(&["EN", "HI"], &config).unwrap(), 0.0);
    }

    #[test]
    fn test_m_index_open_config_uses_observed_languages() {
        let config = EngineConfig::default();
        // three equiprobable languages: Σp² = 1/3, M = (2/3) / (2 · 1/3) = 1
        assert!(close(m_index(&["EN", "HI", "ES"], &config).unwrap(), 1.0));
    }
}
