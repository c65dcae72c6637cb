//! Code-switching metrics
//!
//! Every metric is an independent pure function over a tag sequence and an
//! [`EngineConfig`]. Sequences are slices of anything string-like, so both
//! `&[&str]` and `&[String]` work:
//!
//! ```
//! use csmetrics::config::EngineConfig;
//! use csmetrics::metrics;
//!
//! let config = EngineConfig::builder().languages(["EN", "HI"]).build().unwrap();
//! let tags = ["EN", "EN", "HI", "EN", "HI", "HI", "HI"];
//! assert_eq!(metrics::i_index(&tags, &config).unwrap(), 0.5);
//! ```
//!
//! # Degenerate inputs
//!
//! - An empty sequence fails every metric with `EmptyInput`.
//! - Scalar metrics also fail with `EmptyInput` when no language-tagged
//!   token survives filtering (CMI is the exception: it is `0`).
//! - Metrics whose formula is undefined for a specific input fail with
//!   `DegenerateInput` instead of returning `NaN`.

mod entropy;
mod index;
mod spans;
mod stats;

pub use entropy::{lang_entropy, span_entropy, switch_entropy, switch_probability, switch_surprisal};
pub use index::{cmi, i_index, m_index, num_switchpoints};
pub use spans::{burstiness, memory, span_summary, spans, switchpoints};

use crate::config::EngineConfig;
use crate::error::{MetricError, MetricResult};
use crate::models::MetricValue;
use crate::segment;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::str::FromStr;

/// Name that selects the full scalar bundle
pub const ALL_METRICS: &str = "metrics";

/// One selectable metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    /// Number of adjacent language switches
    NumSwitchpoints,
    /// Multilingual index
    MIndex,
    /// Integration index
    IIndex,
    /// Span-length burstiness
    Burstiness,
    /// Lag-1 autocorrelation of span lengths
    Memory,
    /// Table of spans in order
    Spans,
    /// Frequency table of (tag, length) pairs
    SpanSummary,
    /// Per-position switch indicator
    Switchpoints,
    /// Entropy of the language distribution
    LangEntropy,
    /// Entropy of the span-length distribution
    SpanEntropy,
    /// Binary entropy of the switch probability
    SwitchEntropy,
    /// Surprisal of the switch probability
    SwitchSurprisal,
    /// Code-Mixing Index
    Cmi,
}

impl MetricKind {
    pub fn all() -> &'static [MetricKind] {
        &[
            MetricKind::NumSwitchpoints,
            MetricKind::MIndex,
            MetricKind::IIndex,
            MetricKind::Burstiness,
            MetricKind::Memory,
            MetricKind::Spans,
            MetricKind::SpanSummary,
            MetricKind::Switchpoints,
            MetricKind::LangEntropy,
            MetricKind::SpanEntropy,
            MetricKind::SwitchEntropy,
            MetricKind::SwitchSurprisal,
            MetricKind::Cmi,
        ]
    }

    /// Scalar metrics run by the `metrics` selector, in output order
    pub fn bundle() -> &'static [MetricKind] {
        &[
            MetricKind::NumSwitchpoints,
            MetricKind::MIndex,
            MetricKind::IIndex,
            MetricKind::Burstiness,
            MetricKind::Memory,
            MetricKind::LangEntropy,
            MetricKind::SpanEntropy,
            MetricKind::SwitchEntropy,
            MetricKind::SwitchSurprisal,
            MetricKind::Cmi,
        ]
    }

    /// Selector name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::NumSwitchpoints => "num_switchpoints",
            MetricKind::MIndex => "m_metric",
            MetricKind::IIndex => "i_metric",
            MetricKind::Burstiness => "burstiness",
            MetricKind::Memory => "memory",
            MetricKind::Spans => "spans",
            MetricKind::SpanSummary => "span_summary",
            MetricKind::Switchpoints => "switchpoints",
            MetricKind::LangEntropy => "lang_entropy",
            MetricKind::SpanEntropy => "span_entropy",
            MetricKind::SwitchEntropy => "switch_entropy",
            MetricKind::SwitchSurprisal => "switch_surprisal",
            MetricKind::Cmi => "cmi",
        }
    }

    /// Human-readable label used in text output
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::NumSwitchpoints => "Number of switchpoints",
            MetricKind::MIndex => "M-metric",
            MetricKind::IIndex => "I-metric",
            MetricKind::Burstiness => "Burstiness",
            MetricKind::Memory => "Memory",
            MetricKind::Spans => "Spans",
            MetricKind::SpanSummary => "Span Summary",
            MetricKind::Switchpoints => "Switchpoints",
            MetricKind::LangEntropy => "Language Entropy",
            MetricKind::SpanEntropy => "Span Entropy",
            MetricKind::SwitchEntropy => "Switch Entropy",
            MetricKind::SwitchSurprisal => "Switch Surprisal",
            MetricKind::Cmi => "CMI",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricKind::NumSwitchpoints => "count of adjacent language switches",
            MetricKind::MIndex => "multilingual index, language-frequency skew normalized by k",
            MetricKind::IIndex => "fraction of adjacent token pairs that switch language",
            MetricKind::Burstiness => "(sd - mean) / (sd + mean) of span lengths, in [-1, 1]",
            MetricKind::Memory => "lag-1 autocorrelation of span lengths",
            MetricKind::Spans => "table of language spans in order (Lang, Length)",
            MetricKind::SpanSummary => "frequency table of (Lang, SpanLength) pairs",
            MetricKind::Switchpoints => "1/0 switch indicator for every adjacent token pair",
            MetricKind::LangEntropy => "Shannon entropy of the language distribution",
            MetricKind::SpanEntropy => "Shannon entropy of the span-length distribution",
            MetricKind::SwitchEntropy => "binary entropy of the switch probability",
            MetricKind::SwitchSurprisal => "log2(1/p) of the switch probability",
            MetricKind::Cmi => "Code-Mixing Index on a 0-100 scale",
        }
    }

    /// Whether the metric produces a table rather than a single number
    pub fn is_table(&self) -> bool {
        matches!(
            self,
            MetricKind::Spans | MetricKind::SpanSummary | MetricKind::Switchpoints
        )
    }

    /// Resolve a selector name into the metrics it stands for.
    ///
    /// `metrics` expands to [`MetricKind::bundle`]; anything else must name a
    /// single metric.
    pub fn resolve(name: &str) -> MetricResult<Vec<MetricKind>> {
        if name.trim().eq_ignore_ascii_case(ALL_METRICS) {
            return Ok(Self::bundle().to_vec());
        }
        name.parse().map(|kind| vec![kind])
    }
}

impl FromStr for MetricKind {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        let alias = match wanted.as_str() {
            "m_index" => "m_metric",
            "i_index" => "i_metric",
            "language_entropy" => "lang_entropy",
            other => other,
        };
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == alias)
            .ok_or_else(|| MetricError::UnknownMetric(s.to_string()))
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for MetricKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Evaluate one metric and wrap the result in a [`MetricValue`]
pub fn evaluate<S: AsRef<str>>(
    kind: MetricKind,
    tags: &[S],
    config: &EngineConfig,
) -> MetricResult<MetricValue> {
    match kind {
        MetricKind::NumSwitchpoints => num_switchpoints(tags, config).map(MetricValue::Count),
        MetricKind::MIndex => m_index(tags, config).map(MetricValue::Scalar),
        MetricKind::IIndex => i_index(tags, config).map(MetricValue::Scalar),
        MetricKind::Burstiness => burstiness(tags, config).map(MetricValue::Scalar),
        MetricKind::Memory => memory(tags, config).map(MetricValue::Scalar),
        MetricKind::Spans => spans(tags, config).map(MetricValue::Spans),
        MetricKind::SpanSummary => span_summary(tags, config).map(MetricValue::SpanSummary),
        MetricKind::Switchpoints => switchpoints(tags, config).map(MetricValue::Switchpoints),
        MetricKind::LangEntropy => lang_entropy(tags, config).map(MetricValue::Scalar),
        MetricKind::SpanEntropy => span_entropy(tags, config).map(MetricValue::Scalar),
        MetricKind::SwitchEntropy => switch_entropy(tags, config).map(MetricValue::Scalar),
        MetricKind::SwitchSurprisal => switch_surprisal(tags, config).map(MetricValue::Scalar),
        MetricKind::Cmi => cmi(tags, config).map(MetricValue::Scalar),
    }
}

/// Evaluate a metric selector by name.
///
/// `metrics` expands to the default bundle, in bundle order. An unknown name
/// fails as a whole; failures of individual metrics stay per entry.
pub fn evaluate_named<S: AsRef<str>>(
    name: &str,
    tags: &[S],
    config: &EngineConfig,
) -> MetricResult<Vec<(MetricKind, MetricResult<MetricValue>)>> {
    let kinds = MetricKind::resolve(name)?;
    Ok(kinds
        .into_iter()
        .map(|kind| (kind, evaluate(kind, tags, config)))
        .collect())
}

/// Filtered language tokens of a sequence that must hold at least
/// `required` of them.
///
/// An empty raw or filtered sequence is `EmptyInput`; a non-empty one that
/// is still too short is `DegenerateInput`.
pub(crate) fn language_tokens<'a, S: AsRef<str>>(
    metric: MetricKind,
    tags: &'a [S],
    config: &EngineConfig,
    required: usize,
) -> MetricResult<Vec<Cow<'a, str>>> {
    if tags.is_empty() {
        return Err(MetricError::empty(metric, required));
    }
    let filtered = segment::filter_other(tags, config);
    if filtered.is_empty() {
        return Err(MetricError::empty(metric, required));
    }
    if filtered.len() < required {
        return Err(MetricError::degenerate(
            metric,
            format!(
                "{} language-tagged token(s), at least {} needed",
                filtered.len(),
                required
            ),
        ));
    }
    Ok(filtered)
}
