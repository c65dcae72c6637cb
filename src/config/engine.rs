//! Immutable engine configuration
//!
//! An [`EngineConfig`] is built once per run and threaded by reference
//! into every segmentation and metric function. Nothing in the engine
//! mutates it.

use crate::error::{MetricError, MetricResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Which formula Switch Entropy uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchEntropyForm {
    /// Full binary entropy: `-p·log2(p) - (1-p)·log2(1-p)`
    #[default]
    Binary,
    /// Only the switching term: `-p·log2(p)`
    SwitchTerm,
}

impl FromStr for SwitchEntropyForm {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "binary" => Ok(SwitchEntropyForm::Binary),
            "switch_term" => Ok(SwitchEntropyForm::SwitchTerm),
            _ => Err(MetricError::Configuration(format!(
                "unknown switch entropy form '{}' (expected binary or switch_term)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for SwitchEntropyForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchEntropyForm::Binary => write!(f, "binary"),
            SwitchEntropyForm::SwitchTerm => write!(f, "switch_term"),
        }
    }
}

/// Engine configuration: tag sets, language count and formula options
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    languages: Option<BTreeSet<String>>,
    excluded: BTreeSet<String>,
    k: Option<usize>,
    case_insensitive: bool,
    switch_entropy: SwitchEntropyForm,
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Recognized language tags; `None` means every non-excluded tag counts
    pub fn languages(&self) -> Option<&BTreeSet<String>> {
        self.languages.as_ref()
    }

    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    pub fn case_sensitive(&self) -> bool {
        !self.case_insensitive
    }

    pub fn switch_entropy(&self) -> SwitchEntropyForm {
        self.switch_entropy
    }

    /// Explicitly configured language count, if any
    pub fn k(&self) -> Option<usize> {
        self.k
    }

    /// Language count used for normalization.
    ///
    /// Falls back to the size of the language set, then to the number of
    /// languages actually observed in the sequence.
    pub fn resolve_k(&self, observed: usize) -> usize {
        self.k
            .or_else(|| self.languages.as_ref().map(BTreeSet::len))
            .unwrap_or(observed)
    }

    /// Canonical form of a tag under this configuration
    pub fn normalize<'a>(&self, tag: &'a str) -> Cow<'a, str> {
        if self.case_insensitive && tag.chars().any(char::is_uppercase) {
            Cow::Owned(tag.to_lowercase())
        } else {
            Cow::Borrowed(tag)
        }
    }

    /// Copy of this config with the language set inferred from `tags`.
    ///
    /// Only applies when no language set was configured; excluded tags
    /// never become languages.
    pub fn with_inferred_languages<I, S>(&self, tags: I) -> EngineConfig
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.languages.is_some() {
            return self.clone();
        }
        let inferred: BTreeSet<String> = tags
            .into_iter()
            .map(|t| self.normalize(t.as_ref()).into_owned())
            .filter(|t| !self.excluded.contains(t))
            .collect();
        EngineConfig {
            languages: Some(inferred),
            ..self.clone()
        }
    }
}

/// Builder for [`EngineConfig`]; validation happens in [`build`](Self::build)
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    languages: Option<Vec<String>>,
    excluded: Vec<String>,
    k: Option<usize>,
    case_insensitive: bool,
    switch_entropy: SwitchEntropyForm,
}

impl EngineConfigBuilder {
    pub fn languages<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn excluded<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_insensitive = !case_sensitive;
        self
    }

    pub fn switch_entropy(mut self, form: SwitchEntropyForm) -> Self {
        self.switch_entropy = form;
        self
    }

    pub fn build(self) -> MetricResult<EngineConfig> {
        let fold = |tag: String| {
            if self.case_insensitive {
                tag.trim().to_lowercase()
            } else {
                tag.trim().to_string()
            }
        };

        let excluded: BTreeSet<String> = self
            .excluded
            .iter()
            .cloned()
            .map(fold)
            .filter(|t| !t.is_empty())
            .collect();
        let languages: Option<BTreeSet<String>> = self.languages.as_ref().map(|tags| {
            tags.iter()
                .cloned()
                .map(fold)
                .filter(|t| !t.is_empty())
                .collect()
        });

        if let Some(langs) = &languages {
            if langs.is_empty() {
                return Err(MetricError::Configuration(
                    "language set is empty".to_string(),
                ));
            }
            let overlap: Vec<&str> = langs.intersection(&excluded).map(String::as_str).collect();
            if !overlap.is_empty() {
                return Err(MetricError::Configuration(format!(
                    "tags listed as both language and excluded: {}",
                    overlap.join(", ")
                )));
            }
        }

        if self.k == Some(0) {
            return Err(MetricError::Configuration(
                "k (number of languages) must be at least 1".to_string(),
            ));
        }

        Ok(EngineConfig {
            languages,
            excluded,
            k: self.k,
            case_insensitive: self.case_insensitive,
            switch_entropy: self.switch_entropy,
        })
    }
}
