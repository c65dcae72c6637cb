//! Project-level configuration support
//!
//! Loads configuration from `csmetrics.toml` or `.csmetricsrc.json` in the
//! working directory, or from an explicit path.
//!
//! # Configuration Format
//!
//! ```toml
//! # csmetrics.toml
//!
//! [languages]
//! tags = ["EN", "HI"]
//! excluded = ["UNIV", "NE", "ACRO"]
//! k = 2
//! case_sensitive = true
//! switch_entropy = "binary"
//!
//! [input]
//! delimiter = "\t"
//! column = 0
//! header = false
//! layout = "column"
//!
//! [defaults]
//! format = "text"
//! metrics = ["metrics"]
//! workers = 4
//! precision = 4
//! ```

use super::engine::{EngineConfig, SwitchEntropyForm};
use crate::error::{MetricError, MetricResult};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

pub const TOML_CONFIG_NAME: &str = "csmetrics.toml";
pub const JSON_CONFIG_NAME: &str = ".csmetricsrc.json";

/// How records are laid out in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One token per line; the whole input is one tag sequence
    #[default]
    Column,
    /// One record per line; the selected column holds whitespace-separated tags
    Record,
}

impl std::str::FromStr for Layout {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "column" | "token" => Ok(Layout::Column),
            "record" | "row" => Ok(Layout::Record),
            _ => Err(MetricError::Configuration(format!(
                "unknown layout '{}' (expected column or record)",
                s
            ))),
        }
    }
}

/// Language and tag-set configuration (`[languages]`)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LanguageSection {
    /// Recognized language tags (default: inferred from the corpus)
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Tags that carry no language signal (named entities, punctuation, ...)
    #[serde(default)]
    pub excluded: Vec<String>,

    /// Number of languages used by the M-index
    #[serde(default)]
    pub k: Option<usize>,

    #[serde(default)]
    pub case_sensitive: Option<bool>,

    #[serde(default)]
    pub switch_entropy: Option<SwitchEntropyForm>,
}

/// Input parsing configuration (`[input]`)
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Zero-based column holding the language tags
    #[serde(default)]
    pub column: usize,

    /// Skip the first line
    #[serde(default)]
    pub header: bool,

    #[serde(default)]
    pub layout: Layout,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            column: 0,
            header: false,
            layout: Layout::default(),
        }
    }
}

impl InputConfig {
    /// Resolve delimiter aliases and reject an empty delimiter
    pub fn validate(mut self) -> MetricResult<Self> {
        self.delimiter = parse_delimiter(&self.delimiter)?;
        Ok(self)
    }
}

fn default_delimiter() -> String {
    "\t".to_string()
}

/// Turn a user-supplied delimiter into the literal separator
pub fn parse_delimiter(raw: &str) -> MetricResult<String> {
    let delimiter = match raw {
        "\\t" | "tab" => "\t".to_string(),
        "comma" => ",".to_string(),
        "space" => " ".to_string(),
        other => other.to_string(),
    };
    if delimiter.is_empty() {
        return Err(MetricError::Configuration(
            "delimiter must not be empty".to_string(),
        ));
    }
    Ok(delimiter)
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json, tsv)
    #[serde(default)]
    pub format: Option<String>,

    /// Metrics to compute when `--function` is not given
    #[serde(default)]
    pub metrics: Vec<String>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,

    /// Decimal places for scalar output
    #[serde(default)]
    pub precision: Option<usize>,
}

/// Complete file-backed configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub languages: LanguageSection,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub defaults: CliDefaults,
}

impl ProjectConfig {
    /// Build the engine configuration described by the `[languages]` section
    pub fn engine_config(&self) -> MetricResult<EngineConfig> {
        let section = &self.languages;
        let mut builder = EngineConfig::builder().excluded(section.excluded.iter().cloned());
        if let Some(tags) = &section.tags {
            builder = builder.languages(tags.iter().cloned());
        }
        if let Some(k) = section.k {
            builder = builder.k(k);
        }
        if let Some(case_sensitive) = section.case_sensitive {
            builder = builder.case_sensitive(case_sensitive);
        }
        if let Some(form) = section.switch_entropy {
            builder = builder.switch_entropy(form);
        }
        builder.build()
    }
}

/// Load project configuration from a directory.
///
/// Searches for configuration files in this order:
/// 1. `csmetrics.toml`
/// 2. `.csmetricsrc.json`
///
/// Returns default configuration if no config file is found or the file
/// found cannot be parsed.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    let toml_path = dir.join(TOML_CONFIG_NAME);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(JSON_CONFIG_NAME);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load an explicitly requested config file (TOML unless it ends in `.json`)
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        load_json_config(path)
    } else {
        load_toml_config(path)
    }
}

fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ProjectConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ProjectConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_toml() {
        let config: ProjectConfig = toml::from_str(
            r#"
[languages]
tags = ["EN", "HI"]
excluded = ["NE", "UNIV"]
k = 2
switch_entropy = "switch_term"

[input]
delimiter = ","
column = 2
header = true
layout = "record"

[defaults]
format = "json"
metrics = ["cmi", "i_metric"]
precision = 3
"#,
        )
        .unwrap();

        assert_eq!(config.input.delimiter, ",");
        assert_eq!(config.input.column, 2);
        assert!(config.input.header);
        assert_eq!(config.input.layout, Layout::Record);
        assert_eq!(config.defaults.metrics, vec!["cmi", "i_metric"]);
        assert_eq!(config.defaults.precision, Some(3));

        let engine = config.engine_config().unwrap();
        assert_eq!(engine.languages().unwrap().len(), 2);
        assert_eq!(engine.switch_entropy(), SwitchEntropyForm::SwitchTerm);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ProjectConfig = toml::from_str("").unwrap();
        assert_eq!(config.input.delimiter, "\t");
        assert_eq!(config.input.layout, Layout::Column);
        assert!(config.languages.tags.is_none());
        assert!(config.engine_config().unwrap().languages().is_none());
    }

    #[test]
    fn test_overlapping_sets_rejected() {
        let config: ProjectConfig = toml::from_str(
            r#"
[languages]
tags = ["EN", "NE"]
excluded = ["NE"]
"#,
        )
        .unwrap();
        assert!(config.engine_config().unwrap_err().is_fatal());
    }

    #[test]
    fn test_parse_delimiter_aliases() {
        assert_eq!(parse_delimiter("\\t").unwrap(), "\t");
        assert_eq!(parse_delimiter("tab").unwrap(), "\t");
        assert_eq!(parse_delimiter("comma").unwrap(), ",");
        assert_eq!(parse_delimiter("|").unwrap(), "|");
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn test_load_project_config_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(TOML_CONFIG_NAME),
            "[input]\ncolumn = 3\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(JSON_CONFIG_NAME),
            r#"{"input": {"column": 5}}"#,
        )
        .unwrap();
        assert_eq!(load_project_config(dir.path()).input.column, 3);
    }

    #[test]
    fn test_load_project_config_falls_back_on_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOML_CONFIG_NAME), "[input\ncolumn = ").unwrap();
        std::fs::write(
            dir.path().join(JSON_CONFIG_NAME),
            r#"{"input": {"column": 5}}"#,
        )
        .unwrap();
        assert_eq!(load_project_config(dir.path()).input.column, 5);
    }

    #[test]
    fn test_explicit_config_errors_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "languages = 3").unwrap();
        assert!(load_config_file(&path).is_err());
        assert!(load_config_file(&dir.path().join("missing.toml")).is_err());
    }
}
