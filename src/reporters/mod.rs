//! Output reporters for csmetrics results
//!
//! Supports multiple output formats:
//! - `text` - `Label: value` lines and tab-separated tables
//! - `json` - Machine-readable JSON, one object per record
//! - `tsv` - One row per record, one column per scalar metric

mod json;
mod text;
mod tsv;

use crate::batch::BatchReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "tsv" | "table" => Ok(OutputFormat::Tsv),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, tsv",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Tsv => write!(f, "tsv"),
        }
    }
}

/// Presentation options shared by all reporters
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Fixed number of decimals for scalars (default: shortest round-trip)
    pub precision: Option<usize>,
    /// Prefix output with the corpus summary
    pub verbose: bool,
}

/// Render a batch report using an OutputFormat enum
pub fn report_with_format(
    batch: &BatchReport,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(batch, options),
        OutputFormat::Json => json::render(batch, options),
        OutputFormat::Tsv => tsv::render(batch, options),
    }
}

/// Format a scalar the way every reporter prints it
pub(crate) fn format_scalar(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{:.*}", p, value),
        None => format!("{:?}", value),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::config::EngineConfig;
    use crate::corpus::Record;

    /// Two-record batch over the EN/HI scenario plus an all-English record
    pub(crate) fn test_batch(requested: &[&str]) -> BatchReport {
        let records = vec![
            Record {
                line: 1,
                tags: "EN EN HI EN HI HI HI"
                    .split_whitespace()
                    .map(str::to_string)
                    .collect(),
            },
            Record {
                line: 2,
                tags: vec!["EN".into(); 4],
            },
        ];
        let config = EngineConfig::builder()
            .languages(["EN", "HI"])
            .excluded(["NE"])
            .build()
            .expect("valid config");
        Batch::new(config, requested.iter().map(|s| s.to_string()).collect())
            .run(&records)
            .expect("batch runs")
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("tsv").unwrap(), OutputFormat::Tsv);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_format_scalar() {
        assert_eq!(format_scalar(0.5, None), "0.5");
        assert_eq!(format_scalar(1.0, None), "1.0");
        assert_eq!(format_scalar(2.0 / 3.0, Some(3)), "0.667");
    }
}
