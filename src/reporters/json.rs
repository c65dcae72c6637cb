//! JSON reporter

use super::RenderOptions;
use crate::batch::{BatchReport, CorpusSummary, RecordReport};
use crate::models::MetricValue;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a CorpusSummary>,
    records: Vec<JsonRecord<'a>>,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    record: usize,
    line: usize,
    tokens: usize,
    metrics: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    metric: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

#[derive(Serialize)]
struct JsonError {
    kind: &'static str,
    message: String,
}

fn convert_record(record: &RecordReport) -> JsonRecord<'_> {
    let metrics = record
        .entries
        .iter()
        .map(|entry| match &entry.outcome {
            Ok(value) => JsonEntry {
                metric: &entry.name,
                value: Some(value),
                error: None,
            },
            Err(err) => JsonEntry {
                metric: &entry.name,
                value: None,
                error: Some(JsonError {
                    kind: err.kind(),
                    message: err.to_string(),
                }),
            },
        })
        .collect();

    JsonRecord {
        record: record.record,
        line: record.line,
        tokens: record.tokens,
        metrics,
    }
}

/// Render report as JSON.
///
/// Plain mode emits the array of records; verbose mode wraps it in an
/// object together with the corpus summary.
pub fn render(batch: &BatchReport, options: RenderOptions) -> Result<String> {
    let records: Vec<JsonRecord> = batch.records.iter().map(convert_record).collect();
    let json = if options.verbose {
        serde_json::to_string_pretty(&JsonReport {
            summary: Some(&batch.summary),
            records,
        })?
    } else {
        serde_json::to_string_pretty(&records)?
    };
    Ok(json)
}
