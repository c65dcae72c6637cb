//! TSV reporter: one row per record, one column per scalar metric
//!
//! Table-valued metrics do not fit a row and are left out with a warning.
//! A metric that failed on a record is written as `NA`.

use super::{format_scalar, RenderOptions};
use crate::batch::BatchReport;
use crate::models::MetricValue;
use anyhow::Result;
use std::fmt::Write;
use tracing::warn;

/// Render report as TSV
pub fn render(batch: &BatchReport, options: RenderOptions) -> Result<String> {
    // Every record has the same requested list, so the first one fixes the columns
    let mut columns: Vec<&str> = Vec::new();
    if let Some(first) = batch.records.first() {
        for entry in &first.entries {
            match entry.kind {
                Some(kind) if kind.is_table() => {
                    warn!("Skipping table metric '{}' in TSV output", kind.name());
                }
                Some(kind) => {
                    if !columns.contains(&kind.name()) {
                        columns.push(kind.name());
                    }
                }
                None => {}
            }
        }
    }

    let mut out = String::new();
    write!(out, "record\tline")?;
    for column in &columns {
        write!(out, "\t{}", column)?;
    }
    out.push('\n');

    for record in &batch.records {
        write!(out, "{}\t{}", record.record, record.line)?;
        for column in &columns {
            let cell = record
                .entries
                .iter()
                .find(|e| e.name == *column)
                .and_then(|e| e.outcome.as_ref().ok())
                .map(|value| match value {
                    MetricValue::Scalar(v) => format_scalar(*v, options.precision),
                    MetricValue::Count(n) => n.to_string(),
                    _ => "NA".to_string(),
                })
                .unwrap_or_else(|| "NA".to_string());
            write!(out, "\t{}", cell)?;
        }
        out.push('\n');
    }

    Ok(out)
}
