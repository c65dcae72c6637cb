//! Text reporter: `Label: value` lines and tab-separated tables

use super::{format_scalar, RenderOptions};
use crate::batch::{BatchReport, CorpusSummary};
use crate::models::MetricValue;
use anyhow::Result;
use std::fmt::Write;

/// Render report as plain text
pub fn render(batch: &BatchReport, options: RenderOptions) -> Result<String> {
    let mut out = String::new();

    if options.verbose {
        render_summary(&mut out, &batch.summary)?;
    }

    let show_headers = batch.records.len() > 1;
    for (i, record) in batch.records.iter().enumerate() {
        if show_headers {
            if i > 0 {
                out.push('\n');
            }
            writeln!(out, "# record {} (line {})", record.record, record.line)?;
        }
        for entry in &record.entries {
            let (Some(kind), Ok(value)) = (entry.kind, &entry.outcome) else {
                continue;
            };
            match value {
                MetricValue::Scalar(v) => {
                    writeln!(out, "{}: {}", kind.label(), format_scalar(*v, options.precision))?
                }
                MetricValue::Count(n) => writeln!(out, "{}: {}", kind.label(), n)?,
                MetricValue::Spans(spans) => {
                    writeln!(out, "Lang\tLength")?;
                    for span in spans {
                        writeln!(out, "{}\t{}", span.tag, span.length)?;
                    }
                }
                MetricValue::SpanSummary(rows) => {
                    writeln!(out, "Lang\tSpanLength\tSpanFreq")?;
                    for row in rows {
                        writeln!(out, "{}\t{}\t{}", row.tag, row.length, row.frequency)?;
                    }
                }
                MetricValue::Switchpoints(flags) => {
                    writeln!(out, "Switchpoint")?;
                    for flag in flags {
                        writeln!(out, "{}", flag)?;
                    }
                }
            }
        }
    }

    Ok(out)
}

fn render_summary(out: &mut String, summary: &CorpusSummary) -> std::fmt::Result {
    writeln!(out, "Set of language tags: [{}]", summary.languages.join(", "))?;
    writeln!(out, "Length of corpus: {}", summary.language_tokens)?;
    let counts: Vec<String> = summary
        .counts
        .iter()
        .map(|(tag, n)| format!("{}: {}", tag, n))
        .collect();
    writeln!(out, "Language Tokens: {{{}}}", counts.join(", "))?;
    writeln!(out)
}
