//! Corpus reading: turns delimited text into tag sequences
//!
//! Two layouts are supported (see [`Layout`]):
//! - `column`: one token per line, the whole input is a single record
//! - `record`: one record per line, the selected column holds a
//!   whitespace-separated tag stream

use crate::config::{InputConfig, Layout};
use crate::error::MetricError;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::io::BufRead;
use tracing::{debug, warn};

/// One tag sequence together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number of the record's first line
    pub line: usize,
    pub tags: Vec<String>,
}

/// Read every record from `reader`.
///
/// A column index that a non-blank line does not have, or an empty tag in
/// the `column` layout, is a configuration error and aborts the read. A
/// line that is not valid UTF-8 is decoded lossily and logged; it never
/// costs the other records.
pub fn read_records<R: BufRead>(mut reader: R, input: &InputConfig) -> Result<Vec<Record>> {
    let skip = usize::from(input.header);
    let mut records = Vec::new();
    let mut column_tags = Vec::new();
    let mut first_line = None;
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read line {}", line_no + 1))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if line_no <= skip {
            continue;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(text) => Cow::Borrowed(text),
            Err(e) => {
                warn!(
                    "line {} is not valid UTF-8 ({}), invalid bytes replaced",
                    line_no, e
                );
                String::from_utf8_lossy(&buf)
            }
        };
        let line = line.trim_end_matches(['\r', '\n']);

        match input.layout {
            Layout::Record => {
                let tags = if line.trim().is_empty() {
                    Vec::new()
                } else {
                    field(line, line_no, input)?
                        .split_whitespace()
                        .map(str::to_string)
                        .collect()
                };
                records.push(Record { line: line_no, tags });
            }
            Layout::Column => {
                if line.trim().is_empty() {
                    continue;
                }
                let tag = field(line, line_no, input)?.trim();
                if tag.is_empty() {
                    return Err(MetricError::Configuration(format!(
                        "line {} has an empty tag in column {}",
                        line_no, input.column
                    ))
                    .into());
                }
                first_line.get_or_insert(line_no);
                column_tags.push(tag.to_string());
            }
        }
    }

    if input.layout == Layout::Column {
        records.push(Record {
            line: first_line.unwrap_or(skip + 1),
            tags: column_tags,
        });
    }

    debug!(
        "Read {} record(s), {} token(s)",
        records.len(),
        records.iter().map(|r| r.tags.len()).sum::<usize>()
    );
    Ok(records)
}

fn field<'a>(line: &'a str, line_no: usize, input: &InputConfig) -> Result<&'a str> {
    line.split(input.delimiter.as_str())
        .nth(input.column)
        .ok_or_else(|| {
            MetricError::Configuration(format!(
                "line {} has no column {} (delimiter {:?})",
                line_no, input.column, input.delimiter
            ))
            .into()
        })
}
