//! Batch driver: evaluates requested metrics over every record of a corpus
//!
//! Records are independent, so they are evaluated on a rayon pool; output
//! order always follows input order. Per-record failures are kept as
//! diagnostics in the report and never stop the batch.

use crate::config::EngineConfig;
use crate::corpus::Record;
use crate::error::{MetricError, MetricResult};
use crate::metrics::{self, MetricKind};
use crate::models::MetricValue;
use crate::segment;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Progress callback: (records done, records total)
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Outcome of one requested metric on one record
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    /// Metric name as resolved (or as requested, for unknown names)
    pub name: String,
    pub kind: Option<MetricKind>,
    pub outcome: MetricResult<MetricValue>,
}

/// All requested metrics for one record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordReport {
    /// 1-based position of the record in the corpus
    pub record: usize,
    /// Line the record starts on
    pub line: usize,
    /// Raw token count
    pub tokens: usize,
    pub entries: Vec<MetricEntry>,
}

impl RecordReport {
    /// Errors raised while evaluating this record
    pub fn diagnostics(&self) -> impl Iterator<Item = (&str, &MetricError)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (e.name.as_str(), err)))
    }
}

/// Corpus-wide counts printed in verbose mode
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusSummary {
    /// Working set of language tags
    pub languages: Vec<String>,
    /// Number of language-tagged tokens across all records
    pub language_tokens: usize,
    /// Tokens per language
    pub counts: BTreeMap<String, usize>,
}

impl CorpusSummary {
    pub fn from_records(records: &[Record], config: &EngineConfig) -> Self {
        let mut counts = BTreeMap::new();
        for record in records {
            for tag in segment::filter_other(&record.tags, config) {
                *counts.entry(tag.into_owned()).or_insert(0) += 1;
            }
        }
        let languages = match config.languages() {
            Some(langs) => langs.iter().cloned().collect(),
            None => counts.keys().cloned().collect(),
        };
        Self {
            languages,
            language_tokens: counts.values().sum(),
            counts,
        }
    }
}

/// Everything a batch run produced
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Configuration actually used, with inferred languages filled in
    pub config: EngineConfig,
    pub summary: CorpusSummary,
    pub records: Vec<RecordReport>,
}

impl BatchReport {
    pub fn diagnostic_count(&self) -> usize {
        self.records.iter().map(|r| r.diagnostics().count()).sum()
    }
}

/// Evaluate the requested metric names on a single record
pub fn evaluate_record(
    index: usize,
    record: &Record,
    requested: &[String],
    config: &EngineConfig,
) -> RecordReport {
    let (_, other, unrecognized) = segment::class_counts(&record.tags, config);
    if unrecognized > 0 {
        debug!(
            "record {} (line {}): {} unrecognized tag(s) dropped, {} other tag(s) skipped",
            index + 1,
            record.line,
            unrecognized,
            other
        );
    }

    let mut entries = Vec::new();
    for name in requested {
        match metrics::evaluate_named(name, &record.tags, config) {
            Ok(results) => {
                entries.extend(results.into_iter().map(|(kind, outcome)| MetricEntry {
                    name: kind.name().to_string(),
                    kind: Some(kind),
                    outcome,
                }));
            }
            Err(err) => entries.push(MetricEntry {
                name: name.clone(),
                kind: None,
                outcome: Err(err),
            }),
        }
    }

    let report = RecordReport {
        record: index + 1,
        line: record.line,
        tokens: record.tags.len(),
        entries,
    };
    for (name, err) in report.diagnostics() {
        debug!("record {} (line {}): {}: {}", report.record, report.line, name, err);
    }
    report
}

/// Batch runner over a corpus
pub struct Batch {
    config: EngineConfig,
    requested: Vec<String>,
    workers: usize,
    infer_languages: bool,
    progress_callback: Option<ProgressCallback>,
}

impl Batch {
    pub fn new(config: EngineConfig, requested: Vec<String>) -> Self {
        Self {
            config,
            requested,
            workers: 1,
            infer_languages: true,
            progress_callback: None,
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Whether to infer the language set from the corpus when none is configured
    pub fn infer_languages(mut self, infer: bool) -> Self {
        self.infer_languages = infer;
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Evaluate every record.
    ///
    /// Only pool construction can fail; metric failures end up in the
    /// per-record diagnostics.
    pub fn run(&self, records: &[Record]) -> anyhow::Result<BatchReport> {
        let config = if self.infer_languages && self.config.languages().is_none() {
            let inferred = self
                .config
                .with_inferred_languages(records.iter().flat_map(|r| r.tags.iter()));
            info!(
                "Inferred {} language tag(s) from corpus",
                inferred.languages().map_or(0, |l| l.len())
            );
            inferred
        } else {
            self.config.clone()
        };

        info!(
            "Evaluating {} metric request(s) over {} record(s) with {} worker(s)",
            self.requested.len(),
            records.len(),
            self.workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        let completed = AtomicUsize::new(0);
        let total = records.len();
        let reports: Vec<RecordReport> = pool.install(|| {
            records
                .par_iter()
                .enumerate()
                .map(|(index, record)| {
                    let report = evaluate_record(index, record, &self.requested, &config);
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback(done, total);
                    }
                    report
                })
                .collect()
        });

        let summary = CorpusSummary::from_records(records, &config);
        let batch = BatchReport {
            config,
            summary,
            records: reports,
        };
        info!(
            "Batch complete: {} record(s), {} diagnostic(s)",
            batch.records.len(),
            batch.diagnostic_count()
        );
        Ok(batch)
    }
}
