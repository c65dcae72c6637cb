//! Default command: read a corpus, evaluate the requested metrics, write the report

use super::Cli;
use anyhow::{Context, Result};
use console::style;
use csmetrics::batch::{Batch, BatchReport};
use csmetrics::config::{
    load_config_file, load_project_config, EngineConfig, InputConfig, Layout, ProjectConfig,
    SwitchEntropyForm,
};
use csmetrics::corpus::{self, Record};
use csmetrics::metrics::ALL_METRICS;
use csmetrics::reporters::{self, OutputFormat, RenderOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const DEFAULT_WORKERS: usize = 4;

/// Settings after merging CLI flags over the config file over built-in defaults
#[derive(Debug)]
struct Settings {
    engine: EngineConfig,
    input: InputConfig,
    metrics: Vec<String>,
    format: OutputFormat,
    workers: usize,
    render: RenderOptions,
}

impl Settings {
    fn resolve(cli: &Cli, mut project: ProjectConfig) -> Result<Self> {
        let languages = &mut project.languages;
        if !cli.langs.is_empty() {
            languages.tags = Some(cli.langs.clone());
        }
        if !cli.exclude.is_empty() {
            languages.excluded = cli.exclude.clone();
        }
        if let Some(k) = cli.num_langs {
            languages.k = Some(k);
        }
        if cli.ignore_case {
            languages.case_sensitive = Some(false);
        }
        if let Some(ref form) = cli.switch_entropy {
            languages.switch_entropy = Some(SwitchEntropyForm::from_str(form)?);
        }

        let input = &mut project.input;
        if let Some(ref delimiter) = cli.delimiter {
            input.delimiter = delimiter.clone();
        }
        if let Some(column) = cli.column {
            input.column = column;
        }
        if cli.header {
            input.header = true;
        }
        if let Some(ref layout) = cli.layout {
            input.layout = Layout::from_str(layout)?;
        }

        let engine = project.engine_config()?;
        let input = project.input.validate()?;

        let defaults = project.defaults;
        let metrics = if !cli.functions.is_empty() {
            cli.functions.clone()
        } else if !defaults.metrics.is_empty() {
            defaults.metrics
        } else {
            vec![ALL_METRICS.to_string()]
        };
        let format = match cli.format.as_deref().or(defaults.format.as_deref()) {
            Some(name) => OutputFormat::from_str(name)?,
            None => OutputFormat::Text,
        };
        let workers = cli
            .workers
            .or(defaults.workers)
            .unwrap_or(DEFAULT_WORKERS)
            .clamp(1, 64);

        Ok(Self {
            engine,
            input,
            metrics,
            format,
            workers,
            render: RenderOptions {
                precision: cli.precision.or(defaults.precision),
                verbose: cli.verbose,
            },
        })
    }
}

/// Run the default command
pub fn run(cli: &Cli) -> Result<()> {
    let project = match cli.config {
        Some(ref path) => load_config_file(path)?,
        None => load_project_config(Path::new(".")),
    };
    let settings = Settings::resolve(cli, project)?;
    debug!("Resolved settings: {:?}", settings);

    if let (Some(infile), Some(outfile)) = (cli.infile.as_deref(), cli.outfile.as_deref()) {
        ensure_distinct(infile, outfile)?;
    }
    let records = read_input(cli.infile.as_deref(), &settings.input)?;

    let bar = cli.progress.then(|| create_progress_bar(records.len()));
    let mut batch = Batch::new(settings.engine.clone(), settings.metrics.clone())
        .workers(settings.workers);
    if let Some(ref bar) = bar {
        let bar = bar.clone();
        batch = batch.with_progress(Box::new(move |done, _| bar.set_position(done as u64)));
    }
    let report = batch.run(&records)?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let rendered = reporters::report_with_format(&report, settings.format, settings.render)?;
    write_output(cli.outfile.as_deref(), &rendered)?;

    let diagnostics = print_diagnostics(&report);
    if cli.strict && diagnostics > 0 {
        eprintln!(
            "Failing due to --strict: {} metric(s) could not be computed",
            diagnostics
        );
        std::process::exit(2);
    }
    Ok(())
}

/// Refuse an output path that names the corpus itself
fn ensure_distinct(infile: &Path, outfile: &Path) -> Result<()> {
    let (Ok(input), Ok(output)) = (infile.canonicalize(), outfile.canonicalize()) else {
        return Ok(());
    };
    if input == output {
        anyhow::bail!(
            "Output file {} is the input file; -l takes a comma separated list (-l EN,HI)",
            outfile.display()
        );
    }
    Ok(())
}

fn read_input(path: Option<&Path>, input: &InputConfig) -> Result<Vec<Record>> {
    let records = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open corpus file {}", path.display()))?;
            corpus::read_records(BufReader::new(file), input)
                .with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => corpus::read_records(io::stdin().lock(), input)
            .context("Failed to read corpus from stdin")?,
    };
    info!("Read {} record(s)", records.len());
    Ok(records)
}

fn write_output(path: Option<&Path>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(rendered.as_bytes())?;
            writer
                .flush()
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Print per-record diagnostics to stderr, returning how many there were
fn print_diagnostics(report: &BatchReport) -> usize {
    let mut count = 0;
    for record in &report.records {
        for (name, err) in record.diagnostics() {
            eprintln!(
                "{} record {} (line {}): {}",
                style("warning:").for_stderr().yellow().bold(),
                record.record,
                record.line,
                style(err).for_stderr().dim()
            );
            debug!("diagnostic for '{}' has kind {}", name, err.kind());
            count += 1;
        }
    }
    count
}

fn create_progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(bar_style.progress_chars("█▓▒░  "));
    }
    bar.set_message("Evaluating records...");
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["csmetrics"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_builtin_defaults() {
        let settings = Settings::resolve(&cli(&[]), ProjectConfig::default()).unwrap();
        assert_eq!(settings.metrics, vec!["metrics"]);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.workers, 4);
        assert_eq!(settings.input.delimiter, "\t");
        assert!(settings.engine.languages().is_none());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let project: ProjectConfig = toml::from_str(
            r#"
[languages]
tags = ["EN", "ES"]
excluded = ["NE"]

[input]
delimiter = ","
column = 3

[defaults]
format = "json"
metrics = ["cmi"]
workers = 2
"#,
        )
        .unwrap();
        let settings = Settings::resolve(
            &cli(&["-l", "en,hi", "--ignore-case", "-c", "1", "--format", "tsv"]),
            project,
        )
        .unwrap();

        let langs: Vec<&str> = settings
            .engine
            .languages()
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(langs, vec!["en", "hi"]);
        assert!(settings.engine.excluded().contains("ne"));
        assert_eq!(settings.input.delimiter, ",");
        assert_eq!(settings.input.column, 1);
        assert_eq!(settings.format, OutputFormat::Tsv);
        assert_eq!(settings.metrics, vec!["cmi"]);
        assert_eq!(settings.workers, 2);
    }

    #[test]
    fn test_overlapping_sets_are_rejected() {
        let err = Settings::resolve(&cli(&["-l", "EN,NE", "-x", "NE"]), ProjectConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("both language and excluded"));
    }

    #[test]
    fn test_output_must_differ_from_input() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.tsv");
        std::fs::write(&corpus, "EN\nHI\n").unwrap();

        let err = ensure_distinct(&corpus, &dir.path().join(".").join("corpus.tsv")).unwrap_err();
        assert!(err.to_string().contains("is the input file"));
        assert!(ensure_distinct(&corpus, &dir.path().join("metrics.txt")).is_ok());
    }

    #[test]
    fn test_delimiter_alias() {
        let settings =
            Settings::resolve(&cli(&["-d", "comma"]), ProjectConfig::default()).unwrap();
        assert_eq!(settings.input.delimiter, ",");
        let err = Settings::resolve(&cli(&["-d", ""]), ProjectConfig::default()).unwrap_err();
        assert!(err.to_string().contains("delimiter"));
    }
}
