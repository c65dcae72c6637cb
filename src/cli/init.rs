//! Init command - write a csmetrics.toml template

use anyhow::{Context, Result};
use console::style;
use csmetrics::config::TOML_CONFIG_NAME;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# csmetrics configuration
# Command-line flags override every value set here.

[languages]
# Recognized language tags. Leave unset to use every non-excluded tag in the corpus.
# tags = ["EN", "HI"]

# Tags that carry no language signal (named entities, acronyms, punctuation)
excluded = ["UNIV", "NE", "ACRO"]

# Number of languages used by the M-index (default: size of the language set)
# k = 2

# Compare tags case-sensitively
case_sensitive = true

# Switch entropy form: "binary" or "switch_term"
switch_entropy = "binary"

[input]
# Field delimiter: a literal string, "\t", "tab", "comma" or "space"
delimiter = "\t"

# Zero-based column holding the language tag(s)
column = 0

# Skip the first line
header = false

# "column": one token per line, the file is one sequence
# "record": one sequence per line, tags separated by whitespace
layout = "column"

[defaults]
# Output format (text, json, tsv)
format = "text"

# Metrics to compute when --function is not given
metrics = ["metrics"]

# Parallel workers (1-64)
workers = 4

# Decimal places for scalar values
# precision = 4
"#;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(TOML_CONFIG_NAME);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists; remove it first to regenerate",
            config_path.display()
        );
    }

    std::fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    Ok(())
}
