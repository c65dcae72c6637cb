//! List command - print every selectable metric

use anyhow::Result;
use console::style;
use csmetrics::metrics::{MetricKind, ALL_METRICS};

/// Run the list command
pub fn run() -> Result<()> {
    println!(
        "{:<18} Scalar bundle, in order: {}",
        style(ALL_METRICS).bold(),
        bundle_names()
    );
    for kind in MetricKind::all() {
        let shape = if kind.is_table() { "table" } else { "scalar" };
        println!(
            "{:<18} {} {}",
            style(kind.name()).bold(),
            kind.description(),
            style(format!("[{}]", shape)).dim()
        );
    }
    Ok(())
}

fn bundle_names() -> String {
    MetricKind::bundle()
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ")
}
