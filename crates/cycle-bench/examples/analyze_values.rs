//! Analyze previously recorded samples, one integer per line
//!
//! Usage: cargo run -p cycle-bench --example analyze_values -- <samples.txt> [denominator] [--json]

use anyhow::{Context, Result};
use cycle_bench::reporter::{OutputFormat, Reporter};
use cycle_bench::{OutlierMode, SampleStore};
use std::env;
use std::fs;
use std::io;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let path = args
        .first()
        .context("Usage: analyze_values <samples.txt> [denominator] [--json]")?;
    let denominator = match args.get(1).filter(|a| !a.starts_with("--")) {
        Some(d) => d.parse().with_context(|| format!("Invalid denominator: {}", d))?,
        None => 1,
    };
    let json = args.iter().any(|a| a == "--json");

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let values = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.parse::<u64>().with_context(|| format!("Invalid sample: {}", line)))
        .collect::<Result<Vec<_>>>()?;

    let mut store = SampleStore::create(values.len().max(1))?;
    store.set_denominator(denominator);
    store.set_outlier_mode(OutlierMode::histogram_cutoff());
    store.load_raw_values(&values)?;
    let stats = store.statistics();

    let mut out = io::stdout().lock();
    if json {
        Reporter::new(OutputFormat::JsonPretty).report(&mut out, Some(path), &stats, None)?;
    } else {
        store.render_statistics(&mut out, Some(path), &stats, None)?;
        store.render_histogram(&mut out, Some(path), &stats, None)?;
    }
    Ok(())
}
