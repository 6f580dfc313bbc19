//! Compare an element-wise copy loop against `copy_from_slice`
//!
//! Usage: cargo run --release -p cycle-bench --example copy_compare -- [config.toml]
//!
//! Set `RUST_LOG=cycle_bench=debug` to see the calibration report.

use anyhow::{ensure, Result};
use cycle_bench::config::Config;
use cycle_bench::{SampleStore, TimeUnit};
use std::env;
use std::io::{self, Write};

fn copy_with_loop(src: &[u64], dst: &mut [u64]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = *s;
    }
}

fn copy_with_slice(src: &[u64], dst: &mut [u64]) {
    dst.copy_from_slice(src);
}

fn run<W: Write>(
    out: &mut W,
    store: &mut SampleStore,
    title: &str,
    copy: fn(&[u64], &mut [u64]),
    src: &[u64],
    unit: Option<&TimeUnit>,
) -> Result<()> {
    let mut dst = vec![0u64; src.len()];
    store.reset();
    for _ in 0..store.capacity() {
        dst.fill(0);
        store.measure(|| copy(src, &mut dst));
        ensure!(dst == src, "Mismatch in copied values in {}", title);
    }

    let stats = store.statistics();
    store.render_statistics(out, Some(title), &stats, unit)?;
    store.render_histogram(out, Some(title), &stats, unit)?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let unit = config.time_unit()?;
    let mut store = SampleStore::from_config(&config)?;
    println!("Counter overhead: {} cycles", store.baseline());

    let small: Vec<u64> = (0..101).map(|i| i * 3).collect();
    let large: Vec<u64> = (0..1024).map(|i| i * 3).collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&mut out, &mut store, "1) loop", copy_with_loop, &small, unit.as_ref())?;
    run(&mut out, &mut store, "2) copy_from_slice", copy_with_slice, &small, unit.as_ref())?;
    run(&mut out, &mut store, "3) loop, again", copy_with_loop, &small, unit.as_ref())?;
    run(&mut out, &mut store, "4) loop, more data", copy_with_loop, &large, unit.as_ref())?;
    run(
        &mut out,
        &mut store,
        "5) copy_from_slice, more data",
        copy_with_slice,
        &large,
        unit.as_ref(),
    )?;
    run(&mut out, &mut store, "6) loop, more data, again", copy_with_loop, &large, unit.as_ref())?;

    store.teardown();
    Ok(())
}
