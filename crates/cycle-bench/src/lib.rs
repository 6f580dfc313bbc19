//! Cycle-counter microbenchmark statistics
//!
//! This crate times short code fragments with the CPU cycle counter and
//! summarizes the samples for comparing implementations.
//!
//! # Features
//!
//! - **Baseline removal**: the overhead of an empty start/stop pair is measured
//!   once and subtracted from every sample
//! - **Statistical Analysis**: median and quartiles, mean with a 95% confidence
//!   interval from a t distribution table
//! - **Histograms**: at most 16 bins by default, scaled text bars
//! - **Outlier Filtering**: standard deviation window or exact-value frequency
//!   cutoff, followed by a second analysis of what is kept
//! - **Multiple Output Formats**: Console and JSON reports, optionally in a
//!   configured time unit
//!
//! # Example
//!
//! ```no_run
//! use cycle_bench::{Config, SampleStore};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("bench.toml")?;
//! let unit = config.time_unit()?;
//! let mut store = SampleStore::from_config(&config)?;
//!
//! let data: Vec<u32> = (0..1024).collect();
//! for _ in 0..store.capacity() {
//!     store.measure(|| data.iter().map(|&x| u64::from(x)).sum::<u64>());
//! }
//!
//! let stats = store.statistics();
//! let mut out = std::io::stdout();
//! store.render_statistics(&mut out, Some("sum"), &stats, unit.as_ref())?;
//! let filtered = store.render_histogram(&mut out, Some("sum"), &stats, unit.as_ref())?;
//! println!("median after filtering: {:.1}", filtered.median);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [bench]
//! capacity = 128
//! denominator = 1
//! max_bins = 16
//!
//! [outliers]
//! mode = "histogram_cutoff"
//! cutoff = 1
//!
//! [unit]
//! name = "ns"
//! cycles_per_unit = 3
//! ```

pub mod config;
pub mod counter;
pub mod error;
pub mod histogram;
pub mod reporter;
pub mod stats;
pub mod store;
pub mod units;

// Re-export main types for convenience
pub use config::Config;
pub use counter::{CycleCounter, TscCounter};
pub use error::{BenchError, Result};
pub use histogram::{Histogram, HistogramEngine, OutlierReport};
pub use reporter::{OutputFormat, Reporter};
pub use stats::{OutlierMode, Statistics};
pub use store::SampleStore;
pub use units::TimeUnit;
