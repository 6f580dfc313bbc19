//! Statistical analysis of cycle-count samples
//!
//! This module provides the robust (median, quartiles) and parametric (mean,
//! SD, 95% confidence interval) summaries, the t distribution lookup they use,
//! and the two outlier filters.
//!
//! # Examples
//!
//! ```
//! use cycle_bench::stats::{OutlierMode, Statistics};
//!
//! let mut samples: Vec<u64> = vec![31; 25];
//! samples.extend([30, 30, 32, 32, 480]);
//!
//! let stats = Statistics::compute(&mut samples, 1, 0);
//! assert_eq!(stats.median, 31.0);
//!
//! let mut kept = Vec::new();
//! let mut working = Vec::new();
//! assert!(OutlierMode::histogram_cutoff().filter(&samples, &stats, &mut kept, &mut working));
//! assert!(!kept.contains(&480));
//! ```

pub mod outliers;
pub mod percentiles;
pub mod t_table;

// Re-export main types and functions
pub use outliers::{filter_by_frequency, filter_by_standard_deviation, OutlierMode};
pub use percentiles::{percentile, Statistics};
pub use t_table::t_value;
