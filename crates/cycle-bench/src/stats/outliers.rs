//! Outlier filtering for cycle-count samples.
//!
//! Two strategies pick the subset of samples treated as representative:
//!
//! - **Standard deviation**: keep values within `mean ± width * sd` of the
//!   unfiltered statistics.
//! - **Histogram cutoff**: keep only exact values that occur more than
//!   `cutoff` times. Isolated timing spikes (interrupts, cache misses) rarely
//!   repeat to the cycle, while the real cost of a short code path does.
//!
//! Both refuse to act on small sample sets and leave the input unfiltered.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::percentiles::Statistics;

/// Default width of the standard deviation filter, in SDs.
pub const DEFAULT_SD_WIDTH: f64 = 3.0;

/// Minimum sample count before the standard deviation filter is applied.
pub const SD_MIN_SAMPLES: usize = 20;

/// Default occurrence cutoff of the histogram filter.
pub const DEFAULT_HISTOGRAM_CUTOFF: usize = 1;

/// The histogram filter needs `HISTOGRAM_MIN_SAMPLES_PER_CUTOFF * cutoff` samples.
pub const HISTOGRAM_MIN_SAMPLES_PER_CUTOFF: usize = 20;

/// Outlier detection strategy together with its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutlierMode {
    /// No outlier detection
    #[default]
    Off,
    /// Drop values further than `width` standard deviations from the mean
    StandardDeviation {
        /// Accepted distance from the mean, in SDs
        width: f64,
    },
    /// Drop values that occur `cutoff` times or less
    HistogramCutoff {
        /// Occurrence count a value must exceed to be kept
        cutoff: usize,
    },
}

impl OutlierMode {
    /// Standard deviation filter at the default width of 3 SD.
    pub fn standard_deviation() -> Self {
        OutlierMode::StandardDeviation {
            width: DEFAULT_SD_WIDTH,
        }
    }

    /// Histogram filter at the default cutoff of 1.
    pub fn histogram_cutoff() -> Self {
        OutlierMode::HistogramCutoff {
            cutoff: DEFAULT_HISTOGRAM_CUTOFF,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, OutlierMode::Off)
    }

    /// Minimum sample count for the filter to act, `None` when disabled.
    ///
    /// Saturates for huge cutoffs, which then never filter.
    pub fn min_samples(&self) -> Option<usize> {
        match self {
            OutlierMode::Off => None,
            OutlierMode::StandardDeviation { .. } => Some(SD_MIN_SAMPLES),
            OutlierMode::HistogramCutoff { cutoff } => {
                Some(HISTOGRAM_MIN_SAMPLES_PER_CUTOFF.saturating_mul(*cutoff))
            }
        }
    }

    /// Filter `values` into `kept`.
    ///
    /// `stats` must describe `values`. `working` is scratch space for the
    /// histogram filter. Returns `false` and leaves `kept` empty when the mode
    /// is off or there are too few values; callers then keep using the
    /// unfiltered statistics.
    pub fn filter(
        &self,
        values: &[u64],
        stats: &Statistics,
        kept: &mut Vec<u64>,
        working: &mut Vec<Option<u64>>,
    ) -> bool {
        kept.clear();

        let Some(min_samples) = self.min_samples() else {
            return false;
        };
        if values.len() < min_samples {
            return false;
        }

        match *self {
            OutlierMode::Off => unreachable!("off has no minimum sample count"),
            OutlierMode::StandardDeviation { width } => {
                filter_by_standard_deviation(values, stats, width, kept)
            }
            OutlierMode::HistogramCutoff { cutoff } => {
                filter_by_frequency(values, cutoff, kept, working)
            }
        }
        true
    }
}

impl fmt::Display for OutlierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierMode::Off => write!(f, "off"),
            OutlierMode::StandardDeviation { width } => {
                write!(f, "standard deviation, cutoff at {} SD", width)
            }
            OutlierMode::HistogramCutoff { cutoff } => write!(f, "histogram, cutoff {}", cutoff),
        }
    }
}

/// Keep every value within `mean ± width * sd`.
///
/// The window comes from `stats` and is fixed for the whole scan. Values are
/// divided by `stats.denominator` before comparison, matching the scale of
/// `mean` and `sd`.
///
/// # Examples
///
/// ```
/// use cycle_bench::stats::{filter_by_standard_deviation, Statistics};
///
/// let stats = Statistics { mean: 100.0, sd: 10.0, denominator: 1, ..Default::default() };
/// let mut kept = Vec::new();
/// filter_by_standard_deviation(&[105, 200, 71, 129], &stats, 3.0, &mut kept);
/// assert_eq!(kept, vec![105, 71, 129]);
/// ```
pub fn filter_by_standard_deviation(
    values: &[u64],
    stats: &Statistics,
    width: f64,
    kept: &mut Vec<u64>,
) {
    let d = width * stats.sd;
    let low = stats.mean - d;
    let high = stats.mean + d;
    let denom = f64::from(stats.denominator.max(1));

    kept.extend(values.iter().copied().filter(|&v| {
        let scaled = v as f64 / denom;
        low <= scaled && scaled <= high
    }));
}

/// Keep every exact value that occurs more than `cutoff` times.
///
/// Runs in O(n²) with no memory beyond `working`, which suits the few hundred
/// samples a microbenchmark round collects; do not use it on very large sets.
/// Kept values are grouped by value, in order of first occurrence.
///
/// # Examples
///
/// ```
/// use cycle_bench::stats::filter_by_frequency;
///
/// let mut kept = Vec::new();
/// let mut working = Vec::new();
/// filter_by_frequency(&[5, 7, 5, 9, 5], 1, &mut kept, &mut working);
/// assert_eq!(kept, vec![5, 5, 5]);
/// ```
pub fn filter_by_frequency(
    values: &[u64],
    cutoff: usize,
    kept: &mut Vec<u64>,
    working: &mut Vec<Option<u64>>,
) {
    working.clear();
    working.extend(values.iter().copied().map(Some));

    for i in 0..working.len() {
        let Some(v) = working[i] else {
            continue;
        };

        let mut occurrences = 1;
        for slot in working[i + 1..].iter_mut() {
            if *slot == Some(v) {
                *slot = None;
                occurrences += 1;
            }
        }

        if occurrences > cutoff {
            kept.extend(std::iter::repeat(v).take(occurrences));
        }
    }
}
