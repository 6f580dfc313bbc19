//! Text histograms and outlier-filtered re-analysis.
//!
//! Samples are scaled once, by integer division through the denominator, and
//! binned between `abs_min / denominator` and `abs_max / denominator`. Bins
//! start one unit wide and double until at most `max_bins` remain, so memory
//! and display width stay bounded whatever the spread of the data.
//!
//! ```text
//! baseline (5 bins of size 1)
//!   24 [  3]: ******
//!   25 [ 50]: **************************************************
//!   26 [ 12]: ************
//!   27 [  0]:
//!   28 [  1]: .
//! ```

use serde::Serialize;
use std::io::Write;
use tracing::{debug, warn};

use crate::error::Result;
use crate::reporter::ConsoleReporter;
use crate::stats::{OutlierMode, Statistics};
use crate::units::TimeUnit;

/// Default upper bound on the number of bins.
pub const MAX_BINS: usize = 16;

/// One histogram bin covering `start..=end` (denominator-scaled cycles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bin {
    pub start: u64,
    pub end: u64,
    pub count: usize,
}

/// Binned view of a sample set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    pub bin_width: u64,
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Number of bins and bin width for the scaled range `min..=max`.
    ///
    /// # Panics
    ///
    /// Panics if `max_bins < 2` or `max < min`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cycle_bench::histogram::Histogram;
    ///
    /// assert_eq!(Histogram::layout(20, 35, 16), (16, 1));
    /// assert_eq!(Histogram::layout(20, 36, 16), (9, 2));
    /// ```
    pub fn layout(min: u64, max: u64, max_bins: usize) -> (usize, u64) {
        assert!(max_bins >= 2, "histogram needs at least 2 bins (got {})", max_bins);
        assert!(max >= min, "histogram range is inverted");

        // compare bin indices, not counts, so a full u64 range cannot overflow
        let delta = max - min;
        let last_index = max_bins as u64 - 1;
        let mut width: u64 = 1;
        while delta / width > last_index {
            width <<= 1;
        }
        ((delta / width) as usize + 1, width)
    }

    /// Bin `values`, which `stats` must describe.
    ///
    /// Returns `None` when there is nothing to bin (`count < 1` or an
    /// inverted range).
    pub fn build(stats: &Statistics, values: &[u64], max_bins: usize) -> Option<Self> {
        if stats.count < 1 || stats.max < stats.min || values.is_empty() {
            return None;
        }

        let denominator = u64::from(stats.denominator.max(1));
        let min = stats.abs_min / denominator;
        let max = stats.abs_max / denominator;
        let (bin_count, width) = Self::layout(min, max, max_bins);

        let mut bins: Vec<Bin> = (0..bin_count as u64)
            .map(|i| {
                let start = min + i * width;
                Bin {
                    start,
                    end: start.saturating_add(width - 1),
                    count: 0,
                }
            })
            .collect();

        let last = bin_count - 1;
        for &v in values {
            let index = ((v / denominator).saturating_sub(min) / width) as usize;
            bins[index.min(last)].count += 1;
        }

        Some(Self {
            bin_width: width,
            bins,
        })
    }

    /// Highest bin count.
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Write the header line and one row per bin.
    ///
    /// Bars are 50 characters at the highest bin: `*` per 2% of that bin's
    /// count and a trailing `.` for a remaining 1%.
    pub fn write<W: Write>(&self, out: &mut W, title: Option<&str>) -> std::io::Result<()> {
        match title {
            Some(title) => writeln!(
                out,
                "{} ({} bins of size {})",
                title,
                self.bins.len(),
                self.bin_width
            )?,
            None => writeln!(out, "({} bins of size {})", self.bins.len(), self.bin_width)?,
        }

        let highest = self.max_count().max(1);
        for bin in &self.bins {
            if self.bin_width == 1 {
                write!(out, "{:4} [{:3}]: ", bin.start, bin.count)?;
            } else {
                write!(out, "{:4} - {:4} [{:3}]: ", bin.start, bin.end, bin.count)?;
            }

            let percent = bin.count * 100 / highest;
            write!(out, "{}", "*".repeat(percent / 2))?;
            if percent % 2 == 1 {
                write!(out, ".")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Result of one outlier-filtering pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierReport {
    pub mode: OutlierMode,
    pub removed: usize,
    pub statistics: Statistics,
}

/// Renders histograms and re-analyzes outlier-filtered subsets.
///
/// The engine borrows the filtered-output and working buffers from its
/// owner, typically a [`SampleStore`](crate::SampleStore), so rendering never
/// allocates beyond what was reserved at creation.
pub struct HistogramEngine<'a> {
    mode: OutlierMode,
    max_bins: usize,
    kept: &'a mut Vec<u64>,
    working: &'a mut Vec<Option<u64>>,
}

impl<'a> HistogramEngine<'a> {
    /// # Panics
    ///
    /// Panics if `max_bins < 2`.
    pub fn new(
        mode: OutlierMode,
        max_bins: usize,
        kept: &'a mut Vec<u64>,
        working: &'a mut Vec<Option<u64>>,
    ) -> Self {
        assert!(max_bins >= 2, "histogram needs at least 2 bins (got {})", max_bins);
        Self {
            mode,
            max_bins,
            kept,
            working,
        }
    }

    /// Filter `values` with the configured mode and compute statistics of
    /// what is kept.
    ///
    /// Returns `None` when the mode is off or `values` is below the mode's
    /// minimum sample count. The kept values stay in the engine's buffer,
    /// sorted, until the next call.
    pub fn filter_outliers(&mut self, values: &[u64], stats: &Statistics) -> Option<OutlierReport> {
        if !self.mode.filter(values, stats, self.kept, self.working) {
            return None;
        }

        let statistics = Statistics::compute(self.kept, stats.denominator, stats.baseline);
        let removed = values.len() - statistics.count;
        debug!(method = %self.mode, removed, kept = statistics.count, "Removed outliers");
        if statistics.is_empty() {
            warn!(method = %self.mode, "Outlier filter removed every sample");
        }

        Some(OutlierReport {
            mode: self.mode,
            removed,
            statistics,
        })
    }

    /// Render the histogram of `values` and, when `apply_outlier_filter` is
    /// set and the mode is enabled, an "after outlier removal" section.
    ///
    /// The filtered section is rendered by calling back into this method with
    /// `apply_outlier_filter = false`, so filtering happens at most one level
    /// deep. Returns the filtered statistics when filtering took place, the
    /// input statistics otherwise.
    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        title: Option<&str>,
        stats: &Statistics,
        unit: Option<&TimeUnit>,
        values: &[u64],
        apply_outlier_filter: bool,
    ) -> Result<Statistics> {
        let Some(histogram) = Histogram::build(stats, values, self.max_bins) else {
            return Ok(*stats);
        };
        histogram.write(out, title)?;

        if !apply_outlier_filter || !self.mode.is_enabled() {
            return Ok(*stats);
        }

        let Some(report) = self.filter_outliers(values, stats) else {
            return Ok(*stats);
        };

        writeln!(out)?;
        writeln!(out, "After outlier removal (method {}):", report.mode)?;
        ConsoleReporter::write_statistics(
            out,
            title,
            &report.statistics,
            unit,
            Some(report.removed),
        )?;

        let kept = std::mem::take(self.kept);
        let rendered = self.render(out, None, &report.statistics, unit, &kept, false);
        *self.kept = kept;
        rendered?;

        writeln!(out)?;
        Ok(report.statistics)
    }
}
