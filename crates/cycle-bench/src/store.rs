//! Fixed-capacity sample storage with counter-overhead calibration.
//!
//! A [`SampleStore`] owns three equally sized buffers: the raw samples, the
//! outlier-filtered output and the scratch space of the frequency filter. All
//! three are reserved up front, so a measurement round never allocates and a
//! failed reservation leaves nothing behind.
//!
//! Creating a store measures the overhead of an empty start/stop pair and
//! subtracts it from every later sample as the `baseline`.

use std::collections::TryReserveError;
use std::hint::black_box;
use std::io::Write;

use anyhow::Context;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::counter::{CycleCounter, TscCounter};
use crate::error::{BenchError, Result};
use crate::histogram::{HistogramEngine, MAX_BINS};
use crate::reporter::ConsoleReporter;
use crate::stats::{OutlierMode, Statistics};
use crate::units::TimeUnit;

/// Warm-up passes plus the measured pass used for calibration.
const CALIBRATION_PASSES: usize = 3;

/// Denominator used when none is configured.
pub const DEFAULT_DENOMINATOR: u32 = 1;

/// Baseline-corrected cycle samples for one measurement round.
///
/// # Example
///
/// ```no_run
/// use cycle_bench::{OutlierMode, SampleStore};
///
/// # fn example() -> cycle_bench::Result<()> {
/// let mut store = SampleStore::create(128)?;
/// store.set_outlier_mode(OutlierMode::histogram_cutoff());
///
/// let src = vec![0u8; 4096];
/// let mut dst = vec![0u8; 4096];
/// for _ in 0..store.capacity() {
///     store.measure(|| dst.copy_from_slice(&src));
/// }
///
/// let stats = store.statistics();
/// let mut out = std::io::stdout();
/// store.render_statistics(&mut out, Some("copy"), &stats, None)?;
/// store.render_histogram(&mut out, Some("copy"), &stats, None)?;
/// # Ok(())
/// # }
/// ```
pub struct SampleStore<C: CycleCounter = TscCounter> {
    counter: C,
    capacity: usize,
    baseline: u64,
    denominator: u32,
    outlier_mode: OutlierMode,
    max_bins: usize,
    calibration: Statistics,
    samples: Vec<u64>,
    kept: Vec<u64>,
    working: Vec<Option<u64>>,
}

impl SampleStore<TscCounter> {
    /// Create a calibrated store on the platform cycle counter.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidCapacity`] for a zero capacity and
    /// [`BenchError::Allocation`] when the buffers cannot be reserved.
    pub fn create(capacity: usize) -> Result<Self> {
        Self::with_counter(TscCounter, capacity)
    }

    /// Create a calibrated store from validated configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::from_config_with_counter(TscCounter, config)
    }
}

impl<C: CycleCounter> SampleStore<C> {
    /// Create a calibrated store reading `counter`, with outlier filtering
    /// off and the default bin cap.
    pub fn with_counter(counter: C, capacity: usize) -> Result<Self> {
        let mut store = Self::allocate(counter, capacity, OutlierMode::Off, MAX_BINS)?;
        store.calibrate()?;
        Ok(store)
    }

    /// Create a calibrated store reading `counter` with the settings in
    /// `config`.
    ///
    /// The configured outlier mode and bin cap already apply to calibration;
    /// the denominator applies from the first measurement round on.
    pub fn from_config_with_counter(counter: C, config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let mut store = Self::allocate(
            counter,
            config.bench.capacity,
            config.outlier_mode(),
            config.bench.max_bins,
        )
        .context("Failed to create sample store")?;
        store.calibrate().context("Failed to calibrate sample store")?;
        store.set_denominator(config.bench.denominator);
        Ok(store)
    }

    fn allocate(
        counter: C,
        capacity: usize,
        outlier_mode: OutlierMode,
        max_bins: usize,
    ) -> Result<Self> {
        if capacity < 1 {
            return Err(BenchError::InvalidCapacity(capacity));
        }
        assert!(max_bins >= 2, "histogram needs at least 2 bins (got {})", max_bins);

        let allocation = |source: TryReserveError| BenchError::Allocation { capacity, source };
        let samples = reserve(capacity).map_err(allocation)?;
        let kept = reserve(capacity).map_err(allocation)?;
        let working = reserve(capacity).map_err(allocation)?;

        debug!(capacity, "Reserved sample buffers");
        Ok(Self {
            counter,
            capacity,
            baseline: 0,
            denominator: DEFAULT_DENOMINATOR,
            outlier_mode,
            max_bins,
            calibration: Statistics::default(),
            samples,
            kept,
            working,
        })
    }

    /// Measure the overhead of an empty start/stop pair.
    ///
    /// Fills the buffer three times, keeps the last pass, runs it through the
    /// configured outlier filter and takes the smallest remaining value as the
    /// new baseline. Leaves the store empty.
    #[instrument(skip(self), fields(capacity = self.capacity))]
    fn calibrate(&mut self) -> Result<()> {
        self.baseline = 0;
        self.denominator = DEFAULT_DENOMINATOR;

        for _ in 0..CALIBRATION_PASSES {
            self.samples.clear();
            for _ in 0..self.capacity {
                let start = self.counter.start();
                let stop = self.counter.stop();
                self.samples.push(stop.wrapping_sub(start));
            }
        }

        let stats = self.statistics();
        let mut report = Vec::new();
        ConsoleReporter::write_statistics(&mut report, Some("baseline"), &stats, None, None)?;
        let filtered = self.render_histogram(&mut report, Some("baseline"), &stats, None)?;
        debug!(report = %String::from_utf8_lossy(&report), "Calibration report");

        self.baseline = filtered.abs_min;
        self.calibration = filtered;
        self.samples.clear();

        info!(
            baseline = self.baseline,
            samples = stats.count,
            kept = filtered.count,
            "Calibrated counter overhead"
        );
        Ok(())
    }

    /// Rerun calibration on the existing buffers.
    ///
    /// Discards stored samples; the denominator is kept.
    pub fn recalibrate(&mut self) -> Result<()> {
        let denominator = self.denominator;
        self.calibrate()?;
        self.denominator = denominator;
        Ok(())
    }

    /// Set the denominator for later statistics; zero is ignored.
    pub fn set_denominator(&mut self, denominator: u32) {
        if denominator < 1 {
            return;
        }
        self.denominator = denominator;
    }

    pub fn set_outlier_mode(&mut self, mode: OutlierMode) {
        self.outlier_mode = mode;
    }

    /// # Panics
    ///
    /// Panics if `max_bins < 2`.
    pub fn set_max_bins(&mut self, max_bins: usize) {
        assert!(max_bins >= 2, "histogram needs at least 2 bins (got {})", max_bins);
        self.max_bins = max_bins;
    }

    /// Drop stored samples; baseline, denominator and outlier mode persist.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Release the buffers.
    ///
    /// Dropping the store does the same; this only makes the end of the
    /// lifecycle visible at the call site. Tear down or drop the current store
    /// before creating its replacement so only one set of buffers is live.
    pub fn teardown(self) {
        debug!(capacity = self.capacity, "Released sample buffers");
    }

    /// Record one measurement from raw counter readings.
    ///
    /// Stores `stop - start - baseline`, or 0 when the difference is
    /// negative. The buffer must not be full; this is checked in debug builds
    /// only.
    #[inline]
    pub fn append(&mut self, start: u64, stop: u64) {
        debug_assert!(
            self.samples.len() < self.capacity,
            "sample store is full (capacity {})",
            self.capacity
        );
        let delta = stop.wrapping_sub(start).wrapping_sub(self.baseline);
        self.samples.push(if (delta as i64) < 0 { 0 } else { delta });
    }

    /// Time `f` with the store's counter and record the sample.
    #[inline]
    pub fn measure<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let start = self.counter.start();
        let result = black_box(f());
        let stop = self.counter.stop();
        self.append(start, stop);
        result
    }

    /// Statistics of the stored samples.
    ///
    /// Sorts the stored samples in place.
    pub fn statistics(&mut self) -> Statistics {
        Statistics::compute(&mut self.samples, self.denominator, self.baseline)
    }

    /// Write every stored sample, one per line.
    pub fn render_values<W: Write>(
        &self,
        out: &mut W,
        title: Option<&str>,
        unit: Option<&TimeUnit>,
    ) -> Result<()> {
        ConsoleReporter::write_values(out, title, &self.samples, unit)?;
        Ok(())
    }

    /// Write the summary of `stats`.
    pub fn render_statistics<W: Write>(
        &self,
        out: &mut W,
        title: Option<&str>,
        stats: &Statistics,
        unit: Option<&TimeUnit>,
    ) -> Result<()> {
        ConsoleReporter::write_statistics(out, title, stats, unit, None)?;
        Ok(())
    }

    /// Write the histogram of the stored samples, which `stats` must
    /// describe, followed by the outlier-filtered analysis when enabled.
    ///
    /// Returns the filtered statistics if filtering took place, `stats`
    /// otherwise.
    pub fn render_histogram<W: Write>(
        &mut self,
        out: &mut W,
        title: Option<&str>,
        stats: &Statistics,
        unit: Option<&TimeUnit>,
    ) -> Result<Statistics> {
        let mut engine = HistogramEngine::new(
            self.outlier_mode,
            self.max_bins,
            &mut self.kept,
            &mut self.working,
        );
        engine.render(out, title, stats, unit, &self.samples, true)
    }

    /// Replace the stored samples with `values`, without baseline
    /// correction.
    pub fn load_raw_values(&mut self, values: &[u64]) -> Result<()> {
        if values.len() > self.capacity {
            return Err(BenchError::CapacityExceeded {
                requested: values.len(),
                capacity: self.capacity,
            });
        }
        self.samples.clear();
        self.samples.extend_from_slice(values);
        Ok(())
    }

    /// Copy the stored samples into the front of `dest`, returning how many
    /// were copied.
    pub fn copy_raw_values(&self, dest: &mut [u64]) -> Result<usize> {
        let n = self.samples.len();
        if dest.len() < n {
            return Err(BenchError::CapacityExceeded {
                requested: n,
                capacity: dest.len(),
            });
        }
        dest[..n].copy_from_slice(&self.samples);
        Ok(n)
    }

    /// Apply `f` to every stored sample in place.
    ///
    /// Used to turn timings into derived metrics such as bytes per cycle;
    /// `f` must handle zero samples itself.
    pub fn map_values<F: FnMut(u64) -> u64>(&mut self, mut f: F) {
        for v in self.samples.iter_mut() {
            *v = f(*v);
        }
    }

    /// Stored samples, in insertion order unless [`statistics`](Self::statistics)
    /// has sorted them.
    pub fn values(&self) -> &[u64] {
        &self.samples
    }

    pub fn baseline(&self) -> u64 {
        self.baseline
    }

    /// Filtered statistics of the last calibration.
    pub fn calibration(&self) -> &Statistics {
        &self.calibration
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    pub fn outlier_mode(&self) -> OutlierMode {
        self.outlier_mode
    }

    pub fn max_bins(&self) -> usize {
        self.max_bins
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }
}

fn reserve<T>(capacity: usize) -> std::result::Result<Vec<T>, TryReserveError> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(capacity)?;
    Ok(buffer)
}
