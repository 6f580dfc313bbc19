//! Robust and parametric summary statistics for cycle-count samples.
//!
//! Percentiles follow the rank-interpolation definition used by MedCalc: the
//! rank of percentile `p` in `n` sorted values is `0.5 + p * n`, and
//! fractional ranks are linearly interpolated between neighbours.

use serde::{Deserialize, Serialize};

use super::t_table::t_value;

/// Fractional ranks below this are treated as exact ranks.
///
/// Quartile and median ranks have fractional parts of 0.0, 0.25, 0.5 or 0.75,
/// so a coarse tolerance only guards against rounding close to 0.0.
const RANK_TOLERANCE: f64 = 0.001;

/// Calculate the `p` percentile of sorted raw samples, divided by `denominator`.
///
/// `p` is a fraction, not a percentage, and must lie in `[1/n, (n-1)/n]`: the
/// median needs `n >= 2`, the quartiles need `n >= 4`.
///
/// # Panics
///
/// Panics if `p` is outside the valid range for `sorted.len()` or if
/// `denominator` is zero.
///
/// # Examples
///
/// ```
/// use cycle_bench::stats::percentile;
///
/// let sorted = [1, 2, 3, 4];
/// assert_eq!(percentile(&sorted, 0.5, 1), 2.5);
/// assert_eq!(percentile(&sorted, 0.25, 1), 1.5);
/// assert_eq!(percentile(&sorted, 0.75, 2), 1.75);
/// ```
pub fn percentile(sorted: &[u64], p: f64, denominator: u32) -> f64 {
    assert!(denominator >= 1, "denominator must be at least 1");

    let n = sorted.len() as f64;
    assert!(
        1.0 / n <= p && p <= (n - 1.0) / n,
        "percentile {} is undefined for {} values",
        p,
        sorted.len()
    );

    let rank = 0.5 + p * n;
    let rank_floor = rank.floor();
    let fraction = rank - rank_floor;
    let index = rank_floor as usize - 1;

    let value = if fraction < RANK_TOLERANCE {
        sorted[index] as f64
    } else {
        (1.0 - fraction) * sorted[index] as f64 + fraction * sorted[index + 1] as f64
    };

    value / f64::from(denominator)
}

/// Descriptive statistics of one sample set.
///
/// `abs_min` and `abs_max` are raw cycle counts; every float field is already
/// divided by `denominator`. When `count > 0`,
/// `min <= q1 <= median <= q3 <= max` holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub denominator: u32,
    pub baseline: u64,
    pub abs_min: u64,
    pub abs_max: u64,

    // robust
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,

    // parametric, assumes a normal distribution
    pub mean: f64,
    pub sd: f64,
    pub ci95_lo: f64,
    pub ci95_hi: f64,
}

impl Statistics {
    /// Compute statistics for `values`, sorting them in place.
    ///
    /// The sort is part of the contract: after this call `values` is in
    /// ascending order. Use [`Statistics::from_values`] to leave the input
    /// untouched.
    ///
    /// An empty slice yields zeroed statistics that only carry `denominator`
    /// and `baseline`. Quartiles need at least 4 values and fall back to
    /// min/max below that; mean, sd and the 95% confidence interval of the
    /// mean need at least 2 values and stay zero otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use cycle_bench::stats::Statistics;
    ///
    /// let mut values = vec![4, 1, 3, 2];
    /// let stats = Statistics::compute(&mut values, 1, 0);
    ///
    /// assert_eq!(values, vec![1, 2, 3, 4]);
    /// assert_eq!(stats.median, 2.5);
    /// assert_eq!(stats.q1, 1.5);
    /// assert_eq!(stats.q3, 3.5);
    /// ```
    pub fn compute(values: &mut [u64], denominator: u32, baseline: u64) -> Self {
        assert!(denominator >= 1, "denominator must be at least 1");

        let mut result = Statistics {
            denominator,
            baseline,
            ..Default::default()
        };

        let n = values.len();
        if n == 0 {
            return result;
        }
        result.count = n;

        let denom = f64::from(denominator);
        let mut sum: u128 = 0;
        let mut min = u64::MAX;
        let mut max = 0;
        for &v in values.iter() {
            sum += u128::from(v);
            min = min.min(v);
            max = max.max(v);
        }

        let mean = sum as f64 / (denom * n as f64);
        result.mean = mean;
        result.abs_min = min;
        result.abs_max = max;
        result.min = min as f64 / denom;
        result.max = max as f64 / denom;

        if n == 1 {
            result.median = result.min;
            result.q1 = result.min;
            result.q3 = result.max;
            return result;
        }

        values.sort_unstable();
        result.median = percentile(values, 0.5, denominator);
        if n > 3 {
            result.q1 = percentile(values, 0.25, denominator);
            result.q3 = percentile(values, 0.75, denominator);
        } else {
            result.q1 = result.min;
            result.q3 = result.max;
        }

        let squares: f64 = values
            .iter()
            .map(|&v| {
                let delta = v as f64 / denom - mean;
                delta * delta
            })
            .sum();
        let sd = (squares / (n - 1) as f64).sqrt();
        let sem = sd / (n as f64).sqrt();
        let ci95_delta = t_value(n) * sem;

        result.sd = sd;
        result.ci95_lo = mean - ci95_delta;
        result.ci95_hi = mean + ci95_delta;
        result
    }

    /// Compute statistics on a sorted copy of `values`.
    pub fn from_values(values: &[u64], denominator: u32, baseline: u64) -> Self {
        let mut copy = values.to_vec();
        Self::compute(&mut copy, denominator, baseline)
    }

    /// Whether there is anything to summarize.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Interquartile range `q3 - q1`.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}
