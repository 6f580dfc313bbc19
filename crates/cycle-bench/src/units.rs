//! Display-time rescaling of cycle counts into named time units.

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};
use crate::stats::Statistics;

/// A named unit worth a whole number of cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeUnit {
    name: String,
    cycles_per_unit: u64,
}

impl TimeUnit {
    /// Create a unit; `cycles_per_unit` must be non-zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use cycle_bench::TimeUnit;
    ///
    /// // 3 GHz core clock
    /// let ns = TimeUnit::new("ns", 3).unwrap();
    /// assert_eq!(ns.convert_cycles(3_000), 1_000);
    /// assert!(TimeUnit::new("broken", 0).is_err());
    /// ```
    pub fn new(name: impl Into<String>, cycles_per_unit: u64) -> Result<Self> {
        let name = name.into();
        if cycles_per_unit == 0 {
            return Err(BenchError::InvalidUnit(format!(
                "{}: cycles_per_unit must be at least 1",
                name
            )));
        }
        Ok(Self {
            name,
            cycles_per_unit,
        })
    }

    /// The identity unit.
    pub fn cycles() -> Self {
        Self {
            name: "cycles".to_string(),
            cycles_per_unit: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cycles_per_unit(&self) -> u64 {
        self.cycles_per_unit
    }

    /// Convert a raw cycle count, truncating.
    pub fn convert_cycles(&self, cycles: u64) -> u64 {
        cycles / self.cycles_per_unit
    }

    /// Rescale every cycle-denominated field of `stats` for display.
    ///
    /// Integer fields use integer division, float fields float division;
    /// `count` and `denominator` are carried over unchanged.
    pub fn convert(&self, stats: &Statistics) -> Statistics {
        let per_unit = self.cycles_per_unit as f64;
        Statistics {
            count: stats.count,
            denominator: stats.denominator,
            baseline: self.convert_cycles(stats.baseline),
            abs_min: self.convert_cycles(stats.abs_min),
            abs_max: self.convert_cycles(stats.abs_max),
            min: stats.min / per_unit,
            q1: stats.q1 / per_unit,
            median: stats.median / per_unit,
            q3: stats.q3 / per_unit,
            max: stats.max / per_unit,
            mean: stats.mean / per_unit,
            sd: stats.sd / per_unit,
            ci95_lo: stats.ci95_lo / per_unit,
            ci95_hi: stats.ci95_hi / per_unit,
        }
    }
}

impl Default for TimeUnit {
    fn default() -> Self {
        Self::cycles()
    }
}
