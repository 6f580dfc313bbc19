//! Configuration parsing for measurement rounds
//!
//! This module provides TOML-based configuration for the sample store:
//! buffer capacity, denominator, histogram bin cap, outlier filtering and
//! the display unit.
//!
//! ```toml
//! [bench]
//! capacity = 128
//! denominator = 32
//!
//! [outliers]
//! mode = "histogram_cutoff"
//! cutoff = 1
//!
//! [unit]
//! name = "ns"
//! cycles_per_unit = 3
//! ```

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::histogram::MAX_BINS;
use crate::stats::outliers::{DEFAULT_HISTOGRAM_CUTOFF, DEFAULT_SD_WIDTH};
use crate::stats::OutlierMode;
use crate::units::TimeUnit;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sample store settings
    #[serde(default)]
    pub bench: BenchConfig,
    /// Outlier filtering applied when rendering histograms
    #[serde(default)]
    pub outliers: OutliersConfig,
    /// Display unit; raw cycles when absent
    #[serde(default)]
    pub unit: Option<UnitConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - A value fails [`validate`](Self::validate)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cycle_bench::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("bench.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use cycle_bench::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [bench]
    ///     capacity = 64
    ///
    ///     [outliers]
    ///     mode = "standard_deviation"
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.bench.capacity, 64);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.bench.capacity >= 1, "bench.capacity must be at least 1");
        ensure!(self.bench.denominator >= 1, "bench.denominator must be at least 1");
        ensure!(
            self.bench.max_bins >= 2,
            "bench.max_bins must be at least 2 (got {})",
            self.bench.max_bins
        );
        ensure!(
            self.outliers.sd_width.is_finite() && self.outliers.sd_width > 0.0,
            "outliers.sd_width must be a positive number (got {})",
            self.outliers.sd_width
        );
        ensure!(self.outliers.cutoff >= 1, "outliers.cutoff must be at least 1");
        if let Some(unit) = &self.unit {
            ensure!(
                unit.cycles_per_unit >= 1,
                "unit.cycles_per_unit must be at least 1"
            );
        }
        Ok(())
    }

    /// The outlier mode with its configured threshold.
    pub fn outlier_mode(&self) -> OutlierMode {
        match self.outliers.mode {
            OutlierMethod::Off => OutlierMode::Off,
            OutlierMethod::StandardDeviation => OutlierMode::StandardDeviation {
                width: self.outliers.sd_width,
            },
            OutlierMethod::HistogramCutoff => OutlierMode::HistogramCutoff {
                cutoff: self.outliers.cutoff,
            },
        }
    }

    /// The configured display unit, if any.
    pub fn time_unit(&self) -> anyhow::Result<Option<TimeUnit>> {
        self.unit
            .as_ref()
            .map(|unit| {
                TimeUnit::new(unit.name.clone(), unit.cycles_per_unit)
                    .context("Invalid [unit] configuration")
            })
            .transpose()
    }
}

/// Sample store parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Samples per measurement round (default: 128)
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Divisor applied to every statistic, e.g. loop iterations per sample
    /// (default: 1)
    #[serde(default = "default_denominator")]
    pub denominator: u32,
    /// Upper bound on histogram bins (default: 16)
    #[serde(default = "default_max_bins")]
    pub max_bins: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            denominator: default_denominator(),
            max_bins: default_max_bins(),
        }
    }
}

fn default_capacity() -> usize {
    128
}

fn default_denominator() -> u32 {
    1
}

fn default_max_bins() -> usize {
    MAX_BINS
}

/// Outlier filtering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutliersConfig {
    #[serde(default)]
    pub mode: OutlierMethod,
    /// Window half-width in standard deviations (default: 3.0)
    #[serde(default = "default_sd_width")]
    pub sd_width: f64,
    /// Values occurring this often or less are dropped (default: 1)
    #[serde(default = "default_cutoff")]
    pub cutoff: usize,
}

impl Default for OutliersConfig {
    fn default() -> Self {
        Self {
            mode: OutlierMethod::default(),
            sd_width: default_sd_width(),
            cutoff: default_cutoff(),
        }
    }
}

fn default_sd_width() -> f64 {
    DEFAULT_SD_WIDTH
}

fn default_cutoff() -> usize {
    DEFAULT_HISTOGRAM_CUTOFF
}

/// Outlier filter selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// No filtering
    #[default]
    Off,
    /// Keep samples within `mean ± sd_width * sd`
    StandardDeviation,
    /// Keep exact values occurring more than `cutoff` times
    HistogramCutoff,
}

/// Display unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConfig {
    pub name: String,
    pub cycles_per_unit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bench.capacity, 128);
        assert_eq!(config.bench.denominator, 1);
        assert_eq!(config.bench.max_bins, 16);
        assert_eq!(config.outlier_mode(), OutlierMode::Off);
        assert_eq!(config.time_unit().unwrap(), None);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [bench]
            capacity = 256
            denominator = 32
            max_bins = 20

            [outliers]
            mode = "standard_deviation"
            sd_width = 2.5

            [unit]
            name = "ns"
            cycles_per_unit = 3
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.bench.capacity, 256);
        assert_eq!(config.bench.denominator, 32);
        assert_eq!(config.bench.max_bins, 20);
        assert_eq!(
            config.outlier_mode(),
            OutlierMode::StandardDeviation { width: 2.5 }
        );

        let unit = config.time_unit().unwrap().unwrap();
        assert_eq!(unit.name(), "ns");
        assert_eq!(unit.cycles_per_unit(), 3);
    }

    #[test]
    fn test_histogram_cutoff_mode() {
        let toml = r#"
            [outliers]
            mode = "histogram_cutoff"
            cutoff = 2
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(
            config.outlier_mode(),
            OutlierMode::HistogramCutoff { cutoff: 2 }
        );
    }

    #[test]
    fn test_default_thresholds() {
        let config = Config::from_str("[outliers]\nmode = \"histogram_cutoff\"").unwrap();
        assert_eq!(config.outlier_mode(), OutlierMode::histogram_cutoff());

        let config = Config::from_str("[outliers]\nmode = \"standard_deviation\"").unwrap();
        assert_eq!(config.outlier_mode(), OutlierMode::standard_deviation());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = Config::from_str("[outliers]\nmode = \"median\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            ("[bench]\ncapacity = 0", "bench.capacity"),
            ("[bench]\ndenominator = 0", "bench.denominator"),
            ("[bench]\nmax_bins = 1", "bench.max_bins"),
            ("[outliers]\nsd_width = 0.0", "outliers.sd_width"),
            ("[outliers]\nsd_width = -1.0", "outliers.sd_width"),
            ("[outliers]\ncutoff = 0", "outliers.cutoff"),
            ("[unit]\nname = \"ns\"\ncycles_per_unit = 0", "unit.cycles_per_unit"),
        ];

        for (toml, field) in cases {
            let err = Config::from_str(toml).unwrap_err();
            assert!(
                format!("{:#}", err).contains(field),
                "expected {} in error for {:?}, got {:#}",
                field,
                toml,
                err
            );
        }
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/bench.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir()
            .join(format!("cycle-bench-config-{}.toml", std::process::id()));
        fs::write(&path, "[bench]\ncapacity = 12\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.bench.capacity, 12);
    }
}
