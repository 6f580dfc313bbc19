//! Statistics reporting
//!
//! This module handles formatting and outputting statistics in human-readable
//! text or JSON.
//!
//! # Output Formats
//!
//! - **Console**: the robust/parametric summary lines
//! - **JSON**: machine-readable export, compact or pretty-printed
//!
//! # Example
//!
//! ```
//! use cycle_bench::reporter::{OutputFormat, Reporter};
//! use cycle_bench::stats::Statistics;
//!
//! # fn example() -> cycle_bench::Result<()> {
//! let stats = Statistics::from_values(&[30, 31, 31, 32, 31], 1, 24);
//!
//! let mut out = Vec::new();
//! Reporter::new(OutputFormat::Console).report(&mut out, Some("loop"), &stats, None)?;
//! assert!(String::from_utf8_lossy(&out).contains("median 31.0 cycles"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod console;
mod json;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::stats::Statistics;
use crate::units::TimeUnit;

pub use console::ConsoleReporter;
pub use json::{JsonReporter, StatisticsReport};

/// Output format for statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Console output
    #[default]
    Console,
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

/// Reporter for statistics
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write a summary to `out`
    pub fn report<W: Write>(
        &self,
        out: &mut W,
        title: Option<&str>,
        stats: &Statistics,
        unit: Option<&TimeUnit>,
    ) -> Result<()> {
        let output = self.format_statistics(title, stats, unit)?;
        out.write_all(output.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Write a summary to a file
    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        title: Option<&str>,
        stats: &Statistics,
        unit: Option<&TimeUnit>,
    ) -> Result<()> {
        let output = self.format_statistics(title, stats, unit)?;
        fs::write(path, output)?;
        Ok(())
    }

    /// Format a summary as a string
    pub fn format_statistics(
        &self,
        title: Option<&str>,
        stats: &Statistics,
        unit: Option<&TimeUnit>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Console => Ok(ConsoleReporter::format(title, stats, unit)),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let report = StatisticsReport::new(title, stats, unit);
                let pretty = self.format == OutputFormat::JsonPretty;
                let mut output = JsonReporter::format(&report, pretty).map_err(io::Error::from)?;
                output.push('\n');
                Ok(output)
            }
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}
