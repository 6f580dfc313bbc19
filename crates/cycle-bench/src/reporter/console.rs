//! Console reporter for statistics and raw values
//!
//! Provides the human-readable summary lines and the one-value-per-line dump
//! used for importing samples into external analysis tools.

use std::io::{self, Write};

use crate::stats::Statistics;
use crate::units::TimeUnit;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Write a statistics summary.
    ///
    /// With more than 3 samples the full robust and parametric report is
    /// written, otherwise an abbreviated single line. `removed_outliers`
    /// annotates the sample count after outlier filtering.
    pub fn write_statistics<W: Write>(
        out: &mut W,
        title: Option<&str>,
        stats: &Statistics,
        unit: Option<&TimeUnit>,
        removed_outliers: Option<usize>,
    ) -> io::Result<()> {
        if let Some(title) = title {
            writeln!(out)?;
            writeln!(out, "{}:", title)?;
        }

        let cycles = TimeUnit::cycles();
        let unit = unit.unwrap_or(&cycles);
        let s = unit.convert(stats);
        let name = unit.name();

        let n = match removed_outliers {
            Some(removed) => format!("n={} [{} outlier(s) removed]", s.count, removed),
            None => format!("n={}", s.count),
        };
        let tail = format!(
            "{}, denominator={}, baseline={}",
            n, s.denominator, s.baseline
        );

        if stats.count > 3 {
            writeln!(
                out,
                "- robust:       median {:.1} {}, IQR [{:.1}, {:.1}], min {:.1}, max {:.1}, {}",
                s.median, name, s.q1, s.q3, s.min, s.max, tail
            )?;
            writeln!(
                out,
                "- normal dist.: {:.1} ± {:.1} {} (mean ± sd), 95% CI for the mean [{:.1}, {:.1}], min {:.1}, max {:.1}, {}",
                s.mean, s.sd, name, s.ci95_lo, s.ci95_hi, s.min, s.max, tail
            )?;
        } else {
            writeln!(
                out,
                "mean {:.1} {}, median {:.1}, min {:.1}, max {:.1}, {}; use n >= 4 for more detailed descriptive statistics.",
                s.mean, name, s.median, s.min, s.max, tail
            )?;
        }
        Ok(())
    }

    /// Write one sample per line, converted to `unit` by integer division.
    pub fn write_values<W: Write>(
        out: &mut W,
        title: Option<&str>,
        values: &[u64],
        unit: Option<&TimeUnit>,
    ) -> io::Result<()> {
        if let Some(title) = title {
            writeln!(out, "{}:", title)?;
        }

        for &v in values {
            let v = unit.map_or(v, |u| u.convert_cycles(v));
            writeln!(out, "{}", v)?;
        }
        Ok(())
    }

    /// Format a statistics summary into a string.
    pub fn format(title: Option<&str>, stats: &Statistics, unit: Option<&TimeUnit>) -> String {
        let mut buffer = Vec::new();
        Self::write_statistics(&mut buffer, title, stats, unit, None)
            .expect("writing to a Vec cannot fail");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_statistics() -> Statistics {
        Statistics::from_values(&[1, 2, 3, 4], 1, 0)
    }

    /// Sink that fails after a number of bytes.
    struct FailingWriter {
        remaining: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_full_report() {
        let output = ConsoleReporter::format(Some("Results"), &create_test_statistics(), None);

        assert_eq!(
            output,
            "\nResults:\n\
             - robust:       median 2.5 cycles, IQR [1.5, 3.5], min 1.0, max 4.0, n=4, denominator=1, baseline=0\n\
             - normal dist.: 2.5 ± 1.3 cycles (mean ± sd), 95% CI for the mean [0.4, 4.6], min 1.0, max 4.0, n=4, denominator=1, baseline=0\n"
        );
    }

    #[test]
    fn test_abbreviated_report_for_small_counts() {
        let stats = Statistics::from_values(&[10, 20, 30], 1, 5);
        let output = ConsoleReporter::format(None, &stats, None);

        assert_eq!(
            output,
            "mean 20.0 cycles, median 20.0, min 10.0, max 30.0, n=3, denominator=1, baseline=5; use n >= 4 for more detailed descriptive statistics.\n"
        );
    }

    #[test]
    fn test_report_with_removed_outliers() {
        let mut buffer = Vec::new();
        let stats = create_test_statistics();
        ConsoleReporter::write_statistics(&mut buffer, None, &stats, None, Some(3)).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("n=4 [3 outlier(s) removed], denominator=1"));
        assert_eq!(output.matches("outlier(s) removed").count(), 2);
    }

    #[test]
    fn test_report_in_unit() {
        let stats = Statistics::from_values(&[3000, 6000, 9000, 12000], 1, 30);
        let unit = TimeUnit::new("ns", 3).unwrap();
        let output = ConsoleReporter::format(None, &stats, Some(&unit));

        assert!(output.contains("median 2500.0 ns"));
        assert!(output.contains("baseline=10"));
    }

    #[test]
    fn test_values_one_per_line() {
        let mut buffer = Vec::new();
        ConsoleReporter::write_values(&mut buffer, None, &[30, 31, 45], None).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "30\n31\n45\n");
    }

    #[test]
    fn test_values_with_title_and_unit() {
        let mut buffer = Vec::new();
        let unit = TimeUnit::new("ns", 3).unwrap();
        ConsoleReporter::write_values(&mut buffer, Some("copy"), &[30, 31, 45], Some(&unit))
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "copy:\n10\n10\n15\n");
    }

    #[test]
    fn test_failing_sink_reports_error() {
        let mut sink = FailingWriter { remaining: 10 };
        let stats = create_test_statistics();
        let result = ConsoleReporter::write_statistics(&mut sink, Some("t"), &stats, None, None);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }
}
