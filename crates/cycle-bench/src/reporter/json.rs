//! JSON reporter for statistics

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::stats::Statistics;
use crate::units::TimeUnit;

/// A statistics summary as exported to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Title of the measurement, if any
    pub title: Option<String>,
    /// Unit of every cycle-denominated field
    pub unit: String,
    /// Cycles per unit used for the conversion
    pub cycles_per_unit: u64,
    /// RFC 3339 timestamp of the export
    pub generated_at: String,
    /// Statistics converted to `unit`
    pub statistics: Statistics,
}

impl StatisticsReport {
    pub fn new(title: Option<&str>, stats: &Statistics, unit: Option<&TimeUnit>) -> Self {
        let unit = unit.cloned().unwrap_or_default();
        Self {
            title: title.map(str::to_string),
            statistics: unit.convert(stats),
            unit: unit.name().to_string(),
            cycles_per_unit: unit.cycles_per_unit(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format a statistics summary as JSON
    ///
    /// # Arguments
    ///
    /// * `report` - The report to format
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn format(report: &StatisticsReport, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_report() -> StatisticsReport {
        let stats = Statistics::from_values(&[30, 31, 31, 32], 1, 24);
        StatisticsReport::new(Some("loop"), &stats, None)
    }

    #[test]
    fn test_json_format_compact() {
        let output = JsonReporter::format(&create_test_report(), false).unwrap();

        // Compact JSON should not have newlines
        assert!(!output.contains('\n'));
        assert!(output.contains("\"title\":\"loop\""));
        assert!(output.contains("\"unit\":\"cycles\""));
        assert!(output.contains("\"baseline\":24"));
    }

    #[test]
    fn test_json_format_pretty() {
        let output = JsonReporter::format(&create_test_report(), true).unwrap();

        assert!(output.contains('\n'));
        assert!(output.contains("  \"statistics\": {"));
    }

    #[test]
    fn test_json_roundtrip() {
        let report = create_test_report();
        let json = JsonReporter::format(&report, false).unwrap();
        let parsed: StatisticsReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.title, report.title);
        assert_eq!(parsed.statistics.count, 4);
        assert_eq!(parsed.statistics.median, 31.0);
        assert_eq!(parsed.generated_at, report.generated_at);
    }

    #[test]
    fn test_report_converts_to_unit() {
        let stats = Statistics::from_values(&[300, 600], 1, 0);
        let unit = TimeUnit::new("ns", 3).unwrap();
        let report = StatisticsReport::new(None, &stats, Some(&unit));

        assert_eq!(report.unit, "ns");
        assert_eq!(report.cycles_per_unit, 3);
        assert_eq!(report.statistics.mean, 150.0);
        assert_eq!(report.statistics.abs_max, 200);
    }
}
