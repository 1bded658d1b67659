use crate::analysis::report::FertilityReport;
use serde_json;

/// JSON formatter for fertility reports
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format report as pretty-printed JSON
    pub fn format(report: &FertilityReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }

    /// Format report as compact JSON (no whitespace)
    pub fn format_compact(report: &FertilityReport) -> Result<String, serde_json::Error> {
        serde_json::to_string(report)
    }
}
