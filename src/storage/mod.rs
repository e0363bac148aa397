use std::fs;
use std::path::Path;

use crate::error::HarnessError;
use crate::report::SuiteReport;

/// Writes the report snapshot as pretty-printed JSON, replacing any previous
/// file. The target directory must already exist.
pub fn save_report(path: &Path, report: &SuiteReport) -> Result<(), HarnessError> {
    let raw = serde_json::to_string_pretty(&report.snapshot()).map_err(|e| HarnessError::Report {
        path: path.to_path_buf(),
        reason: format!("Failed to serialize report: {e}"),
    })?;
    fs::write(path, raw).map_err(|e| HarnessError::Report {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
