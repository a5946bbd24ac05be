//! CSV report adapter implementing ReportPort.

use crate::domain::error::AuditError;
use crate::domain::quality::QualityRow;
use crate::domain::report::DuplicateReport;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::path::Path;

pub struct CsvReportAdapter;

fn write_rows<T: Serialize>(rows: &[T], headers: &[&str], path: &Path) -> Result<(), AuditError> {
    let write_err = |reason: String| AuditError::ReportWrite {
        path: path.display().to_string(),
        reason,
    };

    let mut wtr = csv::Writer::from_path(path).map_err(|e| write_err(e.to_string()))?;
    // serde only emits a header with the first row; an empty report still
    // gets one.
    if rows.is_empty() {
        wtr.write_record(headers).map_err(|e| write_err(e.to_string()))?;
    }
    for row in rows {
        wtr.serialize(row).map_err(|e| write_err(e.to_string()))?;
    }
    wtr.flush().map_err(|e| write_err(e.to_string()))?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write_duplicates(&self, report: &DuplicateReport, path: &Path) -> Result<(), AuditError> {
        write_rows(
            &report.recommendations,
            &["keep", "drop", "correlation", "reason", "classification"],
            path,
        )
    }

    fn write_quality(&self, rows: &[QualityRow], path: &Path) -> Result<(), AuditError> {
        write_rows(
            rows,
            &[
                "ticker",
                "status",
                "start_date",
                "end_date",
                "total_rows",
                "max_gap_days",
                "large_gaps",
                "zero_volume_pct",
                "extreme_moves",
            ],
            path,
        )
    }
}
