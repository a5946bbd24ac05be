//! Report persistence port trait.

use crate::domain::error::AuditError;
use crate::domain::quality::QualityRow;
use crate::domain::report::DuplicateReport;
use std::path::Path;

/// Port for writing audit artifacts.
pub trait ReportPort {
    fn write_duplicates(&self, report: &DuplicateReport, path: &Path) -> Result<(), AuditError>;

    fn write_quality(&self, rows: &[QualityRow], path: &Path) -> Result<(), AuditError>;
}
