//! CSV catalog adapter.
//!
//! Reads a single catalog file, or every root-level `*.csv` in a directory
//! concatenated in file-name order.

use crate::domain::error::AuditError;
use crate::domain::instrument::InstrumentRecord;
use crate::ports::catalog_port::CatalogPort;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvCatalogAdapter {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    ticker: String,
    is_active: String,
    asset_class: String,
    description: String,
    sub_class: String,
    sector_style: String,
}

fn parse_active(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Some(true),
        "0" | "0.0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}

impl CsvCatalogAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn source_files(&self) -> Result<Vec<PathBuf>, AuditError> {
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }
        if !self.path.is_dir() {
            return Err(AuditError::MissingCatalog {
                path: self.path.display().to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(AuditError::MissingCatalog {
                path: self.path.display().to_string(),
            });
        }
        files.sort();
        Ok(files)
    }

    fn read_file(path: &Path) -> Result<Vec<InstrumentRecord>, AuditError> {
        let file_name = path.display().to_string();
        let malformed = |reason: String| AuditError::MalformedCatalog {
            reason: format!("{}: {}", file_name, reason),
        };

        let content = fs::read_to_string(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        // Match header names case-insensitively.
        let header: csv::StringRecord = rdr
            .headers()
            .map_err(|e| malformed(e.to_string()))?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();
        rdr.set_headers(header);

        let mut records = Vec::new();
        for (i, result) in rdr.deserialize::<CatalogRow>().enumerate() {
            let row = result.map_err(|e| malformed(e.to_string()))?;
            let is_active = parse_active(&row.is_active).ok_or_else(|| {
                malformed(format!(
                    "row {}: invalid is_active value {:?}",
                    i + 2,
                    row.is_active
                ))
            })?;
            records.push(InstrumentRecord {
                ticker: row.ticker,
                description: row.description,
                sub_class: row.sub_class,
                sector_style: row.sector_style,
                asset_class: row.asset_class,
                is_active,
            });
        }

        log::info!("loaded {} catalog rows from {}", records.len(), file_name);
        Ok(records)
    }
}

impl CatalogPort for CsvCatalogAdapter {
    fn load_instruments(&self) -> Result<Vec<InstrumentRecord>, AuditError> {
        let mut records = Vec::new();
        for file in self.source_files()? {
            records.extend(Self::read_file(&file)?);
        }
        Ok(records)
    }
}
