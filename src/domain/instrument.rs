//! Instrument catalog records and the ticker index built over them.

use crate::domain::error::AuditError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRecord {
    pub ticker: String,
    pub description: String,
    pub sub_class: String,
    pub sector_style: String,
    pub asset_class: String,
    pub is_active: bool,
}

/// Read-only view of the catalog, indexed by ticker.
///
/// Records keep their source order so that the active universe, and
/// everything derived from it, is ordered the same way on every run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<InstrumentRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(records: Vec<InstrumentRecord>) -> Result<Self, AuditError> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if record.ticker.trim().is_empty() {
                return Err(AuditError::MalformedCatalog {
                    reason: format!("record {} has an empty ticker", i + 1),
                });
            }
            if index.insert(record.ticker.clone(), i).is_some() {
                return Err(AuditError::MalformedCatalog {
                    reason: format!("duplicate ticker: {}", record.ticker),
                });
            }
        }
        Ok(Self { records, index })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&InstrumentRecord> {
        self.index.get(ticker).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[InstrumentRecord] {
        &self.records
    }

    pub fn active_tickers(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.is_active)
            .map(|r| r.ticker.clone())
            .collect()
    }

    /// Upper-cased description, sub-class and style joined by spaces.
    /// Unknown tickers yield an empty string.
    pub fn descriptive_text(&self, ticker: &str) -> String {
        match self.get(ticker) {
            Some(r) => format!("{} {} {}", r.description, r.sub_class, r.sector_style)
                .to_uppercase(),
            None => String::new(),
        }
    }
}
