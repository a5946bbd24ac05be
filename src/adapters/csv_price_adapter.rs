//! CSV price-history adapter: one `<TICKER>.csv` per instrument.

use crate::domain::error::AuditError;
use crate::domain::price::{PriceBar, PriceHistory};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

/// Positions of the recognised columns in a file's header.
struct Columns {
    date: usize,
    adj_close: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Result<Self, String> {
        // "Adj Close" and "adj_close" name the same column.
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().replace(' ', "_").eq_ignore_ascii_case(name))
        };
        let date = find("date").ok_or("missing date column")?;
        let adj_close = find("adj_close");
        let close = find("close");
        if adj_close.is_none() && close.is_none() {
            return Err("missing adj_close and close columns".into());
        }
        Ok(Self {
            date,
            adj_close,
            close,
            volume: find("volume"),
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    let value = value.trim();
    // Tolerate a trailing time component, e.g. "2024-01-15 00:00:00".
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
}

fn parse_value(record: &csv::StringRecord, index: Option<usize>, name: &str) -> Result<Option<f64>, String> {
    let Some(raw) = index.and_then(|i| record.get(i)).map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| format!("invalid {} value {:?}: {}", name, raw, e))
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

impl PricePort for CsvPriceAdapter {
    fn fetch_history(&self, ticker: &str) -> Result<PriceHistory, AuditError> {
        let path = self.csv_path(ticker);
        if !path.is_file() {
            return Err(AuditError::MissingPriceFile {
                ticker: ticker.to_string(),
                path: path.display().to_string(),
            });
        }
        let malformed = |reason: String| AuditError::MalformedPriceData {
            ticker: ticker.to_string(),
            reason,
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| malformed(format!("failed to read {}: {}", path.display(), e)))?;
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let header = rdr
            .headers()
            .map_err(|e| malformed(format!("CSV header error: {}", e)))?
            .clone();
        let columns = Columns::from_header(&header).map_err(malformed)?;

        let mut bars = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let row = i + 2;
            let record = result.map_err(|e| malformed(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(columns.date)
                .ok_or_else(|| malformed(format!("row {}: missing date", row)))?;
            let date = parse_date(date_str)
                .map_err(|e| malformed(format!("row {}: invalid date {:?}: {}", row, date_str, e)))?;

            let at_row = |reason: String| malformed(format!("row {}: {}", row, reason));
            bars.push(PriceBar {
                date,
                adj_close: parse_value(&record, columns.adj_close, "adj_close").map_err(at_row)?,
                close: parse_value(&record, columns.close, "close").map_err(at_row)?,
                volume: parse_value(&record, columns.volume, "volume").map_err(at_row)?,
            });
        }

        Ok(PriceHistory {
            ticker: ticker.to_string(),
            has_adj_close: columns.adj_close.is_some(),
            has_volume: columns.volume.is_some(),
            bars,
        })
    }

    fn list_tickers(&self) -> Result<Vec<String>, AuditError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut tickers = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem()) {
                tickers.push(stem.to_string_lossy().into_owned());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
