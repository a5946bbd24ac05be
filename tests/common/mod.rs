#![allow(dead_code)]

use assetaudit::domain::error::AuditError;
use assetaudit::domain::instrument::{Catalog, InstrumentRecord};
pub use assetaudit::domain::price::{PriceBar, PriceHistory};
use assetaudit::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, PriceHistory>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_history(mut self, history: PriceHistory) -> Self {
        self.data.insert(history.ticker.clone(), history);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_history(&self, ticker: &str) -> Result<PriceHistory, AuditError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(AuditError::MalformedPriceData {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        self.data
            .get(ticker)
            .cloned()
            .ok_or_else(|| AuditError::MissingPriceFile {
                ticker: ticker.to_string(),
                path: format!("{}.csv", ticker),
            })
    }

    fn list_tickers(&self) -> Result<Vec<String>, AuditError> {
        let mut tickers: Vec<String> = self.data.keys().chain(self.errors.keys()).cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Deterministic approximately-normal draws (Irwin-Hall, 12 uniforms).
pub fn normal_draws(seed: u64, count: usize) -> Vec<f64> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut uniform = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..count)
        .map(|_| (0..12).map(|_| uniform()).sum::<f64>() - 6.0)
        .collect()
}

/// `base + noise_ratio * noise`, scaled to ~1% daily moves.
pub fn mix(base: &[f64], noise: &[f64], noise_ratio: f64) -> Vec<f64> {
    base.iter()
        .zip(noise)
        .map(|(b, n)| 0.01 * (b + noise_ratio * n))
        .collect()
}

/// Compounds `returns` from a price of 100, one row per calendar day from `start`.
pub fn history_from_returns(
    ticker: &str,
    start: NaiveDate,
    returns: &[f64],
    volume: f64,
) -> PriceHistory {
    let mut price = 100.0;
    let mut bars = vec![PriceBar {
        date: start,
        adj_close: None,
        close: Some(price),
        volume: Some(volume),
    }];
    for (i, r) in returns.iter().enumerate() {
        price *= 1.0 + r;
        bars.push(PriceBar {
            date: start + chrono::Duration::days(i as i64 + 1),
            adj_close: None,
            close: Some(price),
            volume: Some(volume),
        });
    }
    PriceHistory {
        ticker: ticker.to_string(),
        has_adj_close: false,
        has_volume: true,
        bars,
    }
}

pub fn record(ticker: &str, description: &str, active: bool) -> InstrumentRecord {
    InstrumentRecord {
        ticker: ticker.to_string(),
        description: description.to_string(),
        sub_class: "Large Cap".to_string(),
        sector_style: "Blend".to_string(),
        asset_class: "Equity".to_string(),
        is_active: active,
    }
}

pub fn catalog(records: Vec<InstrumentRecord>) -> Catalog {
    Catalog::new(records).unwrap()
}

/// Renders a history as a price CSV file body.
pub fn history_csv(history: &PriceHistory) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for bar in &history.bars {
        let close = bar.close.unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date,
            close,
            close,
            close,
            close,
            bar.volume.unwrap_or_default()
        ));
    }
    out
}
