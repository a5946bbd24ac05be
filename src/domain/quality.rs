//! Per-file data-quality scan: coverage, calendar gaps, zero volume and
//! extreme moves. Gaps are measured in calendar days; no trading calendar
//! is consulted.

use crate::domain::error::AuditError;
use crate::domain::price::{PriceBar, PriceHistory};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

pub const MAX_GAP_DAYS: i64 = 10;
pub const ZERO_VOLUME_PCT: f64 = 5.0;
pub const EXTREME_MOVE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityConfig {
    pub max_gap_days: i64,
    /// Percentage of zero/missing-volume rows above which a file is flagged.
    pub zero_volume_pct: f64,
    /// Absolute daily close change counted as extreme.
    pub extreme_move: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            max_gap_days: MAX_GAP_DAYS,
            zero_volume_pct: ZERO_VOLUME_PCT,
            extreme_move: EXTREME_MOVE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QualityStatus {
    Ok,
    Empty,
    Error(String),
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityStatus::Ok => write!(f, "OK"),
            QualityStatus::Empty => write!(f, "EMPTY FILE"),
            QualityStatus::Error(e) => write!(f, "ERROR: {}", e),
        }
    }
}

impl Serialize for QualityStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityRow {
    pub ticker: String,
    pub status: QualityStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_rows: usize,
    pub max_gap_days: i64,
    pub large_gaps: usize,
    pub zero_volume_pct: f64,
    pub extreme_moves: usize,
}

impl QualityRow {
    fn with_status(ticker: &str, status: QualityStatus) -> Self {
        Self {
            ticker: ticker.to_string(),
            status,
            start_date: None,
            end_date: None,
            total_rows: 0,
            max_gap_days: 0,
            large_gaps: 0,
            zero_volume_pct: 0.0,
            extreme_moves: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == QualityStatus::Ok
    }
}

pub fn assess_history(history: PriceHistory, config: &QualityConfig) -> QualityRow {
    let history = history.deduplicated();
    if history.is_empty() {
        return QualityRow::with_status(&history.ticker, QualityStatus::Empty);
    }
    let bars = &history.bars;
    let total = bars.len();

    let gaps: Vec<i64> = bars
        .windows(2)
        .map(|w| (w[1].date - w[0].date).num_days())
        .collect();
    let max_gap_days = gaps.iter().copied().max().unwrap_or(0);
    let large_gaps = gaps.iter().filter(|&&g| g > config.max_gap_days).count();

    let zero_volume_pct = if history.has_volume {
        let zero = bars
            .iter()
            .filter(|b| !matches!(b.volume, Some(v) if v != 0.0))
            .count();
        zero as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    // Files carrying only an adjusted close are checked on that column.
    let use_close = bars.iter().any(|b| b.close.is_some());
    let price = |b: &PriceBar| if use_close { b.close } else { b.adj_close };
    let extreme_moves = bars
        .windows(2)
        .filter_map(|w| match (price(&w[0]), price(&w[1])) {
            (Some(prev), Some(curr)) if prev != 0.0 && curr != 0.0 => {
                Some((curr / prev - 1.0).abs())
            }
            _ => None,
        })
        .filter(|m| *m > config.extreme_move)
        .count();

    QualityRow {
        ticker: history.ticker.clone(),
        status: QualityStatus::Ok,
        start_date: bars.first().map(|b| b.date),
        end_date: bars.last().map(|b| b.date),
        total_rows: total,
        max_gap_days,
        large_gaps,
        zero_volume_pct,
        extreme_moves,
    }
}

/// Scans every ticker the port knows about, ordered by ticker.
pub fn scan_quality(
    port: &dyn PricePort,
    config: &QualityConfig,
) -> Result<Vec<QualityRow>, AuditError> {
    let mut tickers = port.list_tickers()?;
    tickers.sort();
    log::info!("scanning {} price files", tickers.len());

    Ok(tickers
        .iter()
        .map(|t| match port.fetch_history(t) {
            Ok(h) => assess_history(h, config),
            Err(AuditError::MalformedPriceData { reason, .. }) => {
                QualityRow::with_status(t, QualityStatus::Error(reason))
            }
            Err(e) => QualityRow::with_status(t, QualityStatus::Error(e.to_string())),
        })
        .collect())
}
