//! Price alignment: per-ticker loads merged into one date-indexed table.
//!
//! Each ticker's history is deduplicated, reduced to its canonical price
//! column and outer-joined on date. Tickers that cannot be loaded, or that
//! have too few observations to trust a correlation, are reported as
//! skipped rather than failing the run.

use crate::domain::error::AuditError;
use crate::domain::price::{LiquidityStat, PriceHistory, PriceSeries};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};

pub const MIN_OBSERVATIONS: usize = 120;
pub const LIQUIDITY_WINDOW: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentConfig {
    /// Columns with fewer non-missing prices than this are dropped.
    pub min_observations: usize,
    /// Trailing rows used for the dollar-volume average.
    pub liquidity_window: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            min_observations: MIN_OBSERVATIONS,
            liquidity_window: LIQUIDITY_WINDOW,
        }
    }
}

/// Calendar-indexed prices, one column per ticker. Gaps stay `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedPriceTable {
    pub dates: Vec<NaiveDate>,
    pub tickers: Vec<String>,
    /// `columns[i][r]` is the price of `tickers[i]` on `dates[r]`.
    pub columns: Vec<Vec<Option<f64>>>,
}

impl AlignedPriceTable {
    /// Outer join on date: the row set is the union of every series' dates.
    pub fn outer_join(series: &[PriceSeries]) -> Self {
        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|(d, _)| *d))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let row_of: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let columns = series
            .iter()
            .map(|s| {
                let mut column = vec![None; dates.len()];
                for (date, price) in &s.points {
                    column[row_of[date]] = *price;
                }
                column
            })
            .collect();

        Self {
            dates,
            tickers: series.iter().map(|s| s.ticker.clone()).collect(),
            columns,
        }
    }

    pub fn column(&self, ticker: &str) -> Option<&[Option<f64>]> {
        self.tickers
            .iter()
            .position(|t| t == ticker)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn observations(&self, index: usize) -> usize {
        self.columns[index].iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingFile,
    Malformed(String),
    InsufficientHistory { observations: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingFile => write!(f, "missing price file"),
            SkipReason::Malformed(cause) => write!(f, "malformed data: {}", cause),
            SkipReason::InsufficientHistory { observations } => {
                write!(f, "only {} observations", observations)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct AlignmentResult {
    pub table: AlignedPriceTable,
    pub liquidity: HashMap<String, LiquidityStat>,
    pub skipped: Vec<SkippedTicker>,
}

enum Loaded {
    Ok(PriceSeries, LiquidityStat),
    Skipped(SkippedTicker),
}

fn load_one(port: &dyn PricePort, ticker: &str, config: &AlignmentConfig) -> Loaded {
    let history = match port.fetch_history(ticker) {
        Ok(h) => h,
        Err(AuditError::MissingPriceFile { path, .. }) => {
            log::warn!("skipping {} (no price file at {})", ticker, path);
            return Loaded::Skipped(SkippedTicker {
                ticker: ticker.to_string(),
                reason: SkipReason::MissingFile,
            });
        }
        Err(e) => {
            log::warn!("skipping {} ({})", ticker, e);
            return Loaded::Skipped(SkippedTicker {
                ticker: ticker.to_string(),
                reason: SkipReason::Malformed(e.to_string()),
            });
        }
    };

    let history: PriceHistory = history.deduplicated();
    let stat = LiquidityStat::compute(&history, config.liquidity_window);
    Loaded::Ok(PriceSeries::canonical(&history), stat)
}

/// Loads `tickers` through `port` and aligns them.
///
/// Loads run on the rayon pool; results are consumed in input order so the
/// table's column order always follows `tickers`.
pub fn align_prices(
    port: &dyn PricePort,
    tickers: &[String],
    config: &AlignmentConfig,
) -> AlignmentResult {
    let loaded: Vec<Loaded> = tickers
        .par_iter()
        .map(|t| load_one(port, t, config))
        .collect();

    let mut series = Vec::with_capacity(loaded.len());
    let mut liquidity = HashMap::with_capacity(loaded.len());
    let mut skipped = Vec::new();

    for item in loaded {
        match item {
            Loaded::Ok(s, stat) => {
                let observations = s.observations();
                if observations < config.min_observations {
                    log::warn!(
                        "skipping {} (only {} observations, minimum {} required)",
                        s.ticker,
                        observations,
                        config.min_observations
                    );
                    skipped.push(SkippedTicker {
                        ticker: s.ticker,
                        reason: SkipReason::InsufficientHistory { observations },
                    });
                    continue;
                }
                liquidity.insert(s.ticker.clone(), stat);
                series.push(s);
            }
            Loaded::Skipped(s) => skipped.push(s),
        }
    }

    let table = AlignedPriceTable::outer_join(&series);
    log::info!(
        "aligned {} of {} tickers over {} dates",
        table.tickers.len(),
        tickers.len(),
        table.dates.len()
    );

    AlignmentResult {
        table,
        liquidity,
        skipped,
    }
}
