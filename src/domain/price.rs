//! Daily price records, the canonical price series and liquidity statistics.

use chrono::NaiveDate;

/// One row of a price-history file. Any value column may be a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub adj_close: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl PriceBar {
    /// close * volume, when both are present.
    pub fn dollar_volume(&self) -> Option<f64> {
        match (self.close, self.volume) {
            (Some(c), Some(v)) => Some(c * v),
            _ => None,
        }
    }
}

/// Raw history for one ticker, as supplied by a [`crate::ports::price_port::PricePort`].
#[derive(Debug, Clone)]
pub struct PriceHistory {
    pub ticker: String,
    /// Whether the source carries an adjusted-close column at all.
    pub has_adj_close: bool,
    /// Whether the source carries a volume column at all.
    pub has_volume: bool,
    pub bars: Vec<PriceBar>,
}

impl PriceHistory {
    /// Sorts by date and collapses duplicate dates, keeping the later row.
    pub fn deduplicated(mut self) -> Self {
        self.bars.sort_by_key(|b| b.date);
        let mut bars: Vec<PriceBar> = Vec::with_capacity(self.bars.len());
        for bar in self.bars {
            match bars.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => bars.push(bar),
            }
        }
        self.bars = bars;
        self
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Ordered `(date, price)` observations for one ticker. A `None` price is a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

impl PriceSeries {
    /// Adjusted close when the source has that column, else close.
    /// Expects a deduplicated history.
    pub fn canonical(history: &PriceHistory) -> Self {
        let points = history
            .bars
            .iter()
            .map(|b| {
                let value = if history.has_adj_close { b.adj_close } else { b.close };
                (b.date, value.filter(|v| v.is_finite()))
            })
            .collect();
        Self {
            ticker: history.ticker.clone(),
            points,
        }
    }

    pub fn observations(&self) -> usize {
        self.points.iter().filter(|(_, p)| p.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LiquidityStat {
    pub history_length_days: usize,
    /// Mean close * volume over the trailing window; zero without volume data.
    pub trailing_dollar_volume: f64,
}

impl LiquidityStat {
    pub fn compute(history: &PriceHistory, window: usize) -> Self {
        let start = history.bars.len().saturating_sub(window);
        let recent: Vec<f64> = history.bars[start..]
            .iter()
            .filter_map(PriceBar::dollar_volume)
            .filter(|v| v.is_finite())
            .collect();
        let trailing_dollar_volume = if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<f64>() / recent.len() as f64
        };
        Self {
            history_length_days: history.bars.len(),
            trailing_dollar_volume,
        }
    }
}
