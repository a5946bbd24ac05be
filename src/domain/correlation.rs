//! Day-over-day returns and the pairwise return correlation matrix.

use crate::domain::aligner::AlignedPriceTable;

pub const MIN_OVERLAP: usize = 120;

/// Percentage change per column of an [`AlignedPriceTable`].
///
/// Row `r` holds the change from row `r - 1`; it is a gap when either price
/// is missing or the earlier price is zero. Row 0 is always a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnTable {
    pub tickers: Vec<String>,
    pub columns: Vec<Vec<Option<f64>>>,
}

impl ReturnTable {
    pub fn from_prices(prices: &AlignedPriceTable) -> Self {
        let columns = prices.columns.iter().map(|c| pct_change(c)).collect();
        Self {
            tickers: prices.tickers.clone(),
            columns,
        }
    }
}

fn pct_change(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }
    out.push(None);
    for w in prices.windows(2) {
        let r = match (w[0], w[1]) {
            (Some(prev), Some(curr)) if prev != 0.0 => Some(curr / prev - 1.0),
            _ => None,
        };
        out.push(r.filter(|v| v.is_finite()));
    }
    out
}

/// Pearson correlation over rows where both columns are present.
///
/// `None` when fewer than `min_overlap` joint observations exist or when
/// either side has zero variance over the overlap.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>], min_overlap: usize) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < min_overlap.max(2) {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Symmetric ticker x ticker correlation matrix.
///
/// Only the strict upper triangle is stored; the diagonal is 1 by
/// definition and `get(j, i)` reads the same cell as `get(i, j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    tickers: Vec<String>,
    upper: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    /// An all-undefined matrix over `tickers`.
    pub fn new(tickers: Vec<String>) -> Self {
        let n = tickers.len();
        Self {
            tickers,
            upper: vec![None; n * n.saturating_sub(1) / 2],
        }
    }

    pub fn from_returns(returns: &ReturnTable, min_overlap: usize) -> Self {
        let mut matrix = Self::new(returns.tickers.clone());
        let n = returns.tickers.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let value = pearson(&returns.columns[i], &returns.columns[j], min_overlap);
                matrix.set(i, j, value);
            }
        }
        matrix
    }

    pub fn from_prices(prices: &AlignedPriceTable, min_overlap: usize) -> Self {
        Self::from_returns(&ReturnTable::from_prices(prices), min_overlap)
    }

    fn slot(&self, i: usize, j: usize) -> usize {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let n = self.tickers.len();
        // Rows before i contribute (n - 1) + (n - 2) + ... + (n - i) cells.
        i * (2 * n - i - 1) / 2 + (j - i - 1)
    }

    /// Sets the (i, j) and (j, i) entry. Diagonal writes are ignored.
    pub fn set(&mut self, i: usize, j: usize, value: Option<f64>) {
        if i == j {
            return;
        }
        let slot = self.slot(i, j);
        self.upper[slot] = value;
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let n = self.tickers.len();
        if i >= n || j >= n {
            return None;
        }
        if i == j {
            return Some(1.0);
        }
        self.upper[self.slot(i, j)]
    }

    pub fn get_by_ticker(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.tickers.iter().position(|t| t == a)?;
        let j = self.tickers.iter().position(|t| t == b)?;
        self.get(i, j)
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Defined upper-triangle entries `(i, j, r)` with `i < j`, row-major.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.tickers.len();
        (0..n)
            .flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
            .filter_map(move |(i, j)| self.get(i, j).map(|r| (i, j, r)))
    }
}
