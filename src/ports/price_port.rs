//! Price-history access port trait.

use crate::domain::error::AuditError;
use crate::domain::price::PriceHistory;

/// Per-ticker daily history store. Loads run in parallel, hence `Sync`.
pub trait PricePort: Sync {
    /// Returns `MissingPriceFile` when nothing is stored for `ticker`
    /// and `MalformedPriceData` when the stored history cannot be read.
    fn fetch_history(&self, ticker: &str) -> Result<PriceHistory, AuditError>;

    fn list_tickers(&self) -> Result<Vec<String>, AuditError>;
}
