//! Keep/drop resolution for duplicate candidates.

use crate::domain::classifier::{Classification, DuplicateCandidate};
use crate::domain::price::LiquidityStat;
use serde::Serialize;
use std::collections::HashMap;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const HISTORY_GAP_YEARS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionPolicy {
    /// History difference (in years) above which history decides.
    pub history_gap_years: f64,
    pub trading_days_per_year: f64,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            history_gap_years: HISTORY_GAP_YEARS,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

/// One row of the removal report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub keep: String,
    pub drop: String,
    pub correlation: f64,
    pub reason: String,
    pub classification: Classification,
}

impl ResolutionPolicy {
    /// Picks a keeper for `candidate`.
    ///
    /// With histories more than `history_gap_years` apart the longer one
    /// wins; otherwise the higher trailing dollar volume wins. Ties go to
    /// the second leg.
    pub fn resolve(
        &self,
        candidate: &DuplicateCandidate,
        stat_a: LiquidityStat,
        stat_b: LiquidityStat,
    ) -> Recommendation {
        let (a, b) = (&candidate.ticker_a, &candidate.ticker_b);
        let days_a = stat_a.history_length_days as f64;
        let days_b = stat_b.history_length_days as f64;
        let year_diff = (days_a - days_b).abs() / self.trading_days_per_year;

        let (keep, drop, reason) = if year_diff > self.history_gap_years {
            let reason = format!("longer history, +{:.1}y", year_diff);
            if days_a > days_b {
                (a, b, reason)
            } else {
                (b, a, reason)
            }
        } else {
            let liq_a = stat_a.trailing_dollar_volume;
            let liq_b = stat_b.trailing_dollar_volume;
            if liq_a > liq_b {
                (a, b, format!("better liquidity, {:.1}x", liq_a / (liq_b + 1.0)))
            } else {
                (b, a, format!("better liquidity, {:.1}x", liq_b / (liq_a + 1.0)))
            }
        };

        Recommendation {
            keep: keep.clone(),
            drop: drop.clone(),
            correlation: candidate.score,
            reason,
            classification: candidate.classification,
        }
    }

    /// Resolves every candidate; tickers without stats count as empty history.
    pub fn resolve_all(
        &self,
        candidates: &[DuplicateCandidate],
        stats: &HashMap<String, LiquidityStat>,
    ) -> Vec<Recommendation> {
        let stat = |t: &str| stats.get(t).copied().unwrap_or_default();
        candidates
            .iter()
            .map(|c| self.resolve(c, stat(&c.ticker_a), stat(&c.ticker_b)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> DuplicateCandidate {
        DuplicateCandidate {
            ticker_a: "A".into(),
            ticker_b: "B".into(),
            score: 0.997,
            classification: Classification::Hard,
        }
    }

    fn stat(days: usize, dollar_volume: f64) -> LiquidityStat {
        LiquidityStat {
            history_length_days: days,
            trailing_dollar_volume: dollar_volume,
        }
    }

    #[test]
    fn long_history_wins_regardless_of_liquidity() {
        let policy = ResolutionPolicy::default();
        let rec = policy.resolve(&candidate(), stat(252 * 8, 1.0), stat(252 * 2, 1e12));
        assert_eq!(rec.keep, "A");
        assert_eq!(rec.drop, "B");
        assert_eq!(rec.reason, "longer history, +6.0y");
        assert_eq!(rec.classification, Classification::Hard);
        assert_eq!(rec.correlation, 0.997);
    }

    #[test]
    fn history_gap_of_exactly_five_years_falls_to_liquidity() {
        let policy = ResolutionPolicy::default();
        let rec = policy.resolve(&candidate(), stat(252 * 6, 10.0), stat(252, 1000.0));
        assert_eq!(rec.keep, "B");
        assert!(rec.reason.starts_with("better liquidity"));
    }

    #[test]
    fn comparable_history_uses_liquidity() {
        let policy = ResolutionPolicy::default();
        let rec = policy.resolve(&candidate(), stat(252 * 3, 1_000_000.0), stat(252 * 4, 3_000_000.0));
        assert_eq!(rec.keep, "B");
        assert_eq!(rec.drop, "A");
        assert_eq!(rec.reason, "better liquidity, 3.0x");
    }

    #[test]
    fn zero_liquidity_does_not_divide_by_zero() {
        let policy = ResolutionPolicy::default();
        let rec = policy.resolve(&candidate(), stat(500, 99.0), stat(500, 0.0));
        assert_eq!(rec.keep, "A");
        assert_eq!(rec.reason, "better liquidity, 99.0x");

        let tie = policy.resolve(&candidate(), stat(500, 0.0), stat(500, 0.0));
        assert_eq!(tie.keep, "B");
        assert_eq!(tie.reason, "better liquidity, 0.0x");
    }

    #[test]
    fn resolve_all_defaults_missing_stats() {
        let mut stats = HashMap::new();
        stats.insert("A".to_string(), stat(300, 5.0));
        let recs = ResolutionPolicy::default().resolve_all(&[candidate()], &stats);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].keep, "A");
    }
}
