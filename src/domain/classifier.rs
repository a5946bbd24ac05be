//! Duplicate classification over the correlation matrix.
//!
//! A pair at or above the loose threshold is a candidate. At or above the
//! strict threshold it is a Hard duplicate and is always kept; below it the
//! pair is Soft and is exempted when either leg looks like a factor or
//! style product.

use crate::domain::correlation::CorrelationMatrix;
use crate::domain::instrument::Catalog;
use serde::Serialize;
use std::fmt;

pub const LOOSE_THRESHOLD: f64 = 0.98;
pub const STRICT_THRESHOLD: f64 = 0.995;

pub const DEFAULT_EXEMPT_KEYWORDS: &[&str] = &[
    "VALUE",
    "GROWTH",
    "QUALITY",
    "MOMENTUM",
    "LOW VOL",
    "MIN VOL",
    "FACTOR",
    "EQUAL WEIGHT",
    "DIVIDEND",
    "ALPHADEX",
    "FUNDAMENTAL",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateThresholds {
    pub loose: f64,
    pub strict: f64,
}

impl Default for DuplicateThresholds {
    fn default() -> Self {
        Self {
            loose: LOOSE_THRESHOLD,
            strict: STRICT_THRESHOLD,
        }
    }
}

impl DuplicateThresholds {
    pub fn classify(&self, score: f64) -> Option<Classification> {
        if score >= self.strict {
            Some(Classification::Hard)
        } else if score >= self.loose {
            Some(Classification::Soft)
        } else {
            None
        }
    }
}

/// Case-insensitive keywords marking factor / smart-beta products.
#[derive(Debug, Clone, PartialEq)]
pub struct ExemptionPolicy {
    keywords: Vec<String>,
}

impl Default for ExemptionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXEMPT_KEYWORDS.iter().copied())
    }
}

impl ExemptionPolicy {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First keyword found in `text`, compared upper-cased.
    pub fn matching_keyword(&self, text: &str) -> Option<&str> {
        let text = text.to_uppercase();
        self.keywords
            .iter()
            .find(|k| text.contains(k.as_str()))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    #[serde(rename = "Hard Duplicate")]
    Hard,
    #[serde(rename = "Soft Duplicate")]
    Soft,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Hard => write!(f, "Hard Duplicate"),
            Classification::Soft => write!(f, "Soft Duplicate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCandidate {
    pub ticker_a: String,
    pub ticker_b: String,
    pub score: f64,
    pub classification: Classification,
}

/// A Soft pair spared because one leg matched an exemption keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct ExemptedPair {
    pub ticker_a: String,
    pub ticker_b: String,
    pub score: f64,
    pub exempt_ticker: String,
    pub keyword: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationOutcome {
    pub candidates: Vec<DuplicateCandidate>,
    pub exempted: Vec<ExemptedPair>,
}

pub fn classify_pairs(
    matrix: &CorrelationMatrix,
    catalog: &Catalog,
    thresholds: &DuplicateThresholds,
    policy: &ExemptionPolicy,
) -> ClassificationOutcome {
    let tickers = matrix.tickers();
    let mut outcome = ClassificationOutcome::default();

    for (i, j, score) in matrix.pairs() {
        let Some(classification) = thresholds.classify(score) else {
            continue;
        };
        let (a, b) = (&tickers[i], &tickers[j]);

        if classification == Classification::Soft {
            let hit = [a, b].into_iter().find_map(|t| {
                policy
                    .matching_keyword(&catalog.descriptive_text(t))
                    .map(|kw| (t.clone(), kw.to_string()))
            });
            if let Some((exempt_ticker, keyword)) = hit {
                log::debug!(
                    "exempting {}/{} ({:.4}): {} matches {}",
                    a,
                    b,
                    score,
                    exempt_ticker,
                    keyword
                );
                outcome.exempted.push(ExemptedPair {
                    ticker_a: a.clone(),
                    ticker_b: b.clone(),
                    score,
                    exempt_ticker,
                    keyword,
                });
                continue;
            }
        }

        outcome.candidates.push(DuplicateCandidate {
            ticker_a: a.clone(),
            ticker_b: b.clone(),
            score,
            classification,
        });
    }

    outcome
}
