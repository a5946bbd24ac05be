//! Final removal list assembly.

use crate::domain::classifier::Classification;
use crate::domain::resolution::Recommendation;
use std::collections::HashSet;

/// Recommendations ordered by correlation, descending, with each `drop`
/// ticker appearing at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateReport {
    pub recommendations: Vec<Recommendation>,
}

impl DuplicateReport {
    /// Sorts by correlation (stable, descending) and keeps the first row per
    /// `drop`, i.e. the strongest justification.
    pub fn assemble(mut recommendations: Vec<Recommendation>) -> Self {
        recommendations.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
        let mut seen = HashSet::new();
        recommendations.retain(|r| seen.insert(r.drop.clone()));
        Self { recommendations }
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn drop_list(&self) -> Vec<&str> {
        self.recommendations.iter().map(|r| r.drop.as_str()).collect()
    }

    pub fn with_classification(
        &self,
        classification: Classification,
    ) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(move |r| r.classification == classification)
    }
}
