//! Duplicate-asset audit: loader → aligner → matrix → classifier → resolver → report.

use crate::domain::aligner::{align_prices, AlignmentConfig, SkippedTicker};
use crate::domain::classifier::{classify_pairs, DuplicateThresholds, ExemptedPair, ExemptionPolicy};
use crate::domain::correlation::{CorrelationMatrix, MIN_OVERLAP};
use crate::domain::error::AuditError;
use crate::domain::instrument::Catalog;
use crate::domain::report::DuplicateReport;
use crate::domain::resolution::ResolutionPolicy;
use crate::ports::price_port::PricePort;

#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    pub alignment: AlignmentConfig,
    /// Joint return observations required before a correlation is trusted.
    pub min_overlap: usize,
    pub thresholds: DuplicateThresholds,
    pub exemptions: ExemptionPolicy,
    pub resolution: ResolutionPolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            alignment: AlignmentConfig::default(),
            min_overlap: MIN_OVERLAP,
            thresholds: DuplicateThresholds::default(),
            exemptions: ExemptionPolicy::default(),
            resolution: ResolutionPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DuplicateAudit {
    pub report: DuplicateReport,
    pub exempted: Vec<ExemptedPair>,
    pub skipped: Vec<SkippedTicker>,
    pub universe_size: usize,
    pub analysed: usize,
}

pub fn run_duplicate_audit(
    catalog: &Catalog,
    price_port: &dyn PricePort,
    config: &AuditConfig,
) -> Result<DuplicateAudit, AuditError> {
    let universe = catalog.active_tickers();
    if universe.is_empty() {
        return Err(AuditError::EmptyUniverse);
    }
    log::info!("{} active instruments in catalog", universe.len());

    let alignment = align_prices(price_port, &universe, &config.alignment);
    if alignment.table.is_empty() {
        return Err(AuditError::NoUsablePriceData {
            requested: universe.len(),
        });
    }

    log::info!(
        "computing correlation matrix for {} instruments",
        alignment.table.tickers.len()
    );
    let matrix = CorrelationMatrix::from_prices(&alignment.table, config.min_overlap);

    let outcome = classify_pairs(&matrix, catalog, &config.thresholds, &config.exemptions);
    log::info!(
        "{} candidate pairs, {} exempted",
        outcome.candidates.len(),
        outcome.exempted.len()
    );

    let recommendations = config
        .resolution
        .resolve_all(&outcome.candidates, &alignment.liquidity);

    Ok(DuplicateAudit {
        report: DuplicateReport::assemble(recommendations),
        exempted: outcome.exempted,
        skipped: alignment.skipped,
        universe_size: universe.len(),
        analysed: matrix.tickers().len(),
    })
}
