//! Plain-text summaries printed by the CLI.
//!
//! Provides functions to render:
//! - Duplicate findings grouped by severity, plus exempted pairs
//! - Skipped-ticker summary
//! - Copy-ready drop list
//! - Data-quality sections

use crate::domain::aligner::SkippedTicker;
use crate::domain::audit::DuplicateAudit;
use crate::domain::classifier::{Classification, DuplicateThresholds, ExemptedPair};
use crate::domain::quality::{QualityConfig, QualityRow};
use crate::domain::report::DuplicateReport;

const RULE: &str = "================================================================================";

fn format_section(report: &DuplicateReport, classification: Classification, top: usize) -> String {
    let rows: Vec<_> = report.with_classification(classification).collect();
    let mut out = format!("\n--- {} ({}) ---\n", classification, rows.len());
    if rows.is_empty() {
        out.push_str("None.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<10} {:<10} {:>11}  {}\n",
        "Keep", "Drop", "Correlation", "Reason"
    ));
    for r in rows.iter().take(top) {
        out.push_str(&format!(
            "{:<10} {:<10} {:>11.4}  {}\n",
            r.keep, r.drop, r.correlation, r.reason
        ));
    }
    if rows.len() > top {
        out.push_str(&format!("... and {} more\n", rows.len() - top));
    }
    out
}

pub fn format_exempted(exempted: &[ExemptedPair]) -> String {
    if exempted.is_empty() {
        return String::new();
    }
    let mut out = format!("\n--- Exempted style/factor pairs ({}) ---\n", exempted.len());
    for p in exempted {
        out.push_str(&format!(
            "{} / {}  {:.4}  ({} matches {:?})\n",
            p.ticker_a, p.ticker_b, p.score, p.exempt_ticker, p.keyword
        ));
    }
    out
}

pub fn format_skipped(skipped: &[SkippedTicker]) -> String {
    if skipped.is_empty() {
        return String::new();
    }
    let mut out = format!("\n--- Skipped tickers ({}) ---\n", skipped.len());
    for s in skipped {
        out.push_str(&format!("{:<10} {}\n", s.ticker, s.reason));
    }
    out
}

pub fn format_duplicate_summary(
    audit: &DuplicateAudit,
    thresholds: &DuplicateThresholds,
    top: usize,
) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Removal recommendations: {} ({} of {} active instruments analysed)\n",
        audit.report.len(),
        audit.analysed,
        audit.universe_size
    ));
    out.push_str(&format!(
        "Criteria: active only | style/factor exemption below {} | candidates from {}\n",
        thresholds.strict, thresholds.loose
    ));
    out.push_str(RULE);
    out.push('\n');

    if audit.report.is_empty() {
        out.push_str("\nNo redundant instruments found.\n");
    } else {
        out.push_str(&format_section(&audit.report, Classification::Hard, top));
        out.push_str(&format_section(&audit.report, Classification::Soft, top));
    }

    out.push_str(&format_exempted(&audit.exempted));
    out.push_str(&format_skipped(&audit.skipped));
    out
}

/// Comma-separated drop tickers, for deactivating by hand in the catalog.
pub fn format_drop_list(report: &DuplicateReport) -> String {
    report.drop_list().join(", ")
}

pub fn format_quality_summary(rows: &[QualityRow], config: &QualityConfig) -> String {
    let mut out = String::new();
    let ok: Vec<&QualityRow> = rows.iter().filter(|r| r.is_ok()).collect();

    out.push_str("\n--- [1] Problem files (errors/empty) ---\n");
    let bad: Vec<&QualityRow> = rows.iter().filter(|r| !r.is_ok()).collect();
    if bad.is_empty() {
        out.push_str("None.\n");
    }
    for r in &bad {
        out.push_str(&format!("{:<10} {}\n", r.ticker, r.status));
    }

    out.push_str(&format!(
        "\n--- [2] Possible data gaps (> {} days) ---\n",
        config.max_gap_days
    ));
    let gaps: Vec<&&QualityRow> = ok.iter().filter(|r| r.max_gap_days > config.max_gap_days).collect();
    if gaps.is_empty() {
        out.push_str("No large gaps.\n");
    }
    for r in gaps {
        out.push_str(&format!(
            "{:<10} {} to {}  max gap {} days ({} gaps)\n",
            r.ticker,
            fmt_date(r.start_date),
            fmt_date(r.end_date),
            r.max_gap_days,
            r.large_gaps
        ));
    }

    out.push_str(&format!(
        "\n--- [3] Zombie data (zero volume > {}%) ---\n",
        config.zero_volume_pct
    ));
    let zombies: Vec<&&QualityRow> = ok
        .iter()
        .filter(|r| r.zero_volume_pct > config.zero_volume_pct)
        .collect();
    if zombies.is_empty() {
        out.push_str("No zombie data.\n");
    }
    for r in zombies {
        out.push_str(&format!(
            "{:<10} {:>6.2}% of {} rows\n",
            r.ticker, r.zero_volume_pct, r.total_rows
        ));
    }

    out.push_str(&format!(
        "\n--- [4] Extreme moves (> {:.0}%) ---\n",
        config.extreme_move * 100.0
    ));
    let extreme: Vec<&&QualityRow> = ok.iter().filter(|r| r.extreme_moves > 0).collect();
    if extreme.is_empty() {
        out.push_str("All daily moves within range.\n");
    }
    for r in extreme {
        out.push_str(&format!(
            "{:<10} {} moves since {}\n",
            r.ticker,
            r.extreme_moves,
            fmt_date(r.start_date)
        ));
    }

    out.push_str(&format!(
        "\n--- [5] Overview: {} files, {} OK ---\n",
        rows.len(),
        ok.len()
    ));
    for r in rows.iter().take(10) {
        out.push_str(&format!(
            "{:<10} {:<12} {:>10} {:>10} {:>6} rows\n",
            r.ticker,
            r.status.to_string(),
            fmt_date(r.start_date),
            fmt_date(r.end_date),
            r.total_rows
        ));
    }
    out
}

fn fmt_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
