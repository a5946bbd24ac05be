//! Configuration validation.
//!
//! Validates the `[duplicates]` and `[quality]` sections before an audit runs.
//! Absent keys fall back to their defaults and are always valid.

use crate::domain::aligner::{LIQUIDITY_WINDOW, MIN_OBSERVATIONS};
use crate::domain::classifier::{LOOSE_THRESHOLD, STRICT_THRESHOLD};
use crate::domain::correlation::MIN_OVERLAP;
use crate::domain::error::AuditError;
use crate::domain::quality::{EXTREME_MOVE, MAX_GAP_DAYS, ZERO_VOLUME_PCT};
use crate::domain::resolution::{HISTORY_GAP_YEARS, TRADING_DAYS_PER_YEAR};
use crate::ports::config_port::ConfigPort;

pub fn validate_audit_config(config: &dyn ConfigPort) -> Result<(), AuditError> {
    validate_numeric_keys(config)?;
    validate_thresholds(config)?;
    validate_counts(config)?;
    validate_resolution(config)?;
    validate_keywords(config)?;
    validate_quality_config(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> AuditError {
    AuditError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

const INT_KEYS: &[(&str, &str)] = &[
    ("duplicates", "min_overlap"),
    ("duplicates", "min_observations"),
    ("duplicates", "liquidity_window"),
    ("quality", "max_gap_days"),
];

const FLOAT_KEYS: &[(&str, &str)] = &[
    ("duplicates", "loose_threshold"),
    ("duplicates", "strict_threshold"),
    ("duplicates", "history_gap_years"),
    ("duplicates", "trading_days_per_year"),
    ("quality", "zero_volume_pct"),
    ("quality", "extreme_move"),
];

/// A key that is present but unparseable would otherwise fall back to its
/// default unnoticed.
fn validate_numeric_keys(config: &dyn ConfigPort) -> Result<(), AuditError> {
    for (section, key) in INT_KEYS {
        if let Some(raw) = config.get_string(section, key) {
            if raw.parse::<i64>().is_err() {
                return Err(invalid(section, key, &format!("{} is not an integer: {:?}", key, raw)));
            }
        }
    }
    for (section, key) in FLOAT_KEYS {
        if let Some(raw) = config.get_string(section, key) {
            if raw.parse::<f64>().is_err() {
                return Err(invalid(section, key, &format!("{} is not a number: {:?}", key, raw)));
            }
        }
    }
    Ok(())
}

fn in_unit_interval(x: f64) -> bool {
    x > 0.0 && x <= 1.0
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), AuditError> {
    let loose = config.get_double("duplicates", "loose_threshold", LOOSE_THRESHOLD);
    let strict = config.get_double("duplicates", "strict_threshold", STRICT_THRESHOLD);
    if !in_unit_interval(loose) {
        return Err(invalid(
            "duplicates",
            "loose_threshold",
            "loose_threshold must be in (0, 1]",
        ));
    }
    if !in_unit_interval(strict) {
        return Err(invalid(
            "duplicates",
            "strict_threshold",
            "strict_threshold must be in (0, 1]",
        ));
    }
    if loose > strict {
        return Err(invalid(
            "duplicates",
            "loose_threshold",
            "loose_threshold must not exceed strict_threshold",
        ));
    }
    Ok(())
}

fn validate_counts(config: &dyn ConfigPort) -> Result<(), AuditError> {
    if config.get_int("duplicates", "min_overlap", MIN_OVERLAP as i64) < 2 {
        return Err(invalid("duplicates", "min_overlap", "min_overlap must be at least 2"));
    }
    if config.get_int("duplicates", "min_observations", MIN_OBSERVATIONS as i64) < 2 {
        return Err(invalid(
            "duplicates",
            "min_observations",
            "min_observations must be at least 2",
        ));
    }
    if config.get_int("duplicates", "liquidity_window", LIQUIDITY_WINDOW as i64) < 1 {
        return Err(invalid(
            "duplicates",
            "liquidity_window",
            "liquidity_window must be at least 1",
        ));
    }
    Ok(())
}

fn validate_resolution(config: &dyn ConfigPort) -> Result<(), AuditError> {
    let days = config.get_double("duplicates", "trading_days_per_year", TRADING_DAYS_PER_YEAR);
    if !(days > 0.0 && days.is_finite()) {
        return Err(invalid(
            "duplicates",
            "trading_days_per_year",
            "trading_days_per_year must be positive",
        ));
    }
    let years = config.get_double("duplicates", "history_gap_years", HISTORY_GAP_YEARS);
    if !(years >= 0.0 && years.is_finite()) {
        return Err(invalid(
            "duplicates",
            "history_gap_years",
            "history_gap_years must be non-negative",
        ));
    }
    Ok(())
}

fn validate_keywords(config: &dyn ConfigPort) -> Result<(), AuditError> {
    match config.get_string("duplicates", "exempt_keywords") {
        Some(s) if s.split(',').all(|k| k.trim().is_empty()) => Err(invalid(
            "duplicates",
            "exempt_keywords",
            "exempt_keywords must list at least one keyword",
        )),
        _ => Ok(()),
    }
}

fn validate_quality_config(config: &dyn ConfigPort) -> Result<(), AuditError> {
    if config.get_int("quality", "max_gap_days", MAX_GAP_DAYS) < 1 {
        return Err(invalid("quality", "max_gap_days", "max_gap_days must be at least 1"));
    }
    let pct = config.get_double("quality", "zero_volume_pct", ZERO_VOLUME_PCT);
    if !(0.0..=100.0).contains(&pct) {
        return Err(invalid(
            "quality",
            "zero_volume_pct",
            "zero_volume_pct must be between 0 and 100",
        ));
    }
    let extreme = config.get_double("quality", "extreme_move", EXTREME_MOVE);
    if !(extreme > 0.0 && extreme.is_finite()) {
        return Err(invalid("quality", "extreme_move", "extreme_move must be positive"));
    }
    Ok(())
}
