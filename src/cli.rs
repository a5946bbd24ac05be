//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_catalog_adapter::CsvCatalogAdapter;
use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_summary;
use crate::domain::aligner::{AlignmentConfig, LIQUIDITY_WINDOW, MIN_OBSERVATIONS};
use crate::domain::audit::{run_duplicate_audit, AuditConfig, DuplicateAudit};
use crate::domain::classifier::{
    DuplicateThresholds, ExemptionPolicy, LOOSE_THRESHOLD, STRICT_THRESHOLD,
};
use crate::domain::config_validation::validate_audit_config;
use crate::domain::correlation::MIN_OVERLAP;
use crate::domain::error::AuditError;
use crate::domain::instrument::Catalog;
use crate::domain::quality::{
    scan_quality, QualityConfig, QualityRow, EXTREME_MOVE, MAX_GAP_DAYS, ZERO_VOLUME_PCT,
};
use crate::domain::resolution::{ResolutionPolicy, HISTORY_GAP_YEARS, TRADING_DAYS_PER_YEAR};
use crate::ports::catalog_port::CatalogPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_CATALOG: &str = "master_catalog.csv";
pub const DEFAULT_DATA_DIR: &str = "data/daily_csv";
pub const DEFAULT_REPORT: &str = "duplicates_report.csv";
pub const DEFAULT_QUALITY_REPORT: &str = "data_quality_report.csv";

#[derive(Parser, Debug)]
#[command(name = "assetaudit", about = "Audit an instrument catalog for redundancy and data quality")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find near-identical instruments and recommend which to drop
    Duplicates {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Catalog CSV file, or a directory of catalog CSVs
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Rows shown per severity in the printed summary
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// Scan every price file for gaps, zero volume and extreme moves
    Quality {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Duplicates {
            config,
            catalog,
            data_dir,
            output,
            top,
        } => load_config(config.as_deref()).and_then(|adapter| {
            let paths = resolve_paths(&adapter, catalog, data_dir, output);
            run_duplicates(&adapter, &paths, top)
        }),
        Command::Quality {
            config,
            data_dir,
            output,
        } => load_config(config.as_deref()).and_then(|adapter| {
            let mut paths = resolve_paths(&adapter, None, data_dir, None);
            if let Some(out) = output {
                paths.quality_report = out;
            }
            run_quality(&adapter, &paths)
        }),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Loads and validates the config file; no file means all defaults.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, AuditError> {
    let adapter = match path {
        Some(p) => {
            log::info!("loading config from {}", p.display());
            FileConfigAdapter::from_file(p)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_audit_config(&adapter)?;
    Ok(adapter)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditPaths {
    pub catalog: PathBuf,
    pub data_dir: PathBuf,
    pub report: PathBuf,
    pub quality_report: PathBuf,
}

/// CLI flags win over `[paths]`, which wins over the defaults.
pub fn resolve_paths(
    config: &dyn ConfigPort,
    catalog: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    report: Option<PathBuf>,
) -> AuditPaths {
    let from_config = |key: &str, default: &str| {
        config
            .get_string("paths", key)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(default))
    };
    AuditPaths {
        catalog: catalog.unwrap_or_else(|| from_config("catalog", DEFAULT_CATALOG)),
        data_dir: data_dir.unwrap_or_else(|| from_config("data_dir", DEFAULT_DATA_DIR)),
        report: report.unwrap_or_else(|| from_config("report", DEFAULT_REPORT)),
        quality_report: from_config("quality_report", DEFAULT_QUALITY_REPORT),
    }
}

fn usize_setting(config: &dyn ConfigPort, key: &str, default: usize) -> usize {
    usize::try_from(config.get_int("duplicates", key, default as i64)).unwrap_or(default)
}

pub fn build_audit_config(config: &dyn ConfigPort) -> AuditConfig {
    let exemptions = match config.get_list("duplicates", "exempt_keywords") {
        Some(keywords) => ExemptionPolicy::new(keywords),
        None => ExemptionPolicy::default(),
    };

    AuditConfig {
        alignment: AlignmentConfig {
            min_observations: usize_setting(config, "min_observations", MIN_OBSERVATIONS),
            liquidity_window: usize_setting(config, "liquidity_window", LIQUIDITY_WINDOW),
        },
        min_overlap: usize_setting(config, "min_overlap", MIN_OVERLAP),
        thresholds: DuplicateThresholds {
            loose: config.get_double("duplicates", "loose_threshold", LOOSE_THRESHOLD),
            strict: config.get_double("duplicates", "strict_threshold", STRICT_THRESHOLD),
        },
        exemptions,
        resolution: ResolutionPolicy {
            history_gap_years: config.get_double("duplicates", "history_gap_years", HISTORY_GAP_YEARS),
            trading_days_per_year: config.get_double(
                "duplicates",
                "trading_days_per_year",
                TRADING_DAYS_PER_YEAR,
            ),
        },
    }
}

pub fn build_quality_config(config: &dyn ConfigPort) -> QualityConfig {
    QualityConfig {
        max_gap_days: config.get_int("quality", "max_gap_days", MAX_GAP_DAYS),
        zero_volume_pct: config.get_double("quality", "zero_volume_pct", ZERO_VOLUME_PCT),
        extreme_move: config.get_double("quality", "extreme_move", EXTREME_MOVE),
    }
}

/// Stages 1-3 of the duplicate audit, without printing or writing anything.
pub fn run_duplicate_pipeline(
    catalog_port: &dyn CatalogPort,
    price_port: &dyn PricePort,
    config: &AuditConfig,
) -> Result<DuplicateAudit, AuditError> {
    // Stage 1: Load catalog
    let catalog = Catalog::new(catalog_port.load_instruments()?)?;

    // Stage 2: Align, correlate, classify, resolve
    // Stage 3: Assemble report
    run_duplicate_audit(&catalog, price_port, config)
}

fn run_duplicates(config: &dyn ConfigPort, paths: &AuditPaths, top: usize) -> Result<(), AuditError> {
    let audit_config = build_audit_config(config);
    log::info!("reading catalog from {}", paths.catalog.display());

    let audit = run_duplicate_pipeline(
        &CsvCatalogAdapter::new(paths.catalog.clone()),
        &CsvPriceAdapter::new(paths.data_dir.clone()),
        &audit_config,
    )?;

    // Stage 4: Print summary and persist report
    println!(
        "{}",
        text_summary::format_duplicate_summary(&audit, &audit_config.thresholds, top)
    );
    CsvReportAdapter.write_duplicates(&audit.report, &paths.report)?;
    println!("Report written to: {}", paths.report.display());

    if !audit.report.is_empty() {
        println!("\nSet is_active = 0 in the catalog for:");
        println!("{}", text_summary::format_drop_list(&audit.report));
    }
    Ok(())
}

fn run_quality(config: &dyn ConfigPort, paths: &AuditPaths) -> Result<(), AuditError> {
    let quality_config = build_quality_config(config);
    log::info!("scanning {}", paths.data_dir.display());

    let rows: Vec<QualityRow> =
        scan_quality(&CsvPriceAdapter::new(paths.data_dir.clone()), &quality_config)?;
    if rows.is_empty() {
        println!("No price files found in {}", paths.data_dir.display());
        return Ok(());
    }

    println!("{}", text_summary::format_quality_summary(&rows, &quality_config));
    CsvReportAdapter.write_quality(&rows, &paths.quality_report)?;
    println!("Full report written to: {}", paths.quality_report.display());
    Ok(())
}

fn run_validate(path: &Path) -> Result<(), AuditError> {
    load_config(Some(path))?;
    println!("Configuration is valid: {}", path.display());
    Ok(())
}
