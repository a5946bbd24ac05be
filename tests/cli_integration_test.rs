//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Config loading and validation from INI files on disk
//! - Audit config construction (build_audit_config)
//! - Full duplicate pipeline over catalog and price CSVs in a temp dir
//! - `run` writing the duplicate and quality reports

mod common;

use assetaudit::adapters::csv_catalog_adapter::CsvCatalogAdapter;
use assetaudit::adapters::csv_price_adapter::CsvPriceAdapter;
use assetaudit::cli::{self, Cli, Command};
use assetaudit::domain::classifier::Classification;
use assetaudit::domain::error::AuditError;
use common::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[paths]
catalog = master_catalog.csv
data_dir = data/daily_csv

[duplicates]
loose_threshold = 0.97
strict_threshold = 0.99
min_overlap = 150
exempt_keywords = value, growth, , dividend
history_gap_years = 3

[quality]
max_gap_days = 7
"#;

const CATALOG_CSV: &str = "\
Ticker,Description,Sub_Class,Sector_Style,Asset_Class,Is_Active,Currency
SPY,SPDR S&P 500 ETF,Large Cap,Blend,Equity,1,USD
VOO,Vanguard S&P 500 ETF,Large Cap,Blend,Equity,1,USD
QQQ,Invesco Nasdaq 100,Large Cap,Growth,Equity,1,USD
OLDX,Retired Fund,Large Cap,Blend,Equity,0,USD
";

/// Writes a catalog plus SPY/VOO/QQQ price files into `dir`.
fn write_fixture(dir: &Path) {
    fs::write(dir.join("master_catalog.csv"), CATALOG_CSV).unwrap();
    let prices = dir.join("daily_csv");
    fs::create_dir(&prices).unwrap();

    let days = 260;
    let base = normal_draws(101, days);
    let start = date(2022, 3, 1);
    let histories = [
        history_from_returns("SPY", start, &mix(&base, &normal_draws(102, days), 0.0), 8e6),
        history_from_returns("VOO", start, &mix(&base, &normal_draws(103, days), 0.04), 2e6),
        history_from_returns("QQQ", start, &mix(&base, &normal_draws(104, days), 0.7), 6e6),
    ];
    for h in &histories {
        fs::write(prices.join(format!("{}.csv", h.ticker)), history_csv(h)).unwrap();
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn valid_ini_loads_and_builds_config() {
        let file = write_temp_ini(VALID_INI);
        let adapter = cli::load_config(Some(file.path())).unwrap();
        let config = cli::build_audit_config(&adapter);

        assert_eq!(config.thresholds.loose, 0.97);
        assert_eq!(config.thresholds.strict, 0.99);
        assert_eq!(config.min_overlap, 150);
        assert_eq!(config.resolution.history_gap_years, 3.0);
        assert_eq!(
            config.exemptions.keywords(),
            &["VALUE".to_string(), "GROWTH".to_string(), "DIVIDEND".to_string()]
        );
        assert_eq!(cli::build_quality_config(&adapter).max_gap_days, 7);
    }

    #[test]
    fn missing_config_means_defaults() {
        let adapter = cli::load_config(None).unwrap();
        assert_eq!(
            cli::build_audit_config(&adapter),
            assetaudit::domain::audit::AuditConfig::default()
        );
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let file = write_temp_ini("[duplicates]\nloose_threshold = 0.999\nstrict_threshold = 0.99\n");
        let err = cli::load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, AuditError::ConfigInvalid { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
    }

    #[test]
    fn nan_threshold_rejected() {
        let file = write_temp_ini("[duplicates]\nloose_threshold = NaN\n");
        let err = cli::load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, AuditError::ConfigInvalid { key, .. } if key == "loose_threshold"));
    }

    #[test]
    fn mistyped_number_rejected() {
        let file = write_temp_ini("[duplicates]\nmin_overlap = lots\n");
        let err = cli::load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, AuditError::ConfigInvalid { key, .. } if key == "min_overlap"));
    }

    #[test]
    fn nonexistent_config_file_is_parse_error() {
        let err = cli::load_config(Some(Path::new("/nonexistent/audit.ini"))).unwrap_err();
        assert!(matches!(err, AuditError::ConfigParse { .. }));
    }

    #[test]
    fn validate_command_exit_codes() {
        let good = write_temp_ini(VALID_INI);
        let bad = write_temp_ini("[quality]\nzero_volume_pct = 150\n");

        let ok = cli::run(Cli {
            command: Command::Validate {
                config: good.path().to_path_buf(),
            },
        });
        let failed = cli::run(Cli {
            command: Command::Validate {
                config: bad.path().to_path_buf(),
            },
        });
        assert_eq!(ok, ExitCode::SUCCESS);
        assert_eq!(failed, ExitCode::from(2));
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn csv_fixture_yields_single_hard_duplicate() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let audit = cli::run_duplicate_pipeline(
            &CsvCatalogAdapter::new(dir.path().join("master_catalog.csv")),
            &CsvPriceAdapter::new(dir.path().join("daily_csv")),
            &Default::default(),
        )
        .unwrap();

        assert_eq!(audit.universe_size, 3);
        assert_eq!(audit.analysed, 3);
        assert_eq!(audit.report.len(), 1);
        let rec = &audit.report.recommendations[0];
        assert_eq!((rec.keep.as_str(), rec.drop.as_str()), ("SPY", "VOO"));
        assert_eq!(rec.classification, Classification::Hard);
    }

    #[test]
    fn catalog_directory_with_missing_prices_skips() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let catalogs = dir.path().join("data_import");
        fs::create_dir(&catalogs).unwrap();
        fs::copy(dir.path().join("master_catalog.csv"), catalogs.join("a_equity.csv")).unwrap();
        fs::write(
            catalogs.join("b_bonds.csv"),
            "ticker,description,sub_class,sector_style,asset_class,is_active\n\
             AGG,US Aggregate Bond,Aggregate,Core,Fixed Income,1\n",
        )
        .unwrap();

        let audit = cli::run_duplicate_pipeline(
            &CsvCatalogAdapter::new(catalogs),
            &CsvPriceAdapter::new(dir.path().join("daily_csv")),
            &Default::default(),
        )
        .unwrap();

        assert_eq!(audit.universe_size, 4);
        assert_eq!(audit.skipped.len(), 1);
        assert_eq!(audit.skipped[0].ticker, "AGG");
        assert_eq!(audit.report.drop_list(), vec!["VOO"]);
    }

    #[test]
    fn missing_catalog_is_error() {
        let dir = TempDir::new().unwrap();
        let err = cli::run_duplicate_pipeline(
            &CsvCatalogAdapter::new(dir.path().join("nope.csv")),
            &CsvPriceAdapter::new(dir.path().to_path_buf()),
            &Default::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AuditError::MissingCatalog { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(3));
    }
}

mod run_command {
    use super::*;

    #[test]
    fn duplicates_command_writes_report() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let report = dir.path().join("duplicates_report.csv");

        let code = cli::run(Cli {
            command: Command::Duplicates {
                config: None,
                catalog: Some(dir.path().join("master_catalog.csv")),
                data_dir: Some(dir.path().join("daily_csv")),
                output: Some(report.clone()),
                top: 20,
            },
        });

        assert_eq!(code, ExitCode::SUCCESS);
        let content = fs::read_to_string(&report).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "keep,drop,correlation,reason,classification");
        assert!(lines[1].starts_with("SPY,VOO,0.99"));
        assert!(lines[1].ends_with("Hard Duplicate"));
    }

    #[test]
    fn empty_universe_exit_code() {
        let dir = TempDir::new().unwrap();
        let catalog = dir.path().join("catalog.csv");
        fs::write(
            &catalog,
            "ticker,description,sub_class,sector_style,asset_class,is_active\n\
             SPY,SPDR S&P 500,Large Cap,Blend,Equity,0\n",
        )
        .unwrap();

        let code = cli::run(Cli {
            command: Command::Duplicates {
                config: None,
                catalog: Some(catalog),
                data_dir: Some(dir.path().to_path_buf()),
                output: Some(dir.path().join("out.csv")),
                top: 20,
            },
        });
        assert_eq!(code, ExitCode::from(3));
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn quality_command_writes_report() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        fs::write(dir.path().join("daily_csv").join("EMPTY.csv"), "date,close,volume\n").unwrap();
        let report = dir.path().join("quality.csv");

        let code = cli::run(Cli {
            command: Command::Quality {
                config: None,
                data_dir: Some(dir.path().join("daily_csv")),
                output: Some(report.clone()),
            },
        });

        assert_eq!(code, ExitCode::SUCCESS);
        let content = fs::read_to_string(&report).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("EMPTY,EMPTY FILE"));
        assert!(lines[2].starts_with("QQQ,OK,2022-03-01,"));
    }
}
