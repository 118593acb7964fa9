//! CLI integration tests for command dispatch.
//!
//! Tests cover:
//! - Settings loading from INI files on disk
//! - `import` into a file-backed cache
//! - Non-interactive `chart` and `refresh` through the download directory
//! - Exit codes for config, ticker, acquisition and chart failures

mod common;

use clap::Parser;
use common::*;
use cryptochart::adapters::sqlite_adapter::SqliteAdapter;
use cryptochart::cli::{self, Cli};
use cryptochart::domain::asset::Ticker;
use cryptochart::domain::error::CryptochartError;
use cryptochart::ports::cache_port::CachePort;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;

const EXPORT_CSV: &str = "Date,Open,High,Low,Volume,Close\n\
2024-01-03,0,0,0,0,\"$45,100.00\"\n\
2024-01-01,0,0,0,0,\"$42,250.10\"\n\
garbage,0,0,0,0,\"$1\"\n\
2024-01-02,0,0,0,0,\"$44,000.00\"\n";

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let downloads = dir.path().join("downloads");
        fs::create_dir_all(&downloads).unwrap();
        let config = dir.path().join("cryptochart.ini");
        let mut file = fs::File::create(&config).unwrap();
        write!(
            file,
            "[cache]\npath = {}\n\n[acquisition]\ndownload_dir = {}\n",
            dir.path().join("cache").join("prices.db").display(),
            downloads.display()
        )
        .unwrap();
        Self { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_export(&self, name: &str) -> PathBuf {
        let path = self.path("downloads").join(name);
        fs::write(&path, EXPORT_CSV).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> ExitCode {
        let mut argv = vec!["cryptochart", "--config", self.config.to_str().unwrap()];
        argv.extend_from_slice(args);
        cli::run(Cli::try_parse_from(argv).unwrap())
    }

    fn cache(&self) -> SqliteAdapter {
        let settings = cli::load_settings(Some(self.config.as_path())).unwrap();
        SqliteAdapter::from_settings(&settings.cache).unwrap()
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn missing_file_is_config_parse_error() {
        let err = cli::load_settings(Some(Path::new("/nonexistent/cryptochart.ini"))).unwrap_err();
        assert!(matches!(err, CryptochartError::ConfigParse { .. }));
    }

    #[test]
    fn no_file_means_defaults() {
        let settings = cli::load_settings(None).unwrap();
        assert_eq!(settings.cache.tolerance_days, 2);
        assert_eq!(settings.chart_output, PathBuf::from("cryptochart.html"));
    }

    #[test]
    fn invalid_value_exits_with_config_code() {
        let ws = Workspace::new();
        fs::write(&ws.config, "[cache]\ntolerance_days = -3\n").unwrap();
        assert_eq!(ws.run(&["status"]), ExitCode::from(2));
    }

    #[test]
    fn list_ignores_broken_config() {
        let code = cli::run(
            Cli::try_parse_from(["cryptochart", "--config", "/nonexistent.ini", "list"]).unwrap(),
        );
        assert_eq!(code, ExitCode::SUCCESS);
    }
}

mod import_command {
    use super::*;

    #[test]
    fn import_stores_sorted_rows() {
        let ws = Workspace::new();
        let file = ws.write_export("bitcoin.csv");

        let code = ws.run(&["import", "--ticker", "btc", "--file", file.to_str().unwrap()]);

        assert_eq!(code, ExitCode::SUCCESS);
        let series = ws.cache().read_series(Ticker::Btc, None).unwrap();
        let dates: Vec<_> = series.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
    }

    #[test]
    fn import_then_status_succeeds() {
        let ws = Workspace::new();
        let file = ws.write_export("ethereum.csv");
        assert_eq!(
            ws.run(&["import", "-t", "ETH", "-f", file.to_str().unwrap()]),
            ExitCode::SUCCESS
        );
        assert_eq!(ws.run(&["status"]), ExitCode::SUCCESS);
        assert_eq!(
            ws.cache().data_range(Ticker::Eth).unwrap(),
            Some((date(2024, 1, 1), date(2024, 1, 3), 3))
        );
    }

    #[test]
    fn import_unknown_ticker_exits_with_ticker_code() {
        let ws = Workspace::new();
        let file = ws.write_export("litecoin.csv");
        assert_eq!(
            ws.run(&["import", "-t", "LTC", "-f", file.to_str().unwrap()]),
            ExitCode::from(5)
        );
    }

    #[test]
    fn import_missing_file_exits_with_export_code() {
        let ws = Workspace::new();
        let missing = ws.path("nope.csv");
        assert_eq!(
            ws.run(&["import", "-t", "BTC", "-f", missing.to_str().unwrap()]),
            ExitCode::from(4)
        );
    }
}

mod chart_command {
    use super::*;

    #[test]
    fn chart_acquires_from_download_dir_and_writes_html() {
        let ws = Workspace::new();
        ws.write_export("bitcoin_2010-12-12_2024-01-03.csv");
        let output = ws.path("out").join("btc.html");

        let code = ws.run(&["chart", "-t", "BTC", "--output", output.to_str().unwrap()]);

        assert_eq!(code, ExitCode::SUCCESS);
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("Bitcoin Price Over Time"));
        assert!(html.contains("3 points, 2024-01-01 to 2024-01-03"));
    }

    #[test]
    fn chart_with_range_filters_points() {
        let ws = Workspace::new();
        ws.write_export("solana.csv");
        let output = ws.path("sol.html");

        let code = ws.run(&[
            "chart",
            "-t",
            "SOL",
            "--from",
            "2024-01-02",
            "--to",
            "2024-01-02",
            "-o",
            output.to_str().unwrap(),
        ]);

        assert_eq!(code, ExitCode::SUCCESS);
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("1 points, 2024-01-02 to 2024-01-02"));
    }

    #[test]
    fn chart_without_export_exits_with_acquisition_code() {
        let ws = Workspace::new();
        let output = ws.path("none.html");
        assert_eq!(
            ws.run(&["chart", "-t", "ADA", "-o", output.to_str().unwrap()]),
            ExitCode::from(4)
        );
        assert!(!output.exists());
    }

    #[test]
    fn chart_inverted_range_exits_with_range_code() {
        let ws = Workspace::new();
        assert_eq!(
            ws.run(&["chart", "-t", "BTC", "--from", "2024-02-01", "--to", "2024-01-01"]),
            ExitCode::from(5)
        );
    }

    #[test]
    fn chart_three_tickers_exits_with_chart_code() {
        let ws = Workspace::new();
        assert_eq!(
            ws.run(&["chart", "-t", "BTC", "-t", "ETH", "-t", "XRP"]),
            ExitCode::from(6)
        );
    }
}

mod refresh_command {
    use super::*;

    #[test]
    fn refresh_loads_each_ticker() {
        let ws = Workspace::new();
        ws.write_export("dogecoin.csv");
        ws.write_export("cardano.csv");

        assert_eq!(
            ws.run(&["refresh", "-t", "DOGE", "-t", "ADA"]),
            ExitCode::SUCCESS
        );
        let cache = ws.cache();
        assert_eq!(cache.read_series(Ticker::Doge, None).unwrap().len(), 3);
        assert_eq!(cache.read_series(Ticker::Ada, None).unwrap().len(), 3);
    }

    #[test]
    fn refresh_stops_at_first_failure() {
        let ws = Workspace::new();
        ws.write_export("tron.csv");

        assert_eq!(
            ws.run(&["refresh", "-t", "BNB", "-t", "TRX"]),
            ExitCode::from(4)
        );
        assert_eq!(ws.cache().data_range(Ticker::Trx).unwrap(), None);
    }
}
