//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::command_adapter::CommandAdapter;
use crate::adapters::download_dir_adapter::DownloadDirAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_chart_adapter::HtmlChartAdapter;
use crate::adapters::raw_export::read_raw_export;
use crate::adapters::sqlite_adapter::SqliteAdapter;
use crate::domain::asset::{Catalog, Ticker};
use crate::domain::error::CryptochartError;
use crate::domain::price_series::DateRange;
use crate::domain::query::load_series;
use crate::domain::refresh::{ensure_current, store_export, RefreshOutcome, RefreshPolicy};
use crate::domain::settings::Settings;
use crate::ports::acquisition_port::AcquisitionPort;
use crate::ports::cache_port::CachePort;
use crate::ports::chart_port::{Chart, ChartPort, NamedSeries};
use crate::prompt::{ChartMode, Prompter};

#[derive(Parser, Debug)]
#[command(name = "cryptochart", about = "Cached historical crypto price charts")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to an interactive `chart` session
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Refresh stale caches and chart one or two assets
    Chart {
        /// Ticker to chart (give twice to compare); prompts when omitted
        #[arg(short, long = "ticker")]
        tickers: Vec<String>,
        #[arg(long, value_parser = parse_cli_date)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_cli_date)]
        to: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Refetch even when the cache is fresh
        #[arg(long)]
        force: bool,
    },
    /// Refresh the cache for one or more assets
    Refresh {
        #[arg(short, long = "ticker", required = true)]
        tickers: Vec<String>,
        #[arg(long)]
        force: bool,
    },
    /// Load a raw CSV export from disk into the cache
    Import {
        #[arg(short, long)]
        ticker: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show cached date range per asset
    Status,
    /// List supported assets
    List,
}

pub fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date {s:?} (expected YYYY-MM-DD)"))
}

pub fn run(cli: Cli) -> ExitCode {
    let catalog = Catalog::standard();
    let config = cli.config.as_deref();

    let result = match cli.command {
        None => load_settings(config)
            .and_then(|s| run_chart(&s, &catalog, &[], None, None, None, false)),
        Some(Command::Chart {
            tickers,
            from,
            to,
            output,
            force,
        }) => load_settings(config)
            .and_then(|s| run_chart(&s, &catalog, &tickers, from, to, output, force)),
        Some(Command::Refresh { tickers, force }) => {
            load_settings(config).and_then(|s| run_refresh(&s, &catalog, &tickers, force))
        }
        Some(Command::Import { ticker, file }) => {
            load_settings(config).and_then(|s| run_import(&s, &catalog, &ticker, &file))
        }
        Some(Command::Status) => load_settings(config).and_then(|s| run_status(&s, &catalog)),
        Some(Command::List) => {
            run_list(&catalog);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Settings from the given INI file, or defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CryptochartError> {
    let adapter = match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path).map_err(|e| CryptochartError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?
        }
        None => FileConfigAdapter::empty(),
    };
    Settings::from_config(&adapter)
}

pub fn build_acquisition(settings: &Settings) -> Box<dyn AcquisitionPort> {
    match CommandAdapter::from_settings(&settings.acquisition) {
        Some(adapter) => Box::new(adapter),
        None => Box::new(DownloadDirAdapter::new(
            settings.acquisition.download_dir.clone(),
        )),
    }
}

pub fn policy(settings: &Settings, force: bool) -> RefreshPolicy {
    RefreshPolicy {
        tolerance_days: settings.cache.tolerance_days,
        mapping: settings.mapping.clone(),
        force,
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn resolve_tickers(
    catalog: &Catalog,
    symbols: &[String],
) -> Result<Vec<Ticker>, CryptochartError> {
    symbols.iter().map(|s| catalog.parse(s)).collect()
}

/// "<Name> Price Over Time" for one asset, "<A> vs <B>" for a pair.
pub fn chart_title(catalog: &Catalog, tickers: &[Ticker]) -> String {
    let names: Vec<&str> = tickers.iter().map(|t| catalog.asset(*t).name).collect();
    match names.as_slice() {
        [single] => format!("{single} Price Over Time"),
        _ => names.join(" vs "),
    }
}

fn report_outcome(ticker: Ticker, outcome: &RefreshOutcome) {
    match outcome {
        RefreshOutcome::Fresh { latest: Some(date) } => {
            eprintln!("{ticker}: cache is current (latest {date})")
        }
        RefreshOutcome::Fresh { latest: None } => eprintln!("{ticker}: cache is current"),
        RefreshOutcome::Refreshed { rows } => eprintln!("{ticker}: cached {rows} rows"),
    }
}

/// Brings each ticker's cache up to date, then charts the (filtered) series.
/// Tickers are handled one after another.
#[allow(clippy::too_many_arguments)]
pub fn chart_pipeline(
    cache: &dyn CachePort,
    acquisition: &dyn AcquisitionPort,
    chart_port: &dyn ChartPort,
    catalog: &Catalog,
    tickers: &[Ticker],
    range: Option<DateRange>,
    policy: &RefreshPolicy,
    today: NaiveDate,
) -> Result<PathBuf, CryptochartError> {
    let mut series = Vec::with_capacity(tickers.len());
    for &ticker in tickers {
        let asset = catalog.asset(ticker);
        let outcome = ensure_current(cache, acquisition, asset, policy, today)?;
        report_outcome(ticker, &outcome);

        let loaded = load_series(cache, ticker, range)?;
        if loaded.is_empty() {
            eprintln!("{ticker}: no rows in the selected range");
        }
        series.push(NamedSeries {
            label: asset.name.to_string(),
            series: loaded,
        });
    }

    chart_port.render(&Chart {
        title: chart_title(catalog, tickers),
        series,
    })
}

fn run_chart(
    settings: &Settings,
    catalog: &Catalog,
    symbols: &[String],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    output: Option<PathBuf>,
    force: bool,
) -> Result<(), CryptochartError> {
    if symbols.len() > 2 {
        return Err(CryptochartError::Chart {
            reason: format!("at most two tickers can be charted, got {}", symbols.len()),
        });
    }

    let (tickers, range) = if symbols.is_empty() {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stderr());
        let mode = prompter.select_mode()?;
        let mut tickers = vec![prompter.select_ticker(catalog, "data for")?];
        if mode == ChartMode::Paired {
            tickers.push(prompter.select_ticker(catalog, "it against")?);
        }
        let range = match (from, to) {
            (None, None) => prompter.select_range()?,
            (from, to) => DateRange::from_bounds(from, to)?,
        };
        (tickers, range)
    } else {
        (resolve_tickers(catalog, symbols)?, DateRange::from_bounds(from, to)?)
    };

    let cache = SqliteAdapter::from_settings(&settings.cache)?;
    let acquisition = build_acquisition(settings);
    let chart = HtmlChartAdapter::new(output.unwrap_or_else(|| settings.chart_output.clone()))
        .with_markers(settings.chart_markers);

    eprintln!("Loading data...");
    let path = chart_pipeline(
        &cache,
        acquisition.as_ref(),
        &chart,
        catalog,
        &tickers,
        range,
        &policy(settings, force),
        today(),
    )?;
    println!("{}", path.display());
    Ok(())
}

fn run_refresh(
    settings: &Settings,
    catalog: &Catalog,
    symbols: &[String],
    force: bool,
) -> Result<(), CryptochartError> {
    let tickers = resolve_tickers(catalog, symbols)?;
    let cache = SqliteAdapter::from_settings(&settings.cache)?;
    let acquisition = build_acquisition(settings);
    let policy = policy(settings, force);
    let today = today();

    for ticker in tickers {
        let asset = catalog.asset(ticker);
        let outcome = ensure_current(&cache, acquisition.as_ref(), asset, &policy, today)?;
        report_outcome(ticker, &outcome);
    }
    Ok(())
}

fn run_import(
    settings: &Settings,
    catalog: &Catalog,
    symbol: &str,
    file: &Path,
) -> Result<(), CryptochartError> {
    let ticker = catalog.parse(symbol)?;
    eprintln!("Loading CSV: {}", file.display());
    let raw = read_raw_export(file)?;
    let cache = SqliteAdapter::from_settings(&settings.cache)?;
    let rows = store_export(&cache, catalog.asset(ticker), &raw, &settings.mapping)?;
    eprintln!(
        "{ticker}: cached {rows} rows ({} dropped)",
        raw.rows.len().saturating_sub(rows)
    );
    Ok(())
}

fn run_status(settings: &Settings, catalog: &Catalog) -> Result<(), CryptochartError> {
    let cache = SqliteAdapter::from_settings(&settings.cache)?;
    let today = today();
    for asset in catalog.iter() {
        match cache.data_range(asset.ticker)? {
            Some((first, last, count)) => {
                let age = (today - last).num_days();
                let state = if age <= i64::from(settings.cache.tolerance_days) {
                    "fresh"
                } else {
                    "stale"
                };
                println!(
                    "{:<5} {:<13} {} rows, {} to {} ({})",
                    asset.ticker, asset.name, count, first, last, state
                );
            }
            None => println!("{:<5} {:<13} no data", asset.ticker, asset.name),
        }
    }
    Ok(())
}

fn run_list(catalog: &Catalog) {
    for asset in catalog.iter() {
        println!("{:<5} {}", asset.ticker, asset.name);
    }
}
