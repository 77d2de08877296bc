//! flowrank CLI — fetch, reconcile, and report institutional flow rankings.
//!
//! With no arguments the run starts from today and walks backward one
//! calendar day at a time, probing each date with the cheap trading-day
//! check before committing to the full concurrent fetch. The first date
//! that yields a complete analysis wins; exhausting the lookback budget
//! exits non-zero so calling automation can tell total failure from a
//! skipped holiday.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use flowrank_analysis::DailyAnalysis;
use flowrank_core::{Config, Error};
use flowrank_fetch::{build_client, fetch_all, find_session, is_trading_day};
use flowrank_report::{print_summary, write_report};
use reqwest::Client;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "flowrank",
    about = "Daily institutional buy/sell ranking report for TWSE and TPEx"
)]
struct Cli {
    /// Target date (YYYYMMDD). Defaults to today; the search walks back
    /// day by day until a trading session is found.
    date: Option<String>,

    /// Directory where report files are written.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::default();
    config.report.output_dir = cli.output_dir;

    let start = match &cli.date {
        Some(text) => NaiveDate::parse_from_str(text, "%Y%m%d")
            .with_context(|| format!("invalid date '{}', expected YYYYMMDD", text))?,
        None => Local::now().date_naive(),
    };
    info!("starting backward search from {}", start);

    let client = build_client(&config.fetch)?;
    let found = find_session(start, config.search.max_lookback_days, |date| {
        attempt_date(&client, &config, date)
    })
    .await;

    match found {
        Some(date) => {
            info!("analysis complete for {}", date);
            Ok(())
        }
        None => bail!(
            "no trading session found within the last {} days",
            config.search.max_lookback_days
        ),
    }
}

/// Try one candidate date end to end. Returns true only for a completed
/// analysis; a closed market or an empty session continues the search.
async fn attempt_date(client: &Client, config: &Config, date: NaiveDate) -> bool {
    if !is_trading_day(client, &config.fetch, date).await {
        info!("{} is not a trading session", date);
        return false;
    }
    info!("{} is a trading session, running full analysis", date);

    match run_pipeline(client, config, date).await {
        Ok(()) => true,
        Err(Error::NoData(_)) => {
            warn!("no usable records for {}, continuing backward search", date);
            false
        }
        Err(e) => {
            error!("analysis for {} failed: {}", date, e);
            false
        }
    }
}

/// The full pipeline for one confirmed trading day: concurrent fetch,
/// reconcile, rank, print, and persist.
async fn run_pipeline(client: &Client, config: &Config, date: NaiveDate) -> flowrank_core::Result<()> {
    let feeds = fetch_all(client, &config.fetch, date).await;
    let analysis = DailyAnalysis::from_feeds(date, &feeds)?;

    print_summary(&analysis);

    // The console summary above stays valid even if the file write fails.
    match write_report(&analysis, &config.report.output_dir) {
        Ok(path) => info!("report written to {}", path.display()),
        Err(e) => error!("report emission failed: {}", e),
    }

    Ok(())
}
