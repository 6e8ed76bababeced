//! BarVault CLI — monthly intraday-bar backfill commands.
//!
//! Commands:
//! - `backfill` — fetch the next checkpointed month of 30-minute bars,
//!   bucket them into session segments, and upload the JSON payload
//! - `calendar` — print the market-open dates of a month
//! - `checkpoint status` — show the checkpoint and hard-stop state for a
//!   ticker

use anyhow::{bail, Context, Result};
use barvault_core::{market_dates, FsBlobStore, Month, NyseCalendar, PolygonProvider};
use barvault_runner::{
    read_checkpoint, read_hard_stop_year, run_backfill, BackfillConfig, BackfillOutcome,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "barvault",
    about = "BarVault CLI — monthly intraday-bar backfill into blob storage"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, bucket, and upload the next checkpointed month for a ticker.
    Backfill {
        /// Ticker symbol to backfill.
        #[arg(long, default_value = "NVDA")]
        ticker: String,

        /// Path to a TOML config file. Overrides --ticker/--state-dir/
        /// --provider-segment.
        #[arg(long)]
        config: Option<PathBuf>,

        /// File holding the provider API key.
        #[arg(long, default_value = "polygon_api_key")]
        api_key_file: PathBuf,

        /// Root directory of the blob store.
        #[arg(long, default_value = "blobs")]
        store_dir: PathBuf,

        /// Directory holding checkpoint and hard-stop files.
        #[arg(long, default_value = "state")]
        state_dir: PathBuf,

        /// First path segment of storage keys.
        #[arg(long, default_value = "polygon-30m")]
        provider_segment: String,
    },
    /// Print the market-open dates of a month.
    Calendar {
        /// Month to list, as YYYY-MM.
        #[arg(long)]
        month: String,
    },
    /// Checkpoint management commands.
    Checkpoint {
        #[command(subcommand)]
        action: CheckpointAction,
    },
}

#[derive(Subcommand)]
enum CheckpointAction {
    /// Show the checkpoint month and hard-stop year for a ticker.
    Status {
        /// Ticker symbol.
        #[arg(long, default_value = "NVDA")]
        ticker: String,

        /// Directory holding checkpoint and hard-stop files.
        #[arg(long, default_value = "state")]
        state_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Backfill {
            ticker,
            config,
            api_key_file,
            store_dir,
            state_dir,
            provider_segment,
        } => run_backfill_cmd(
            ticker,
            config,
            api_key_file,
            store_dir,
            state_dir,
            provider_segment,
        ),
        Commands::Calendar { month } => run_calendar(&month),
        Commands::Checkpoint { action } => match action {
            CheckpointAction::Status { ticker, state_dir } => run_status(&ticker, &state_dir),
        },
    }
}

fn run_backfill_cmd(
    ticker: String,
    config_path: Option<PathBuf>,
    api_key_file: PathBuf,
    store_dir: PathBuf,
    state_dir: PathBuf,
    provider_segment: String,
) -> Result<()> {
    let config = if let Some(path) = config_path {
        BackfillConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?
    } else {
        let mut config = BackfillConfig::in_state_dir(ticker, &state_dir);
        config.provider_segment = provider_segment;
        config
    };

    let provider = PolygonProvider::from_key_file(&api_key_file)?;
    let store = FsBlobStore::new(store_dir);
    let today = chrono::Local::now().date_naive();

    let outcome = run_backfill(&config, &provider, &store, &NyseCalendar, today)?;

    match outcome {
        BackfillOutcome::HardStopReached {
            month,
            hard_stop_year,
        } => {
            println!(
                "Hard stop reached: next month {month} is before {hard_stop_year}. Nothing to do."
            );
        }
        BackfillOutcome::Uploaded {
            month,
            key,
            market_days,
            bar_count,
            next_month,
        } => {
            println!("Uploaded {month} for {}:", config.ticker);
            println!("  Key:         {key}");
            println!("  Market days: {market_days}");
            println!("  Bars:        {bar_count}");
            println!("  Next month:  {next_month}");
        }
    }

    Ok(())
}

fn run_calendar(month: &str) -> Result<()> {
    let month: Month = match month.parse() {
        Ok(m) => m,
        Err(e) => bail!("{e}"),
    };

    let dates = market_dates(month, &NyseCalendar);
    println!("Market-open dates for {month} ({} days):", dates.len());
    for date in dates {
        println!("  {date}");
    }
    Ok(())
}

fn run_status(ticker: &str, state_dir: &std::path::Path) -> Result<()> {
    let config = BackfillConfig::in_state_dir(ticker, state_dir);

    println!("Ticker:     {}", config.ticker);
    match read_checkpoint(&config.checkpoint_path) {
        Some(month) => println!("Checkpoint: {month}"),
        None => {
            let default = Month::containing(chrono::Local::now().date_naive()).pred();
            println!("Checkpoint: none (next run would fetch {default})");
        }
    }
    match read_hard_stop_year(&config.hard_stop_path) {
        Some(year) => println!("Hard stop:  {year}"),
        None => println!("Hard stop:  none"),
    }
    Ok(())
}
