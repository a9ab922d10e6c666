//! stockfetch — download daily price history and save it as CSV.
//!
//! Single ticker:   `stockfetch --ticker AAPL --start 2023-01-01 --end 2023-12-31`
//! Several tickers: `stockfetch --tickers AAPL MSFT --start 2023-01-01 --end 2023-12-31`
//!
//! Exit status is 1 when validation fails or nothing could be fetched.

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use stockfetch_core::{
    run, DataError, DataProvider, FetchRequest, FetcherConfig, ProviderConfig, StdoutReporter,
    YahooProvider,
};

#[derive(Parser, Debug)]
#[command(
    name = "stockfetch",
    about = "Fetch daily stock prices and save them to a CSV file"
)]
struct Cli {
    /// Ticker symbol (e.g. AAPL).
    #[arg(short = 't', long)]
    ticker: Option<String>,

    /// Several ticker symbols, written to one combined file. Short form: -ts.
    #[arg(long, num_args = 1..)]
    tickers: Option<Vec<String>>,

    /// Start date (YYYY-MM-DD).
    #[arg(short = 's', long)]
    start: String,

    /// End date (YYYY-MM-DD).
    #[arg(short = 'e', long)]
    end: String,

    /// Output CSV file name. Generated from the tickers and dates when omitted.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// TOML config file with provider settings.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

const USAGE_EXAMPLES: &str = "\
Usage examples:
stockfetch --ticker AAPL --start 2023-01-01 --end 2023-12-31
stockfetch --tickers AAPL MSFT GOOGL --start 2023-01-01 --end 2023-12-31
stockfetch --ticker NOVO-B.CO --start 2023-06-01 --end 2023-12-31 --output novo_data.csv";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    ExitCode::from(real_main(std::env::args_os().collect(), YahooProvider::new))
}

/// Run the CLI over `args` (program name first) and return the exit status.
///
/// `connect` builds the data provider from the loaded settings; it is only
/// called once the request has validated.
fn real_main<P, F>(args: Vec<OsString>, connect: F) -> u8
where
    P: DataProvider,
    F: FnOnce(&ProviderConfig) -> Result<P, DataError>,
{
    if args.len() <= 1 {
        println!("{USAGE_EXAMPLES}");
        return 0;
    }

    let cli = Cli::parse_from(normalize_args(args));
    match fetch(cli, connect) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}

/// Rewrite the two-letter `-ts` flag, which clap would read as `-t s`.
/// Everything after a bare `--` is positional and left alone.
fn normalize_args(args: Vec<OsString>) -> Vec<OsString> {
    let mut options_done = false;
    args.into_iter()
        .map(|a| {
            if options_done {
                return a;
            }
            if a == "--" {
                options_done = true;
                a
            } else if a == "-ts" {
                OsString::from("--tickers")
            } else {
                a
            }
        })
        .collect()
}

/// Validate, fetch and export. `Ok(false)` means the fetch itself failed and
/// has already been reported.
fn fetch<P, F>(cli: Cli, connect: F) -> Result<bool>
where
    P: DataProvider,
    F: FnOnce(&ProviderConfig) -> Result<P, DataError>,
{
    let request = FetchRequest::new(cli.ticker, cli.tickers, &cli.start, &cli.end, cli.output)?;
    debug!("{request:?}");

    let config = FetcherConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let provider = connect(&config.provider).context("failed to set up data provider")?;

    Ok(run(&provider, &request, &StdoutReporter).is_ok())
}
