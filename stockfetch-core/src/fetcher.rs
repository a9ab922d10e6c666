//! Fetch orchestration: provider call, reshape, export, report.
//!
//! Tickers are fetched one after another. Every per-ticker failure is caught
//! here, reported, and turned into a `FetchError`; nothing is retried.

use crate::export::{self, ExportError};
use crate::provider::{DataError, DataProvider};
use crate::request::{batch_output_name, single_output_name, FetchRequest, TickerSelection};
use crate::table::PriceTable;
use chrono::NaiveDate;
use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no data found for {ticker}")]
    Empty { ticker: String },

    #[error("error fetching {ticker}: {source}")]
    Provider {
        ticker: String,
        #[source]
        source: DataError,
    },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("no data could be fetched")]
    NoData,
}

/// A table that was written to disk.
#[derive(Debug, Clone)]
pub struct SavedTable {
    pub path: PathBuf,
    pub table: PriceTable,
}

/// Outcome of a multi-ticker fetch that wrote a combined file.
#[derive(Debug)]
pub struct BatchSummary {
    pub path: PathBuf,
    pub table: PriceTable,
    pub requested: usize,
    pub failures: Vec<(String, FetchError)>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.requested - self.failures.len()
    }
}

/// Receives user-facing progress messages.
pub trait FetchReporter {
    /// A single-ticker table was written.
    fn single_saved(&self, ticker: &str, saved: &SavedTable);

    /// A single-ticker fetch ended without a file.
    fn single_failed(&self, ticker: &str, start: NaiveDate, end: NaiveDate, err: &FetchError);

    /// One ticker of a batch produced rows.
    fn ticker_fetched(&self, ticker: &str);

    /// One ticker of a batch was skipped.
    fn ticker_failed(&self, ticker: &str, err: &FetchError);

    /// The combined batch file was written.
    fn batch_saved(&self, summary: &BatchSummary);

    /// The batch ended without a combined file.
    fn batch_failed(&self, err: &FetchError);
}

/// Reporter that prints to stdout.
pub struct StdoutReporter;

impl FetchReporter for StdoutReporter {
    fn single_saved(&self, ticker: &str, saved: &SavedTable) {
        println!("Data for {ticker} saved to {}", saved.path.display());
        println!("Days: {}", saved.table.len());
        if let (Some(first), Some(last)) = (saved.table.first_date(), saved.table.last_date()) {
            println!("Period: {first} to {last}");
        }
    }

    fn single_failed(&self, ticker: &str, start: NaiveDate, end: NaiveDate, err: &FetchError) {
        match err {
            FetchError::Empty { .. } => {
                println!("No data found for {ticker} in the period {start} to {end}")
            }
            FetchError::Provider { source, .. } => {
                println!("Error fetching data for {ticker}: {source}")
            }
            other => println!("Error saving data for {ticker}: {other}"),
        }
    }

    fn ticker_fetched(&self, ticker: &str) {
        println!("✓ Fetched data for {ticker}");
    }

    fn ticker_failed(&self, ticker: &str, err: &FetchError) {
        match err {
            FetchError::Empty { .. } => println!("✗ No data found for {ticker}"),
            FetchError::Provider { source, .. } => println!("✗ Error fetching {ticker}: {source}"),
            other => println!("✗ {ticker}: {other}"),
        }
    }

    fn batch_saved(&self, summary: &BatchSummary) {
        println!("\nAll data saved to {}", summary.path.display());
        println!("Tickers: {}", summary.requested);
        println!("Total data points: {}", summary.table.len());
    }

    fn batch_failed(&self, err: &FetchError) {
        match err {
            FetchError::NoData => println!("No data could be fetched"),
            other => println!("Error saving combined data: {other}"),
        }
    }
}

/// Fetch one ticker and reshape it, without writing anything.
pub fn fetch_table(
    provider: &dyn DataProvider,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceTable, FetchError> {
    let bars = provider
        .fetch(ticker, start, end)
        .map_err(|source| FetchError::Provider {
            ticker: ticker.to_string(),
            source,
        })?;

    if bars.is_empty() {
        return Err(FetchError::Empty {
            ticker: ticker.to_string(),
        });
    }

    let table = PriceTable::from_bars(ticker, bars);
    debug!("{ticker}: {} rows from {}", table.len(), provider.name());
    Ok(table)
}

/// Fetch one ticker and write it to `output`, or to the generated name.
pub fn fetch_single(
    provider: &dyn DataProvider,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
    output: Option<&Path>,
    reporter: &dyn FetchReporter,
) -> Result<SavedTable, FetchError> {
    let result = fetch_table(provider, ticker, start, end).and_then(|table| {
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| single_output_name(ticker, start, end));
        export::write_table(&path, &table)?;
        Ok(SavedTable { path, table })
    });

    match &result {
        Ok(saved) => reporter.single_saved(ticker, saved),
        Err(e) => reporter.single_failed(ticker, start, end, e),
    }
    result
}

/// Fetch every ticker in order and write the successful ones to one file.
///
/// Failed or empty tickers are reported and skipped. The call only fails as a
/// whole when no ticker produced rows or the combined file cannot be written.
pub fn fetch_multiple(
    provider: &dyn DataProvider,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
    output: Option<&Path>,
    reporter: &dyn FetchReporter,
) -> Result<BatchSummary, FetchError> {
    let mut tables = Vec::with_capacity(tickers.len());
    let mut failures = Vec::new();

    for ticker in tickers {
        match fetch_table(provider, ticker, start, end) {
            Ok(table) => {
                reporter.ticker_fetched(ticker);
                tables.push(table);
            }
            Err(e) => {
                reporter.ticker_failed(ticker, &e);
                failures.push((ticker.clone(), e));
            }
        }
    }

    if tables.is_empty() {
        let err = FetchError::NoData;
        reporter.batch_failed(&err);
        return Err(err);
    }

    let table = PriceTable::concat(tables);
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| batch_output_name(start, end));
    if let Err(e) = export::write_table(&path, &table) {
        let err = FetchError::from(e);
        reporter.batch_failed(&err);
        return Err(err);
    }

    let summary = BatchSummary {
        path,
        table,
        requested: tickers.len(),
        failures,
    };
    reporter.batch_saved(&summary);
    Ok(summary)
}

/// Execute a validated request.
pub fn run(
    provider: &dyn DataProvider,
    request: &FetchRequest,
    reporter: &dyn FetchReporter,
) -> Result<PriceTable, FetchError> {
    let output = request.output.as_deref();
    match &request.selection {
        TickerSelection::Single(ticker) => {
            fetch_single(provider, ticker, request.start, request.end, output, reporter)
                .map(|saved| saved.table)
        }
        TickerSelection::Multiple(tickers) => {
            fetch_multiple(provider, tickers, request.start, request.end, output, reporter)
                .map(|summary| summary.table)
        }
    }
}
