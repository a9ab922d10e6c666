//! Validated fetch request: dates, ticker selection and output naming.

use chrono::NaiveDate;
use log::warn;
use std::path::PathBuf;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("dates must be in the format YYYY-MM-DD (got '{0}')")]
    InvalidDate(String),

    #[error("either --ticker or --tickers must be given")]
    MissingSelection,

    #[error("ticker symbols must not be empty")]
    EmptyTicker,

    #[error("ticker symbol '{0}' must not contain a path separator")]
    InvalidTicker(String),
}

/// A ticker ends up in the generated file name, so it must be non-blank and
/// must not contain path separators.
fn check_ticker(ticker: &str) -> Result<(), ValidationError> {
    if ticker.trim().is_empty() {
        return Err(ValidationError::EmptyTicker);
    }
    if ticker.contains(['/', '\\']) {
        return Err(ValidationError::InvalidTicker(ticker.to_string()));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

/// Which tickers to fetch and whether to write one file per ticker or a combined file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerSelection {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub selection: TickerSelection,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub output: Option<PathBuf>,
}

impl FetchRequest {
    /// Validate raw command-line values.
    ///
    /// Dates are checked first so a bad date is reported even when the ticker
    /// selection is also wrong. When both `ticker` and `tickers` are present the
    /// single ticker is used.
    pub fn new(
        ticker: Option<String>,
        tickers: Option<Vec<String>>,
        start: &str,
        end: &str,
        output: Option<PathBuf>,
    ) -> Result<Self, ValidationError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;

        let selection = match (ticker, tickers) {
            (Some(t), ignored) => {
                if ignored.is_some() {
                    warn!("both --ticker and --tickers given; using --ticker {t}");
                }
                check_ticker(&t)?;
                TickerSelection::Single(t)
            }
            (None, Some(list)) if list.is_empty() => return Err(ValidationError::MissingSelection),
            (None, Some(list)) => {
                for t in &list {
                    check_ticker(t)?;
                }
                TickerSelection::Multiple(list)
            }
            (None, None) => return Err(ValidationError::MissingSelection),
        };

        Ok(Self {
            selection,
            start,
            end,
            output,
        })
    }
}

/// Default file name for a single-ticker export.
///
/// Dates are rendered from the parsed values, so `2023-1-5` on the command
/// line becomes `2023-01-05` in the name.
pub fn single_output_name(ticker: &str, start: NaiveDate, end: NaiveDate) -> PathBuf {
    PathBuf::from(format!(
        "{ticker}_{}_to_{}.csv",
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT)
    ))
}

/// Default file name for a combined multi-ticker export.
pub fn batch_output_name(start: NaiveDate, end: NaiveDate) -> PathBuf {
    PathBuf::from(format!(
        "stocks_{}_to_{}.csv",
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT)
    ))
}
