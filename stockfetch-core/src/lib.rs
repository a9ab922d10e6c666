//! stockfetch core — daily price history retrieval and CSV export.
//!
//! - Provider trait and the Yahoo Finance chart API client
//! - Price table model with ticker-block concatenation
//! - Semicolon-delimited CSV writer/reader
//! - Single and multi-ticker fetch orchestration
//! - Request validation and TOML configuration

pub mod config;
pub mod export;
pub mod fetcher;
pub mod provider;
pub mod request;
pub mod table;
pub mod yahoo;

pub use config::{ConfigError, FetcherConfig, ProviderConfig};
pub use export::{read_table, write_table, ExportError};
pub use fetcher::{
    fetch_multiple, fetch_single, fetch_table, run, BatchSummary, FetchError, FetchReporter,
    SavedTable, StdoutReporter,
};
pub use provider::{DataError, DataProvider, PriceBar};
pub use request::{parse_date, FetchRequest, TickerSelection, ValidationError};
pub use table::{PriceRow, PriceTable};
pub use yahoo::YahooProvider;
