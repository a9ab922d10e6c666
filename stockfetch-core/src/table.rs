//! Price table: provider bars reshaped to the fixed export layout.
//!
//! A table is a sequence of ticker blocks. Inside a block rows are ascending
//! by date with no repeated dates; blocks keep the order they were added in.

use crate::provider::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day for one ticker, in export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub ticker: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
}

impl PriceTable {
    /// Attach `ticker` to every bar and order the block by date.
    ///
    /// Duplicate dates keep the first bar the provider sent.
    pub fn from_bars(ticker: &str, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);

        let rows = bars
            .into_iter()
            .map(|b| PriceRow {
                date: b.date,
                ticker: ticker.to_string(),
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
                volume: b.volume,
            })
            .collect();

        Self { rows }
    }

    /// Build a table from rows that are already in export order.
    pub fn from_rows(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }

    /// Concatenate tables block-wise, in the order given.
    pub fn concat(tables: impl IntoIterator<Item = PriceTable>) -> Self {
        let rows = tables.into_iter().flat_map(|t| t.rows).collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Date of the first row, which for a single-ticker table is the earliest.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// Distinct tickers in the order their blocks appear.
    pub fn tickers(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !out.contains(&row.ticker.as_str()) {
                out.push(row.ticker.as_str());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(y: i32, m: u32, d: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn from_bars_attaches_ticker_and_sorts() {
        let table = PriceTable::from_bars(
            "AAPL",
            vec![bar(2023, 1, 4, 126.0), bar(2023, 1, 3, 125.0)],
        );
        assert_eq!(table.len(), 2);
        assert!(table.rows().iter().all(|r| r.ticker == "AAPL"));
        assert_eq!(table.first_date(), NaiveDate::from_ymd_opt(2023, 1, 3));
        assert_eq!(table.last_date(), NaiveDate::from_ymd_opt(2023, 1, 4));
    }

    #[test]
    fn duplicate_dates_keep_first_bar() {
        let table = PriceTable::from_bars(
            "AAPL",
            vec![bar(2023, 1, 3, 125.0), bar(2023, 1, 3, 999.0)],
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].close, 125.0);
    }

    #[test]
    fn concat_is_block_wise() {
        let a = PriceTable::from_bars("A", vec![bar(2023, 1, 4, 1.0), bar(2023, 1, 5, 2.0)]);
        let b = PriceTable::from_bars(
            "B",
            vec![bar(2023, 1, 3, 3.0), bar(2023, 1, 4, 4.0), bar(2023, 1, 5, 5.0)],
        );
        let combined = PriceTable::concat([a, b]);

        assert_eq!(combined.len(), 5);
        let tickers: Vec<&str> = combined.rows().iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, ["A", "A", "B", "B", "B"]);
        // B's earlier date is not merged ahead of A
        assert_eq!(combined.first_date(), NaiveDate::from_ymd_opt(2023, 1, 4));
        assert_eq!(combined.tickers(), ["A", "B"]);
    }

    #[test]
    fn empty_table() {
        let table = PriceTable::from_bars("AAPL", Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.first_date(), None);
        assert!(table.tickers().is_empty());
    }
}
