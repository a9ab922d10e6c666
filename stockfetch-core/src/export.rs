//! Semicolon-delimited CSV export of a price table.
//!
//! Layout:
//!
//! ```text
//! ;Ticker;Open;High;Low;Close;Volume
//! 2023-01-03;AAPL;130.28;130.9;124.17;125.07;112117500
//! ```
//!
//! The leading column is the date index and has an empty header. Prices are
//! written in Rust's shortest round-trip form so `read_table` gets back the
//! exact values that were written.

use crate::table::{PriceRow, PriceTable};
use chrono::NaiveDate;
use std::path::Path;
use thiserror::Error;

pub const DELIMITER: u8 = b';';
pub const HEADER: [&str; 7] = ["", "Ticker", "Open", "High", "Low", "Close", "Volume"];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("unexpected header in {path}: {found}")]
    UnexpectedHeader { path: String, found: String },

    #[error("malformed row {line} in {path}: {message}")]
    MalformedRow {
        path: String,
        line: u64,
        message: String,
    },
}

/// Write `table` to `path`, replacing any existing file.
///
/// The file is opened, written and flushed inside this call.
pub fn write_table(path: &Path, table: &PriceTable) -> Result<(), ExportError> {
    let write_err = |source: csv::Error| ExportError::Write {
        path: path.display().to_string(),
        source,
    };

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(write_err)?;

    wtr.write_record(HEADER).map_err(write_err)?;
    for row in table.rows() {
        wtr.write_record([
            row.date.format(DATE_FORMAT).to_string(),
            row.ticker.clone(),
            row.open.to_string(),
            row.high.to_string(),
            row.low.to_string(),
            row.close.to_string(),
            row.volume.to_string(),
        ])
        .map_err(write_err)?;
    }
    wtr.flush().map_err(|e| write_err(e.into()))?;
    Ok(())
}

/// Read a file produced by `write_table` back into a table.
pub fn read_table(path: &Path) -> Result<PriceTable, ExportError> {
    let display = path.display().to_string();
    let read_err = |source: csv::Error| ExportError::Read {
        path: display.clone(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .from_path(path)
        .map_err(read_err)?;

    let headers = rdr.headers().map_err(read_err)?;
    if headers.iter().ne(HEADER.iter().copied()) {
        return Err(ExportError::UnexpectedHeader {
            path: display.clone(),
            found: headers.iter().collect::<Vec<_>>().join(";"),
        });
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(read_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = parse_record(&record).map_err(|message| ExportError::MalformedRow {
            path: display.clone(),
            line,
            message,
        })?;
        rows.push(row);
    }

    Ok(PriceTable::from_rows(rows))
}

fn parse_record(record: &csv::StringRecord) -> Result<PriceRow, String> {
    if record.len() != HEADER.len() {
        return Err(format!(
            "expected {} fields, found {}",
            HEADER.len(),
            record.len()
        ));
    }

    let date = NaiveDate::parse_from_str(&record[0], DATE_FORMAT)
        .map_err(|e| format!("bad date '{}': {e}", &record[0]))?;
    let price = |i: usize| -> Result<f64, String> {
        record[i]
            .parse::<f64>()
            .map_err(|e| format!("bad {} '{}': {e}", HEADER[i], &record[i]))
    };
    let volume = record[6]
        .parse::<u64>()
        .map_err(|e| format!("bad Volume '{}': {e}", &record[6]))?;

    Ok(PriceRow {
        date,
        ticker: record[1].to_string(),
        open: price(2)?,
        high: price(3)?,
        low: price(4)?,
        close: price(5)?,
        volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::PriceBar;

    fn sample_table() -> PriceTable {
        PriceTable::from_bars(
            "AAPL",
            vec![
                PriceBar {
                    date: NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
                    open: 130.28,
                    high: 130.9,
                    low: 124.17,
                    close: 125.07,
                    volume: 112_117_500,
                },
                PriceBar {
                    date: NaiveDate::from_ymd_opt(2023, 1, 4).unwrap(),
                    open: 126.89,
                    high: 128.66,
                    low: 125.08,
                    close: 126.36,
                    volume: 89_113_600,
                },
            ],
        )
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL.csv");
        write_table(&path, &sample_table()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], ";Ticker;Open;High;Low;Close;Volume");
        assert_eq!(lines[1], "2023-01-03;AAPL;130.28;130.9;124.17;125.07;112117500");
        assert_eq!(lines.len(), 3);
        assert!(lines[1..].iter().all(|l| l.split(';').count() == 7));
    }

    #[test]
    fn read_back_reproduces_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL.csv");
        let table = sample_table();
        write_table(&path, &table).unwrap();

        assert_eq!(read_table(&path).unwrap(), table);
    }

    #[test]
    fn rejects_foreign_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "date;close\n2023-01-03;1.0\n").unwrap();

        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, ExportError::UnexpectedHeader { .. }));
    }

    #[test]
    fn reports_malformed_row_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            ";Ticker;Open;High;Low;Close;Volume\n2023-01-03;AAPL;x;1;1;1;10\n",
        )
        .unwrap();

        match read_table(&path).unwrap_err() {
            ExportError::MalformedRow { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("Open"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_table(&path, &sample_table()).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
