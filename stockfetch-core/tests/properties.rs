//! Property tests for table shaping and export naming.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use stockfetch_core::request::single_output_name;
use stockfetch_core::{read_table, write_table, PriceBar, PriceTable};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn bars_from_offsets(offsets: &[u16]) -> Vec<PriceBar> {
    offsets
        .iter()
        .map(|&o| PriceBar {
            date: base_date() + Duration::days(o as i64),
            open: 10.0 + o as f64 * 0.01,
            high: 11.0 + o as f64 * 0.01,
            low: 9.0 + o as f64 * 0.01,
            close: 10.5 + o as f64 * 0.01,
            volume: o as u64 * 100,
        })
        .collect()
}

proptest! {
    #[test]
    fn concat_keeps_blocks_contiguous_and_sorted(
        blocks in prop::collection::vec(prop::collection::vec(0u16..2000, 0..20), 1..6)
    ) {
        let tables: Vec<PriceTable> = blocks
            .iter()
            .enumerate()
            .map(|(i, offsets)| PriceTable::from_bars(&format!("T{i}"), bars_from_offsets(offsets)))
            .collect();
        let expected_len: usize = tables.iter().map(PriceTable::len).sum();
        let expected_order: Vec<String> = tables
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| t.rows()[0].ticker.clone())
            .collect();

        let combined = PriceTable::concat(tables);
        prop_assert_eq!(combined.len(), expected_len);
        prop_assert_eq!(combined.tickers(), expected_order.iter().map(String::as_str).collect::<Vec<_>>());

        for pair in combined.rows().windows(2) {
            if pair[0].ticker == pair[1].ticker {
                prop_assert!(pair[0].date < pair[1].date);
            }
        }
    }

    #[test]
    fn written_table_reads_back_identically(offsets in prop::collection::vec(0u16..2000, 1..50)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let table = PriceTable::from_bars("NOVO-B.CO", bars_from_offsets(&offsets));

        write_table(&path, &table).unwrap();
        prop_assert_eq!(read_table(&path).unwrap(), table);
    }

    #[test]
    fn generated_name_encodes_ticker_and_range(
        ticker in "[A-Z]{1,5}",
        start_off in 0i64..3000,
        len in 0i64..400,
    ) {
        let start = base_date() + Duration::days(start_off);
        let end = start + Duration::days(len);
        let name = single_output_name(&ticker, start, end).display().to_string();

        prop_assert!(name.contains(&ticker));
        prop_assert!(name.contains(&start.format("%Y-%m-%d").to_string()));
        prop_assert!(name.contains(&end.format("%Y-%m-%d").to_string()));
        prop_assert!(name.ends_with(".csv"));
    }
}
