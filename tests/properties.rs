//! Property tests for loading, conversion and layout

use std::collections::BTreeMap;
use std::io::Cursor;

use proptest::prelude::*;
use stiffness_spy::io::read_matrix_market_from;
use stiffness_spy::spy::{markers, x_ticks};
use stiffness_spy::{coo_to_csr, Marker};

/// A matrix shape and a set of distinct, non-zero entries inside it
fn matrix_strategy() -> impl Strategy<Value = (usize, usize, BTreeMap<(usize, usize), f64>)> {
    (1usize..40, 1usize..40).prop_flat_map(|(rows, cols)| {
        let value = prop_oneof![1e-3f64..1e3, -1e3f64..-1e-3];
        (
            Just(rows),
            Just(cols),
            prop::collection::btree_map((0..rows, 0..cols), value, 0..60),
        )
    })
}

fn to_mtx(rows: usize, cols: usize, entries: &BTreeMap<(usize, usize), f64>) -> String {
    let mut text = format!(
        "%%MatrixMarket matrix coordinate real general\n{} {} {}\n",
        rows,
        cols,
        entries.len()
    );
    // Reverse order so the converter has to sort
    for (&(i, j), v) in entries.iter().rev() {
        text.push_str(&format!("{} {} {:e}\n", i + 1, j + 1, v));
    }
    text
}

proptest! {
    #[test]
    fn shape_and_entries_preserved((rows, cols, entries) in matrix_strategy()) {
        let loaded = read_matrix_market_from(Cursor::new(to_mtx(rows, cols, &entries))).unwrap();
        prop_assert_eq!(loaded.shape(), (rows, cols));
        prop_assert_eq!(loaded.nnz(), entries.len());

        let csr = coo_to_csr(&loaded.into_triplets());
        prop_assert_eq!(csr.shape(), (rows, cols));
        prop_assert_eq!(csr.nnz(), entries.len());

        let converted: BTreeMap<(usize, usize), f64> =
            csr.iter().map(|(i, j, &v)| ((i, j), v)).collect();
        prop_assert_eq!(converted, entries);
    }

    #[test]
    fn one_marker_per_entry_above_precision((rows, cols, entries) in matrix_strategy()) {
        let loaded = read_matrix_market_from(Cursor::new(to_mtx(rows, cols, &entries))).unwrap();
        let csr = coo_to_csr(&loaded.into_triplets());

        let expected: Vec<Marker> = entries
            .keys()
            .map(|&(row, col)| Marker { col, row })
            .collect();
        prop_assert_eq!(markers(&csr, 1e-7), expected);
    }

    #[test]
    fn ticks_span_zero_to_cols_plus_one(cols in 0usize..100_000) {
        let ticks = x_ticks(cols, 10).unwrap();
        let step = (cols + 1) as f64 / 10.0;

        prop_assert_eq!(ticks.len(), 11);
        prop_assert_eq!(ticks[0], 0.0);
        prop_assert!((ticks[10] - (cols + 1) as f64).abs() < 1e-9 * (cols + 1) as f64);
        for pair in ticks.windows(2) {
            prop_assert!((pair[1] - pair[0] - step).abs() < 1e-9 * step.max(1.0));
        }
    }
}
