//! Stage-level property tests for loading, lag construction, and merging.
//!
//! These run the stages on in-memory frames and assert the invariants the
//! split relies on: filter counts, lag key uniqueness, and the
//! null-iff-no-prior-date rule for merged lag columns.

use polars::prelude::*;

use market_preprocessor::prelude::*;

// ============================================================================
// Test Fixtures
// ============================================================================

/// 2 symbols × dates 1..=5, with every responder column populated.
/// responder values encode (date, symbol) so lags are easy to check:
/// responder_k = date * 10 + symbol + k / 10.
fn sample_dataset() -> DataFrame {
    let mut dates = Vec::new();
    let mut symbols = Vec::new();
    for date in 1i64..=5 {
        for symbol in 0i64..2 {
            dates.push(date);
            symbols.push(symbol);
        }
    }

    let mut df = df! {
        "date_id" => &dates,
        "symbol_id" => &symbols,
    }
    .unwrap();

    for k in 0..9usize {
        let values: Vec<f64> = dates
            .iter()
            .zip(&symbols)
            .map(|(d, s)| (*d * 10 + *s) as f64 + k as f64 / 10.0)
            .collect();
        df.with_column(Column::new(format!("responder_{k}").into(), values))
            .unwrap();
    }
    df
}

fn test_config() -> PreprocessConfig {
    PreprocessConfig::default().with_start_date(0)
}

// ============================================================================
// Loader Properties
// ============================================================================

#[test]
fn test_loader_count_matches_date_filter() {
    for start_dt in 0..6i64 {
        let config = PreprocessConfig::default().with_start_date(start_dt);
        let out = prepare_frame(sample_dataset().lazy(), &config)
            .collect()
            .unwrap();

        let expected = sample_dataset()
            .column("date_id")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .filter(|&d| d > start_dt)
            .count();
        assert_eq!(out.height(), expected, "start_dt = {start_dt}");
    }
}

#[test]
fn test_loader_adds_id_and_label_columns() {
    let out = prepare_frame(sample_dataset().lazy(), &test_config())
        .collect()
        .unwrap();
    assert!(out.column("id").is_ok());
    assert!(out.column("label").is_ok());
    assert_eq!(out.column("label").unwrap().dtype(), &DataType::Int32);
}

// ============================================================================
// Lag Builder Properties
// ============================================================================

#[test]
fn test_lag_keys_are_unique() {
    let config = test_config();
    // Duplicate the whole dataset so every key appears twice upstream.
    let mut doubled = sample_dataset();
    doubled.vstack_mut(&sample_dataset()).unwrap();

    let lags = build_lags(doubled.lazy(), &config);
    let validator = SplitValidator::new();
    assert!(validator
        .check_lag_keys_unique(lags)
        .unwrap()
        .is_valid());
}

#[test]
fn test_lag_values_come_from_previous_date() {
    let config = test_config();
    let base = prepare_frame(sample_dataset().lazy(), &config);
    let lags = build_lags(base.clone(), &config);
    let merged = merge_lags(base, lags).collect().unwrap();

    let dates = merged.column("date_id").unwrap().i64().unwrap();
    let symbols = merged.column("symbol_id").unwrap().i64().unwrap();
    let lag0 = merged.column("responder_0_lag_1").unwrap().f64().unwrap();

    for row in 0..merged.height() {
        let date = dates.get(row).unwrap();
        let symbol = symbols.get(row).unwrap();
        match lag0.get(row) {
            // responder_0 on the previous date for this symbol.
            Some(value) => {
                assert_eq!(value, ((date - 1) * 10 + symbol) as f64);
            }
            None => {
                // Only the first date has no prior-date record here.
                assert_eq!(date, 1);
            }
        }
    }
}

#[test]
fn test_merge_lag_null_iff_no_prior_date_row() {
    let config = test_config();
    // Symbol 7 exists on date 100 only; symbol 1 exists on both dates.
    let data = df! {
        "date_id" => &[100i64, 100, 101],
        "symbol_id" => &[1i64, 7, 1],
        "responder_0" => &[0.5f64, 0.9, 0.6],
        "responder_1" => &[1.5f64, 1.9, 1.6],
        "responder_2" => &[2.5f64, 2.9, 2.6],
        "responder_3" => &[3.5f64, 3.9, 3.6],
        "responder_4" => &[4.5f64, 4.9, 4.6],
        "responder_5" => &[5.5f64, 5.9, 5.6],
        "responder_6" => &[6.5f64, 6.9, 6.6],
        "responder_7" => &[7.5f64, 7.9, 7.6],
        "responder_8" => &[8.5f64, 8.9, 8.6],
    }
    .unwrap()
    .lazy();

    let base = prepare_frame(data, &config);
    let lags = build_lags(base.clone(), &config);
    let merged = merge_lags(base, lags).collect().unwrap();

    assert_eq!(merged.height(), 3);
    let lag0 = merged.column("responder_0_lag_1").unwrap().f64().unwrap();
    // Date-100 rows have no prior date.
    assert_eq!(lag0.get(0), None);
    assert_eq!(lag0.get(1), None);
    // Date-101 / symbol-1 row sees symbol 1's date-100 responder_0.
    assert_eq!(lag0.get(2), Some(0.5));
}

#[test]
fn test_merge_preserves_row_count() {
    let config = test_config();
    let base = prepare_frame(sample_dataset().lazy(), &config);
    let lags = build_lags(base.clone(), &config);
    let merged = merge_lags(base.clone(), lags);

    let validator = SplitValidator::new();
    assert!(validator
        .check_row_preservation(base, merged)
        .unwrap()
        .is_valid());
}
