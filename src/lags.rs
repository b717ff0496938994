//! Lag-feature construction and merging.
//!
//! Reinterprets each day's responder vector as the next day's lag features:
//!
//! 1. project `(date_id, symbol_id)` plus the configured responder columns,
//! 2. rename each responder to its `_lag_1` form,
//! 3. shift `date_id` forward by one,
//! 4. keep the **last** row per `(date_id, symbol_id)` key in scan order.
//!
//! The `+1` shift followed by last-per-key grouping is what keeps the
//! features leakage-safe: a row's lag columns derive only from strictly
//! prior-date data, and the grouping guarantees key uniqueness, so the
//! subsequent left join is one-to-at-most-one and never changes the row
//! count. Rows whose symbol has no prior-date record keep null lag columns;
//! nulls are expected, not errors.

use polars::prelude::*;

use crate::config::PreprocessConfig;
use crate::loader::{DATE_COL, SYMBOL_COL};

/// Build the lag frame from the loaded dataset.
///
/// Duplicate `(date_id, symbol_id)` keys in the input (e.g. duplicate
/// scans) are resolved deterministically: the stable group-by keeps groups
/// in first-appearance order and `last()` picks the final record of each
/// group in original scan order.
pub fn build_lags(train: LazyFrame, config: &PreprocessConfig) -> LazyFrame {
    let mut projection: Vec<Expr> = vec![col(DATE_COL), col(SYMBOL_COL)];
    for name in &config.lag_cols {
        let renamed = config
            .lag_rename
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("{name}{}", crate::config::LAG_SUFFIX));
        projection.push(col(name.as_str()).alias(renamed.as_str()));
    }

    train
        .select(projection)
        // Today's responders become tomorrow's lag features.
        .with_column((col(DATE_COL) + lit(1)).alias(DATE_COL))
        .group_by_stable([col(DATE_COL), col(SYMBOL_COL)])
        .agg([col("*").last()])
}

/// Left-join the lag frame back onto the dataset on `(date_id, symbol_id)`.
///
/// Every input row is preserved; unmatched rows keep null lag columns.
pub fn merge_lags(train: LazyFrame, lags: LazyFrame) -> LazyFrame {
    train.join(
        lags,
        [col(DATE_COL), col(SYMBOL_COL)],
        [col(DATE_COL), col(SYMBOL_COL)],
        JoinArgs::new(JoinType::Left),
    )
}
