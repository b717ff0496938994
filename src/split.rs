//! Chronological train/holdout splitting.
//!
//! Rows are partitioned by a *date cutoff* rather than a raw row index, so
//! no date straddles the boundary: every row of a given `date_id` lands
//! entirely in one partition, which preserves temporal causality for
//! evaluation. The cutoff is the date of the last row intended for the
//! earlier partition; rows tying with it at the boundary all stay in the
//! training side, so the realized holdout may be smaller than requested.
//!
//! The input frame is expected to be sorted by `date_id` (the raw dataset
//! is); the cutoff lookup is positional.

use polars::prelude::*;

use crate::error::{PrepError, Result};
use crate::loader::DATE_COL;

/// Materialized facts about one split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSummary {
    /// Total rows entering the split.
    pub total_rows: usize,

    /// Rows in the earlier (training) partition.
    pub train_rows: usize,

    /// Rows in the later (holdout) partition.
    pub holdout_rows: usize,

    /// Last date included in the training partition.
    pub cutoff_date: i64,
}

/// Chronological splitter with a fixed holdout ratio.
#[derive(Debug, Clone, Copy)]
pub struct ChronoSplitter {
    ratio: f64,
}

impl ChronoSplitter {
    /// Create a splitter. `ratio` is the target holdout fraction and must
    /// lie in the open interval (0, 1).
    pub fn new(ratio: f64) -> Result<Self> {
        if !ratio.is_finite() || ratio <= 0.0 || ratio >= 1.0 {
            return Err(PrepError::Config(format!(
                "split ratio must be in the open interval (0, 1), got {ratio}"
            )));
        }
        Ok(Self { ratio })
    }

    /// Split `frame` into (training, holdout) partitions.
    ///
    /// With `n` rows and `k = floor(n * ratio)` rows reserved for the
    /// holdout, the cutoff date is read at sorted row index `n - k - 1`;
    /// the training partition is `date_id <= cutoff`, the holdout is
    /// `date_id > cutoff`.
    ///
    /// Only the `date_id` column is materialized here; the returned
    /// partitions stay lazy.
    ///
    /// # Errors
    ///
    /// An empty frame is a fatal data error. The constructor's ratio bound
    /// guarantees `k < n`, so the cutoff index is always in range.
    pub fn split(&self, frame: LazyFrame) -> Result<(LazyFrame, LazyFrame, SplitSummary)> {
        let dates = frame.clone().select([col(DATE_COL)]).collect()?;
        let total_rows = dates.height();
        if total_rows == 0 {
            return Err(PrepError::Data(
                "cannot split an empty dataset".to_string(),
            ));
        }

        let holdout_target = (total_rows as f64 * self.ratio).floor() as usize;
        // ratio < 1 guarantees floor(n * ratio) <= n - 1.
        debug_assert!(holdout_target < total_rows);

        let date_values = dates.column(DATE_COL)?.cast(&DataType::Int64)?;
        let date_values = date_values.i64()?;
        let cutoff_idx = total_rows - holdout_target - 1;
        let cutoff_date = date_values.get(cutoff_idx).ok_or_else(|| {
            PrepError::Data(format!("null date_id at split index {cutoff_idx}"))
        })?;

        // Ties at the cutoff date all fall on the training side.
        let train_rows = date_values
            .into_iter()
            .filter(|d| d.is_some_and(|d| d <= cutoff_date))
            .count();
        let holdout_rows = total_rows - train_rows;

        let training = frame.clone().filter(col(DATE_COL).lt_eq(lit(cutoff_date)));
        let holdout = frame.filter(col(DATE_COL).gt(lit(cutoff_date)));

        Ok((
            training,
            holdout,
            SplitSummary {
                total_rows,
                train_rows,
                holdout_rows,
                cutoff_date,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_of_dates(dates: &[i64]) -> LazyFrame {
        df! { DATE_COL => dates }.unwrap().lazy()
    }

    #[test]
    fn test_rejects_bad_ratio() {
        assert!(ChronoSplitter::new(0.0).is_err());
        assert!(ChronoSplitter::new(1.0).is_err());
        assert!(ChronoSplitter::new(f64::NAN).is_err());
        assert!(ChronoSplitter::new(0.1).is_ok());
    }

    #[test]
    fn test_empty_frame_is_fatal() {
        let splitter = ChronoSplitter::new(0.1).unwrap();
        let frame = frame_of_dates(&[]);
        assert!(matches!(
            splitter.split(frame),
            Err(PrepError::Data(_))
        ));
    }

    #[test]
    fn test_ten_rows_five_dates_ratio_point_two() {
        // 2 symbols per date across 5 dates; the holdout must be exactly
        // the last date's rows.
        let splitter = ChronoSplitter::new(0.2).unwrap();
        let frame = frame_of_dates(&[1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);

        let (train, holdout, summary) = splitter.split(frame).unwrap();
        assert_eq!(summary.cutoff_date, 4);
        assert_eq!(summary.train_rows, 8);
        assert_eq!(summary.holdout_rows, 2);

        assert_eq!(train.collect().unwrap().height(), 8);
        assert_eq!(holdout.collect().unwrap().height(), 2);
    }

    #[test]
    fn test_ties_at_cutoff_stay_in_training() {
        // Requesting 40% of 10 rows lands the boundary inside date 3, so
        // all of date 3 stays in training and the holdout shrinks.
        let splitter = ChronoSplitter::new(0.4).unwrap();
        let frame = frame_of_dates(&[1, 1, 1, 2, 2, 3, 3, 3, 4, 4]);

        let (_, _, summary) = splitter.split(frame).unwrap();
        assert_eq!(summary.cutoff_date, 3);
        assert_eq!(summary.train_rows, 8);
        assert_eq!(summary.holdout_rows, 2);
        assert!(summary.holdout_rows <= 4);
    }

    #[test]
    fn test_single_date_yields_empty_holdout() {
        let splitter = ChronoSplitter::new(0.3).unwrap();
        let frame = frame_of_dates(&[7, 7, 7, 7]);

        let (train, holdout, summary) = splitter.split(frame).unwrap();
        assert_eq!(summary.train_rows, 4);
        assert_eq!(summary.holdout_rows, 0);
        assert_eq!(train.collect().unwrap().height(), 4);
        assert_eq!(holdout.collect().unwrap().height(), 0);
    }

    #[test]
    fn test_degenerate_ratio_for_tiny_frame() {
        // floor(1 * 0.9) = 0 still leaves the single row in training.
        let splitter = ChronoSplitter::new(0.9).unwrap();
        let (_, _, summary) = splitter.split(frame_of_dates(&[1])).unwrap();
        assert_eq!(summary.train_rows, 1);

        // Two rows at ratio 0.9 reserve one row; with distinct dates the
        // holdout gets exactly the later one.
        let (_, _, summary) = splitter.split(frame_of_dates(&[1, 2])).unwrap();
        assert_eq!(summary.cutoff_date, 1);
        assert_eq!(summary.holdout_rows, 1);
    }

    #[test]
    fn test_ratio_near_one_keeps_first_row_in_training() {
        // floor(3 * 0.999) = 2 reserved rows; the cutoff lands on the
        // first row, the training side keeps at least that row.
        let splitter = ChronoSplitter::new(0.999).unwrap();
        let (train, holdout, summary) = splitter.split(frame_of_dates(&[1, 2, 3])).unwrap();
        assert_eq!(summary.cutoff_date, 1);
        assert_eq!(summary.train_rows, 1);
        assert_eq!(summary.holdout_rows, 2);
        assert_eq!(train.collect().unwrap().height(), 1);
        assert_eq!(holdout.collect().unwrap().height(), 2);
    }

    #[test]
    fn test_partition_dates_never_overlap() {
        let splitter = ChronoSplitter::new(0.3).unwrap();
        let frame = frame_of_dates(&[1, 2, 2, 3, 4, 4, 4, 5, 6, 6]);

        let (train, holdout, _) = splitter.split(frame).unwrap();
        let max_train = train
            .select([col(DATE_COL).max()])
            .collect()
            .unwrap()
            .column(DATE_COL)
            .unwrap()
            .i64()
            .unwrap()
            .get(0)
            .unwrap();
        let min_holdout = holdout
            .select([col(DATE_COL).min()])
            .collect()
            .unwrap()
            .column(DATE_COL)
            .unwrap()
            .i64()
            .unwrap()
            .get(0)
            .unwrap();
        assert!(max_train < min_holdout);
    }
}
