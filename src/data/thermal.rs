//! Anchor search and threshold metrics over a 1 Hz temperature log.
//!
//! Rows are assumed to be sampled exactly one second apart. The row whose
//! reading is closest to the operator's reference temperature is pinned to
//! `t = 60 s`, and every other row is placed relative to it:
//!
//! ```text
//! time_for_index(i) = 60 + (i - anchor)
//! index_for_time(t) = anchor + (t - 60)
//! ```

use super::model::NumericColumn;
use crate::error::{ReportError, ReportResult};

/// Elapsed time assigned to the anchor row.
pub const ANCHOR_TIME_S: i64 = 60;

/// Thresholds for the "time to reach" metrics, ascending.
pub const REACH_TEMPERATURES: [f64; 4] = [100.0, 150.0, 180.0, 200.0];

/// Sample times for the "temperature at" metrics, ascending.
pub const SAMPLE_TIMES_S: [i64; 4] = [60, 120, 300, 600];

/// The eight metrics of one run. `None` means "not available".
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalMetrics {
    pub anchor_index: usize,
    /// Seconds until each of [`REACH_TEMPERATURES`] is first reached.
    pub time_to_reach: [Option<i64>; 4],
    /// Reading at each of [`SAMPLE_TIMES_S`].
    pub temperature_at: [Option<f64>; 4],
}

impl ThermalMetrics {
    /// Locate the anchor and derive every metric from it.
    pub fn compute(
        column: &NumericColumn,
        reference_at_60s: f64,
        column_index: usize,
    ) -> ReportResult<Self> {
        let anchor_index = find_anchor(column, reference_at_60s)
            .ok_or(ReportError::AnchorNotFound {
                column: column_index,
            })?;
        log::info!(
            "Anchor at row {anchor_index} ({:?} °C, reference {reference_at_60s} °C)",
            column.get(anchor_index)
        );

        let time_to_reach = REACH_TEMPERATURES.map(|t| time_to_reach(column, anchor_index, t));
        let temperature_at = SAMPLE_TIMES_S.map(|s| temperature_at(column, anchor_index, s));

        for (t, v) in REACH_TEMPERATURES.iter().zip(&time_to_reach) {
            log::debug!("time to reach {t} °C: {v:?}");
        }
        for (s, v) in SAMPLE_TIMES_S.iter().zip(&temperature_at) {
            log::debug!("temperature at {s} s: {v:?}");
        }

        Ok(Self {
            anchor_index,
            time_to_reach,
            temperature_at,
        })
    }

    pub fn time_for_index(&self, index: usize) -> i64 {
        time_for_index(self.anchor_index, index)
    }
}

/// Row whose reading is closest to `reference`; the earliest row wins ties.
///
/// Returns `None` when the column holds no reading at all.
pub fn find_anchor(column: &NumericColumn, reference: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in column.present() {
        let distance = (value - reference).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn time_for_index(anchor: usize, index: usize) -> i64 {
    ANCHOR_TIME_S + (index as i64 - anchor as i64)
}

/// Row index for elapsed time `t`, or `None` if it would be negative.
pub fn index_for_time(anchor: usize, t: i64) -> Option<usize> {
    usize::try_from(anchor as i64 + (t - ANCHOR_TIME_S)).ok()
}

/// Elapsed time of the first row, scanning from row 0, whose reading is at
/// least `threshold`.
///
/// Rows before the anchor are eligible too, so a pre-anchor reading that
/// already meets the threshold yields a time below 60 s.
pub fn time_to_reach(column: &NumericColumn, anchor: usize, threshold: f64) -> Option<i64> {
    column
        .present()
        .find(|&(_, value)| value >= threshold)
        .map(|(i, _)| time_for_index(anchor, i))
}

/// Reading at elapsed time `t`, without interpolation.
pub fn temperature_at(column: &NumericColumn, anchor: usize, t: i64) -> Option<f64> {
    index_for_time(anchor, t).and_then(|i| column.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[Option<f64>]) -> NumericColumn {
        NumericColumn::new(values.to_vec())
    }

    #[test]
    fn exact_match_is_the_anchor() {
        let col = column(&[Some(18.0), Some(20.0), Some(19.0), None, Some(25.0)]);
        let anchor = find_anchor(&col, 19.0).unwrap();
        assert_eq!(anchor, 2);
        assert_eq!(time_for_index(anchor, 2), 60);
    }

    #[test]
    fn earliest_row_wins_ties() {
        let col = column(&[Some(10.0), Some(21.0), Some(19.0), Some(21.0)]);
        assert_eq!(find_anchor(&col, 20.0), Some(1));
    }

    #[test]
    fn absent_entries_are_never_the_anchor() {
        let col = column(&[None, None, Some(500.0), None]);
        assert_eq!(find_anchor(&col, 0.0), Some(2));
    }

    #[test]
    fn all_absent_column_has_no_anchor() {
        assert_eq!(find_anchor(&column(&[None, None, None]), 20.0), None);
        assert_eq!(find_anchor(&NumericColumn::default(), 20.0), None);

        let err = ThermalMetrics::compute(&column(&[None, None]), 20.0, 3).unwrap_err();
        assert!(matches!(err, ReportError::AnchorNotFound { column: 3 }));
    }

    #[test]
    fn time_axis_round_trips() {
        assert_eq!(time_for_index(10, 0), 50);
        assert_eq!(index_for_time(10, 50), Some(0));
        assert_eq!(index_for_time(10, 49), None);
        assert_eq!(index_for_time(10, 600), Some(550));
    }

    #[test]
    fn first_crossing_is_reported_in_seconds() {
        let col = column(&[Some(90.0), Some(95.0), Some(100.0), Some(105.0), Some(110.0)]);
        // Anchor pinned at index 4 so that index 2 maps to t = 58.
        assert_eq!(time_to_reach(&col, 4, 100.0), Some(58));
        assert_eq!(time_to_reach(&col, 4, 106.0), Some(60));
        assert_eq!(time_to_reach(&col, 4, 150.0), None);
    }

    #[test]
    fn crossing_at_the_anchor_maps_to_sixty() {
        let col = column(&[Some(90.0), Some(95.0), Some(100.0), Some(105.0), Some(110.0)]);
        assert_eq!(time_to_reach(&col, 2, 100.0), Some(60));
        assert_eq!(time_to_reach(&col, 2, 101.0), Some(61));
    }

    #[test]
    fn crossing_before_the_anchor_is_still_reported() {
        // Warm-up spike at row 0 already exceeds 100 °C before the anchor.
        let col = column(&[Some(120.0), Some(20.0), Some(25.0), Some(30.0)]);
        let anchor = find_anchor(&col, 25.0).unwrap();
        assert_eq!(anchor, 2);
        assert_eq!(time_to_reach(&col, anchor, 100.0), Some(58));
    }

    #[test]
    fn absent_rows_are_skipped_when_scanning() {
        let col = column(&[None, Some(99.0), None, Some(100.0)]);
        assert_eq!(time_to_reach(&col, 0, 100.0), Some(63));
    }

    #[test]
    fn temperature_at_reads_the_mapped_row() {
        let col = column(&[Some(90.0), Some(95.0), Some(100.0), Some(105.0), Some(110.0)]);
        assert_eq!(temperature_at(&col, 2, 58), Some(90.0));
        assert_eq!(temperature_at(&col, 2, 62), Some(110.0));
        assert_eq!(temperature_at(&col, 2, 200), None);
        assert_eq!(temperature_at(&col, 2, 57), None);
    }

    #[test]
    fn temperature_at_absent_row_is_not_available() {
        let col = column(&[Some(50.0), None, Some(52.0)]);
        assert_eq!(temperature_at(&col, 0, 61), None);
    }

    #[test]
    fn short_log_has_partial_metrics() {
        // 150 rows heating 1 °C/s from 20 °C; the anchor lands on row 40.
        let values: Vec<Option<f64>> = (0..150).map(|i| Some(20.0 + i as f64)).collect();
        let metrics = ThermalMetrics::compute(&NumericColumn::new(values), 60.0, 3).unwrap();

        assert_eq!(metrics.anchor_index, 40);
        assert_eq!(metrics.time_to_reach, [Some(100), Some(150), None, None]);
        assert_eq!(metrics.temperature_at, [Some(60.0), Some(120.0), None, None]);
        assert_eq!(metrics.time_for_index(0), 20);
    }
}
