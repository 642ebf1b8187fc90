//! Date-indexed table of several series
//!
//! Aligns observations of several series on a shared, sorted date index.
//! Cells are `None` where a series has no observation (or no value) for a date.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::TimeSeriesValue;

/// Observations of several series aligned on a shared date index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesFrame {
    dates: Vec<NaiveDate>,
    codes: Vec<u32>,
    /// One column per code, each `dates.len()` long
    columns: Vec<Vec<Option<f64>>>,
}

impl SeriesFrame {
    /// Build a frame from per-series observations.
    ///
    /// Columns follow the first occurrence of each code; a repeated code is
    /// merged into its first column. Observations without a parsable date
    /// are dropped.
    pub fn from_series<I>(series: I) -> Self
    where
        I: IntoIterator<Item = (u32, Vec<TimeSeriesValue>)>,
    {
        let mut codes: Vec<u32> = Vec::new();
        let mut rows: BTreeMap<NaiveDate, HashMap<u32, Option<f64>>> = BTreeMap::new();

        for (code, values) in series {
            if !codes.contains(&code) {
                codes.push(code);
            }
            for value in values {
                if let Some(date) = value.date {
                    rows.entry(date).or_default().insert(code, value.value);
                }
            }
        }

        let columns = codes
            .iter()
            .map(|code| {
                rows.values()
                    .map(|row| row.get(code).copied().flatten())
                    .collect()
            })
            .collect();

        Self {
            dates: rows.into_keys().collect(),
            codes,
            columns,
        }
    }

    /// Sorted date index
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Series codes, one per column
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Values of one series across the date index
    pub fn column(&self, code: u32) -> Option<&[Option<f64>]> {
        let index = self.codes.iter().position(|c| *c == code)?;
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Value of one series at one date
    pub fn value(&self, date: NaiveDate, code: u32) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.column(code)?.get(row).copied().flatten()
    }

    /// Number of dates in the index
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeSeriesPoint;

    fn values(code: u32, points: &[(&str, &str)]) -> (u32, Vec<TimeSeriesValue>) {
        let values = points
            .iter()
            .map(|(date, value)| TimeSeriesValue::from_point(code, TimeSeriesPoint::new(*date, *value)))
            .collect();
        (code, values)
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_empty_frame() {
        let frame = SeriesFrame::from_series(Vec::new());
        assert!(frame.is_empty());
        assert!(frame.codes().is_empty());
    }

    #[test]
    fn test_frame_aligns_dates() {
        let frame = SeriesFrame::from_series(vec![
            values(12, &[("03/01/2020", "0,02"), ("02/01/2020", "0,01")]),
            values(1, &[("02/01/2020", "4.40"), ("06/01/2020", "4.41")]),
        ]);

        assert_eq!(frame.codes(), &[12, 1]);
        assert_eq!(
            frame.dates(),
            &[ymd(2020, 1, 2), ymd(2020, 1, 3), ymd(2020, 1, 6)]
        );
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.column(12).unwrap(), &[Some(0.01), Some(0.02), None]);
        assert_eq!(frame.column(1).unwrap(), &[Some(4.40), None, Some(4.41)]);
        assert_eq!(frame.value(ymd(2020, 1, 6), 1), Some(4.41));
        assert_eq!(frame.value(ymd(2020, 1, 6), 12), None);
        assert_eq!(frame.column(99), None);
    }

    #[test]
    fn test_frame_drops_undated_points() {
        let frame = SeriesFrame::from_series(vec![values(7, &[("bad", "1"), ("2019", "2")])]);

        assert_eq!(frame.dates(), &[ymd(2019, 12, 31)]);
        assert_eq!(frame.value(ymd(2019, 12, 31), 7), Some(2.0));
    }

    #[test]
    fn test_deserialized_short_column_has_no_value() {
        let frame: SeriesFrame = serde_json::from_str(
            r#"{"dates": ["2020-01-01", "2020-01-02"], "codes": [3, 4], "columns": [[1.5]]}"#,
        )
        .unwrap();

        assert_eq!(frame.value(ymd(2020, 1, 1), 3), Some(1.5));
        assert_eq!(frame.value(ymd(2020, 1, 2), 3), None);
        assert_eq!(frame.column(4), None);
        assert_eq!(frame.value(ymd(2020, 1, 1), 4), None);
    }

    #[test]
    fn test_frame_merges_repeated_codes() {
        let frame = SeriesFrame::from_series(vec![
            values(5, &[("01/01/2020", "1")]),
            values(5, &[("02/01/2020", "2")]),
        ]);

        assert_eq!(frame.codes(), &[5]);
        assert_eq!(frame.column(5).unwrap(), &[Some(1.0), Some(2.0)]);
    }
}
