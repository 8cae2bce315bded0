//! Price series table.

use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Rows of a single symbol's series, always sorted ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesTable {
    rows: Vec<PriceBar>,
}

impl TimeSeriesTable {
    pub fn new(mut rows: Vec<PriceBar>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        Self { rows }
    }

    pub fn rows(&self) -> &[PriceBar] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep rows whose calendar date lies in `[start, end]`.
    ///
    /// Filtering only applies when both bounds are given; a single bound is ignored.
    pub fn filter_dates(self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => Self {
                rows: self
                    .rows
                    .into_iter()
                    .filter(|r| {
                        let date = r.timestamp.date();
                        date >= start && date <= end
                    })
                    .collect(),
            },
            _ => self,
        }
    }

    /// Lowest and highest close, if any.
    pub fn close_bounds(&self) -> Option<(f64, f64)> {
        if self.rows.is_empty() {
            return None;
        }
        let min = self.rows.iter().map(|r| r.close).fold(f64::INFINITY, f64::min);
        let max = self
            .rows
            .iter()
            .map(|r| r.close)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}
