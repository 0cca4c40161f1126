/// Date helpers for dashboard ranges.
use chrono::{Duration, NaiveDate, Utc};

/// Inclusive date range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `days` days back through `today`.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self {
            start: today - Duration::days(days),
            end: today,
        }
    }

    /// Default dashboard range: the last 30 days through today (UTC).
    pub fn last_30_days() -> Self {
        Self::last_days(today_utc(), 30)
    }
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
