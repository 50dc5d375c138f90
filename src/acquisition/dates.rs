use chrono::{Duration, NaiveDate};

/// Every calendar date from `start` to `end`, inclusive
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    let days = (end - start).num_days();
    (0..=days).map(|i| start + Duration::days(i)).collect()
}
