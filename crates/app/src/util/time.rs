use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{AppError, Result};

/// Usage is bucketed by UTC calendar day.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn window_hours(hours: i64) -> Result<Duration> {
    positive_window(hours, "hours", Duration::try_hours(hours))
}

pub fn window_days(days: i64) -> Result<Duration> {
    positive_window(days, "days", Duration::try_days(days))
}

fn positive_window(value: i64, unit: &str, window: Option<Duration>) -> Result<Duration> {
    match window {
        Some(window) if value > 0 => Ok(window),
        _ => Err(AppError::InvalidInput(format!(
            "look-back of {} {} is out of range",
            value, unit
        ))),
    }
}

pub fn window_start(now: DateTime<Utc>, window: Duration) -> Result<DateTime<Utc>> {
    if window <= Duration::zero() {
        return Err(AppError::InvalidInput(
            "look-back window must be positive".to_string(),
        ));
    }
    now.checked_sub_signed(window)
        .ok_or_else(|| AppError::InvalidInput("look-back window is too large".to_string()))
}

/// Whether `instant` lies inside the look-back window ending at `now`.
pub fn within_window(instant: Option<DateTime<Utc>>, start: Option<DateTime<Utc>>) -> bool {
    match (start, instant) {
        (None, _) => true,
        (Some(start), Some(instant)) => instant >= start,
        (Some(_), None) => false,
    }
}
