//! Timestamp formatting for axis ticks and tooltips.

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const FULL: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const SHORT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

fn datetime(timestamp: f64) -> Option<OffsetDateTime> {
    if !timestamp.is_finite() {
        return None;
    }
    OffsetDateTime::from_unix_timestamp(timestamp as i64).ok()
}

/// `HH:MM:SS` for tooltips and the traffic table.
pub fn format_time(timestamp: f64) -> String {
    datetime(timestamp)
        .and_then(|dt| dt.format(FULL).ok())
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// `HH:MM` for the x-axis tick labels.
pub fn format_time_short(timestamp: f64) -> String {
    datetime(timestamp)
        .and_then(|dt| dt.format(SHORT).ok())
        .unwrap_or_else(|| "--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_timestamp() {
        // 2021-01-01 00:00:30 UTC
        assert_eq!(format_time(1609459230.0), "00:00:30");
        assert_eq!(format_time_short(1609459230.0), "00:00");
    }

    #[test]
    fn test_fractional_seconds_truncate() {
        assert_eq!(format_time(1609459230.9), "00:00:30");
    }

    #[test]
    fn test_invalid_timestamp_renders_placeholder() {
        assert_eq!(format_time(f64::NAN), "--:--:--");
        assert_eq!(format_time_short(f64::INFINITY), "--:--");
        assert_eq!(format_time(1e18), "--:--:--");
    }
}
