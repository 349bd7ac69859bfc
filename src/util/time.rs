//! Time formatting for the feed UI.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Format a playback position as `m:ss` (or `h:mm:ss` past an hour).
pub fn format_timestamp(d: Duration) -> String {
    let total = d.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Human-readable age of a video ("just now", "5m ago", "3h ago", "2d ago").
pub fn format_age(created_at: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(created_at);
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", elapsed.num_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_format_timestamp_under_an_hour() {
        assert_eq!(format_timestamp(Duration::from_secs(0)), "0:00");
        assert_eq!(format_timestamp(Duration::from_secs(75)), "1:15");
        assert_eq!(format_timestamp(Duration::from_secs(599)), "9:59");
    }

    #[test]
    fn test_format_timestamp_with_hours() {
        assert_eq!(format_timestamp(Duration::from_secs(3661)), "1:01:01");
    }

    #[test]
    fn test_format_age_buckets() {
        let now = Utc::now();
        assert_eq!(format_age(now), "just now");
        assert_eq!(format_age(now - ChronoDuration::minutes(5)), "5m ago");
        assert_eq!(format_age(now - ChronoDuration::hours(3)), "3h ago");
        assert_eq!(format_age(now - ChronoDuration::days(2)), "2d ago");
    }
}
