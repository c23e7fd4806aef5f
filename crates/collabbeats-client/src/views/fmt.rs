//! Timestamp formatting. `now` is always passed in, never read from a
//! clock, so rendered output is deterministic.

use chrono::{DateTime, Utc};

/// Compact age: `42s`, `5m`, `3h`, `2d`.
pub fn time_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - ts).num_seconds().max(0);
    if secs < 60 {
        return format!("{secs}s");
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{mins}m");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h");
    }
    format!("{}d", hours / 24)
}

/// Age with suffix, or a dash for unknown: `5m ago`, `—`.
pub fn from_now(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match ts {
        Some(ts) => format!("{} ago", time_ago(ts, now)),
        None => "—".to_string(),
    }
}

/// Full date + time: `2024-05-01 12:30`.
pub fn stamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Time of day only, for message bubbles: `12:30`.
pub fn clock(ts: DateTime<Utc>) -> String {
    ts.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn age_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "30s");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m");
        assert_eq!(time_ago(now - Duration::hours(7), now), "7h");
        assert_eq!(time_ago(now - Duration::days(3), now), "3d");
        // clock skew never renders negative ages
        assert_eq!(time_ago(now + Duration::seconds(10), now), "0s");
    }

    #[test]
    fn from_now_dashes_unknown() {
        let now = Utc::now();
        assert_eq!(from_now(None, now), "—");
        assert_eq!(from_now(Some(now - Duration::minutes(2)), now), "2m ago");
    }
}
