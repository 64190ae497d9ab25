//! Coarse relative-time labels ("just now", "5 minutes ago", ...).

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Format the age of `event_time` relative to `now`.
///
/// Timestamps in the future collapse to "just now".
pub fn format(now: DateTime<Utc>, event_time: DateTime<Utc>) -> String {
    let diff = (now - event_time).num_milliseconds().div_euclid(1000);

    if diff < MINUTE {
        "just now".to_string()
    } else if diff < HOUR {
        ago(diff / MINUTE, "minute")
    } else if diff < DAY {
        ago(diff / HOUR, "hour")
    } else {
        ago(diff / DAY, "day")
    }
}

/// Relative label for an event, anchored on the dashboard's live baseline.
///
/// Returns an empty string until the first successful fetch has completed.
pub fn label(
    last_updated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    event_time: DateTime<Utc>,
) -> String {
    match last_updated {
        Some(_) => format(now, event_time),
        None => String::new(),
    }
}

fn ago(n: i64, unit: &str) -> String {
    let suffix = if n > 1 { "s" } else { "" };
    format!("{n} {unit}{suffix} ago")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(secs: i64) -> String {
        let now = Utc::now();
        format(now, now - Duration::seconds(secs))
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(at(0), "just now");
        assert_eq!(at(59), "just now");
        assert_eq!(at(60), "1 minute ago");
        assert_eq!(at(119), "1 minute ago");
        assert_eq!(at(120), "2 minutes ago");
        assert_eq!(at(3599), "59 minutes ago");
        assert_eq!(at(3600), "1 hour ago");
        assert_eq!(at(86399), "23 hours ago");
        assert_eq!(at(86400), "1 day ago");
        assert_eq!(at(3 * 86400 + 5), "3 days ago");
    }

    #[test]
    fn sub_second_remainders_floor() {
        let now = Utc::now();
        let t = now - Duration::milliseconds(59_999);
        assert_eq!(format(now, t), "just now");
        let t = now - Duration::milliseconds(60_001);
        assert_eq!(format(now, t), "1 minute ago");
    }

    #[test]
    fn future_timestamps_are_just_now() {
        let now = Utc::now();
        assert_eq!(format(now, now + Duration::minutes(10)), "just now");
    }

    #[test]
    fn buckets_never_go_backwards_with_age() {
        fn rank(label: &str) -> (u8, i64) {
            if label == "just now" {
                return (0, 0);
            }
            let n: i64 = label.split(' ').next().unwrap().parse().unwrap();
            let unit = if label.contains("minute") {
                1
            } else if label.contains("hour") {
                2
            } else {
                3
            };
            (unit, n)
        }

        let mut prev = (0, 0);
        for secs in (0..200_000).step_by(37) {
            let r = rank(&at(secs));
            assert!(r >= prev, "label regressed at {secs}s");
            prev = r;
        }
    }

    #[test]
    fn label_is_empty_without_baseline() {
        let now = Utc::now();
        let t = now - Duration::seconds(300);
        assert_eq!(label(None, now, t), "");
        assert_eq!(label(Some(now), now, t), "5 minutes ago");
    }
}
