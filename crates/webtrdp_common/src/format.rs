//! Presentation helpers
//!
//! Pure formatting of telegram fields for tables and status lines.

use crate::model::TelegramRecord;

/// Shown wherever a value is zero, missing, or not yet meaningful
pub const EMPTY_VALUE: &str = "—";

const US_PER_SECOND: i64 = 1_000_000;

/// Microsecond duration as milliseconds with one decimal ("12.5 ms")
pub fn format_period_ms(period_us: Option<f64>) -> String {
    match period_us {
        Some(us) if us.is_finite() && us != 0.0 => format!("{:.1} ms", us / 1000.0),
        _ => EMPTY_VALUE.to_string(),
    }
}

/// Age of an epoch timestamp relative to `now_us`
pub fn format_age(timestamp_us: Option<i64>, now_us: i64) -> String {
    let timestamp_us = match timestamp_us {
        Some(ts) if ts != 0 => ts,
        _ => return EMPTY_VALUE.to_string(),
    };

    let secs = now_us.saturating_sub(timestamp_us) / US_PER_SECOND;
    if secs < 1 {
        "just now".to_string()
    } else if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

/// Direction token to label: `source_sink` -> `Source/Sink`
pub fn format_direction(token: Option<&str>) -> String {
    let token = match token {
        Some(t) if !t.trim().is_empty() => t.trim(),
        _ => return EMPTY_VALUE.to_string(),
    };

    token
        .split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("/")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cycle time column; cycle is configured in microseconds
pub fn format_cycle(cycle_us: Option<u64>) -> String {
    format_period_ms(cycle_us.map(|us| us as f64))
}

/// Last-receive column for one record
pub fn format_rx_age(record: &TelegramRecord, now_us: i64) -> String {
    format_age(record.last_rx_time(), now_us)
}

/// Optional text column
pub fn or_empty(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => EMPTY_VALUE.to_string(),
    }
}

/// "1 telegram" / "3 telegrams"
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_formatting() {
        assert_eq!(format_period_ms(Some(12_345.0)), "12.3 ms");
        assert_eq!(format_period_ms(Some(100_000.0)), "100.0 ms");
        assert_eq!(format_period_ms(Some(0.0)), EMPTY_VALUE);
        assert_eq!(format_period_ms(None), EMPTY_VALUE);
        assert_eq!(format_period_ms(Some(f64::NAN)), EMPTY_VALUE);
        assert_eq!(format_cycle(Some(50_000)), "50.0 ms");
    }

    #[test]
    fn test_age_buckets() {
        let now = 10_000_000_000_000;
        assert_eq!(format_age(None, now), EMPTY_VALUE);
        assert_eq!(format_age(Some(0), now), EMPTY_VALUE);
        assert_eq!(format_age(Some(now - 300_000), now), "just now");
        assert_eq!(format_age(Some(now + 5_000_000), now), "just now");
        assert_eq!(format_age(Some(now - 42 * US_PER_SECOND), now), "42s ago");
        assert_eq!(format_age(Some(now - 5 * 60 * US_PER_SECOND), now), "5m ago");
        assert_eq!(format_age(Some(now - 3 * 3600 * US_PER_SECOND), now), "3h ago");
        assert_eq!(format_age(Some(now - 2 * 86_400 * US_PER_SECOND), now), "2d ago");
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!(format_direction(Some("tx_rx")), "Tx/Rx");
        assert_eq!(format_direction(Some("source_sink")), "Source/Sink");
        assert_eq!(format_direction(Some("sink")), "Sink");
        assert_eq!(format_direction(Some("")), EMPTY_VALUE);
        assert_eq!(format_direction(None), EMPTY_VALUE);
    }

    #[test]
    fn test_rx_age_respects_validity() {
        let record = TelegramRecord {
            last_rx_valid: false,
            last_rx_time_us: 5_000_000,
            ..Default::default()
        };
        assert_eq!(format_rx_age(&record, 10_000_000), EMPTY_VALUE);

        let record = TelegramRecord {
            last_rx_valid: true,
            ..record
        };
        assert_eq!(format_rx_age(&record, 10_000_000), "5s ago");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "telegram", "telegrams"), "1 telegram");
        assert_eq!(pluralize(0, "telegram", "telegrams"), "0 telegrams");
    }
}
