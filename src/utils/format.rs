// src/utils/format.rs

//! Display formatting for sizes, durations and dates.

use chrono::NaiveDateTime;

/// Upstream timestamp layout, e.g. `2014-10-15T21:04:33Z`.
const UPSTREAM_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Bytes as decimal megabytes with at most two fraction digits.
///
/// `1_234_567` becomes `"1.23"`, `2_500_000_000` becomes `"2,500"`.
pub fn size_string(bytes: u64) -> String {
    let megabytes = bytes as f64 / 1_000_000.0;
    let fixed = format!("{megabytes:.2}");
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let whole = group_thousands(whole);
    if fraction.is_empty() {
        whole
    } else {
        format!("{whole}.{fraction}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Normalize a raw length (`"125"`, `"125.4"`, `"MM:SS"`, `"HH:MM:SS"`).
///
/// Returns the input unchanged when it cannot be parsed.
pub fn length_string(raw: &str) -> String {
    let trimmed = raw.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();

    let formatted = match parts.as_slice() {
        [seconds] => parse_seconds(seconds).map(seconds_string),
        [minutes, seconds] => minutes_seconds(minutes, seconds),
        [hours, minutes, seconds] => hours_minutes_seconds(hours, minutes, seconds),
        _ => None,
    };

    formatted.unwrap_or_else(|| raw.to_string())
}

fn hours_minutes_seconds(hours: &str, minutes: &str, seconds: &str) -> Option<String> {
    let hours = hours.trim().parse::<u64>().ok()?;
    let minutes = minutes.trim().parse::<u64>().ok()?;
    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(parse_seconds(seconds)?)?;
    Some(seconds_string(total))
}

fn minutes_seconds(minutes: &str, seconds: &str) -> Option<String> {
    let minutes = minutes.trim().parse::<u64>().ok()?;
    // Rounded seconds may carry into the next minute.
    let total = minutes.checked_mul(60)?.checked_add(parse_seconds(seconds)?)?;
    let (minutes, seconds) = (total / 60, total % 60);
    if minutes <= 60 {
        Some(format!("{minutes:02}:{seconds:02}"))
    } else {
        Some(format!(
            "{:02}:{:02}:{seconds:02}",
            minutes / 60,
            minutes % 60
        ))
    }
}

fn parse_seconds(raw: &str) -> Option<u64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.round() as u64)
}

/// `MM:SS`, or `HH:MM:SS` once there is at least one full hour.
pub fn seconds_string(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Medium-style date (`Oct 15, 2014`), or an empty string.
pub fn medium_date(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw.trim(), UPSTREAM_DATE_FORMAT)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}
