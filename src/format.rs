use chrono::{DateTime, NaiveDateTime, Utc};

const UNKNOWN: &str = "Unknown date";

fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // Backends sometimes drop the offset; treat naive timestamps as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// "3 days ago", "in 2 hours". Unparseable input renders as
/// "Unknown date".
pub fn format_relative(raw: &str) -> String {
    match parse(raw) {
        Some(ts) => relative_from(ts, Utc::now()),
        None => UNKNOWN.to_string(),
    }
}

fn relative_from(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now - ts;
    let future = delta < chrono::Duration::zero();
    let secs = delta.num_seconds().abs();

    let phrase = if secs < 60 {
        return "just now".to_string();
    } else if secs < 3600 {
        plural(secs / 60, "minute")
    } else if secs < 86_400 {
        plural(secs / 3600, "hour")
    } else if secs < 86_400 * 30 {
        plural(secs / 86_400, "day")
    } else if secs < 86_400 * 365 {
        plural(secs / (86_400 * 30), "month")
    } else {
        plural(secs / (86_400 * 365), "year")
    };

    if future {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// "Jan 5, 2026"
pub fn format_full(raw: &str) -> String {
    match parse(raw) {
        Some(ts) => ts.format("%b %-d, %Y").to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// "Jan 5, 2026 3:04 PM"
pub fn format_with_time(raw: &str) -> String {
    match parse(raw) {
        Some(ts) => ts.format("%b %-d, %Y %-I:%M %p").to_string(),
        None => UNKNOWN.to_string(),
    }
}
