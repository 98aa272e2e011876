//! Date parsing and formatting for feeds and sitemaps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::time::SystemTime;

/// Parse a frontmatter date string into a UTC datetime.
///
/// Accepted formats, tried in order:
/// - RFC 3339 (`2024-01-01T12:30:00Z`, with or without offset)
/// - `YYYY-MM-DD HH:MM:SS`
/// - `YYYY-MM-DD` (midnight UTC)
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

/// Format a datetime as RFC 2822 for rss `pubDate` fields.
pub fn to_rfc2822(dt: DateTime<Utc>) -> String {
    dt.to_rfc2822()
}

/// Format a filesystem timestamp as `YYYY-MM-DD` for sitemap `lastmod`.
pub fn to_ymd(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%Y-%m-%d").to_string()
}
