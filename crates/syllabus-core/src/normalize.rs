//! Helpers shared by every strategy for turning loosely-shaped input into
//! well-formed entity fields.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Cap for topic and deadline titles.
pub const TITLE_MAX_CHARS: usize = 500;
/// Cap for material titles, which are often full citations.
pub const MATERIAL_TITLE_MAX_CHARS: usize = 900;

const ELLIPSIS: &str = "...";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Shortens `text` to at most `max_chars` characters, replacing the tail with
/// `...`. The result is exactly `max_chars` long when truncation happens, so
/// truncating again is a no-op.
#[must_use]
pub fn truncate_title(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }

    tracing::warn!(from = count, to = max_chars, "Truncating title");

    if max_chars <= ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }

    let mut truncated: String = text.chars().take(max_chars - ELLIPSIS.len()).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

#[must_use]
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// End of day, `weeks` weeks after `from`.
#[must_use]
pub fn weeks_from(from: NaiveDateTime, weeks: i64) -> NaiveDateTime {
    let date = from.date();
    end_of_day(date.checked_add_signed(Duration::weeks(weeks)).unwrap_or(date))
}

/// Due date used when a deadline's own date can't be read.
#[must_use]
pub fn default_due_date(from: NaiveDateTime) -> NaiveDateTime {
    weeks_from(from, 2)
}

/// Accepts a bare `YYYY-MM-DD` (read as end of that day) or a full
/// timestamp, with or without offset. Returns `None` for anything else.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.chars().count() == 10 {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(end_of_day);
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Builds an end-of-day timestamp from month/day/year pieces found in text,
/// promoting two-digit years into the 2000s.
#[must_use]
pub fn date_from_parts(month: u32, day: u32, year: i32) -> Option<NaiveDateTime> {
    let year = if year < 100 { year + 2000 } else { year };
    NaiveDate::from_ymd_opt(year, month, day).map(end_of_day)
}
