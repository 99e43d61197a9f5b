//! Date validation and fail-safe formatting for display.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;
use std::fmt::Write;

pub const DEFAULT_FALLBACK: &str = "Invalid date";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Anything that may hold a point in time.
pub trait DateInput {
    fn to_datetime(&self) -> Option<DateTime<Utc>>;
}

impl DateInput for str {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        parse_date(self)
    }
}

impl DateInput for String {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        parse_date(self)
    }
}

/// Epoch milliseconds.
impl DateInput for i64 {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(*self).single()
    }
}

impl DateInput for DateTime<Utc> {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Some(*self)
    }
}

impl DateInput for NaiveDate {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        self.and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

impl DateInput for NaiveDateTime {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Some(Utc.from_utc_datetime(self))
    }
}

/// Strings are parsed, numbers are epoch milliseconds, anything else is invalid.
impl DateInput for Value {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::String(text) => parse_date(text),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .and_then(|ms| ms.to_datetime()),
            _ => None,
        }
    }
}

impl<T: DateInput + ?Sized> DateInput for &T {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        (**self).to_datetime()
    }
}

impl<T: DateInput> DateInput for Option<T> {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        self.as_ref().and_then(DateInput::to_datetime)
    }
}

/// Parses RFC 3339, offset-less ISO-8601 (as UTC), `YYYY-MM-DD` and RFC 2822.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.to_datetime();
    }
    DateTime::parse_from_rfc2822(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn is_valid_date<D: DateInput + ?Sized>(date: &D) -> bool {
    date.to_datetime().is_some()
}

/// Formats `date` with a strftime `pattern`, or returns `fallback`.
///
/// Never panics: invalid input and invalid patterns both yield `fallback`.
pub fn safe_format<D: DateInput + ?Sized>(date: &D, pattern: &str, fallback: &str) -> String {
    let Some(dt) = date.to_datetime() else {
        return fallback.to_string();
    };
    match try_format(&dt, pattern) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("Date formatting error: {err}");
            fallback.to_string()
        }
    }
}

pub fn safe_format_or_default<D: DateInput + ?Sized>(date: &D, pattern: &str) -> String {
    safe_format(date, pattern, DEFAULT_FALLBACK)
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-03-01T09:00:00.000Z`.
pub fn to_iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_iso() -> String {
    to_iso_string(&Utc::now())
}

fn try_format(dt: &DateTime<Utc>, pattern: &str) -> Result<String, String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid pattern `{pattern}`"));
    }
    let mut out = String::new();
    write!(out, "{}", dt.format_with_items(items.into_iter()))
        .map_err(|_| format!("cannot render pattern `{pattern}`"))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_common_shapes() {
        assert!(is_valid_date("2024-03-01T09:00:00Z"));
        assert!(is_valid_date("2024-03-01T09:00:00.123+02:00"));
        assert!(is_valid_date("2024-03-01T09:00:00"));
        assert!(is_valid_date("2024-03-01 09:00"));
        assert!(is_valid_date("2024-03-01"));
        assert!(is_valid_date("Fri, 01 Mar 2024 09:00:00 +0000"));
        assert!(is_valid_date(&now_iso()));
    }

    #[test]
    fn rejects_non_dates() {
        assert!(!is_valid_date("not a date"));
        assert!(!is_valid_date(""));
        assert!(!is_valid_date("2024-02-30"));
        assert!(!is_valid_date(&json!(null)));
        assert!(!is_valid_date(&json!(true)));
        assert!(!is_valid_date(&None::<String>));
    }

    #[test]
    fn numbers_are_epoch_millis() {
        let dt = json!(0).to_datetime().unwrap();
        assert_eq!(to_iso_string(&dt), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn formats_valid_dates() {
        assert_eq!(
            safe_format("2024-03-01T09:05:00Z", "%b %-d, %Y", DEFAULT_FALLBACK),
            "Mar 1, 2024"
        );
        assert_eq!(
            safe_format(&json!("2024-12-25"), "%Y/%m/%d", "n/a"),
            "2024/12/25"
        );
    }

    #[test]
    fn invalid_input_returns_fallback() {
        assert_eq!(safe_format_or_default("garbage", "%Y"), "Invalid date");
        assert_eq!(safe_format("", "%Y", "n/a"), "n/a");
    }

    #[test]
    fn invalid_pattern_returns_fallback_without_panicking() {
        assert_eq!(safe_format_or_default("2024-03-01", "%Q %Y"), "Invalid date");
        assert_eq!(safe_format("2024-03-01", "%", "bad"), "bad");
    }
}
