// Utility helpers for time parsing and display formatting.
//
// The export mixes full timestamps and bare clock times in the same column,
// so everything time-shaped goes through `parse_instant` before the rest of
// the code sees it.
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").expect("valid clock regex"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse an absolute date-time in local wall-clock terms.
///
/// RFC 3339 values carrying an offset are converted to local time; everything
/// else is taken as already local. A bare date means midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Strict `H:MM` / `H:MM:SS` clock time; hour 0-23, minute and second 0-59.
pub fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    let caps = CLOCK_TIME.captures(s.trim())?;
    let h: u32 = caps[1].parse().ok()?;
    let m: u32 = caps[2].parse().ok()?;
    let sec: u32 = match caps.get(3) {
        Some(v) => v.as_str().parse().ok()?,
        None => 0,
    };
    // from_hms_opt rejects out-of-range parts, including second 60
    NaiveTime::from_hms_opt(h, m, sec)
}

/// Normalize a stage-by value into one instant.
///
/// Full date-times win; a bare clock time lands on `reference_now`'s calendar
/// day. Anything else is `None` and the caller drops the row.
pub fn parse_instant(raw: &str, reference_now: NaiveDateTime) -> Option<NaiveDateTime> {
    if let Some(dt) = parse_datetime(raw) {
        return Some(dt);
    }
    let t = parse_clock_time(raw)?;
    Some(reference_now.date().and_time(t))
}

/// Minutes from `from` to `to`, clamped at zero.
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let ms = (to - from).num_milliseconds() as f64;
    (ms / 60_000.0).max(0.0)
}

/// Render minutes as `H:MM:SS`, flooring to whole seconds.
pub fn format_hms(minutes: f64) -> String {
    let total = (minutes * 60.0).floor().max(0.0) as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{}:{:02}:{:02}", h, m, s)
}

/// `HH:MM`, used for the stage-by column.
pub fn format_clock(dt: NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}

/// `HH:MM:SS`, used for the report timestamp.
pub fn format_clock_seconds(dt: NaiveDateTime) -> String {
    dt.format("%H:%M:%S").to_string()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with `num-format` thousands separators on the integer part.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_val: i64 = parts.next().unwrap_or("0").parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = parts.next() {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
