//! Field coercion
//!
//! Converts raw CSV fields into typed column values. Every coercer is total:
//! malformed input degrades to an absent value (or `""` for text) and never
//! fails the row. `None` input is the blank marker produced by the reader.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use sqlx::types::BigDecimal;
use std::str::FromStr;

use crate::value::{ColumnKind, Value};

/// Most digits a PostgreSQL `NUMERIC` holds before the decimal point
pub const NUMERIC_MAX_INTEGER_DIGITS: i128 = 131_072;

/// Most digits a PostgreSQL `NUMERIC` holds after the decimal point
pub const NUMERIC_MAX_SCALE: i128 = 16_383;

/// Textual date layouts, tried in order. `%b`/`%B` accept short and long
/// month names. Two-digit-year layouts come first so `21` is not read as
/// year 21.
const TEXT_DATE_FORMATS: &[&str] = &[
    "%d %B %y",
    "%d %B %Y",
    "%d %B, %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d-%B-%y",
    "%d-%B-%Y",
    "%Y-%B-%d",
    "%A, %B %d, %Y",
    "%a, %d %B %Y",
];

/// Month-and-year layouts, applied to the input prefixed with `"1 "`.
const MONTH_YEAR_FORMATS: &[&str] = &["%d %B %Y", "%d %B, %Y"];

/// Trailing time of day accepted after a date
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

impl ColumnKind {
    /// Apply the coercer for this column type.
    pub fn coerce(self, raw: Option<&str>) -> Value {
        match self {
            ColumnKind::Integer => Value::Integer(to_integer(raw)),
            ColumnKind::Text => Value::Text(to_text(raw)),
            ColumnKind::Decimal => Value::Decimal(to_decimal(raw)),
            ColumnKind::Date => Value::Date(to_date(raw)),
        }
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an integer, or absent for blank and malformed input (`"12.5"`, `"abc"`).
pub fn to_integer(raw: Option<&str>) -> Option<i32> {
    non_blank(raw)?.parse().ok()
}

/// Trimmed text; blank input becomes `""`.
pub fn to_text(raw: Option<&str>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Exact decimal with thousands separators removed: `"1,234.50"` -> `1234.50`.
///
/// Values a `NUMERIC` column cannot store (`"1e400000"`) are absent.
pub fn to_decimal(raw: Option<&str>) -> Option<BigDecimal> {
    let cleaned = raw?.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    BigDecimal::from_str(cleaned).ok().filter(fits_numeric)
}

fn fits_numeric(value: &BigDecimal) -> bool {
    let (_, scale) = value.as_bigint_and_exponent();
    let scale = i128::from(scale);
    let integer_digits = i128::from(value.digits()) - scale;
    scale <= NUMERIC_MAX_SCALE && integer_digits <= NUMERIC_MAX_INTEGER_DIGITS
}

/// Calendar date from any of the common layouts, or absent.
///
/// Ambiguous numeric dates like `03/04/2021` are read month first; when that
/// is impossible (`25/12/2020`) day first is tried. Partial dates (`2021`,
/// `2021-03`, `March 2021`) fall on the first day of the period. A trailing
/// time of day is dropped. Years outside 1000..=9999 are rejected.
pub fn to_date(raw: Option<&str>) -> Option<NaiveDate> {
    let s = non_blank(raw)?;

    parse_date_part(s)
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
                .filter(plausible_year)
        })
        .or_else(|| {
            DateTime::parse_from_rfc2822(s)
                .ok()
                .map(|dt| dt.date_naive())
                .filter(plausible_year)
        })
        .or_else(|| strip_time(s).and_then(parse_date_part))
}

fn plausible_year(date: &NaiveDate) -> bool {
    (1000..=9999).contains(&date.year())
}

/// A date without any time of day
fn parse_date_part(s: &str) -> Option<NaiveDate> {
    let parsers: [fn(&str) -> Option<NaiveDate>; 5] = [
        parse_compact_date,
        parse_numeric_date,
        parse_partial_date,
        parse_month_year,
        parse_text_date,
    ];
    parsers
        .iter()
        .find_map(|parse| parse(s).filter(plausible_year))
}

/// Date part of `<date> HH:MM[:SS[.f]]` or `<date>THH:MM[:SS[.f]]`
fn strip_time(s: &str) -> Option<&str> {
    let (date, time) = s.rsplit_once(' ').or_else(|| s.split_once('T'))?;
    let is_time = TIME_FORMATS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(time, fmt).is_ok());
    is_time.then(|| date.trim_end())
}

/// `YYYYMMDD`
fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    ymd(&s[0..4], &s[4..6], &s[6..8])
}

/// Three digit groups joined by one of `/`, `-` or `.`.
fn parse_numeric_date(s: &str) -> Option<NaiveDate> {
    let sep = s.chars().find(|c| !c.is_ascii_digit())?;
    if !matches!(sep, '/' | '-' | '.') {
        return None;
    }

    let parts: Vec<&str> = s.split(sep).collect();
    if parts.len() != 3 || !parts.iter().all(|p| is_digits(p)) {
        return None;
    }

    let (a, b, c) = (parts[0], parts[1], parts[2]);
    if a.len() == 4 {
        return ymd(a, b, c);
    }
    if a.len() > 2 || b.len() > 2 {
        return None;
    }

    let year: i32 = match c.len() {
        4 => c.parse().ok()?,
        2 => {
            let yy: i32 = c.parse().ok()?;
            if yy < 70 {
                2000 + yy
            } else {
                1900 + yy
            }
        },
        _ => return None,
    };

    let (first, second): (u32, u32) = (a.parse().ok()?, b.parse().ok()?);
    NaiveDate::from_ymd_opt(year, first, second)
        .or_else(|| NaiveDate::from_ymd_opt(year, second, first))
}

/// `YYYY`, or `YYYY-MM` with `/`, `-` or `.` between the parts
fn parse_partial_date(s: &str) -> Option<NaiveDate> {
    if s.len() == 4 && is_digits(s) {
        return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1);
    }

    let (year, month) = s.split_once(['/', '-', '.'])?;
    if year.len() != 4 || !is_digits(year) || month.len() > 2 || !is_digits(month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// `March 2021`, `Mar 2021`, `March, 2021`
fn parse_month_year(s: &str) -> Option<NaiveDate> {
    let padded = format!("1 {}", s);
    MONTH_YEAR_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&padded, fmt).ok())
}

fn parse_text_date(s: &str) -> Option<NaiveDate> {
    TEXT_DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(s, fmt)
            .ok()
            .filter(plausible_year)
    })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    if month.len() > 2 || day.len() > 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
