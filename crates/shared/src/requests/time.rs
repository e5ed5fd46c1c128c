//! `POST /api/set_time` form body.
//!
//! The body looks like `hour=23&min=59&sec=58&day=31&month=12&year=25`.
//! Each value is read the way C `atoi` reads it (leading digits, optional
//! sign) from at most [`VALUE_MAX_CHARS`] characters, then clamped to
//! `0..=255`. Range checking against the clock's limits is left to
//! [`TimeFields::validate`](rtcbridge_domain::TimeFields::validate).

use rtcbridge_domain::TimeFields;
use thiserror::Error;

/// Bodies larger than this are rejected before parsing.
pub const MAX_FORM_BODY_BYTES: usize = 1024;

/// Only this many characters of each value are considered.
pub const VALUE_MAX_CHARS: usize = 5;

/// Form keys in the order the fields are reported.
pub const FORM_KEYS: [&str; 6] = ["hour", "min", "sec", "day", "month", "year"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Invalid body size: {0} bytes (expected 1..={max})", max = MAX_FORM_BODY_BYTES)]
    BodySize(usize),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

/// Parses a set-time form body into candidate fields.
///
/// Every key in [`FORM_KEYS`] must be present; the first occurrence wins.
pub fn parse_set_time_form(body: &[u8]) -> Result<TimeFields, FormError> {
    if body.is_empty() || body.len() > MAX_FORM_BODY_BYTES {
        return Err(FormError::BodySize(body.len()));
    }

    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let field = |key: &'static str| -> Result<u8, FormError> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| atoi_clamped(v))
            .ok_or(FormError::MissingField(key))
    };

    Ok(TimeFields {
        hour: field("hour")?,
        minute: field("min")?,
        second: field("sec")?,
        day: field("day")?,
        month: field("month")?,
        year: field("year")?,
    })
}

/// `atoi` over the first few characters, clamped into a byte.
fn atoi_clamped(raw: &str) -> u8 {
    let head: String = raw.chars().take(VALUE_MAX_CHARS).collect();
    let s = head.trim_start();

    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, d| {
            acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
        });

    if negative {
        return 0;
    }
    u8::try_from(value).unwrap_or(u8::MAX)
}
