//! Timestamp formats
//!
//! Two formats live here and they are deliberately unrelated:
//!
//! - [`ARG_TIME_FORMAT`] is a `strftime` pattern (`YYYY-MM-DD HH:MM:SS`) exported
//!   for callers that render timestamps themselves.
//! - [`TIMESTAMP_ENCODING`] names the encoding the map's timestamp accessor
//!   parses. Parsing is strict RFC 3339 and never consults `ARG_TIME_FORMAT`.

use chrono::{DateTime, FixedOffset, TimeZone};
use std::fmt::Display;

/// `strftime` pattern for rendering timestamps as `YYYY-MM-DD HH:MM:SS`
pub const ARG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Name of the encoding accepted by [`parse_timestamp`]
pub const TIMESTAMP_ENCODING: &str = "RFC 3339";

/// Parse a string as a strict RFC 3339 timestamp, keeping its UTC offset
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
}

/// Render a timestamp with [`ARG_TIME_FORMAT`]
pub fn format_arg_time<Tz>(ts: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ts.format(ARG_TIME_FORMAT).to_string()
}
