//! Literal formatting shared by the GraphQL renderers.
//!
//! Strings are quoted with JSON rules, which are also valid GraphQL string
//! literals. Arrays are compact (`["a","b"]`, `[1,2]`), numbers use the
//! shortest round-trip representation (`1`, `0.7`).

use chrono::{DateTime, FixedOffset, Timelike};
use serde_json::Value;
use std::fmt::Display;

/// Quote and escape a string literal.
pub fn quote(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

/// Render a list of strings as a compact array of quoted literals.
pub fn string_array(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("[{}]", quoted.join(","))
}

/// Render a list of `Display` values as a compact array.
pub fn array<T: Display>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(","))
}

/// GraphQL block string (`"""..."""`), used for generative prompts so that
/// embedded quotes need no escaping. Only a literal `"""` is escaped.
pub fn block_string(s: &str) -> String {
    format!("\"\"\"{}\"\"\"", s.replace("\"\"\"", "\\\"\"\""))
}

/// RFC 3339 with nanosecond precision; trailing fractional zeros are
/// trimmed and a zero offset is written as `Z`.
pub fn rfc3339_nano(dt: &DateTime<FixedOffset>) -> String {
    let mut out = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
    // Leap seconds are encoded as nanos >= 1e9.
    let nanos = dt.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let frac = format!("{:09}", nanos);
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    if dt.offset().local_minus_utc() == 0 {
        out.push('Z');
    } else {
        out.push_str(&dt.format("%:z").to_string());
    }
    out
}
