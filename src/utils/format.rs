// src/utils/format.rs
//! Human-readable formatting for hash counts, durations and echoed input

use std::fmt::Write;
use std::time::Duration;

const UNITS: [&str; 6] = ["H", "KH", "MH", "GH", "TH", "PH"];

/// Formats a hash count with a magnitude suffix, e.g. `12.30 KH`
///
/// Values below 1000 are printed without decimals. Callers append `/s` when
/// the value is a rate.
pub fn format_hashes(hashes: u64) -> String {
    if hashes < 1000 {
        return format!("{} H", hashes);
    }

    let mut value = hashes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Formats an uptime as `1h 02m 03s`, dropping leading zero components
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Double-quotes `text` with C-style escapes
///
/// Control characters use the short escapes where one exists, otherwise
/// `\xHH` below 0x80 and `\uHHHH` above, in lower-case hex.
/// Printable characters, non-ASCII included, are kept as is.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            c if c.is_control() => {
                let code = c as u32;
                // Writing to a String cannot fail.
                let _ = if code < 0x80 {
                    write!(out, "\\x{:02x}", code)
                } else {
                    write!(out, "\\u{:04x}", code)
                };
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
