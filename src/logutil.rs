//! Logging helpers that keep sign text on one log line.

use std::fmt::Write;

/// Longest line kept in a log entry; sign lines hold 15 but hosts may pass more.
const LINE_PREVIEW: usize = 32;

/// The four lines of a sign as `[a|b|c|d]`.
///
/// Line breaks, tabs, backslashes and the `|` separator are escaped, other
/// control characters become `\xNN`, and overlong lines end in `…`.
pub fn sign_text(lines: &[String; 4]) -> String {
    let mut out = String::from("[");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        push_line(&mut out, line);
    }
    out.push(']');
    out
}

fn push_line(out: &mut String, line: &str) {
    let mut chars = line.chars();
    for ch in chars.by_ref().take(LINE_PREVIEW) {
        match ch {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    if chars.next().is_some() {
        out.push('…');
    }
}
