//! Scalar formatting utilities.

use std::borrow::Cow;

/// Escape a string for use inside a SWON string literal (without the
/// surrounding quotes).
///
/// Escapes `"`, `\`, newline and tab. Other characters, including other
/// control characters, are written verbatim.
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if !s.contains(['"', '\\', '\n', '\t']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + count_escapes(s));
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Count characters that [`escape_string`] will escape.
pub fn count_escapes(s: &str) -> usize {
    s.chars()
        .filter(|c| matches!(c, '"' | '\\' | '\n' | '\t'))
        .count()
}

/// Format a float so that it reads back as a float: the output always has a
/// `.` or an exponent. Non-finite values have no literal and become `nil`.
pub fn format_float(n: f64) -> String {
    if n.is_finite() {
        format!("{n:?}")
    } else {
        "nil".to_string()
    }
}
