//! Conversion of literal token text into scalar values.

use std::borrow::Cow;

use crate::ParseErrorKind;
use crate::event::Scalar;

/// An error inside a string literal, located relative to the literal's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeError {
    /// Byte offset of the offending escape within the unquoted content.
    pub offset: usize,
    /// Byte length of the offending escape.
    pub len: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// Process escape sequences in the content of a string literal (without the
/// surrounding quotes).
///
/// Recognized: `\0 \\ \t \n \r \" \'` and `\u{X}` with 1 to 8 hex digits.
/// `\(` is string interpolation and is rejected.
pub fn unescape(content: &str) -> Result<Cow<'_, str>, EscapeError> {
    if !content.contains('\\') {
        return Ok(Cow::Borrowed(content));
    }

    let mut result = String::with_capacity(content.len());
    let mut chars = content.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        let Some((_, escape)) = chars.next() else {
            return Err(EscapeError {
                offset,
                len: 1,
                kind: ParseErrorKind::InvalidEscape("\\".to_string()),
            });
        };

        match escape {
            '0' => result.push('\0'),
            '\\' => result.push('\\'),
            't' => result.push('\t'),
            'n' => result.push('\n'),
            'r' => result.push('\r'),
            '"' => result.push('"'),
            '\'' => result.push('\''),
            '(' => {
                return Err(EscapeError {
                    offset,
                    len: 2,
                    kind: ParseErrorKind::Interpolation,
                });
            }
            'u' => {
                let mut end = offset + 2;
                let mut hex = String::new();
                let mut closed = false;
                if chars.peek().map(|&(_, c)| c) == Some('{') {
                    chars.next();
                    end += 1;
                    while let Some(&(i, c)) = chars.peek() {
                        chars.next();
                        end = i + c.len_utf8();
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        hex.push(c);
                    }
                }

                let ch = if closed && (1..=8).contains(&hex.len()) {
                    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match ch {
                    Some(ch) => result.push(ch),
                    None => {
                        return Err(EscapeError {
                            offset,
                            len: end - offset,
                            kind: ParseErrorKind::InvalidEscape(content[offset..end].to_string()),
                        });
                    }
                }
            }
            other => {
                return Err(EscapeError {
                    offset,
                    len: 1 + other.len_utf8(),
                    kind: ParseErrorKind::InvalidEscape(format!("\\{other}")),
                });
            }
        }
    }

    Ok(Cow::Owned(result))
}

/// Convert the text of a numeric literal.
///
/// `_` separators are stripped first. Literals containing `.` or an exponent
/// are floats; everything else is a signed 64-bit integer, optionally with a
/// `0x`, `0o` or `0b` radix prefix.
pub fn parse_number(text: &str) -> Result<Scalar<'static>, ParseErrorKind> {
    let invalid = || ParseErrorKind::InvalidNumber(text.to_string());

    let cleaned: Cow<'_, str> = if text.contains('_') {
        Cow::Owned(text.replace('_', ""))
    } else {
        Cow::Borrowed(text)
    };

    let (negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_ref()),
    };

    let radix = match unsigned.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };

    if let Some(radix) = radix {
        let digits = &unsigned[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(invalid());
        }
        let magnitude = i128::from_str_radix(digits, radix).map_err(|_| invalid())?;
        let value = if negative { -magnitude } else { magnitude };
        return i64::try_from(value)
            .map(Scalar::Integer)
            .map_err(|_| invalid());
    }

    if !unsigned.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) {
        return Err(invalid());
    }

    if unsigned.contains(['.', 'e', 'E']) {
        let value: f64 = cleaned.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(Scalar::Float(value))
    } else {
        cleaned.parse::<i64>().map(Scalar::Integer).map_err(|_| invalid())
    }
}
