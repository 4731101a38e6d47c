//! Lexical bridge from JSON text to SWON text.

use tracing::debug;

/// Rewrite JSON text as SWON text in one pass.
///
/// Outside string literals `{` becomes `[`, `}` becomes `]` and the keyword
/// `null` becomes `nil`; every other byte is copied. An empty object `{}`
/// becomes the empty dictionary `[:]`. Inside string literals
/// the escapes SWON spells differently are rewritten: `\/` to `/`, `\b` and
/// `\f` to `\u{8}` and `\u{c}`, and `\uXXXX` (including surrogate pairs) to
/// `\u{X...}`.
///
/// The output is not validated; malformed JSON produces malformed SWON, and
/// the SWON parser reports it.
pub fn json_to_swon(json: &[u8]) -> Vec<u8> {
    debug!(len = json.len(), "Bridging JSON to SWON");
    let mut out = Vec::with_capacity(json.len());
    let mut in_string = false;
    let mut i = 0;

    while i < json.len() {
        let byte = json[i];
        if in_string {
            match byte {
                b'"' => {
                    in_string = false;
                    out.push(byte);
                    i += 1;
                }
                b'\\' => i += translate_escape(&json[i..], &mut out),
                _ => {
                    out.push(byte);
                    i += 1;
                }
            }
            continue;
        }

        match byte {
            b'"' => {
                in_string = true;
                out.push(byte);
            }
            b'{' => {
                let blank = json[i + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_whitespace())
                    .count();
                let close = i + 1 + blank;
                if json.get(close) == Some(&b'}') {
                    out.extend_from_slice(b"[:]");
                    i = close + 1;
                    continue;
                }
                out.push(b'[');
            }
            b'}' => out.push(b']'),
            b'n' if is_null_keyword(json, i) => {
                out.extend_from_slice(b"nil");
                i += 4;
                continue;
            }
            _ => out.push(byte),
        }
        i += 1;
    }

    out
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn is_null_keyword(json: &[u8], at: usize) -> bool {
    json[at..].starts_with(b"null")
        && (at == 0 || !is_word_byte(json[at - 1]))
        && json.get(at + 4).is_none_or(|&b| !is_word_byte(b))
}

/// Parse the four hex digits of a `\uXXXX` escape at the start of `input`.
fn hex4(input: &[u8]) -> Option<u32> {
    let digits = input.get(2..6)?;
    if !input.starts_with(b"\\u") || !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let digits = std::str::from_utf8(digits).ok()?;
    u32::from_str_radix(digits, 16).ok()
}

/// Translate the escape at the start of `input` (which begins with `\`),
/// returning how many input bytes were consumed.
fn translate_escape(input: &[u8], out: &mut Vec<u8>) -> usize {
    match input.get(1) {
        Some(b'/') => {
            out.push(b'/');
            2
        }
        Some(b'b') => {
            out.extend_from_slice(b"\\u{8}");
            2
        }
        Some(b'f') => {
            out.extend_from_slice(b"\\u{c}");
            2
        }
        Some(b'u') => match hex4(input) {
            Some(high @ 0xD800..=0xDBFF) => {
                match hex4(&input[6..]) {
                    Some(low @ 0xDC00..=0xDFFF) => {
                        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        out.extend_from_slice(format!("\\u{{{code:x}}}").as_bytes());
                        12
                    }
                    _ => {
                        // Unpaired surrogate: leave it for the parser to reject.
                        out.extend_from_slice(format!("\\u{{{high:x}}}").as_bytes());
                        6
                    }
                }
            }
            Some(code) => {
                out.extend_from_slice(format!("\\u{{{code:x}}}").as_bytes());
                6
            }
            None => {
                out.extend_from_slice(&input[..2]);
                2
            }
        },
        Some(&other) => {
            out.push(b'\\');
            out.push(other);
            2
        }
        None => {
            out.push(b'\\');
            1
        }
    }
}
