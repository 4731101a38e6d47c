//! Low-level SWON output writer.
//!
//! Provides a structured way to build SWON output with proper formatting,
//! independent of any serialization framework. The caller decides per
//! collection whether it is written on one line or over several.

use crate::options::FormatOptions;
use crate::scalar::{escape_string, format_float};

/// Context for tracking output state.
#[derive(Debug, Clone)]
enum Context {
    /// Inside an array.
    Array { first: bool, multiline: bool },
    /// Inside a dictionary.
    Dictionary { first: bool, multiline: bool },
}

/// Low-level SWON output writer.
///
/// This writer handles separators, indentation and scalar escaping. It does
/// not check that calls are well-nested; [`format_value`](crate::format_value)
/// drives it from a tree.
pub struct SwonWriter {
    out: String,
    stack: Vec<Context>,
    options: FormatOptions,
    /// Set after a key so the value that follows writes no separator.
    after_key: bool,
}

impl Default for SwonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SwonWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::with_options(FormatOptions::default())
    }

    /// Create a new writer with the given options.
    pub fn with_options(options: FormatOptions) -> Self {
        Self {
            out: String::new(),
            stack: Vec::new(),
            options,
            after_key: false,
        }
    }

    /// The options this writer was created with.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Consume the writer and return the output as a String.
    pub fn finish_string(self) -> String {
        self.out
    }

    fn write_indent(&mut self, depth: usize) {
        let width = depth * self.options.indentation;
        self.out.extend(std::iter::repeat_n(' ', width));
    }

    /// Write whatever has to precede the next element of the current
    /// collection: the `,` separator and either a line break with
    /// indentation or a single space.
    fn before_element(&mut self) {
        let depth = self.stack.len();
        let pretty = self.options.pretty_print;
        let (first, multiline) = match self.stack.last_mut() {
            Some(Context::Array { first, multiline })
            | Some(Context::Dictionary { first, multiline }) => {
                let was_first = *first;
                *first = false;
                (was_first, *multiline)
            }
            None => return,
        };

        if !first {
            self.out.push(',');
        }
        if pretty && multiline {
            self.out.push('\n');
            self.write_indent(depth);
        } else if pretty && !first {
            self.out.push(' ');
        }
    }

    fn before_value(&mut self) {
        if self.after_key {
            self.after_key = false;
        } else {
            self.before_element();
        }
    }

    /// Write the end of a collection, breaking the line first if the
    /// collection was multi-line and had any elements.
    fn close(&mut self, first: bool, multiline: bool) {
        if self.options.pretty_print && multiline && !first {
            self.out.push('\n');
            let depth = self.stack.len();
            self.write_indent(depth);
        }
    }

    /// Begin an array. `multiline` only has an effect with pretty printing.
    pub fn begin_array(&mut self, multiline: bool) {
        self.before_value();
        self.out.push('[');
        self.stack.push(Context::Array {
            first: true,
            multiline,
        });
    }

    /// End the current array.
    pub fn end_array(&mut self) {
        if let Some(Context::Array { first, multiline }) = self.stack.pop() {
            self.close(first, multiline);
        }
        self.out.push(']');
    }

    /// Begin a dictionary. `multiline` only has an effect with pretty printing.
    pub fn begin_dictionary(&mut self, multiline: bool) {
        self.before_value();
        self.out.push('[');
        self.stack.push(Context::Dictionary {
            first: true,
            multiline,
        });
    }

    /// End the current dictionary. An empty dictionary is written `[:]`.
    pub fn end_dictionary(&mut self) {
        if let Some(Context::Dictionary { first, multiline }) = self.stack.pop() {
            if first {
                self.out.push(':');
            }
            self.close(first, multiline);
        }
        self.out.push(']');
    }

    /// Write a dictionary key and its `:`. The next value written belongs to
    /// this key.
    pub fn write_key(&mut self, key: &str) {
        self.before_element();
        self.write_quoted(key);
        self.out.push(':');
        if self.options.pretty_print {
            self.out.push(' ');
        }
        self.after_key = true;
    }

    /// Write an integer.
    pub fn write_integer(&mut self, n: i64) {
        self.before_value();
        self.out.push_str(&n.to_string());
    }

    /// Write a float. Non-finite values are written as `nil`.
    pub fn write_float(&mut self, n: f64) {
        self.before_value();
        self.out.push_str(&format_float(n));
    }

    /// Write a boolean.
    pub fn write_bool(&mut self, b: bool) {
        self.before_value();
        self.out.push_str(if b { "true" } else { "false" });
    }

    /// Write `nil`.
    pub fn write_nil(&mut self) {
        self.before_value();
        self.out.push_str("nil");
    }

    /// Write a string literal.
    pub fn write_string(&mut self, s: &str) {
        self.before_value();
        self.write_quoted(s);
    }

    fn write_quoted(&mut self, s: &str) {
        self.out.push('"');
        self.out.push_str(&escape_string(s));
        self.out.push('"');
    }
}
