//! Format a [`Value`] tree as SWON text.

use swon_tree::{Dictionary, Value};
use tracing::trace;

use crate::FormatOptions;
use crate::writer::SwonWriter;

/// Format a value as a SWON string.
///
/// Collections whose immediate children are all scalars are written on one
/// line; any other collection is broken over several lines (when pretty
/// printing is enabled).
pub fn format_value(value: &Value, options: &FormatOptions) -> String {
    let mut formatter = ValueFormatter::new(options.clone());
    formatter.format(value);
    formatter.finish()
}

/// Format a value with default options.
pub fn format_value_default(value: &Value) -> String {
    format_value(value, &FormatOptions::default())
}

/// Whether a collection with these children fits on one line.
fn is_simple<'a>(mut children: impl Iterator<Item = &'a Value>) -> bool {
    children.all(|child| !child.is_container())
}

struct ValueFormatter {
    writer: SwonWriter,
}

impl ValueFormatter {
    fn new(options: FormatOptions) -> Self {
        Self {
            writer: SwonWriter::with_options(options),
        }
    }

    fn finish(self) -> String {
        self.writer.finish_string()
    }

    fn format(&mut self, value: &Value) {
        match value {
            Value::Integer(n) => self.writer.write_integer(*n),
            Value::Float(n) => self.writer.write_float(*n),
            Value::String(s) => self.writer.write_string(s),
            Value::Bool(b) => self.writer.write_bool(*b),
            Value::Nil => self.writer.write_nil(),
            Value::Array(items) => self.format_array(items),
            Value::Dictionary(dict) => self.format_dictionary(dict),
        }
    }

    fn format_array(&mut self, items: &[Value]) {
        let multiline = !is_simple(items.iter());
        trace!(len = items.len(), multiline, "Formatting array");
        self.writer.begin_array(multiline);
        for item in items {
            self.format(item);
        }
        self.writer.end_array();
    }

    fn format_dictionary(&mut self, dict: &Dictionary) {
        let multiline = !is_simple(dict.values());
        trace!(len = dict.len(), multiline, "Formatting dictionary");

        let mut entries: Vec<(&str, &Value)> = dict.iter().collect();
        if self.writer.options().sort_keys {
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }

        self.writer.begin_dictionary(multiline);
        for (key, value) in entries {
            self.writer.write_key(key);
            self.format(value);
        }
        self.writer.end_dictionary();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::Dictionary(entries.into_iter().collect())
    }

    fn sample() -> Value {
        dict([
            ("hello", Value::Integer(123)),
            ("goodbye", Value::Float(495.0)),
            (
                "children",
                Value::Array(vec![
                    Value::from("test"),
                    Value::Integer(3),
                    Value::Float(4.3),
                    dict([("abc", Value::Float(10e3))]),
                    Value::Integer(100_000),
                ]),
            ),
        ])
    }

    #[test]
    fn test_format_simple_array() {
        let value = Value::Array(vec![1.into(), 2.into(), 3.into()]);
        insta::assert_snapshot!(format_value_default(&value), @"[1, 2, 3]");
    }

    #[test]
    fn test_format_nested_array() {
        let value = Value::Array(vec![1.into(), Value::Array(vec![2.into(), 3.into()])]);
        insta::assert_snapshot!(format_value_default(&value), @r"
        [
            1,
            [2, 3]
        ]
        ");
    }

    #[test]
    fn test_format_document() {
        insta::assert_snapshot!(format_value_default(&sample()), @r#"
        [
            "hello": 123,
            "goodbye": 495.0,
            "children": [
                "test",
                3,
                4.3,
                ["abc": 10000.0],
                100000
            ]
        ]
        "#);
    }

    #[test]
    fn test_format_sorted_keys() {
        let options = FormatOptions::new().sort_keys(true);
        let value = dict([("b", Value::Integer(1)), ("a", Value::Integer(2))]);
        insta::assert_snapshot!(format_value(&value, &options), @r#"["a": 2, "b": 1]"#);

        insta::assert_snapshot!(format_value(&sample(), &options.indentation(2)), @r#"
        [
          "children": [
            "test",
            3,
            4.3,
            ["abc": 10000.0],
            100000
          ],
          "goodbye": 495.0,
          "hello": 123
        ]
        "#);
    }

    #[test]
    fn test_format_compact() {
        let options = FormatOptions::new().compact();
        insta::assert_snapshot!(
            format_value(&sample(), &options),
            @r#"["hello":123,"goodbye":495.0,"children":["test",3,4.3,["abc":10000.0],100000]]"#
        );
    }

    #[test]
    fn test_format_empty_collections() {
        assert_eq!(format_value_default(&Value::Array(vec![])), "[]");
        assert_eq!(
            format_value_default(&Value::Dictionary(Dictionary::new())),
            "[:]"
        );
        let value = dict([("empty", Value::Array(vec![]))]);
        insta::assert_snapshot!(format_value_default(&value), @r#"
        [
            "empty": []
        ]
        "#);
    }

    #[test]
    fn test_format_scalars() {
        assert_eq!(format_value_default(&Value::Integer(-42)), "-42");
        assert_eq!(format_value_default(&Value::Float(2.0)), "2.0");
        assert_eq!(format_value_default(&Value::Bool(false)), "false");
        assert_eq!(format_value_default(&Value::Nil), "nil");
        assert_eq!(format_value_default(&Value::Float(f64::INFINITY)), "nil");
        assert_eq!(
            format_value_default(&Value::from("line\nbreak")),
            r#""line\nbreak""#
        );
    }

    #[test]
    fn test_zero_indentation_keeps_line_breaks() {
        let value = Value::Array(vec![Value::Array(vec![])]);
        let options = FormatOptions::new().indentation(0);
        assert_eq!(format_value(&value, &options), "[\n[]\n]");
    }
}
