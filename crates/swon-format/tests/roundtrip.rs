//! Property tests: formatted output parses back to the same tree.

use proptest::prelude::*;
use swon_format::{FormatOptions, format_value, json_to_swon};
use swon_tree::{Dictionary, Value, parse};

/// Strings without raw control characters other than newline and tab.
fn text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 _\\-\"\\\\\n\t{}\\[\\]:,/*é€😀]{0,12}").unwrap()
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        any::<f64>()
            .prop_filter("finite", |n| n.is_finite())
            .prop_map(Value::Float),
        text().prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Nil),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((text(), inner), 0..6)
                .prop_map(|entries| Value::Dictionary(entries.into_iter().collect::<Dictionary>())),
        ]
    })
}

fn options() -> impl Strategy<Value = FormatOptions> {
    (0usize..6, any::<bool>(), any::<bool>()).prop_map(|(indentation, pretty_print, sort_keys)| {
        FormatOptions {
            indentation,
            pretty_print,
            sort_keys,
        }
    })
}

proptest! {
    #[test]
    fn formatted_value_parses_back(value in value(), options in options()) {
        let text = format_value(&value, &options);
        let parsed = parse(&text).map_err(|e| TestCaseError::fail(format!("{e}\n{text}")))?;
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn formatting_is_deterministic(value in value(), options in options()) {
        prop_assert_eq!(format_value(&value, &options), format_value(&value, &options));
    }

    #[test]
    fn sorted_output_does_not_depend_on_insertion_order(
        entries in prop::collection::vec((text(), any::<i64>()), 0..8)
    ) {
        let forward: Dictionary = entries.iter().cloned().collect();
        let backward: Dictionary = entries.iter().rev().cloned().collect();
        // Later duplicates win on insert, so compare only when keys are unique.
        prop_assume!(forward.len() == entries.len());
        let options = FormatOptions::new().sort_keys(true);
        prop_assert_eq!(
            format_value(&Value::Dictionary(forward), &options),
            format_value(&Value::Dictionary(backward), &options)
        );
    }
}

#[test]
fn bridged_json_parses() {
    swon_testhelpers::setup();
    let json = br#"{"name": "widget", "tags": ["a", "b"], "size": {"w": 2.5, "h": -3}, "extra": null, "empty": {}}"#;
    let value = parse(std::str::from_utf8(&json_to_swon(json)).unwrap()).unwrap();

    assert_eq!(value.get("name").and_then(Value::as_str), Some("widget"));
    assert_eq!(value.get("tags[1]").and_then(Value::as_str), Some("b"));
    assert_eq!(value.get("size.w").and_then(Value::as_f64), Some(2.5));
    assert_eq!(value.get("size.h").and_then(Value::as_i64), Some(-3));
    assert_eq!(value.get("extra"), Some(&Value::Nil));
    assert_eq!(value.get("empty"), Some(&Value::Dictionary(Dictionary::new())));
}

#[test]
fn sorted_keys_render_first_key_first() {
    swon_testhelpers::setup();
    let value = parse(r#"["b": 1, "a": 2]"#).unwrap();
    let text = format_value(&value, &FormatOptions::new().sort_keys(true));
    assert_eq!(text, r#"["a": 2, "b": 1]"#);
}
