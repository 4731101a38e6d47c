use super::*;
use swon_testhelpers::setup;

fn dict<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Dictionary(entries.into_iter().collect())
}

#[test]
fn test_parse_nested_document() {
    setup();
    let value = parse(
        r#"["hello": 123, "goodbye": 495.0, "children": ["test", 3, 4.3, ["abc": 10e3], 100_000]]"#,
    )
    .unwrap();

    let expected = dict([
        ("hello", Value::Integer(123)),
        ("goodbye", Value::Float(495.0)),
        (
            "children",
            Value::Array(vec![
                Value::String("test".into()),
                Value::Integer(3),
                Value::Float(4.3),
                dict([("abc", Value::Float(10_000.0))]),
                Value::Integer(100_000),
            ]),
        ),
    ]);
    assert_eq!(value, expected);
}

#[test]
fn test_empty_collections() {
    setup();
    assert_eq!(parse("[:]").unwrap(), Value::Dictionary(Dictionary::new()));
    assert_eq!(parse("[]").unwrap(), Value::Array(Vec::new()));
    assert_eq!(
        parse("[[], [:]]").unwrap(),
        Value::Array(vec![Value::Array(vec![]), Value::Dictionary(Dictionary::new())])
    );
    assert_eq!(
        parse("[[:]]").unwrap(),
        Value::Array(vec![Value::Dictionary(Dictionary::new())])
    );
    let nested = parse(r#"["a": [1, [:]]]"#).unwrap();
    assert_eq!(
        nested.get("a"),
        Some(&Value::Array(vec![
            Value::Integer(1),
            Value::Dictionary(Dictionary::new())
        ]))
    );
}

#[test]
fn test_parse_scalars() {
    setup();
    assert_eq!(parse("100_000").unwrap(), Value::Integer(100_000));
    assert_eq!(parse("-0x10").unwrap(), Value::Integer(-16));
    assert_eq!(parse("10e3").unwrap(), Value::Float(10_000.0));
    assert_eq!(parse(r#""a\u{e9}""#).unwrap(), Value::String("aé".into()));
    assert_eq!(parse("false").unwrap(), Value::Bool(false));
    assert_eq!(parse("  nil  ").unwrap(), Value::Nil);
}

#[test]
fn test_nil_is_kept_as_a_value() {
    setup();
    let value = parse(r#"["a": nil]"#).unwrap();
    assert_eq!(value.get("a"), Some(&Value::Nil));
    assert!(value.as_dictionary().unwrap().contains_key("a"));
}

#[test]
fn test_dictionary_keeps_source_order() {
    setup();
    let value = parse(r#"["b": 1, "a": 2, "c": 3]"#).unwrap();
    let keys: Vec<_> = value.as_dictionary().unwrap().keys().collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
}

#[test]
fn test_parse_errors_carry_spans() {
    setup();
    let error = parse(r#"["a": 1, 2]"#).unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::InvalidKey);
    assert_eq!(error.span, Span::new(9, 10));

    let error = parse("").unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::EmptyDocument);

    let error = parse("[1] 2").unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::TrailingContent);
}

#[test]
fn test_max_depth() {
    setup();
    assert!(parse_with_max_depth("[[1]]", 2).is_ok());
    let error = parse_with_max_depth("[[1]]", 1).unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::DepthLimitExceeded(1));
}

#[test]
fn test_large_dictionary() {
    setup();
    let body: Vec<String> = (0..50_000).map(|n| format!("\"k{n}\": {n}")).collect();
    let value = parse(&format!("[{}]", body.join(", "))).unwrap();
    let dict = value.as_dictionary().unwrap();
    assert_eq!(dict.len(), 50_000);
    assert_eq!(dict.keys().next(), Some("k0"));
    assert_eq!(value.get("k49999"), Some(&Value::Integer(49_999)));
}
