//! Test helpers shared by the SWON crates.
//!
//! Error expectations are written inline in the source under test, as a
//! line of carets below the offending text followed by the error name:
//!
//! ```text
//! [1, 2
//! ^ UnclosedBracket
//! ```

use std::ops::Range;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Install a tracing subscriber for tests. Honors `RUST_LOG`; safe to call
/// from every test.
pub fn setup() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// An error reported by the code under test, in a form comparable with
/// annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualError {
    /// Byte range in the source without annotations.
    pub span: Range<usize>,
    /// Name of the error kind.
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExpectedError {
    span: Range<usize>,
    kind: String,
}

/// Parse an annotation line: optional indentation, one or more `^`, a space,
/// and the error name.
fn parse_annotation(line: &str) -> Option<(usize, usize, &str)> {
    let column = line.find('^')?;
    if !line[..column].chars().all(|c| c == ' ') {
        return None;
    }
    let carets = line[column..].chars().take_while(|&c| c == '^').count();
    let kind = line[column + carets..].trim();
    if kind.is_empty() || kind.contains(char::is_whitespace) {
        return None;
    }
    Some((column, carets, kind))
}

/// Remove annotation lines, leaving the source the code under test sees.
pub fn source_without_annotations(annotated: &str) -> String {
    annotated
        .split_inclusive('\n')
        .filter(|line| parse_annotation(line).is_none())
        .collect()
}

fn expected_errors(annotated: &str) -> Vec<ExpectedError> {
    let mut expected = Vec::new();
    let mut offset = 0;
    let mut previous_line_start = None;

    for line in annotated.split_inclusive('\n') {
        match parse_annotation(line) {
            Some((column, carets, kind)) => {
                let line_start = previous_line_start
                    .unwrap_or_else(|| panic!("annotation without a source line: {line:?}"));
                let start = line_start + column;
                expected.push(ExpectedError {
                    span: start..start + carets,
                    kind: kind.to_string(),
                });
            }
            None => {
                previous_line_start = Some(offset);
                offset += line.len();
            }
        }
    }

    expected
}

/// Compare the errors annotated in `annotated` with `actual`. Panics with a
/// rendering of both sides on mismatch.
pub fn assert_annotated_errors(annotated: &str, actual: Vec<ActualError>) {
    let expected = expected_errors(annotated);
    let expected_pairs: Vec<_> = expected
        .iter()
        .map(|e| (e.span.clone(), e.kind.as_str()))
        .collect();
    let actual_pairs: Vec<_> = actual
        .iter()
        .map(|e| (e.span.clone(), e.kind.as_str()))
        .collect();

    if expected_pairs != actual_pairs {
        let source = source_without_annotations(annotated);
        panic!(
            "error mismatch\n\nsource:\n{source}\nexpected: {expected_pairs:#?}\nactual: {actual_pairs:#?}"
        );
    }
}
