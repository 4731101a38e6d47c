//! Diagnostic rendering for parser errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use swon_parse::{ParseErrorKind, Span};

/// A parser error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range: std::ops::Range<usize> = self.span.into();
        let simple = |label: &str| {
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(self.kind.to_string())
                .with_label(
                    Label::new((filename, range.clone()))
                        .with_message(label)
                        .with_color(Color::Red),
                )
        };

        match &self.kind {
            ParseErrorKind::DuplicateKey { original } => {
                let original_range: std::ops::Range<usize> = (*original).into();
                Report::build(ReportKind::Error, (filename, range.clone()))
                    .with_message("duplicate key")
                    .with_label(
                        Label::new((filename, original_range))
                            .with_message("first defined here")
                            .with_color(Color::Blue),
                    )
                    .with_label(
                        Label::new((filename, range.clone()))
                            .with_message("duplicate key")
                            .with_color(Color::Red),
                    )
                    .with_help("each key must appear only once in a dictionary")
            }

            ParseErrorKind::UnclosedBracket => {
                simple("opened here").with_help("add a closing ']'")
            }

            ParseErrorKind::InvalidEscape(_) => simple("invalid escape").with_help(
                "valid escapes are: \\0, \\\\, \\t, \\n, \\r, \\\", \\', \\u{X...}",
            ),

            ParseErrorKind::Interpolation => simple("interpolation")
                .with_help("SWON strings are plain literals; write the value out in full"),

            ParseErrorKind::UnsupportedExpression(_) => simple("not a literal").with_help(
                "only strings, numbers, true, false, nil, arrays and dictionaries are allowed",
            ),

            ParseErrorKind::InvalidKey => simple("cannot be used as a key")
                .with_help("dictionary keys must be string literals, e.g. [\"key\": value]"),

            ParseErrorKind::MixedElements => simple("entry inside an array")
                .with_help("an array literal holds values only; use a dictionary for key: value pairs"),

            ParseErrorKind::ExpectedEmptyDictionaryClose => {
                simple("expected ']' here").with_help("the empty dictionary is written [:]")
            }

            ParseErrorKind::TrailingContent => simple("unexpected content here")
                .with_help("a document holds exactly one top-level value"),

            ParseErrorKind::DepthLimitExceeded(_) => simple("nested too deeply"),

            ParseErrorKind::EmptyDocument => simple("document ends here"),

            ParseErrorKind::ExpectedValue => simple("expected a value here"),

            ParseErrorKind::ExpectedColon => simple("expected ':' here"),

            ParseErrorKind::ExpectedCommaOrClose => simple("expected ',' or ']' here"),

            ParseErrorKind::InvalidNumber(_) => simple("invalid number"),

            ParseErrorKind::UnterminatedString => {
                simple("string starts here").with_help("strings must close on the same line")
            }

            ParseErrorKind::UnterminatedComment => simple("comment starts here"),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.span.start)
    }
}

impl std::error::Error for ParseError {}
