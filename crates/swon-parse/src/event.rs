//! Event types for the SWON event-based parser.

use std::borrow::Cow;

use crate::Span;

/// Events emitted by the parser.
///
/// A successful parse emits a well-nested sequence of events describing
/// exactly one value. A failed parse ends with a single [`Event::Error`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'src> {
    // Arrays
    /// Start of an array `[ ... ]`.
    ArrayStart {
        /// Span of the opening bracket.
        span: Span,
    },
    /// End of an array.
    ArrayEnd {
        /// Span of the closing bracket.
        span: Span,
    },

    // Dictionaries
    /// Start of a dictionary `[ "k": v, ... ]` or `[:]`.
    DictionaryStart {
        /// Span of the opening bracket.
        span: Span,
    },
    /// End of a dictionary.
    DictionaryEnd {
        /// Span of the closing bracket.
        span: Span,
    },
    /// A dictionary key. Always followed by the events of its value.
    Key {
        /// Span of the key literal (including quotes).
        span: Span,
        /// Key text after escape processing.
        value: Cow<'src, str>,
    },

    // Values
    /// A scalar literal.
    Scalar {
        /// Span of the literal.
        span: Span,
        /// The converted literal.
        value: Scalar<'src>,
    },

    // Errors
    /// Parse error. Always the last event.
    Error {
        /// Span where error occurred.
        span: Span,
        /// Kind of error.
        kind: ParseErrorKind,
    },
}

/// A converted scalar literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'src> {
    /// Integer literal, separators stripped.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// String literal after escape processing.
    String(Cow<'src, str>),
    /// `true` or `false`.
    Bool(bool),
    /// `nil`.
    Nil,
}

/// Parse error kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// The document contains no expression at all.
    #[error("empty document")]
    EmptyDocument,
    /// A value was expected (e.g. after `,` or `:`, or at end of input).
    #[error("expected a value")]
    ExpectedValue,
    /// A dictionary key was not followed by `:`.
    #[error("expected ':' after dictionary key")]
    ExpectedColon,
    /// An element was not followed by `,` or the closing bracket.
    #[error("expected ',' or ']'")]
    ExpectedCommaOrClose,
    /// `[:` was not followed by `]`.
    #[error("expected ']' to close empty dictionary")]
    ExpectedEmptyDictionaryClose,
    /// End of input inside an array or dictionary.
    #[error("unclosed bracket")]
    UnclosedBracket,
    /// An expression outside the literal grammar (identifier, operator, ...).
    #[error("unsupported expression `{0}`")]
    UnsupportedExpression(String),
    /// A dictionary key that is not a string literal.
    #[error("dictionary keys must be string literals")]
    InvalidKey,
    /// A `key: value` entry inside an array literal.
    #[error("array literal cannot contain `key: value` entries")]
    MixedElements,
    /// The same key appears twice in one dictionary literal.
    #[error("duplicate key")]
    DuplicateKey {
        /// Span of the first occurrence.
        original: Span,
    },
    /// A numeric literal that does not convert (bad digits, overflow, non-finite).
    #[error("invalid number literal `{0}`")]
    InvalidNumber(String),
    /// An escape sequence the grammar does not know.
    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),
    /// String interpolation `\(...)`.
    #[error("string interpolation is not supported")]
    Interpolation,
    /// A string literal without closing quote on its line.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A block comment without closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// Nesting deeper than the parser's limit.
    #[error("nesting depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),
    /// Content after the top-level expression.
    #[error("trailing content after top-level value")]
    TrailingContent,
}
