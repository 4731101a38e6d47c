//! Token types for the SWON lexer.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural tokens
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,

    // Literal tokens
    /// String literal including its quotes: `"hello"`
    String,
    /// Numeric literal, possibly signed: `-12`, `100_000`, `0x1F`, `2.5e-3`
    Number,
    /// Identifier-like word: `true`, `false`, `nil`, or anything else made of
    /// identifier characters (rejected by the parser).
    Word,

    // Trivia
    /// Spaces, tabs and newlines
    Whitespace,
    /// Line comment: `// ...`
    LineComment,
    /// Block comment: `/* ... */` (nesting allowed)
    BlockComment,

    // Special tokens
    /// End of file
    Eof,
    /// String literal with no closing quote on its line
    UnterminatedString,
    /// Block comment with no closing `*/`
    UnterminatedComment,
    /// A character that cannot start any token
    Error,
}

impl TokenKind {
    /// Whether this token is trivia (whitespace or comments).
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// A token with its kind, span, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }
}
