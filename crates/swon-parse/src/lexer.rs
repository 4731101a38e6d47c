//! Lexer for the SWON literal grammar.

use crate::{Span, Token, TokenKind};
use tracing::trace;

/// A lexer that produces tokens from SWON source text.
#[derive(Clone)]
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    #[inline]
    fn advance_by(&mut self, n: usize) {
        self.pos += n as u32;
        self.remaining = &self.remaining[n..];
    }

    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Get the next token. Returns `Eof` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token<'src> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            '[' => {
                self.advance();
                self.token(TokenKind::LBracket, start)
            }
            ']' => {
                self.advance();
                self.token(TokenKind::RBracket, start)
            }
            ',' => {
                self.advance();
                self.token(TokenKind::Comma, start)
            }
            ':' => {
                self.advance();
                self.token(TokenKind::Colon, start)
            }
            '"' => self.lex_string(),
            '/' if self.starts_with("//") => {
                self.eat_while(|c| c != '\n');
                self.token(TokenKind::LineComment, start)
            }
            '/' if self.starts_with("/*") => self.lex_block_comment(),
            c if c.is_whitespace() => {
                self.eat_while(char::is_whitespace);
                self.token(TokenKind::Whitespace, start)
            }
            c if c.is_ascii_digit() => self.lex_number(),
            '-' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            c if c.is_alphabetic() || c == '_' => {
                self.eat_while(|c| c.is_alphanumeric() || c == '_');
                self.token(TokenKind::Word, start)
            }
            _ => {
                self.advance();
                self.token(TokenKind::Error, start)
            }
        }
    }

    /// Lex a single-line string literal. Escapes are validated by the parser;
    /// here we only need to know which quote closes the literal.
    fn lex_string(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance(); // opening quote

        loop {
            match self.peek() {
                None | Some('\n') => return self.token(TokenKind::UnterminatedString, start),
                Some('"') => {
                    self.advance();
                    return self.token(TokenKind::String, start);
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn lex_block_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance_by(2);
        let mut depth = 1usize;

        while depth > 0 {
            if self.starts_with("/*") {
                self.advance_by(2);
                depth += 1;
            } else if self.starts_with("*/") {
                self.advance_by(2);
                depth -= 1;
            } else if self.advance().is_none() {
                return self.token(TokenKind::UnterminatedComment, start);
            }
        }

        self.token(TokenKind::BlockComment, start)
    }

    /// Lex a numeric literal. The lexer is permissive: trailing identifier
    /// characters are swallowed into the token (`12abc`) so the parser can
    /// report the whole literal as invalid.
    fn lex_number(&mut self) -> Token<'src> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }

        if self.starts_with("0x") || self.starts_with("0o") || self.starts_with("0b") {
            self.advance_by(2);
        } else {
            self.eat_while(|c| c.is_ascii_digit() || c == '_');

            if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }

            if matches!(self.peek(), Some('e' | 'E')) {
                let exponent_follows = match self.peek_nth(1) {
                    Some(c) if c.is_ascii_digit() => true,
                    Some('+' | '-') => self.peek_nth(2).is_some_and(|c| c.is_ascii_digit()),
                    _ => false,
                };
                if exponent_follows {
                    self.advance();
                    if matches!(self.peek(), Some('+' | '-')) {
                        self.advance();
                    }
                    self.eat_while(|c| c.is_ascii_digit() || c == '_');
                }
            }
        }

        self.eat_while(|c| c.is_alphanumeric() || c == '_');
        self.token(TokenKind::Number, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push((token.kind, token.text));
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .into_iter()
            .map(|(kind, _)| kind)
            .filter(|kind| !kind.is_trivia())
            .collect()
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            kinds("[ : , ]"),
            vec![
                TokenKind::LBracket,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::RBracket
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("100_000"), vec![(TokenKind::Number, "100_000")]);
        assert_eq!(lex("-42"), vec![(TokenKind::Number, "-42")]);
        assert_eq!(lex("10e3"), vec![(TokenKind::Number, "10e3")]);
        assert_eq!(lex("2.5E-3"), vec![(TokenKind::Number, "2.5E-3")]);
        assert_eq!(lex("0xFF"), vec![(TokenKind::Number, "0xFF")]);
        assert_eq!(lex("12abc"), vec![(TokenKind::Number, "12abc")]);
    }

    #[test]
    fn test_dot_without_fraction_is_not_part_of_number() {
        assert_eq!(
            lex("1.x"),
            vec![(TokenKind::Number, "1"), (TokenKind::Error, "."), (TokenKind::Word, "x")]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex(r#""hello""#), vec![(TokenKind::String, r#""hello""#)]);
        assert_eq!(
            lex(r#""say \"hi\"""#),
            vec![(TokenKind::String, r#""say \"hi\"""#)]
        );
        assert_eq!(
            lex("\"open\nnext"),
            vec![
                (TokenKind::UnterminatedString, "\"open"),
                (TokenKind::Whitespace, "\n"),
                (TokenKind::Word, "next")
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("// line\n[ /* block /* nested */ */ ]"),
            vec![TokenKind::LBracket, TokenKind::RBracket]
        );
        assert_eq!(
            lex("/* never closed"),
            vec![(TokenKind::UnterminatedComment, "/* never closed")]
        );
    }

    #[test]
    fn test_words_and_errors() {
        assert_eq!(
            kinds("true nil foo + 1"),
            vec![
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Error,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}
