//! Event-based parser for SWON.

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::trace;

use crate::event::{Event, ParseErrorKind, Scalar};
use crate::lexer::Lexer;
use crate::literal::{parse_number, unescape};
use crate::token::{Token, TokenKind};
use crate::{ParseCallback, Span};


/// Default maximum nesting depth of arrays and dictionaries.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Marker for "stop emitting": either an error event was sent or the
/// callback asked to stop.
struct Halt;

type Flow = Result<(), Halt>;

/// Event-based parser for SWON documents.
///
/// A document is exactly one literal expression surrounded by optional
/// whitespace and comments. Parsing is fail-fast: the first problem emits an
/// [`Event::Error`] and nothing after it.
pub struct Parser<'src> {
    source: &'src str,
    lexer: Lexer<'src>,
    peeked: Option<Token<'src>>,
    depth: usize,
    max_depth: usize,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            lexer: Lexer::new(source),
            peeked: None,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum nesting depth of arrays and dictionaries.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse and emit events to callback.
    pub fn parse<C: ParseCallback<'src>>(mut self, callback: &mut C) {
        let _ = self.parse_document(callback);
    }

    /// Convenience: parse and collect all events.
    pub fn parse_to_vec(self) -> Vec<Event<'src>> {
        let mut events = Vec::new();
        self.parse(&mut events);
        events
    }

    /// Peek at the next non-trivia token.
    fn peek(&mut self) -> &Token<'src> {
        let lexer = &mut self.lexer;
        self.peeked.get_or_insert_with(|| Self::lex_significant(lexer))
    }

    /// Consume the next non-trivia token.
    fn next(&mut self) -> Token<'src> {
        match self.peeked.take() {
            Some(token) => token,
            None => Self::lex_significant(&mut self.lexer),
        }
    }

    fn lex_significant(lexer: &mut Lexer<'src>) -> Token<'src> {
        loop {
            let token = lexer.next_token();
            if !token.kind.is_trivia() {
                return token;
            }
        }
    }

    fn emit<C: ParseCallback<'src>>(callback: &mut C, event: Event<'src>) -> Flow {
        if callback.event(event) {
            Ok(())
        } else {
            Err(Halt)
        }
    }

    fn fail<C: ParseCallback<'src>>(callback: &mut C, span: Span, kind: ParseErrorKind) -> Flow {
        trace!(?span, ?kind, "Parse error");
        callback.event(Event::Error { span, kind });
        Err(Halt)
    }

    /// Report a token that cannot continue the current production. Lexer-level
    /// problems get their own, more specific error kinds.
    fn fail_token<C: ParseCallback<'src>>(
        callback: &mut C,
        token: &Token<'src>,
        fallback: ParseErrorKind,
    ) -> Flow {
        let kind = match token.kind {
            TokenKind::UnterminatedString => ParseErrorKind::UnterminatedString,
            TokenKind::UnterminatedComment => ParseErrorKind::UnterminatedComment,
            TokenKind::Error => ParseErrorKind::UnsupportedExpression(token.text.to_string()),
            _ => fallback,
        };
        Self::fail(callback, token.span, kind)
    }

    fn parse_document<C: ParseCallback<'src>>(&mut self, callback: &mut C) -> Flow {
        if self.peek().kind == TokenKind::Eof {
            let span = self.peek().span;
            return Self::fail(callback, span, ParseErrorKind::EmptyDocument);
        }

        self.parse_value(callback)?;

        let token = self.next();
        match token.kind {
            TokenKind::Eof => Ok(()),
            TokenKind::UnterminatedComment => {
                Self::fail(callback, token.span, ParseErrorKind::UnterminatedComment)
            }
            _ => {
                let end = self.source.trim_end().len() as u32;
                let span = Span::new(token.span.start, end.max(token.span.end));
                Self::fail(callback, span, ParseErrorKind::TrailingContent)
            }
        }
    }

    fn parse_value<C: ParseCallback<'src>>(&mut self, callback: &mut C) -> Flow {
        let token = self.next();
        self.parse_value_from(token, callback)
    }

    /// Parse the value that starts with an already-consumed token.
    fn parse_value_from<C: ParseCallback<'src>>(
        &mut self,
        token: Token<'src>,
        callback: &mut C,
    ) -> Flow {
        trace!("Parsing value: {:?}", token.kind);
        match token.kind {
            TokenKind::LBracket => self.parse_collection(token.span, callback),
            TokenKind::String => {
                let value = Self::string_value(&token, callback)?;
                Self::emit(
                    callback,
                    Event::Scalar {
                        span: token.span,
                        value: Scalar::String(value),
                    },
                )
            }
            TokenKind::Number => match parse_number(token.text) {
                Ok(value) => Self::emit(
                    callback,
                    Event::Scalar {
                        span: token.span,
                        value,
                    },
                ),
                Err(kind) => Self::fail(callback, token.span, kind),
            },
            TokenKind::Word => {
                let value = match token.text {
                    "true" => Scalar::Bool(true),
                    "false" => Scalar::Bool(false),
                    "nil" => Scalar::Nil,
                    other => {
                        return Self::fail(
                            callback,
                            token.span,
                            ParseErrorKind::UnsupportedExpression(other.to_string()),
                        );
                    }
                };
                Self::emit(
                    callback,
                    Event::Scalar {
                        span: token.span,
                        value,
                    },
                )
            }
            _ => Self::fail_token(callback, &token, ParseErrorKind::ExpectedValue),
        }
    }

    /// Unescape a string token, reporting escape problems at their exact span.
    fn string_value<C: ParseCallback<'src>>(
        token: &Token<'src>,
        callback: &mut C,
    ) -> Result<Cow<'src, str>, Halt> {
        let text: &'src str = token.text;
        let content = &text[1..text.len() - 1];
        unescape(content).map_err(|err| {
            let start = token.span.start + 1 + err.offset as u32;
            let _ = Self::fail(
                callback,
                Span::new(start, start + err.len as u32),
                err.kind,
            );
            Halt
        })
    }

    fn parse_collection<C: ParseCallback<'src>>(&mut self, open: Span, callback: &mut C) -> Flow {
        self.depth += 1;
        let result = if self.depth > self.max_depth {
            Self::fail(
                callback,
                open,
                ParseErrorKind::DepthLimitExceeded(self.max_depth),
            )
        } else {
            self.parse_collection_body(open, callback)
        };
        self.depth -= 1;
        result
    }

    /// Decide between array and dictionary from the first element, then
    /// hand off to the matching loop.
    fn parse_collection_body<C: ParseCallback<'src>>(
        &mut self,
        open: Span,
        callback: &mut C,
    ) -> Flow {
        let first = self.next();
        match first.kind {
            TokenKind::RBracket => {
                trace!("Parsing empty array");
                Self::emit(callback, Event::ArrayStart { span: open })?;
                Self::emit(callback, Event::ArrayEnd { span: first.span })
            }
            TokenKind::Colon => {
                trace!("Parsing empty dictionary");
                let close = self.next();
                if close.kind != TokenKind::RBracket {
                    return Self::fail(
                        callback,
                        close.span,
                        ParseErrorKind::ExpectedEmptyDictionaryClose,
                    );
                }
                Self::emit(callback, Event::DictionaryStart { span: open })?;
                Self::emit(callback, Event::DictionaryEnd { span: close.span })
            }
            TokenKind::Eof => Self::fail(callback, open, ParseErrorKind::UnclosedBracket),
            _ if Self::starts_entry(&first) && self.peek().kind == TokenKind::Colon => {
                if first.kind != TokenKind::String {
                    return Self::fail(callback, first.span, ParseErrorKind::InvalidKey);
                }
                trace!("Parsing dictionary");
                Self::emit(callback, Event::DictionaryStart { span: open })?;
                self.parse_dictionary_entries(open, first, callback)
            }
            _ => {
                trace!("Parsing array");
                Self::emit(callback, Event::ArrayStart { span: open })?;
                self.parse_value_from(first, callback)?;
                self.parse_array_rest(open, callback)
            }
        }
    }

    /// Whether a `:` after this token would make it a dictionary key. A `[`
    /// opens a nested collection, so the `:` of a nested `[:]` is not one.
    fn starts_entry(token: &Token<'src>) -> bool {
        token.kind != TokenKind::LBracket
    }

    /// After the first element: `("," expr)* ","? "]"`.
    fn parse_array_rest<C: ParseCallback<'src>>(&mut self, open: Span, callback: &mut C) -> Flow {
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::RBracket => {
                    return Self::emit(callback, Event::ArrayEnd { span: token.span });
                }
                TokenKind::Comma => {
                    if self.peek().kind == TokenKind::RBracket {
                        let close = self.next();
                        return Self::emit(callback, Event::ArrayEnd { span: close.span });
                    }
                    let element = self.next();
                    if element.kind == TokenKind::Eof {
                        return Self::fail(callback, open, ParseErrorKind::UnclosedBracket);
                    }
                    if Self::starts_entry(&element) && self.peek().kind == TokenKind::Colon {
                        return Self::fail(callback, element.span, ParseErrorKind::MixedElements);
                    }
                    self.parse_value_from(element, callback)?;
                }
                TokenKind::Eof => {
                    return Self::fail(callback, open, ParseErrorKind::UnclosedBracket);
                }
                TokenKind::Colon => {
                    return Self::fail(callback, token.span, ParseErrorKind::MixedElements);
                }
                _ => {
                    return Self::fail_token(
                        callback,
                        &token,
                        ParseErrorKind::ExpectedCommaOrClose,
                    );
                }
            }
        }
    }

    /// `entry ("," entry)* ","? "]"`, starting from the already-consumed
    /// first key token.
    fn parse_dictionary_entries<C: ParseCallback<'src>>(
        &mut self,
        open: Span,
        first_key: Token<'src>,
        callback: &mut C,
    ) -> Flow {
        let mut seen: HashMap<Cow<'src, str>, Span> = HashMap::new();
        let mut key_token = first_key;

        loop {
            let key = Self::string_value(&key_token, callback)?;
            if let Some(&original) = seen.get(&key) {
                return Self::fail(
                    callback,
                    key_token.span,
                    ParseErrorKind::DuplicateKey { original },
                );
            }
            seen.insert(key.clone(), key_token.span);
            Self::emit(
                callback,
                Event::Key {
                    span: key_token.span,
                    value: key,
                },
            )?;

            let colon = self.next();
            if colon.kind != TokenKind::Colon {
                return Self::fail_token(callback, &colon, ParseErrorKind::ExpectedColon);
            }

            self.parse_value(callback)?;

            let token = self.next();
            match token.kind {
                TokenKind::RBracket => {
                    return Self::emit(callback, Event::DictionaryEnd { span: token.span });
                }
                TokenKind::Comma => {
                    let next = self.next();
                    match next.kind {
                        TokenKind::RBracket => {
                            return Self::emit(
                                callback,
                                Event::DictionaryEnd { span: next.span },
                            );
                        }
                        TokenKind::String => key_token = next,
                        TokenKind::Eof => {
                            return Self::fail(callback, open, ParseErrorKind::UnclosedBracket);
                        }
                        TokenKind::UnterminatedString
                        | TokenKind::UnterminatedComment
                        | TokenKind::Error => {
                            return Self::fail_token(callback, &next, ParseErrorKind::InvalidKey);
                        }
                        _ => return Self::fail(callback, next.span, ParseErrorKind::InvalidKey),
                    }
                }
                TokenKind::Eof => {
                    return Self::fail(callback, open, ParseErrorKind::UnclosedBracket);
                }
                _ => {
                    return Self::fail_token(
                        callback,
                        &token,
                        ParseErrorKind::ExpectedCommaOrClose,
                    );
                }
            }
        }
    }
}
