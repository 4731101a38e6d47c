//! Tree builder from parse events.

use swon_parse::{Event, ParseCallback, ParseErrorKind, Scalar, Span};
use tracing::trace;

use crate::diagnostic::ParseError;
use crate::value::{Dictionary, Value};

/// Builder that constructs a [`Value`] from parse events.
///
/// Each open array or dictionary owns its own frame; a finished child is
/// moved into its parent when the child's end event arrives.
#[derive(Default)]
pub struct TreeBuilder {
    stack: Vec<BuilderFrame>,
    root: Option<Value>,
    error: Option<ParseError>,
}

enum BuilderFrame {
    Array {
        items: Vec<Value>,
        span: Span,
    },
    Dictionary {
        entries: Dictionary,
        pending_key: Option<String>,
        span: Span,
    },
}

impl TreeBuilder {
    /// Create a new tree builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish building and return the root value.
    pub fn finish(self) -> Result<Value, ParseError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if let Some(frame) = self.stack.first() {
            let span = match frame {
                BuilderFrame::Array { span, .. } | BuilderFrame::Dictionary { span, .. } => *span,
            };
            return Err(ParseError::new(ParseErrorKind::UnclosedBracket, span));
        }

        self.root
            .ok_or_else(|| ParseError::new(ParseErrorKind::EmptyDocument, Span::empty(0)))
    }

    /// Push a finished value into the current context.
    fn push_value(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(BuilderFrame::Array { items, .. }) => items.push(value),
            Some(BuilderFrame::Dictionary {
                entries,
                pending_key,
                ..
            }) => {
                // The parser reports a repeated key before its value.
                if let Some(key) = pending_key.take() {
                    entries.push_unchecked(key, value);
                }
            }
            None => self.root = Some(value),
        }
    }
}

fn scalar_value(scalar: Scalar<'_>) -> Value {
    match scalar {
        Scalar::Integer(n) => Value::Integer(n),
        Scalar::Float(n) => Value::Float(n),
        Scalar::String(s) => Value::String(s.into_owned()),
        Scalar::Bool(b) => Value::Bool(b),
        Scalar::Nil => Value::Nil,
    }
}

impl<'src> ParseCallback<'src> for TreeBuilder {
    fn event(&mut self, event: Event<'src>) -> bool {
        match event {
            Event::ArrayStart { span } => {
                self.stack.push(BuilderFrame::Array {
                    items: Vec::new(),
                    span,
                });
            }

            Event::ArrayEnd { .. } => {
                if let Some(BuilderFrame::Array { items, .. }) = self.stack.pop() {
                    trace!(len = items.len(), "Built array");
                    self.push_value(Value::Array(items));
                }
            }

            Event::DictionaryStart { span } => {
                self.stack.push(BuilderFrame::Dictionary {
                    entries: Dictionary::new(),
                    pending_key: None,
                    span,
                });
            }

            Event::DictionaryEnd { .. } => {
                if let Some(BuilderFrame::Dictionary { entries, .. }) = self.stack.pop() {
                    trace!(len = entries.len(), "Built dictionary");
                    self.push_value(Value::Dictionary(entries));
                }
            }

            Event::Key { value, .. } => {
                if let Some(BuilderFrame::Dictionary { pending_key, .. }) = self.stack.last_mut() {
                    *pending_key = Some(value.into_owned());
                }
            }

            Event::Scalar { value, .. } => {
                self.push_value(scalar_value(value));
            }

            Event::Error { span, kind } => {
                self.error = Some(ParseError::new(kind, span));
                return false;
            }
        }
        true
    }
}
