//! Lexer and event-based parser for SWON, a data format built from Swift
//! array and dictionary literals.
//!
//! ```
//! use swon_parse::{Event, Parser, Scalar};
//!
//! let events = Parser::new(r#"["answer": 42]"#).parse_to_vec();
//! assert!(matches!(events[0], Event::DictionaryStart { .. }));
//! assert!(matches!(&events[1], Event::Key { value, .. } if value == "answer"));
//! assert!(matches!(events[2], Event::Scalar { value: Scalar::Integer(42), .. }));
//! ```

mod span;
pub use span::Span;

mod token;
pub use token::{Token, TokenKind};

mod lexer;
pub use lexer::Lexer;

mod event;
pub use event::{Event, ParseErrorKind, Scalar};

mod literal;
pub use literal::{EscapeError, parse_number, unescape};

mod callback;
pub use callback::ParseCallback;

mod parser;
pub use parser::{DEFAULT_MAX_DEPTH, Parser};
