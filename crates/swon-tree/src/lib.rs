//! Value tree for SWON documents.
//!
//! This crate provides the in-memory [`Value`] shared by the parser, the
//! writer and the codec, along with coding [`Path`]s and parse diagnostics.

mod builder;
mod diagnostic;
mod path;
mod value;

pub use builder::TreeBuilder;
pub use diagnostic::ParseError;
pub use path::{Path, PathSegment};
pub use swon_parse::{DEFAULT_MAX_DEPTH, ParseErrorKind, Span};
pub use value::{Dictionary, Iter, Value, ValueKind};

use tracing::debug;

/// Parse a SWON document into a tree.
pub fn parse(source: &str) -> Result<Value, ParseError> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse a SWON document, allowing at most `max_depth` levels of nested
/// arrays and dictionaries.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Value, ParseError> {
    debug!(len = source.len(), max_depth, "Parsing document");
    let mut builder = TreeBuilder::new();
    swon_parse::Parser::new(source)
        .with_max_depth(max_depth)
        .parse(&mut builder);
    builder.finish()
}

#[cfg(test)]
mod tests;
