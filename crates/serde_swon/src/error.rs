//! Error types for serde_swon.

use std::fmt;

use swon_tree::{ParseError, Path, PathSegment, ValueKind};

/// What went wrong.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The text is not a valid SWON document.
    #[error(transparent)]
    Parse(ParseError),

    /// The stored value is of a different kind than requested.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the target type asked for.
        expected: ValueKind,
        /// Kind actually stored.
        found: ValueKind,
    },

    /// A required dictionary key is absent.
    #[error("key not found: `{key}`")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },

    /// A fixed-length sequence read past the end of the stored array.
    #[error("value not found: array ends after {len} elements, expected {expected}")]
    ValueNotFound {
        /// Description of what the target type expected.
        expected: String,
        /// Number of elements the array had.
        len: usize,
    },

    /// The input is unusable before parsing (e.g. not UTF-8).
    #[error("data corrupted: {0}")]
    DataCorrupted(String),

    /// An integer does not fit the requested or representable range.
    #[error("number {value} is out of range for {target}")]
    NumberOutOfRange {
        /// The number, as text.
        value: String,
        /// The type it had to fit.
        target: &'static str,
    },

    /// NaN and infinities have no SWON literal.
    #[error("non-finite float {0} cannot be encoded")]
    NonFiniteFloat(f64),

    /// A map key that cannot be written as a dictionary key.
    #[error("map key must be a string, integer, bool or char, found {0}")]
    InvalidMapKey(&'static str),

    /// Reading or writing failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error, usually raised by a `Serialize` or `Deserialize`
    /// implementation.
    #[error("{0}")]
    Message(String),
}

/// Error type for serde_swon operations: a kind plus the coding path where
/// it happened.
pub struct Error {
    inner: Box<ErrorImpl>,
}

struct ErrorImpl {
    kind: ErrorKind,
    path: Path,
    /// Whether `path` is final. Decoding fills the path in once, at the
    /// deepest point that knows it.
    located: bool,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            inner: Box::new(ErrorImpl {
                kind,
                path: Path::root(),
                located: false,
            }),
        }
    }

    pub(crate) fn custom(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Message(msg.to_string()))
    }

    /// Record where this error happened, unless a deeper location is
    /// already known.
    pub(crate) fn located_at(mut self, path: &Path) -> Self {
        if !self.inner.located {
            self.inner.path = path.clone();
            self.inner.located = true;
        }
        self
    }

    /// Add the segment of the container this error bubbled out of.
    pub(crate) fn prepend(mut self, segment: impl Into<PathSegment>) -> Self {
        self.inner.path.prepend(segment);
        self
    }

    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }

    /// Consume the error, returning its kind.
    pub fn into_kind(self) -> ErrorKind {
        self.inner.kind
    }

    /// Where in the value tree the error happened. Empty for errors at the
    /// root and for parse errors.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Render the error for humans. Parse errors get an annotated excerpt
    /// of `source`.
    pub fn render(&self, filename: &str, source: &str) -> String {
        match &self.inner.kind {
            ErrorKind::Parse(error) => error.render(filename, source),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.kind)?;
        if !self.inner.path.is_empty() {
            write!(f, " at {}", self.inner.path)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.inner.kind)
            .field("path", &self.inner.path.to_string())
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.inner.kind {
            ErrorKind::Parse(error) => Some(error),
            ErrorKind::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Error::new(ErrorKind::Parse(error))
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::custom(msg)
    }

    fn missing_field(field: &'static str) -> Self {
        Error::new(ErrorKind::KeyNotFound {
            key: field.to_string(),
        })
    }

    fn invalid_length(len: usize, exp: &dyn serde::de::Expected) -> Self {
        Error::new(ErrorKind::ValueNotFound {
            expected: exp.to_string(),
            len,
        })
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::custom(msg)
    }
}

/// Result type for serde_swon operations.
pub type Result<T> = std::result::Result<T, Error>;
