//! Coding paths: where in a value tree something happened.

use std::fmt;

/// One step into a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A dictionary key.
    Key(String),
    /// An array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A sequence of keys and indices from the root of a value tree.
///
/// Displays as `a.b[3].c`; the empty path displays as `<root>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// The segments from the root outwards.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Descend one level.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    /// Return one level.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Add a segment in front, used while an error bubbles up out of nested
    /// containers.
    pub fn prepend(&mut self, segment: impl Into<PathSegment>) {
        self.segments.insert(0, segment.into());
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl From<&[PathSegment]> for Path {
    fn from(segments: &[PathSegment]) -> Self {
        Self {
            segments: segments.to_vec(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Path::root().to_string(), "<root>");

        let path = Path::from(vec![
            PathSegment::from("a"),
            PathSegment::from("b"),
            PathSegment::from(3usize),
            PathSegment::from("c"),
        ]);
        assert_eq!(path.to_string(), "a.b[3].c");

        let path = Path::from(vec![PathSegment::Index(0), PathSegment::Index(1)]);
        assert_eq!(path.to_string(), "[0][1]");
    }

    #[test]
    fn test_push_pop_is_lifo() {
        let mut path = Path::root();
        path.push("children");
        path.push(2usize);
        assert_eq!(path.to_string(), "children[2]");
        assert_eq!(path.pop(), Some(PathSegment::Index(2)));
        assert_eq!(path.pop(), Some(PathSegment::Key("children".into())));
        assert_eq!(path.pop(), None);
        assert!(path.is_empty());
    }

    #[test]
    fn test_prepend() {
        let mut path = Path::root();
        path.prepend("inner");
        path.prepend(1usize);
        path.prepend("outer");
        assert_eq!(path.to_string(), "outer[1].inner");
        assert_eq!(path.len(), 3);
    }
}
