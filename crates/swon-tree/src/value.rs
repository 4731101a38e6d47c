//! Value types for SWON documents.
//!
//! Every SWON document is one of seven kinds of value:
//! - `Integer`: `42`, `-7`, `100_000`, `0xFF`
//! - `Float`: `4.3`, `10e3`
//! - `String`: `"hello"`
//! - `Bool`: `true`, `false`
//! - `Array`: `[1, 2, 3]`, `[]`
//! - `Dictionary`: `["key": value]`, `[:]`
//! - `Nil`: `nil`, an explicit absence of a value

use std::fmt;

/// A SWON value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Text.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// String-keyed mapping.
    Dictionary(Dictionary),
    /// Explicit absence of a value.
    #[default]
    Nil,
}

/// The kind of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Integer`]
    Integer,
    /// [`Value::Float`]
    Float,
    /// [`Value::String`]
    String,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Array`]
    Array,
    /// [`Value::Dictionary`]
    Dictionary,
    /// [`Value::Nil`]
    Nil,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "Integer",
            ValueKind::Float => "Float",
            ValueKind::String => "String",
            ValueKind::Bool => "Bool",
            ValueKind::Array => "Array",
            ValueKind::Dictionary => "Dictionary",
            ValueKind::Nil => "Nil",
        };
        f.write_str(name)
    }
}

/// A mapping from string keys to values.
///
/// Keys are unique. Entries keep insertion order so output is stable, but
/// order carries no meaning: two dictionaries with the same entries in a
/// different order are equal.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<(String, Value)>,
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Bool(_) => ValueKind::Bool,
            Value::Array(_) => ValueKind::Array,
            Value::Dictionary(_) => ValueKind::Dictionary,
            Value::Nil => ValueKind::Nil,
        }
    }

    /// Check if this is `nil`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Whether this is an array or a dictionary.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Dictionary(_))
    }

    /// Get as integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as float. Integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as mutable array.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as dictionary.
    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Get as mutable dictionary.
    pub fn as_dictionary_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Get a value by path.
    ///
    /// Path segments are separated by `.`; use `[n]` for array indexing,
    /// e.g. `children[3].abc`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }

        let (segment, rest) = split_path(path);

        let value = match self {
            Value::Dictionary(dict) => dict.get(segment)?,
            Value::Array(items) => items.get(parse_index(segment)?)?,
            _ => return None,
        };
        value.get(rest)
    }

    /// Get a mutable value by path.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        if path.is_empty() {
            return Some(self);
        }

        let (segment, rest) = split_path(path);

        let value = match self {
            Value::Dictionary(dict) => dict.get_mut(segment)?,
            Value::Array(items) => items.get_mut(parse_index(segment)?)?,
            _ => return None,
        };
        value.get_mut(rest)
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    segment.strip_prefix('[')?.strip_suffix(']')?.parse().ok()
}

fn split_path(path: &str) -> (&str, &str) {
    if path.starts_with('[')
        && let Some(end) = path.find(']')
    {
        let segment = &path[..=end];
        let rest = &path[end + 1..];
        let rest = rest.strip_prefix('.').unwrap_or(rest);
        return (segment, rest);
    }

    let dot_pos = path.find('.');
    let bracket_pos = path.find('[');

    match (dot_pos, bracket_pos) {
        (Some(d), Some(b)) if b < d => (&path[..b], &path[b..]),
        (Some(d), _) => (&path[..d], &path[d + 1..]),
        (None, Some(b)) => (&path[..b], &path[b..]),
        (None, None) => (path, ""),
    }
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dictionary with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Get entry value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Get mutable entry value by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Check if key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Insert or update an entry. An existing key keeps its position and
    /// the old value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Append an entry without looking for an existing key. The caller
    /// guarantees `key` is not present yet.
    #[doc(hidden)]
    pub fn push_unchecked(&mut self, key: String, value: Value) {
        self.entries.push((key, value));
    }

    /// Remove an entry, preserving the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

/// Iterator over the entries of a [`Dictionary`], in insertion order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, Value)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Dictionary {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        dict.extend(iter);
        dict
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Dictionary {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Integer(i64::from(n))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Nil
    }
}

impl From<Dictionary> for Value {
    fn from(dict: Dictionary) -> Self {
        Value::Dictionary(dict)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        let abc: Dictionary = [("abc", 10e3)].into_iter().collect();
        let children: Value = vec![
            Value::from("test"),
            Value::from(3),
            Value::from(4.3),
            Value::from(abc),
            Value::from(100_000),
        ]
        .into();
        [
            ("hello", Value::from(123)),
            ("goodbye", Value::from(495.0)),
            ("children", children),
        ]
        .into_iter()
        .collect::<Dictionary>()
        .into()
    }

    #[test]
    fn test_dictionary_equality_ignores_order() {
        let a: Dictionary = [("x", 1), ("y", 2)].into_iter().collect();
        let b: Dictionary = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);

        let c: Dictionary = [("x", 1), ("y", 3)].into_iter().collect();
        assert_ne!(a, c);

        let d: Dictionary = [("x", 1)].into_iter().collect();
        assert_ne!(a, d);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.insert("a", 1), None);
        dict.insert("b", 2);
        assert_eq!(dict.insert("a", 3), Some(Value::Integer(1)));
        assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(dict.get("a"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_remove() {
        let mut dict: Dictionary = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(dict.remove("b"), Some(Value::Integer(2)));
        assert_eq!(dict.remove("b"), None);
        assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_get_by_path() {
        let value = sample();
        assert_eq!(value.get("hello").and_then(Value::as_i64), Some(123));
        assert_eq!(
            value.get("children[0]").and_then(Value::as_str),
            Some("test")
        );
        assert_eq!(
            value.get("children[3].abc").and_then(Value::as_f64),
            Some(10_000.0)
        );
        assert_eq!(value.get("children[9]"), None);
        assert_eq!(value.get("hello.nested"), None);
        assert_eq!(value.get(""), Some(&value));
    }

    #[test]
    fn test_get_mut_by_path() {
        let mut value = sample();
        if let Some(slot) = value.get_mut("children[1]") {
            *slot = Value::Nil;
        }
        assert_eq!(value.get("children[1]"), Some(&Value::Nil));
    }

    #[test]
    fn test_literal_conversions() {
        assert_eq!(Value::from(7u8), Value::Integer(7));
        assert_eq!(Value::from(-7i32), Value::Integer(-7));
        assert_eq!(Value::from(1.5f32), Value::Float(1.5));
        assert_eq!(Value::from('x'), Value::String("x".into()));
        assert_eq!(Value::from(None::<i32>), Value::Nil);
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
        assert_eq!(Value::from(()), Value::Nil);
        assert_eq!(
            (1..=3).collect::<Value>(),
            Value::Array(vec![1.into(), 2.into(), 3.into()])
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Value::from(1).kind(), ValueKind::Integer);
        assert_eq!(Value::Nil.kind().to_string(), "Nil");
        assert_eq!(ValueKind::Dictionary.to_string(), "Dictionary");
        assert!(sample().is_container());
        assert!(!Value::from("x").is_container());
    }

    #[test]
    fn test_float_accessor_widens_integers() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(3.5).as_i64(), None);
    }
}
