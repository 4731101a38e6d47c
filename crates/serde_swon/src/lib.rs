//! Serde support for SWON, the data format built from Swift array and
//! dictionary literals.
//!
//! Values are encoded into a [`Value`] tree and written with
//! [`swon_format`]; text is parsed with [`swon_tree`] and the tree is
//! decoded. Every codec error carries the coding [`Path`] where it happened.
//!
//! # Deserialization Example
//!
//! ```
//! use serde::Deserialize;
//! use serde_swon::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config {
//!     name: String,
//!     port: u16,
//! }
//!
//! let swon = r#"["name": "myapp", "port": 8080]"#;
//! let config: Config = from_str(swon).unwrap();
//! assert_eq!(config.name, "myapp");
//! assert_eq!(config.port, 8080);
//! ```
//!
//! # Serialization Example
//!
//! ```
//! use serde::Serialize;
//! use serde_swon::to_string_pretty;
//!
//! #[derive(Serialize)]
//! struct Config {
//!     name: String,
//!     ports: Vec<u16>,
//! }
//!
//! let config = Config { name: "myapp".into(), ports: vec![80, 443] };
//! let swon = to_string_pretty(&config).unwrap();
//! assert_eq!(swon, "[\n    \"name\": \"myapp\",\n    \"ports\": [80, 443]\n]");
//! ```

mod de;
mod error;
mod ser;

use std::io;

use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};
use tracing::debug;

pub use de::Deserializer;
pub use error::{Error, ErrorKind, Result};
pub use ser::Serializer;
pub use swon_format::FormatOptions;
pub use swon_tree::{Path, PathSegment, Value};

/// Encode a value into a SWON value tree.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    value.serialize(Serializer)
}

/// Decode a value from a SWON value tree.
///
/// # Example
///
/// ```
/// use serde_swon::{from_value, Value};
///
/// let value = Value::Array(vec![1.into(), 2.into()]);
/// let pair: (u8, u8) = from_value(&value).unwrap();
/// assert_eq!(pair, (1, 2));
/// ```
pub fn from_value<'de, T>(value: &'de Value) -> Result<T>
where
    T: Deserialize<'de>,
{
    let mut path = Path::root();
    T::deserialize(Deserializer::new(value, &mut path))
}

/// Serialize a value to a compact SWON string.
///
/// # Example
///
/// ```
/// use serde::Serialize;
/// use serde_swon::to_string;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let swon = to_string(&Point { x: 10, y: 20 }).unwrap();
/// assert_eq!(swon, r#"["x":10,"y":20]"#);
/// ```
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    to_string_with_options(value, &FormatOptions::new().compact())
}

/// Serialize a value to an indented, multi-line SWON string.
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    to_string_with_options(value, &FormatOptions::default())
}

/// Serialize a value to a SWON string with custom options.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use serde_swon::{to_string_with_options, FormatOptions};
///
/// let map = HashMap::from([("b", 1), ("a", 2)]);
/// let options = FormatOptions::new().sort_keys(true);
/// assert_eq!(to_string_with_options(&map, &options).unwrap(), r#"["a": 2, "b": 1]"#);
/// ```
pub fn to_string_with_options<T>(value: &T, options: &FormatOptions) -> Result<String>
where
    T: Serialize + ?Sized,
{
    debug!(?options, "Serializing to SWON");
    let tree = to_value(value)?;
    Ok(swon_format::format_value(&tree, options))
}

/// Serialize a value to compact SWON bytes.
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    to_string(value).map(String::into_bytes)
}

/// Serialize a value as pretty SWON into a writer.
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: Serialize + ?Sized,
{
    let text = to_string_pretty(value)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Deserialize a value from a SWON string.
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use serde_swon::from_str;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// let person: Person = from_str(r#"["name": "Alice", "age": 30]"#).unwrap();
/// assert_eq!(person, Person { name: "Alice".into(), age: 30 });
/// ```
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    debug!(len = s.len(), "Deserializing from SWON");
    let tree = swon_tree::parse(s)?;
    from_value(&tree)
}

/// Deserialize a value from SWON bytes. The bytes must be UTF-8.
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::new(ErrorKind::DataCorrupted(format!("input is not UTF-8: {e}"))))?;
    from_str(text)
}

/// Deserialize a value from a reader of SWON text.
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_slice(&bytes)
}

/// Deserialize a value from JSON text by bridging it to SWON first.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use serde_swon::from_json_str;
///
/// let map: BTreeMap<String, Option<Vec<i32>>> =
///     from_json_str(r#"{"a": [1, 2], "b": null}"#).unwrap();
/// assert_eq!(map["a"], Some(vec![1, 2]));
/// assert_eq!(map["b"], None);
/// ```
pub fn from_json_str<T>(json: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_json_slice(json.as_bytes())
}

/// Deserialize a value from JSON bytes by bridging them to SWON first.
pub fn from_json_slice<T>(json: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice(&swon_format::json_to_swon(json))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Simple {
        name: String,
        value: i32,
    }

    #[test]
    fn test_roundtrip_simple() {
        let original = Simple {
            name: "test".into(),
            value: 42,
        };
        let swon = to_string(&original).unwrap();
        let parsed: Simple = from_str(&swon).unwrap();
        assert_eq!(original, parsed);
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Nested {
        inner: Simple,
        tags: Vec<String>,
    }

    #[test]
    fn test_roundtrip_nested_pretty() {
        let original = Nested {
            inner: Simple {
                name: "nested".into(),
                value: 7,
            },
            tags: vec!["a".into(), "b".into()],
        };
        let swon = to_string_pretty(&original).unwrap();
        let parsed: Nested = from_str(&swon).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_to_writer_and_from_reader() {
        let original = vec![Some(1.5), None];
        let mut buf = Vec::new();
        to_writer(&mut buf, &original).unwrap();
        let parsed: Vec<Option<f64>> = from_reader(buf.as_slice()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let err = from_slice::<i32>(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::DataCorrupted(_)));
    }

    #[test]
    fn test_parse_error_is_wrapped() {
        let err = from_str::<Vec<i32>>("[1, 2").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Parse(_)));
        assert!(err.path().is_empty());
        assert!(err.to_string().starts_with("unclosed bracket"));
        assert!(!err.render("input.swon", "[1, 2").is_empty());
    }
}
