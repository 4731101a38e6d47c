//! Serde deserializer reading from a SWON value tree.

use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;
use swon_tree::{Path, PathSegment, Value, ValueKind};

use crate::error::{Error, ErrorKind, Result};

/// Run `f` with `segment` pushed onto the coding path.
fn descend<T>(
    path: &mut Path,
    segment: impl Into<PathSegment>,
    f: impl FnOnce(&mut Path) -> Result<T>,
) -> Result<T> {
    path.push(segment);
    let result = f(path);
    path.pop();
    result
}

/// Deserializer over a borrowed [`Value`].
///
/// `path` is the coding path of `value`. It is shared with every nested
/// deserializer, which push their own segment on the way down and pop it on
/// the way back.
pub struct Deserializer<'de, 'p> {
    value: &'de Value,
    path: &'p mut Path,
}

impl<'de, 'p> Deserializer<'de, 'p> {
    /// Create a deserializer for `value`, located at `path`.
    pub fn new(value: &'de Value, path: &'p mut Path) -> Self {
        Self { value, path }
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::new(kind).located_at(self.path)
    }

    fn mismatch(&self, expected: ValueKind) -> Error {
        self.error(ErrorKind::TypeMismatch {
            expected,
            found: self.value.kind(),
        })
    }

    /// Errors raised by a visitor (missing fields, bad lengths) belong to
    /// the value being visited.
    fn locate<T>(path: &Path, result: Result<T>) -> Result<T> {
        result.map_err(|e| e.located_at(path))
    }

    fn integer(&self) -> Result<i64> {
        match self.value {
            Value::Integer(n) => Ok(*n),
            _ => Err(self.mismatch(ValueKind::Integer)),
        }
    }

    fn narrow<T: TryFrom<i64>>(&self, target: &'static str) -> Result<T> {
        let n = self.integer()?;
        T::try_from(n).map_err(|_| {
            self.error(ErrorKind::NumberOutOfRange {
                value: n.to_string(),
                target,
            })
        })
    }

    fn float(&self) -> Result<f64> {
        match self.value {
            Value::Float(n) => Ok(*n),
            Value::Integer(n) => Ok(*n as f64),
            _ => Err(self.mismatch(ValueKind::Float)),
        }
    }

    fn visit_array<V: Visitor<'de>>(self, items: &'de [Value], visitor: V) -> Result<V::Value> {
        let access = SeqAccess {
            items: items.iter(),
            index: 0,
            path: &mut *self.path,
        };
        let result = visitor.visit_seq(access);
        Self::locate(self.path, result)
    }

    fn visit_dictionary<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let entries: Vec<(&'de str, &'de Value)> = match self.value {
            Value::Dictionary(dict) => dict.iter().collect(),
            // `{}` comes through the JSON bridge as `[]`.
            Value::Array(items) if items.is_empty() => Vec::new(),
            _ => return Err(self.mismatch(ValueKind::Dictionary)),
        };
        let access = MapAccess {
            entries: entries.into_iter(),
            pending: None,
            path: &mut *self.path,
        };
        let result = visitor.visit_map(access);
        Self::locate(self.path, result)
    }
}

macro_rules! deserialize_narrow {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                let n: $ty = self.narrow(stringify!($ty))?;
                let result = visitor.$visit(n);
                Self::locate(self.path, result)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer<'de, '_> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let result = match self.value {
            Value::Integer(n) => visitor.visit_i64(*n),
            Value::Float(n) => visitor.visit_f64(*n),
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Nil => visitor.visit_unit(),
            Value::Array(items) => return self.visit_array(items, visitor),
            Value::Dictionary(_) => return self.visit_dictionary(visitor),
        };
        Self::locate(self.path, result)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Bool(b) => Self::locate(self.path, visitor.visit_bool(*b)),
            _ => Err(self.mismatch(ValueKind::Bool)),
        }
    }

    deserialize_narrow! {
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let n = self.float()?;
        Self::locate(self.path, visitor.visit_f32(n as f32))
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let n = self.float()?;
        Self::locate(self.path, visitor.visit_f64(n))
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let Value::String(s) = self.value else {
            return Err(self.mismatch(ValueKind::String));
        };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::locate(self.path, visitor.visit_char(c)),
            _ => Err(self.error(ErrorKind::DataCorrupted(format!(
                "expected a single character, found {s:?}"
            )))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::String(s) => Self::locate(self.path, visitor.visit_borrowed_str(s)),
            _ => Err(self.mismatch(ValueKind::String)),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Nil => Self::locate(self.path, visitor.visit_none()),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Nil => Self::locate(self.path, visitor.visit_unit()),
            _ => Err(self.mismatch(ValueKind::Nil)),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Array(items) => self.visit_array(items, visitor),
            _ => Err(self.mismatch(ValueKind::Array)),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.visit_dictionary(visitor)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.visit_dictionary(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let (variant, payload) = match self.value {
            Value::String(s) => (s.as_str(), None),
            Value::Dictionary(dict) if dict.len() == 1 => match dict.iter().next() {
                Some((key, value)) => (key, Some(value)),
                None => return Err(self.mismatch(ValueKind::Dictionary)),
            },
            Value::Dictionary(dict) => {
                return Err(self.error(ErrorKind::DataCorrupted(format!(
                    "enum dictionary must have exactly one entry, found {}",
                    dict.len()
                ))));
            }
            _ => return Err(self.mismatch(ValueKind::String)),
        };
        let access = EnumAccess {
            variant,
            payload,
            path: &mut *self.path,
        };
        let result = visitor.visit_enum(access);
        Self::locate(self.path, result)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

/// Cursor over the elements of an array.
struct SeqAccess<'de, 'p> {
    items: std::slice::Iter<'de, Value>,
    index: usize,
    path: &'p mut Path,
}

impl<'de> de::SeqAccess<'de> for SeqAccess<'de, '_> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        let Some(item) = self.items.next() else {
            return Ok(None);
        };
        let index = self.index;
        self.index += 1;
        descend(self.path, index, |path| {
            seed.deserialize(Deserializer::new(item, path)).map(Some)
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Cursor over the entries of a dictionary.
struct MapAccess<'de, 'p> {
    entries: std::vec::IntoIter<(&'de str, &'de Value)>,
    pending: Option<(&'de str, &'de Value)>,
    path: &'p mut Path,
}

impl<'de> de::MapAccess<'de> for MapAccess<'de, '_> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        self.pending = Some((key, value));
        descend(self.path, key, |path| {
            seed.deserialize(MapKeyDeserializer { key })
                .map(Some)
                .map_err(|e| e.located_at(path))
        })
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (key, value) = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        descend(self.path, key, |path| {
            seed.deserialize(Deserializer::new(value, path))
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Dictionary keys are strings; integer, bool and char map keys are
/// parsed back out of them.
struct MapKeyDeserializer<'de> {
    key: &'de str,
}

impl MapKeyDeserializer<'_> {
    fn parse<T: std::str::FromStr>(&self, what: &str) -> Result<T> {
        self.key.parse().map_err(|_| {
            Error::new(ErrorKind::DataCorrupted(format!(
                "map key `{}` is not a valid {what}",
                self.key
            )))
        })
    }
}

macro_rules! deserialize_parsed_key {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                let key: $ty = self.parse(stringify!($ty))?;
                visitor.$visit(key)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.key)
    }

    deserialize_parsed_key! {
        deserialize_bool => bool, visit_bool;
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
        deserialize_char => char, visit_char;
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let key: de::value::StrDeserializer<'_, Error> = self.key.into_deserializer();
        visitor.visit_enum(key)
    }

    forward_to_deserialize_any! {
        f32 f64 str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// Externally tagged enum: the variant name plus the payload, if any.
struct EnumAccess<'de, 'p> {
    variant: &'de str,
    payload: Option<&'de Value>,
    path: &'p mut Path,
}

impl<'de, 'p> de::EnumAccess<'de> for EnumAccess<'de, 'p> {
    type Error = Error;
    type Variant = VariantAccess<'de, 'p>;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let tag = seed.deserialize(de::value::BorrowedStrDeserializer::<Error>::new(
            self.variant,
        ))?;
        Ok((
            tag,
            VariantAccess {
                variant: self.variant,
                payload: self.payload,
                path: self.path,
            },
        ))
    }
}

struct VariantAccess<'de, 'p> {
    variant: &'de str,
    payload: Option<&'de Value>,
    path: &'p mut Path,
}

impl<'de> VariantAccess<'de, '_> {
    /// The payload of a data-carrying variant. A bare variant name has none.
    fn payload(&self, expected: ValueKind) -> Result<&'de Value> {
        self.payload.ok_or_else(|| {
            Error::new(ErrorKind::TypeMismatch {
                expected,
                found: ValueKind::String,
            })
            .located_at(self.path)
        })
    }
}

impl<'de> de::VariantAccess<'de> for VariantAccess<'de, '_> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.payload {
            None | Some(Value::Nil) => Ok(()),
            Some(other) => descend(self.path, self.variant, |path| {
                Err(Error::new(ErrorKind::TypeMismatch {
                    expected: ValueKind::Nil,
                    found: other.kind(),
                })
                .located_at(path))
            }),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        let payload = self.payload(ValueKind::Dictionary)?;
        descend(self.path, self.variant, |path| {
            seed.deserialize(Deserializer::new(payload, path))
        })
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        let payload = self.payload(ValueKind::Dictionary)?;
        descend(self.path, self.variant, |path| {
            de::Deserializer::deserialize_tuple(Deserializer::new(payload, path), len, visitor)
        })
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let payload = self.payload(ValueKind::Dictionary)?;
        descend(self.path, self.variant, |path| {
            de::Deserializer::deserialize_struct(
                Deserializer::new(payload, path),
                "",
                fields,
                visitor,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;
    use swon_tree::Dictionary;

    use super::*;

    fn decode<'de, T: Deserialize<'de>>(value: &'de Value) -> Result<T> {
        let mut path = Path::root();
        T::deserialize(Deserializer::new(value, &mut path))
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode::<i32>(&Value::Integer(-3)).unwrap(), -3);
        assert_eq!(decode::<f64>(&Value::Integer(2)).unwrap(), 2.0);
        assert_eq!(decode::<&str>(&Value::from("hi")).unwrap(), "hi");
        assert_eq!(decode::<char>(&Value::from("é")).unwrap(), 'é');
        assert_eq!(decode::<Option<bool>>(&Value::Nil).unwrap(), None);
        assert_eq!(decode::<Option<bool>>(&Value::Bool(true)).unwrap(), Some(true));
    }

    #[test]
    fn test_float_does_not_narrow_to_integer() {
        let err = decode::<i64>(&Value::Float(1.0)).unwrap_err();
        assert_eq!(err.to_string(), "expected Integer, found Float");
    }

    #[test]
    fn test_narrowing_overflow() {
        let err = decode::<u8>(&Value::Integer(300)).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::NumberOutOfRange { target: "u8", .. }
        ));
        assert!(decode::<u32>(&Value::Integer(-1)).is_err());
    }

    #[test]
    fn test_nil_for_concrete_type() {
        let err = decode::<String>(&Value::Nil).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch {
                expected: ValueKind::String,
                found: ValueKind::Nil
            }
        ));
    }

    #[test]
    fn test_empty_array_as_map() {
        let map: HashMap<String, i32> = decode(&Value::Array(vec![])).unwrap();
        assert!(map.is_empty());
        assert!(decode::<HashMap<String, i32>>(&Value::Array(vec![1.into()])).is_err());
    }

    #[test]
    fn test_integer_map_keys() {
        let dict: Dictionary = [("1", 10), ("2", 20)].into_iter().collect();
        let map: HashMap<u8, i64> = decode(&Value::Dictionary(dict)).unwrap();
        assert_eq!(map[&1], 10);
        assert_eq!(map[&2], 20);

        let dict: Dictionary = [("x", 1)].into_iter().collect();
        let err = decode::<HashMap<u8, i64>>(&Value::Dictionary(dict)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::DataCorrupted(_)));
        assert_eq!(err.path().to_string(), "x");
    }

    #[test]
    fn test_path_is_restored_after_success() {
        let value = Value::Array(vec![Value::Array(vec![1.into()]), 2.into()]);
        let mut path = Path::root();
        let _: (Vec<i32>, i32) =
            <(Vec<i32>, i32)>::deserialize(Deserializer::new(&value, &mut path)).unwrap();
        assert!(path.is_empty());
    }
}
