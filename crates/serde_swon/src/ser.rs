//! Serde serializer producing a SWON value tree.

use std::collections::HashSet;

use serde::ser::{self, Serialize};
use swon_tree::{Dictionary, Value};

use crate::error::{Error, ErrorKind, Result};

/// Serializer turning any `Serialize` type into a [`Value`].
///
/// Each composite owns the collection it is building; a child's finished
/// value is moved into its parent once the child ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer;

fn out_of_range(value: impl ToString) -> Error {
    Error::new(ErrorKind::NumberOutOfRange {
        value: value.to_string(),
        target: "i64",
    })
}

/// One-entry dictionary holding an enum payload under its variant name.
fn tagged(variant: &'static str, payload: Value) -> Value {
    let mut dict = Dictionary::with_capacity(1);
    dict.insert(variant, payload);
    Value::Dictionary(dict)
}

impl ser::Serializer for Serializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeDictionary;
    type SerializeStruct = SerializeDictionary;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| out_of_range(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| out_of_range(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| out_of_range(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        if v.is_finite() {
            Ok(Value::Float(v))
        } else {
            Err(Error::new(ErrorKind::NonFiniteFloat(v)))
        }
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(
            v.iter().map(|&b| Value::Integer(i64::from(b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Nil)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        let payload = value
            .serialize(Serializer)
            .map_err(|e| e.prepend(variant))?;
        Ok(tagged(variant, payload))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray> {
        Ok(SerializeArray {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeArray> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeDictionary> {
        Ok(SerializeDictionary {
            entries: Entries::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeDictionary> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            entries: Entries::with_capacity(len),
        })
    }
}

/// Builds an array from sequence and tuple elements.
pub struct SerializeArray {
    items: Vec<Value>,
}

impl SerializeArray {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let index = self.items.len();
        let value = value
            .serialize(Serializer)
            .map_err(|e| e.prepend(index))?;
        self.items.push(value);
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

/// Builds `["Variant": [fields...]]`.
pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let index = self.items.len();
        let value = value
            .serialize(Serializer)
            .map_err(|e| e.prepend(index).prepend(self.variant))?;
        self.items.push(value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::Array(self.items)))
    }
}

/// Dictionary under construction. A repeated key replaces the earlier
/// value in place.
struct Entries {
    dict: Dictionary,
    seen: HashSet<String>,
}

impl Entries {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            dict: Dictionary::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    fn insert(&mut self, key: String, value: Value) {
        if self.seen.contains(&key) {
            self.dict.insert(key, value);
        } else {
            self.seen.insert(key.clone());
            self.dict.push_unchecked(key, value);
        }
    }

    fn finish(self) -> Value {
        Value::Dictionary(self.dict)
    }
}

/// Builds a dictionary from map entries or struct fields.
pub struct SerializeDictionary {
    entries: Entries,
    next_key: Option<String>,
}

impl SerializeDictionary {
    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        match value.serialize(Serializer) {
            Ok(value) => {
                self.entries.insert(key, value);
                Ok(())
            }
            Err(e) => Err(e.prepend(key)),
        }
    }
}

impl ser::SerializeMap for SerializeDictionary {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.entries.finish())
    }
}

impl ser::SerializeStruct for SerializeDictionary {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.entries.finish())
    }
}

/// Builds `["Variant": ["field": value, ...]]`.
pub struct SerializeStructVariant {
    variant: &'static str,
    entries: Entries,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let value = value
            .serialize(Serializer)
            .map_err(|e| e.prepend(key).prepend(self.variant))?;
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.variant, self.entries.finish()))
    }
}

/// Turns map keys into dictionary key strings.
struct KeySerializer;

fn invalid_key(kind: &'static str) -> Error {
    Error::new(ErrorKind::InvalidMapKey(kind))
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = ser::Impossible<String, Error>;
    type SerializeTuple = ser::Impossible<String, Error>;
    type SerializeTupleStruct = ser::Impossible<String, Error>;
    type SerializeTupleVariant = ser::Impossible<String, Error>;
    type SerializeMap = ser::Impossible<String, Error>;
    type SerializeStruct = ser::Impossible<String, Error>;
    type SerializeStructVariant = ser::Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(invalid_key("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(invalid_key("float"))
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_owned())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(invalid_key("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(invalid_key("none"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(invalid_key("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(invalid_key("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(invalid_key("newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(invalid_key("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(invalid_key("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(invalid_key("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(invalid_key("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(invalid_key("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(invalid_key("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(invalid_key("struct variant"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn encode<T: Serialize>(value: &T) -> Result<Value> {
        value.serialize(Serializer)
    }

    #[test]
    fn test_primitives() {
        assert_eq!(encode(&42u8).unwrap(), Value::Integer(42));
        assert_eq!(encode(&-7i32).unwrap(), Value::Integer(-7));
        assert_eq!(encode(&1.5f32).unwrap(), Value::Float(1.5));
        assert_eq!(encode(&'x').unwrap(), Value::from("x"));
        assert_eq!(encode(&()).unwrap(), Value::Nil);
        assert_eq!(encode(&None::<i32>).unwrap(), Value::Nil);
        assert_eq!(encode(&Some(true)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(
            encode(&(i64::MAX as u64)).unwrap(),
            Value::Integer(i64::MAX)
        );
        let err = encode(&u64::MAX).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::NumberOutOfRange { target: "i64", .. }
        ));
        assert!(encode(&i128::MIN).is_err());
        assert_eq!(encode(&-5i128).unwrap(), Value::Integer(-5));
    }

    #[test]
    fn test_non_finite_float_path() {
        let err = encode(&vec![vec![1.0, f64::NAN]]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NonFiniteFloat(_)));
        assert_eq!(err.path().to_string(), "[0][1]");
    }

    #[test]
    fn test_map_keys() {
        let mut map = BTreeMap::new();
        map.insert(2u32, "two");
        map.insert(10u32, "ten");
        let value = encode(&map).unwrap();
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict.get("2"), Some(&Value::from("two")));
        assert_eq!(dict.get("10"), Some(&Value::from("ten")));

        let mut bad = BTreeMap::new();
        bad.insert(vec![1], 1);
        let err = encode(&bad).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidMapKey("sequence")));
    }

    #[test]
    fn test_repeated_map_key_replaces_in_place() {
        struct Pairs(Vec<(&'static str, i32)>);

        impl Serialize for Pairs {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: ser::Serializer,
            {
                serializer.collect_map(self.0.iter().copied())
            }
        }

        let value = encode(&Pairs(vec![("a", 1), ("b", 2), ("a", 3)])).unwrap();
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(dict.get("a"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_large_map_keeps_every_key() {
        let map: BTreeMap<u32, u32> = (0..50_000).map(|n| (n, n * 2)).collect();
        let value = encode(&map).unwrap();
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict.len(), 50_000);
        assert_eq!(dict.get("49999"), Some(&Value::Integer(99_998)));
    }

    #[test]
    fn test_bytes_become_integers() {
        let value = ser::Serializer::serialize_bytes(Serializer, &[0, 255]).unwrap();
        assert_eq!(value, Value::Array(vec![0.into(), 255.into()]));
    }
}
