//! Conversion of `Serialize` types into [`Value`].
//!
//! [`ValueSerializer`] is a `serde::Serializer` whose output is a [`Value`]
//! tree. It lets types that only derive `Serialize` be rendered without an
//! [`Inspect`](crate::Inspect) implementation.
//!
//! ## Mapping
//!
//! | serde form | Value |
//! |------------|-------|
//! | `bool`, integers, floats | `Bool`, `Number` |
//! | `i128`, `u128` | `BigInt` |
//! | `char`, `str` | `Char`, `String` |
//! | `None`, `()` | `Null`, empty `Tuple` |
//! | bytes, sequences | `Array` |
//! | tuples, tuple structs | `Tuple` |
//! | maps | `Map` |
//! | structs, unit structs | `Object` |
//! | unit variants | `Symbol` |
//! | newtype, tuple and struct variants | `Variant` |
//!
//! Newtype structs and `Some` are transparent.
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use propstring::{Value, ValueSerializer};
//! use serde::Serialize;
//!
//! let value = (1, "two").serialize(ValueSerializer).unwrap();
//! assert_eq!(value, Value::Tuple(vec![Value::from(1), Value::from("two")]));
//! ```

use crate::{Error, Number, Result, Value, ValueMap};
use num_bigint::BigInt;
use serde::{ser, Serialize};

/// Serializer producing a [`Value`] tree.
pub struct ValueSerializer;

enum SeqKind {
    Array,
    Tuple,
    Variant {
        name: &'static str,
        variant: &'static str,
    },
}

pub struct SerializeVec {
    items: Vec<Value>,
    kind: SeqKind,
}

pub struct SerializeMap {
    entries: Vec<(Value, Value)>,
    current_key: Option<Value>,
}

pub struct SerializeStruct {
    name: &'static str,
    variant: Option<&'static str>,
    fields: ValueMap,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStruct;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(Number::I8(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(Number::I16(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(Number::I32(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::I64(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::BigInt(BigInt::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(Number::U8(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(Number::U16(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(Number::U32(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Number(Number::U64(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::BigInt(BigInt::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(Number::F32(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(Number::F64(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        let items = v
            .iter()
            .map(|&b| Value::Number(Number::U8(b)))
            .collect();
        Ok(Value::Array(items))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Tuple(Vec::new()))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        Ok(Value::Object {
            name,
            fields: ValueMap::new(),
        })
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::Symbol { name, variant })
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(Value::Variant {
            name,
            variant,
            value: Box::new(to_value(value)?),
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(SeqKind::Array, len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(SeqKind::Tuple, len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(SeqKind::Tuple, len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(SeqKind::Variant { name, variant }, len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            current_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<SerializeStruct> {
        Ok(SerializeStruct::new(name, None, len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStruct> {
        Ok(SerializeStruct::new(name, Some(variant), len))
    }
}

impl SerializeVec {
    fn new(kind: SeqKind, len: usize) -> Self {
        SerializeVec {
            items: Vec::with_capacity(len),
            kind,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        match self.kind {
            SeqKind::Array => Value::Array(self.items),
            SeqKind::Tuple => Value::Tuple(self.items),
            SeqKind::Variant { name, variant } => Value::Variant {
                name,
                variant,
                value: Box::new(Value::Tuple(self.items)),
            },
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.entries.push((key, to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.entries))
    }
}

impl SerializeStruct {
    fn new(name: &'static str, variant: Option<&'static str>, len: usize) -> Self {
        SerializeStruct {
            name,
            variant,
            fields: ValueMap::with_capacity(len),
        }
    }

    fn finish(self) -> Value {
        match self.variant {
            None => Value::Object {
                name: self.name,
                fields: self.fields,
            },
            Some(variant) => Value::Variant {
                name: self.name,
                variant,
                value: Box::new(Value::Object {
                    name: variant,
                    fields: self.fields,
                }),
            },
        }
    }
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeStruct {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}
