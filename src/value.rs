//! Dynamic values produced from `Serialize` types.
//!
//! [`Value`] is the bridge between serde and the renderer. Any type that
//! implements `Serialize` but not [`Inspect`] can be converted with
//! [`to_value`](crate::to_value) and then rendered like a native value.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use propstring::{Value, Number};
//!
//! let null = Value::Null;
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! assert_eq!(number, Value::Number(Number::I32(42)));
//! ```
//!
//! ### Converting from Rust Types
//!
//! ```rust
//! use propstring::{to_string, to_value, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let value: Value = to_value(&Point { x: 10, y: 20 }).unwrap();
//! assert!(value.is_object());
//! assert_eq!(to_string(&value), "{ x: 10, y: 20 }");
//! ```

use crate::inspect::{Compound, Inspect, KeyValue, Member, Object, Primitive, Sequence, Shape};
use crate::render::Rendered;
use crate::ValueMap;
use num_bigint::BigInt;
use serde::ser::{SerializeMap, SerializeSeq, SerializeTuple};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A dynamically typed snapshot of a serialized value.
///
/// Structs keep their name so that type annotations read the same as for a
/// native [`Inspect`] implementation.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    /// 128-bit integers.
    BigInt(BigInt),
    Char(char),
    String(String),
    /// A unit enum variant.
    Symbol {
        name: &'static str,
        variant: &'static str,
    },
    Array(Vec<Value>),
    Tuple(Vec<Value>),
    /// Map entries in serialization order. Keys can be any value.
    Map(Vec<(Value, Value)>),
    Object {
        name: &'static str,
        fields: ValueMap,
    },
    /// A newtype, tuple or struct enum variant.
    Variant {
        name: &'static str,
        variant: &'static str,
        value: Box<Value>,
    },
}

/// A numeric value, kept at the width it was serialized with.
///
/// # Examples
///
/// ```rust
/// use propstring::Number;
///
/// assert_eq!(Number::I32(42).as_i64(), Some(42));
/// assert_eq!(Number::U64(u64::MAX).as_i64(), None);
/// assert!(Number::F64(3.5).is_float());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        !self.is_float()
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::F32(_) | Number::F64(_))
    }

    /// Converts this number to an `i64` if it is an integer in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::I8(i) => Some(i64::from(i)),
            Number::I16(i) => Some(i64::from(i)),
            Number::I32(i) => Some(i64::from(i)),
            Number::I64(i) => Some(i),
            Number::U8(u) => Some(i64::from(u)),
            Number::U16(u) => Some(i64::from(u)),
            Number::U32(u) => Some(i64::from(u)),
            Number::U64(u) => i64::try_from(u).ok(),
            Number::F32(_) | Number::F64(_) => None,
        }
    }

    /// Converts this number to an `f64`, rounding large integers.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::I8(i) => f64::from(i),
            Number::I16(i) => f64::from(i),
            Number::I32(i) => f64::from(i),
            Number::I64(i) => i as f64,
            Number::U8(u) => f64::from(u),
            Number::U16(u) => f64::from(u),
            Number::U32(u) => f64::from(u),
            Number::U64(u) => u as f64,
            Number::F32(f) => f64::from(f),
            Number::F64(f) => f,
        }
    }

    fn primitive(&self) -> Primitive<'static> {
        match *self {
            Number::I8(i) => Primitive::Int(i128::from(i)),
            Number::I16(i) => Primitive::Int(i128::from(i)),
            Number::I32(i) => Primitive::Int(i128::from(i)),
            Number::I64(i) => Primitive::Int(i128::from(i)),
            Number::U8(u) => Primitive::UInt(u128::from(u)),
            Number::U16(u) => Primitive::UInt(u128::from(u)),
            Number::U32(u) => Primitive::UInt(u128::from(u)),
            Number::U64(u) => Primitive::UInt(u128::from(u)),
            Number::F32(f) => Primitive::F32(f),
            Number::F64(f) => Primitive::F64(f),
        }
    }

    /// The Rust type the number was serialized from.
    fn type_name(&self) -> &'static str {
        match self {
            Number::I8(_) => "i8",
            Number::I16(_) => "i16",
            Number::I32(_) => "i32",
            Number::I64(_) => "i64",
            Number::U8(_) => "u8",
            Number::U16(_) => "u16",
            Number::U32(_) => "u32",
            Number::U64(_) => "u64",
            Number::F32(_) => "f32",
            Number::F64(_) => "f64",
        }
    }
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object { .. })
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propstring::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// If the value is a struct, returns its fields.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Value::Object { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

impl Inspect for Value {
    fn classify(&self) -> Shape<'_> {
        match self {
            Value::Null => Shape::Null,
            Value::Bool(b) => Shape::Primitive(Primitive::Bool(*b)),
            Value::Number(n) => Shape::Primitive(n.primitive()),
            Value::BigInt(bi) => Shape::Primitive(Primitive::Text(Cow::Owned(bi.to_string()))),
            Value::Char(c) => Shape::Primitive(Primitive::Char(*c)),
            Value::String(s) => Shape::Primitive(Primitive::Str(Cow::Borrowed(s.as_str()))),
            Value::Symbol { variant, .. } => {
                Shape::Primitive(Primitive::Variant(Cow::Borrowed(*variant)))
            }
            Value::Array(items) => Shape::Sequence(Sequence::borrowed(items)),
            Value::Tuple(items) => {
                Shape::Compound(Compound::tuple(items.iter().map(Member::from).collect()))
            }
            Value::Map(entries) => Shape::Sequence(Sequence::owned(
                entries.iter().map(|(key, value)| KeyValue::new(key, value)),
            )),
            Value::Object { fields, .. } => fields.classify(),
            Value::Variant { variant, value, .. } => {
                Shape::Object(Object::new().field(*variant, value.as_ref()))
            }
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(n) => n.type_name(),
            Value::BigInt(_) => "BigInt",
            Value::Char(_) => "char",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Tuple(_) => "Tuple",
            Value::Map(_) => "Map",
            Value::Symbol { name, .. } | Value::Object { name, .. } | Value::Variant { name, .. } => {
                *name
            }
        }
    }
}

/// Renders the value with default options.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Rendered::new(self), f)
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Number::I8(i) => serializer.serialize_i8(i),
            Number::I16(i) => serializer.serialize_i16(i),
            Number::I32(i) => serializer.serialize_i32(i),
            Number::I64(i) => serializer.serialize_i64(i),
            Number::U8(u) => serializer.serialize_u8(u),
            Number::U16(u) => serializer.serialize_u16(u),
            Number::U32(u) => serializer.serialize_u32(u),
            Number::U64(u) => serializer.serialize_u64(u),
            Number::F32(f) => serializer.serialize_f32(f),
            Number::F64(f) => serializer.serialize_f64(f),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::BigInt(bi) => serializer.serialize_str(&bi.to_string()),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::String(s) => serializer.serialize_str(s),
            Value::Symbol { name, variant } => serializer.serialize_unit_variant(*name, 0, *variant),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Tuple(items) => {
                let mut tuple = serializer.serialize_tuple(items.len())?;
                for item in items {
                    tuple.serialize_element(item)?;
                }
                tuple.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Object { fields, .. } => fields.serialize(serializer),
            Value::Variant {
                name,
                variant,
                value,
            } => serializer.serialize_newtype_variant(*name, 0, *variant, value.as_ref()),
        }
    }
}

macro_rules! from_number {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::Number(Number::$variant(value))
            }
        }
    )*};
}

from_number! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}
