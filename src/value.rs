//! Dynamically typed field values.

use crate::record::Record;

/// The value of one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value: the field's bytes were missing from a short source.
    None,
    /// An unsigned integer of any width.
    UInt(u64),
    /// A signed integer of any width.
    Int(i64),
    /// A 4-byte float, kept at its own width so encoding reproduces the exact bits.
    Float32(f32),
    /// An 8-byte float.
    Float(f64),
    /// A raw, space-padded or NUL-terminated string.
    Bytes(Vec<u8>),
    /// A hex-digit string.
    Str(String),
    /// A nested struct.
    Record(Record),
    /// An array of numbers or nested structs.
    Array(Vec<Value>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// The value as `u64`, if it is an integer that fits.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::UInt(n) => Some(n),
            Value::Int(n) => u64::try_from(n).ok(),
            _ => None,
        }
    }

    /// The value as `i64`, if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::UInt(n) => i64::try_from(n).ok(),
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// The value as `f64`, widening 4-byte floats.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float32(x) => Some(x as f64),
            Value::Float(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::Str(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// The value as text, if it is a hex string or a UTF-8 byte string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// True for absent values, zeros, strings made only of NULs, and nested records or arrays
    /// whose every element is blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::None => true,
            Value::UInt(n) => *n == 0,
            Value::Int(n) => *n == 0,
            Value::Float32(x) => *x == 0.0,
            Value::Float(x) => *x == 0.0,
            Value::Bytes(b) => b.iter().all(|&c| c == 0),
            Value::Str(s) => s.chars().all(|c| c == '\0'),
            Value::Record(r) => r.is_empty(),
            Value::Array(items) => items.iter().all(Value::is_blank),
        }
    }
}

macro_rules! from_int {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )*
    };
}

from_int!(UInt, u64, u8, u16, u32, u64, usize);
from_int!(Int, i64, i8, i16, i32, i64, isize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Bytes(value.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Bytes(value.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}
