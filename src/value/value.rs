//! Dynamic property values

use std::fmt;

use super::timestamp::Timestamp;
use crate::object::Object;
use crate::schema::PropertyType;

/// A property value as seen by callers.
///
/// Integers are always carried at the canonical 64-bit width; narrowing to
/// the declared width happens on read.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    Date(Timestamp),
    /// Link to another object, `None` for a null link
    Object(Option<Object>),
}

impl Value {
    /// Zero value for a declared type
    pub fn default_for(property_type: PropertyType) -> Value {
        match property_type {
            PropertyType::Bool => Value::Bool(false),
            PropertyType::Int8 | PropertyType::Int16 | PropertyType::Int32 | PropertyType::Int64 => {
                Value::Int(0)
            }
            PropertyType::Float => Value::Float(0.0),
            PropertyType::Double => Value::Double(0.0),
            PropertyType::String => Value::String(String::new()),
            PropertyType::Binary => Value::Binary(Vec::new()),
            PropertyType::Date => Value::Date(Timestamp::REFERENCE),
            PropertyType::Object => Value::Object(None),
        }
    }

    /// Kind name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Date(_) => "date",
            Value::Object(_) => "object",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(Some(o)) => Some(o),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Object(None))
    }
}

/// Links compare by object identity, everything else by value.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Object(None), Value::Object(None)) => true,
            (Value::Object(Some(a)), Value::Object(Some(b))) => a.same_object(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Double(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::Date(ts) => write!(f, "{}", ts),
            Value::Object(Some(o)) => write!(f, "{}", o.class_name()),
            Value::Object(None) => f.write_str("null"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Binary(v.to_vec())
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Date(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(Some(v))
    }
}

impl From<Option<Object>> for Value {
    fn from(v: Option<Object>) -> Self {
        Value::Object(v)
    }
}
