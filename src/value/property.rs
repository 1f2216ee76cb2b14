//! Typed property conversions
//!
//! `Property` maps a Rust type onto a declared property type. Static
//! accessors use it on top of the dynamic path, so typed and keyed access
//! share descriptor resolution and coercion.

use super::coercion::{sign_extend_i16, sign_extend_i32, sign_extend_i8, truncate_i16, truncate_i32, truncate_i8};
use super::timestamp::Timestamp;
use super::value::Value;
use crate::schema::{PropertyType, SchemaRegistry, SchemaResult};

pub trait Property: Sized {
    /// Declared type of a property holding `Self`
    const PROPERTY_TYPE: PropertyType;

    /// Name used in type mismatch errors
    const TYPE_NAME: &'static str;

    /// Linked class for link properties
    fn object_class() -> Option<&'static str> {
        None
    }

    /// Registers classes this type depends on
    fn register_class(_registry: &SchemaRegistry) -> SchemaResult<()> {
        Ok(())
    }

    /// Reads `Self` out of a stored value, handing the value back if it
    /// cannot be represented.
    fn from_value(value: Value) -> Result<Self, Value>;

    fn into_value(self) -> Value;
}

impl Property for bool {
    const PROPERTY_TYPE: PropertyType = PropertyType::Bool;
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! narrow_int_property {
    ($t:ty, $property_type:expr, $name:literal, $truncate:ident, $extend:ident) => {
        impl Property for $t {
            const PROPERTY_TYPE: PropertyType = $property_type;
            const TYPE_NAME: &'static str = $name;

            fn from_value(value: Value) -> Result<Self, Value> {
                match value {
                    Value::Int(i) => Ok($truncate(i)),
                    other => Err(other),
                }
            }

            fn into_value(self) -> Value {
                Value::Int($extend(self))
            }
        }
    };
}

narrow_int_property!(i8, PropertyType::Int8, "int8", truncate_i8, sign_extend_i8);
narrow_int_property!(i16, PropertyType::Int16, "int16", truncate_i16, sign_extend_i16);
narrow_int_property!(i32, PropertyType::Int32, "int32", truncate_i32, sign_extend_i32);

impl Property for i64 {
    const PROPERTY_TYPE: PropertyType = PropertyType::Int64;
    const TYPE_NAME: &'static str = "int64";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl Property for f32 {
    const PROPERTY_TYPE: PropertyType = PropertyType::Float;
    const TYPE_NAME: &'static str = "float";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Double(d) => Ok(d as f32),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl Property for f64 {
    const PROPERTY_TYPE: PropertyType = PropertyType::Double;
    const TYPE_NAME: &'static str = "double";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Double(d) => Ok(d),
            Value::Float(f) => Ok(f64::from(f)),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl Property for String {
    const PROPERTY_TYPE: PropertyType = PropertyType::String;
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl Property for Vec<u8> {
    const PROPERTY_TYPE: PropertyType = PropertyType::Binary;
    const TYPE_NAME: &'static str = "binary";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Binary(b) => Ok(b),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Binary(self)
    }
}

impl Property for Timestamp {
    const PROPERTY_TYPE: PropertyType = PropertyType::Date;
    const TYPE_NAME: &'static str = "date";

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Date(ts) => Ok(ts),
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Date(self)
    }
}
