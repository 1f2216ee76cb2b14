//! Value coercion engine
//!
//! Pure conversions between caller values, declared property types and the
//! canonical storage representation.
//!
//! # Integer rules
//!
//! - Every integer property is stored in a canonical `i64` slot
//! - Reading at a narrower width truncates to the low bits, two's complement;
//!   the sign comes from the truncated width
//! - Writing a narrower value sign-extends to 64 bits
//! - Narrowing never reports overflow
//!
//! # Floating point rules
//!
//! - `float` stores `f32`: an `f64` is rounded to nearest at write time
//! - `double` stores `f64` exactly

use crate::error::{AccessorError, AccessorResult};
use crate::schema::{PropertyDescriptor, PropertyType};

use super::timestamp::Timestamp;
use super::value::Value;

/// Storage representation of one slot.
///
/// Links hold the row index of the target in the table of the property's
/// declared object class.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    Date(Timestamp),
    Link(Option<usize>),
}

/// Truncates to the low `bits` bits and sign-extends from bit `bits - 1`.
///
/// `bits` must be in `1..=64`; 64 is the identity.
#[inline]
pub fn truncate_to_width(value: i64, bits: u32) -> i64 {
    debug_assert!((1..=64).contains(&bits));
    let shift = 64 - bits;
    (value << shift) >> shift
}

#[inline]
pub fn truncate_i8(value: i64) -> i8 {
    truncate_to_width(value, 8) as i8
}

#[inline]
pub fn truncate_i16(value: i64) -> i16 {
    truncate_to_width(value, 16) as i16
}

#[inline]
pub fn truncate_i32(value: i64) -> i32 {
    truncate_to_width(value, 32) as i32
}

#[inline]
pub fn sign_extend_i8(value: i8) -> i64 {
    i64::from(value)
}

#[inline]
pub fn sign_extend_i16(value: i16) -> i64 {
    i64::from(value)
}

#[inline]
pub fn sign_extend_i32(value: i32) -> i64 {
    i64::from(value)
}

/// Rounds a double to the nearest single-precision value.
#[inline]
pub fn round_to_float(value: f64) -> f32 {
    value as f32
}

/// Converts a supplied value to the declared type of `descriptor`.
///
/// Accepted conversions besides exact matches:
/// - int → float / double (numeric)
/// - double → float (rounded), float → double (exact)
/// - a link must target the declared object class
pub fn coerce(descriptor: &PropertyDescriptor, value: Value) -> AccessorResult<Value> {
    let coerced = match (descriptor.property_type, value) {
        (PropertyType::Bool, v @ Value::Bool(_)) => v,

        (t, v @ Value::Int(_)) if t.is_integer() => v,

        (PropertyType::Float, v @ Value::Float(_)) => v,
        (PropertyType::Float, Value::Double(d)) => Value::Float(round_to_float(d)),
        (PropertyType::Float, Value::Int(i)) => Value::Float(i as f32),

        (PropertyType::Double, v @ Value::Double(_)) => v,
        (PropertyType::Double, Value::Float(f)) => Value::Double(f64::from(f)),
        (PropertyType::Double, Value::Int(i)) => Value::Double(i as f64),

        (PropertyType::String, v @ Value::String(_)) => v,
        (PropertyType::Binary, v @ Value::Binary(_)) => v,
        (PropertyType::Date, v @ Value::Date(_)) => v,

        (PropertyType::Object, Value::Object(None)) => Value::Object(None),
        (PropertyType::Object, Value::Object(Some(target))) => {
            let expected = descriptor.object_class.as_deref().unwrap_or_default();
            if target.class_name() != expected {
                return Err(AccessorError::type_mismatch(
                    &descriptor.name,
                    expected,
                    target.class_name(),
                ));
            }
            Value::Object(Some(target))
        }

        (t, v) => {
            return Err(AccessorError::type_mismatch(
                &descriptor.name,
                t.type_name(),
                v.kind(),
            ))
        }
    };
    Ok(coerced)
}

/// Presents a stored value at the declared width of `descriptor`.
pub fn normalize(descriptor: &PropertyDescriptor, value: Value) -> Value {
    match (descriptor.property_type.integer_width(), value) {
        (Some(bits), Value::Int(i)) => Value::Int(truncate_to_width(i, bits)),
        (_, v) => v,
    }
}

/// Canonical form of a non-link value; `None` for links.
pub fn to_canonical(value: &Value) -> Option<CanonicalValue> {
    let canonical = match value {
        Value::Bool(b) => CanonicalValue::Bool(*b),
        Value::Int(i) => CanonicalValue::Int(*i),
        Value::Float(f) => CanonicalValue::Float(*f),
        Value::Double(d) => CanonicalValue::Double(*d),
        Value::String(s) => CanonicalValue::String(s.clone()),
        Value::Binary(b) => CanonicalValue::Binary(b.clone()),
        Value::Date(ts) => CanonicalValue::Date(*ts),
        Value::Object(_) => return None,
    };
    Some(canonical)
}

/// Value form of a non-link canonical value; `None` for links.
pub fn from_canonical(canonical: CanonicalValue) -> Option<Value> {
    let value = match canonical {
        CanonicalValue::Bool(b) => Value::Bool(b),
        CanonicalValue::Int(i) => Value::Int(i),
        CanonicalValue::Float(f) => Value::Float(f),
        CanonicalValue::Double(d) => Value::Double(d),
        CanonicalValue::String(s) => Value::String(s),
        CanonicalValue::Binary(b) => Value::Binary(b),
        CanonicalValue::Date(ts) => Value::Date(ts),
        CanonicalValue::Link(_) => return None,
    };
    Some(value)
}
