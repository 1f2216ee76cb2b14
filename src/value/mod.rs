//! Value coercion subsystem
//!
//! This module provides:
//! - `Value` - dynamic property value
//! - `CanonicalValue` - storage representation of a slot
//! - `Property` - typed view of a value
//! - `Timestamp` - fixed-point date
//! - width truncation / sign extension primitives

pub mod coercion;
mod property;
mod timestamp;
#[allow(clippy::module_inception)]
mod value;

pub use coercion::{
    coerce, normalize, sign_extend_i16, sign_extend_i32, sign_extend_i8, truncate_i16,
    truncate_i32, truncate_i8, truncate_to_width, CanonicalValue,
};
pub use property::Property;
pub use timestamp::{Timestamp, REFERENCE_EPOCH_UNIX_SECONDS};
pub use value::Value;
