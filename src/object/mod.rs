//! Object proxies
//!
//! - `Object` - dynamic handle, by name or slot
//! - `ObjectType` - statically declared classes, see `object_type!`
//!
//! Standalone and persisted objects expose the same contract; only the
//! backing differs.

mod macros;
mod proxy;

pub use proxy::{FromObject, Object, ObjectType};
