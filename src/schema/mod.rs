//! Schema registry subsystem
//!
//! Every object class has one immutable, ordered property table.
//!
//! # Design Principles
//!
//! - Property order defines slot indices and positional initialization
//! - Names are unique, slots are dense `0..n`
//! - Built once per class, shared by all instances
//! - Typed and dynamic accessors resolve through the same table

mod errors;
mod loader;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::SchemaLoader;
pub use registry::SchemaRegistry;
pub use types::{
    ObjectSchema, ObjectSchemaBuilder, PropertyDefinition, PropertyDescriptor, PropertyKey,
    PropertyType, SchemaDefinition,
};
