//! aeroproxy - typed and dynamic object proxies over a transactional row store
//!
//! - `schema`: per-class property tables, process-wide registry, JSON loader
//! - `value`: dynamic values and the coercion rules between them
//! - `object`: standalone and persisted object proxies, `object_type!`
//! - `store`: row store contract, in-memory implementation, `Database`

pub mod cli;
pub mod config;
pub mod error;
pub mod object;
pub mod observability;
pub mod schema;
pub mod store;
pub mod value;

pub use config::DatabaseConfig;
pub use error::{AccessorError, AccessorResult};
pub use object::{FromObject, Object, ObjectType};
pub use schema::{ObjectSchema, PropertyType, SchemaRegistry};
pub use store::{Database, Results};
pub use value::{Property, Timestamp, Value};
