//! Process-wide schema registry
//!
//! Lifecycle:
//! - Created lazily on the first call to `SchemaRegistry::global()`
//! - Schemas are inserted once per class and never removed or replaced
//! - Lives until process exit
//!
//! Lookups take a shared read lock. Registration takes the write lock only
//! for the insert itself.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::errors::{SchemaError, SchemaResult};
use super::types::ObjectSchema;
use crate::object::ObjectType;
use crate::observability::{Event, Logger};

static GLOBAL: OnceLock<SchemaRegistry> = OnceLock::new();

/// Class name → schema table
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<ObjectSchema>>>,
}

impl SchemaRegistry {
    /// Creates an empty, private registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every object in the process.
    pub fn global() -> &'static SchemaRegistry {
        GLOBAL.get_or_init(SchemaRegistry::new)
    }

    /// Resolves the schema of a statically declared type.
    ///
    /// Computed on first use and memoized; later calls return the same `Arc`.
    /// Link targets of `T` are registered as well.
    pub fn resolve<T: ObjectType>(&self) -> SchemaResult<Arc<ObjectSchema>> {
        if let Some(schema) = self.get(T::CLASS_NAME) {
            return Ok(schema);
        }

        let schema = self.register(T::object_schema()?)?;
        // Inserted before recursing so self-referencing types terminate.
        T::register_links(self)?;
        Ok(schema)
    }

    /// Registers a schema built at runtime.
    ///
    /// Registering an identical schema again returns the existing entry.
    /// A different schema under the same class name is rejected.
    pub fn register(&self, schema: ObjectSchema) -> SchemaResult<Arc<ObjectSchema>> {
        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = schemas.get(schema.class_name()) {
            if **existing == schema {
                return Ok(Arc::clone(existing));
            }
            return Err(SchemaError::schema_immutable(schema.class_name()));
        }

        let class_name = schema.class_name().to_string();
        let property_count = schema.property_count().to_string();
        let schema = Arc::new(schema);
        schemas.insert(class_name.clone(), Arc::clone(&schema));
        drop(schemas);

        Logger::event(
            Event::SchemaRegistered,
            &[("class", class_name.as_str()), ("properties", property_count.as_str())],
        );
        Ok(schema)
    }

    /// Gets a schema by class name.
    pub fn get(&self, class_name: &str) -> Option<Arc<ObjectSchema>> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(class_name)
            .cloned()
    }

    /// Gets a schema by class name, failing with `AERO_UNKNOWN_CLASS`.
    pub fn require(&self, class_name: &str) -> SchemaResult<Arc<ObjectSchema>> {
        self.get(class_name)
            .ok_or_else(|| SchemaError::unknown_class(class_name))
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.get(class_name).is_some()
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
