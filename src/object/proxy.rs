//! Object proxy
//!
//! An `Object` is a handle onto one instance of a schema class. Two backings:
//!
//! - Standalone: values live in the proxy itself, writes need no transaction
//! - Persisted: values live in a row store, reached through a `RowRef`
//!
//! Clones share the backing, so a write through one handle is visible through
//! every other. `Database::add` flips the backing in place from standalone to
//! persisted.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{AccessorError, AccessorResult};
use crate::schema::{
    ObjectSchema, PropertyDescriptor, PropertyKey, PropertyType, SchemaError, SchemaRegistry, SchemaResult,
};
use crate::store::{RowId, RowRef, RowStore, TxError};
use crate::value::coercion::{from_canonical, to_canonical};
use crate::value::{coerce, normalize, CanonicalValue, Property, Value};

/// Builds a handle from an untyped object.
pub trait FromObject {
    fn from_object(object: Object) -> Self;
}

/// A statically declared object class.
///
/// Usually implemented through `object_type!`.
pub trait ObjectType: FromObject + Sized {
    const CLASS_NAME: &'static str;

    /// Property table in declaration order
    fn object_schema() -> SchemaResult<ObjectSchema>;

    /// Registers the classes this type links to
    fn register_links(_registry: &SchemaRegistry) -> SchemaResult<()> {
        Ok(())
    }

    fn as_object(&self) -> &Object;

    fn into_object(self) -> Object;
}

#[derive(Debug)]
enum Backing {
    Standalone(Vec<Value>),
    Persisted(RowRef),
}

/// Live handle onto one object.
#[derive(Clone)]
pub struct Object {
    schema: Arc<ObjectSchema>,
    backing: Arc<RwLock<Backing>>,
}

impl FromObject for Object {
    fn from_object(object: Object) -> Self {
        object
    }
}

impl Object {
    /// Standalone object holding the default value of every property.
    pub fn new(schema: Arc<ObjectSchema>) -> Self {
        let values = schema
            .properties()
            .iter()
            .map(|p| Value::default_for(p.property_type))
            .collect();
        Self::with_backing(schema, Backing::Standalone(values))
    }

    /// Standalone object of a registered class.
    pub fn dynamic(class_name: &str) -> AccessorResult<Self> {
        Ok(Self::new(SchemaRegistry::global().require(class_name)?))
    }

    /// Standalone object initialized positionally, in slot order.
    pub fn from_values(schema: Arc<ObjectSchema>, values: Vec<Value>) -> AccessorResult<Self> {
        let values = coerce_all(&schema, values)?;
        Ok(Self::with_backing(schema, Backing::Standalone(values)))
    }

    pub(crate) fn persisted(schema: Arc<ObjectSchema>, row: RowRef) -> Self {
        Self::with_backing(schema, Backing::Persisted(row))
    }

    fn with_backing(schema: Arc<ObjectSchema>, backing: Backing) -> Self {
        Self {
            schema,
            backing: Arc::new(RwLock::new(backing)),
        }
    }

    pub fn class_name(&self) -> &str {
        self.schema.class_name()
    }

    pub fn schema(&self) -> &Arc<ObjectSchema> {
        &self.schema
    }

    pub fn is_persisted(&self) -> bool {
        matches!(*self.read_backing(), Backing::Persisted(_))
    }

    /// False once the database of a persisted object is gone, or its row was
    /// discarded by a cancelled write transaction.
    pub fn is_valid(&self) -> bool {
        match &*self.read_backing() {
            Backing::Standalone(_) => true,
            Backing::Persisted(row) => row.is_valid(),
        }
    }

    /// Identity: same handle, or the same row of the same database.
    pub fn same_object(&self, other: &Object) -> bool {
        if Arc::ptr_eq(&self.backing, &other.backing) {
            return true;
        }
        if self.class_name() != other.class_name() {
            return false;
        }
        match (self.row_ref(), other.row_ref()) {
            (Some(a), Some(b)) => a.same_row(&b),
            _ => false,
        }
    }

    pub(crate) fn row_ref(&self) -> Option<RowRef> {
        match &*self.read_backing() {
            Backing::Standalone(_) => None,
            Backing::Persisted(row) => Some(row.clone()),
        }
    }

    /// Reads a property by name or slot.
    pub fn get<'k>(&self, key: impl Into<PropertyKey<'k>>) -> AccessorResult<Value> {
        let descriptor = self.schema.descriptor(key)?;

        let row = match &*self.read_backing() {
            Backing::Standalone(values) => {
                let value = values
                    .get(descriptor.slot)
                    .cloned()
                    .unwrap_or_else(|| Value::default_for(descriptor.property_type));
                return Ok(normalize(descriptor, value));
            }
            Backing::Persisted(row) => row.clone(),
        };

        let value = self.read_row(descriptor, &row)?;
        Ok(normalize(descriptor, value))
    }

    /// Reads a property as `T`.
    pub fn get_as<'k, T: Property>(&self, key: impl Into<PropertyKey<'k>>) -> AccessorResult<T> {
        let key = key.into();
        let descriptor = self.schema.descriptor(key)?;
        let value = self.get(key)?;
        T::from_value(value)
            .map_err(|v| AccessorError::type_mismatch(&descriptor.name, T::TYPE_NAME, v.kind()))
    }

    /// Writes a property by name or slot.
    ///
    /// The value is coerced to the declared type before anything is written.
    /// Persisted objects require an active write transaction.
    pub fn set<'k>(&self, key: impl Into<PropertyKey<'k>>, value: impl Into<Value>) -> AccessorResult<()> {
        let descriptor = self.schema.descriptor(key)?;
        let value = coerce(descriptor, value.into())?;

        let row = match &mut *self.write_backing() {
            Backing::Standalone(values) => {
                if let Some(slot) = values.get_mut(descriptor.slot) {
                    *slot = value;
                }
                return Ok(());
            }
            Backing::Persisted(row) => row.clone(),
        };

        let store = row.store()?;
        if !store.is_in_write_transaction()? {
            return Err(AccessorError::NotInTransaction);
        }
        self.write_row(&store, descriptor, &row, value)
    }

    /// Writes a property as `T`.
    pub fn set_as<'k, T: Property>(&self, key: impl Into<PropertyKey<'k>>, value: T) -> AccessorResult<()> {
        self.set(key, value.into_value())
    }

    /// All values in slot order.
    pub fn values(&self) -> AccessorResult<Vec<Value>> {
        (0..self.schema.property_count()).map(|slot| self.get(slot)).collect()
    }

    /// Replaces every value, in slot order.
    ///
    /// All values are coerced before the first write.
    pub fn set_values(&self, values: Vec<Value>) -> AccessorResult<()> {
        let values = coerce_all(&self.schema, values)?;

        let row = match &mut *self.write_backing() {
            Backing::Standalone(current) => {
                *current = values;
                return Ok(());
            }
            Backing::Persisted(row) => row.clone(),
        };

        let store = row.store()?;
        if !store.is_in_write_transaction()? {
            return Err(AccessorError::NotInTransaction);
        }
        for (descriptor, value) in self.schema.properties().iter().zip(values) {
            self.write_row(&store, descriptor, &row, value)?;
        }
        Ok(())
    }

    /// Inserts this object into `store` unless it already lives there.
    ///
    /// Every reachable link target is checked before the first insert, so a
    /// foreign or discarded target leaves the whole graph standalone.
    pub(crate) fn attach(&self, store: &Arc<dyn RowStore>) -> AccessorResult<RowId> {
        self.check_attach(store, &mut HashSet::new())?;
        self.insert_into(store)
    }

    fn check_attach(
        &self,
        store: &Arc<dyn RowStore>,
        seen: &mut HashSet<*const RwLock<Backing>>,
    ) -> AccessorResult<()> {
        if !seen.insert(Arc::as_ptr(&self.backing)) {
            return Ok(());
        }

        let values = match &*self.read_backing() {
            Backing::Persisted(row) => return self.check_persisted_in(row, store),
            Backing::Standalone(values) => values.clone(),
        };

        if let Some(existing) = store.table_schema(self.class_name())? {
            if existing != self.schema {
                return Err(SchemaError::schema_immutable(self.class_name()).into());
            }
        }
        for value in values {
            if let Value::Object(Some(target)) = value {
                target.check_attach(store, seen)?;
            }
        }
        Ok(())
    }

    fn check_persisted_in(&self, row: &RowRef, store: &Arc<dyn RowStore>) -> AccessorResult<()> {
        if row.store_id() != store.store_id() {
            return Err(TxError::ForeignObject {
                class_name: self.class_name().to_string(),
            }
            .into());
        }
        if !row.is_valid() {
            return Err(TxError::Invalidated.into());
        }
        Ok(())
    }

    /// The row is inserted with null links and the backing flipped before
    /// targets are visited, so cycles resolve to the rows already inserted.
    /// On failure the backing goes back to standalone.
    fn insert_into(&self, store: &Arc<dyn RowStore>) -> AccessorResult<RowId> {
        let mut backing = self.write_backing();
        let values = match &*backing {
            Backing::Persisted(row) => {
                self.check_persisted_in(row, store)?;
                return Ok(row.row());
            }
            Backing::Standalone(values) => values.clone(),
        };

        let canonical = values
            .iter()
            .map(|v| to_canonical(v).unwrap_or(CanonicalValue::Link(None)))
            .collect();
        let row = store.insert_row(&self.schema, canonical)?;
        *backing = Backing::Persisted(RowRef::new(store, self.class_name(), row));
        drop(backing);

        if let Err(err) = self.insert_links(store, row, &values) {
            *self.write_backing() = Backing::Standalone(values);
            return Err(err);
        }
        Ok(row)
    }

    fn insert_links(&self, store: &Arc<dyn RowStore>, row: RowId, values: &[Value]) -> AccessorResult<()> {
        for (descriptor, value) in self.schema.properties().iter().zip(values) {
            if let Value::Object(Some(target)) = value {
                let target_row = target.insert_into(store)?;
                store.write_slot(
                    self.class_name(),
                    row,
                    descriptor.slot,
                    CanonicalValue::Link(Some(target_row.index)),
                )?;
            }
        }
        Ok(())
    }

    fn read_row(&self, descriptor: &PropertyDescriptor, row: &RowRef) -> AccessorResult<Value> {
        let store = row.store()?;
        match store.read_slot(self.class_name(), row.row(), descriptor.slot)? {
            CanonicalValue::Link(None) => Ok(Value::Object(None)),
            CanonicalValue::Link(Some(index)) => {
                let class_name = descriptor.object_class.as_deref().unwrap_or_default();
                let schema = match store.table_schema(class_name)? {
                    Some(schema) => schema,
                    None => SchemaRegistry::global().require(class_name)?,
                };
                let target_row = store.row_id(class_name, index)?.ok_or_else(|| TxError::UnknownRow {
                    class_name: class_name.to_string(),
                    row: index,
                })?;
                let target = Object::persisted(schema, RowRef::new(&store, class_name, target_row));
                Ok(Value::Object(Some(target)))
            }
            canonical => from_canonical(canonical).ok_or_else(|| {
                AccessorError::type_mismatch(&descriptor.name, descriptor.property_type.type_name(), "object")
            }),
        }
    }

    fn write_row(
        &self,
        store: &Arc<dyn RowStore>,
        descriptor: &PropertyDescriptor,
        row: &RowRef,
        value: Value,
    ) -> AccessorResult<()> {
        let canonical = match value {
            Value::Object(None) => CanonicalValue::Link(None),
            Value::Object(Some(target)) => CanonicalValue::Link(Some(target.attach(store)?.index)),
            other => to_canonical(&other).ok_or_else(|| {
                AccessorError::type_mismatch(&descriptor.name, descriptor.property_type.type_name(), other.kind())
            })?,
        };
        store.write_slot(self.class_name(), row.row(), descriptor.slot, canonical)
    }

    fn read_backing(&self) -> RwLockReadGuard<'_, Backing> {
        self.backing.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_backing(&self) -> RwLockWriteGuard<'_, Backing> {
        self.backing.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn coerce_all(schema: &ObjectSchema, values: Vec<Value>) -> AccessorResult<Vec<Value>> {
    if values.len() != schema.property_count() {
        return Err(AccessorError::ArityMismatch {
            class_name: schema.class_name().to_string(),
            expected: schema.property_count(),
            actual: values.len(),
        });
    }

    schema
        .properties()
        .iter()
        .zip(values)
        .map(|(descriptor, value)| coerce(descriptor, value))
        .collect()
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Object");
        debug.field("class_name", &self.class_name());
        match self.row_ref() {
            Some(row) => debug.field("row", &row),
            None => debug.field("row", &"standalone"),
        };
        debug.finish()
    }
}

/// Optional link to a typed object.
impl<L: ObjectType> Property for Option<L> {
    const PROPERTY_TYPE: PropertyType = PropertyType::Object;
    const TYPE_NAME: &'static str = "object";

    fn object_class() -> Option<&'static str> {
        Some(L::CLASS_NAME)
    }

    fn register_class(registry: &SchemaRegistry) -> SchemaResult<()> {
        registry.resolve::<L>().map(|_| ())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(None) => Ok(None),
            Value::Object(Some(object)) if object.class_name() == L::CLASS_NAME => {
                Ok(Some(L::from_object(object)))
            }
            other => Err(other),
        }
    }

    fn into_value(self) -> Value {
        Value::Object(self.map(L::into_object))
    }
}
