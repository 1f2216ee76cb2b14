//! # Database Facade
//!
//! High-level handle over an in-memory row store. Cheap to clone; every clone
//! addresses the same store. Persisted objects hold only weak references, so
//! dropping the last handle invalidates them.

use std::sync::Arc;

use super::commit::CommitId;
use super::errors::TxResult;
use super::memory::MemoryRowStore;
use super::results::Results;
use super::row::RowStore;
use crate::config::DatabaseConfig;
use crate::error::{AccessorError, AccessorResult};
use crate::object::{Object, ObjectType};
use crate::observability::Event;
use crate::schema::{ObjectSchema, SchemaRegistry};
use crate::value::Value;

#[derive(Clone)]
pub struct Database {
    store: Arc<MemoryRowStore>,
}

impl Database {
    /// Opens an empty database with the given configuration.
    pub fn open(config: DatabaseConfig) -> AccessorResult<Self> {
        config.validate()?;

        Ok(Self::opened(Arc::new(MemoryRowStore::new(config))))
    }

    fn opened(store: Arc<MemoryRowStore>) -> Self {
        store.emit(
            Event::DatabaseOpened,
            &[("read_only", if store.config().read_only { "true" } else { "false" })],
        );
        Self { store }
    }

    /// Opens an empty database with the default configuration.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryRowStore::new(DatabaseConfig::default()));
        Self::opened(store)
    }

    pub fn config(&self) -> &DatabaseConfig {
        self.store.config()
    }

    fn row_store(&self) -> Arc<dyn RowStore> {
        self.store.clone()
    }

    pub fn begin_write(&self) -> TxResult<()> {
        self.store.begin_write()
    }

    pub fn commit_write(&self) -> TxResult<CommitId> {
        self.store.commit_write()
    }

    pub fn cancel_write(&self) -> TxResult<()> {
        self.store.cancel_write()
    }

    pub fn is_in_write_transaction(&self) -> TxResult<bool> {
        self.store.is_in_write_transaction()
    }

    /// Runs `f` inside a write transaction.
    ///
    /// Commits when `f` returns `Ok`; on `Err` every change made by `f` is
    /// discarded and the error returned. Objects created by `f` are invalid
    /// afterwards.
    pub fn write<R, F>(&self, f: F) -> AccessorResult<R>
    where
        F: FnOnce(&Database) -> AccessorResult<R>,
    {
        self.begin_write()?;

        match f(self) {
            Ok(result) => {
                self.commit_write()?;
                Ok(result)
            }
            Err(err) => {
                if let Err(cancel_err) = self.cancel_write() {
                    self.store.emit(
                        Event::TxCancelFailed,
                        &[("code", err.code()), ("cancel_code", cancel_err.code())],
                    );
                }
                self.store.emit(Event::TxAborted, &[("code", err.code())]);
                Err(err)
            }
        }
    }

    /// Last committed commit identity.
    pub fn commit_id(&self) -> TxResult<Option<CommitId>> {
        self.store.last_commit_id()
    }

    /// Creates a persisted object of `T` from values in property order.
    pub fn create<T: ObjectType>(&self, values: Vec<Value>) -> AccessorResult<T> {
        let schema = SchemaRegistry::global().resolve::<T>()?;
        let object = self.create_with_schema(schema, values)?;
        Ok(T::from_object(object))
    }

    /// Creates a persisted object of a registered class.
    pub fn create_dynamic(&self, class_name: &str, values: Vec<Value>) -> AccessorResult<Object> {
        let schema = SchemaRegistry::global().require(class_name)?;
        self.create_with_schema(schema, values)
    }

    fn create_with_schema(&self, schema: Arc<ObjectSchema>, values: Vec<Value>) -> AccessorResult<Object> {
        if !self.is_in_write_transaction()? {
            return Err(AccessorError::NotInTransaction);
        }

        let object = Object::from_values(schema, values)?;
        let row = object.attach(&self.row_store())?;

        self.store.emit(
            Event::ObjectCreated,
            &[
                ("class", object.class_name()),
                ("row", row.to_string().as_str()),
            ],
        );
        Ok(object)
    }

    /// Persists a standalone object in place.
    ///
    /// The given handle, and every clone of it, becomes persisted. Standalone
    /// link targets are added too; objects already in this database are
    /// reused.
    pub fn add(&self, object: &Object) -> AccessorResult<()> {
        if !self.is_in_write_transaction()? {
            return Err(AccessorError::NotInTransaction);
        }

        let row = object.attach(&self.row_store())?;

        self.store.emit(
            Event::ObjectAdded,
            &[
                ("class", object.class_name()),
                ("row", row.to_string().as_str()),
            ],
        );
        Ok(())
    }

    /// All objects of `T`, in insertion order.
    pub fn objects<T: ObjectType>(&self) -> AccessorResult<Results<T>> {
        let schema = SchemaRegistry::global().resolve::<T>()?;
        Ok(Results::new(&self.row_store(), schema))
    }

    /// All objects of a registered class, in insertion order.
    pub fn dynamic_objects(&self, class_name: &str) -> AccessorResult<Results<Object>> {
        let schema = SchemaRegistry::global().require(class_name)?;
        Ok(Results::new(&self.row_store(), schema))
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("identifier", &self.config().identifier)
            .field("store_id", &self.store.store_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PropertyType;
    use crate::store::TxError;

    fn register_note() -> Arc<ObjectSchema> {
        SchemaRegistry::global()
            .register(
                ObjectSchema::builder("DatabaseNote")
                    .primitive("text", PropertyType::String)
                    .primitive("pinned", PropertyType::Bool)
                    .build()
                    .unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn test_write_commits_on_ok() {
        register_note();
        let db = Database::in_memory();

        let note = db
            .write(|db| db.create_dynamic("DatabaseNote", vec!["hi".into(), true.into()]))
            .unwrap();

        assert!(note.is_persisted());
        assert_eq!(note.get("text").unwrap(), Value::from("hi"));
        assert_eq!(db.commit_id().unwrap(), Some(CommitId::new(1)));
        assert!(!db.is_in_write_transaction().unwrap());
    }

    #[test]
    fn test_write_cancels_on_err() {
        register_note();
        let db = Database::in_memory();

        let err = db
            .write(|db| {
                db.create_dynamic("DatabaseNote", vec!["kept?".into(), false.into()])?;
                db.create_dynamic("DatabaseNote", vec!["short".into()])
            })
            .unwrap_err();

        assert_eq!(err.code(), "AERO_ARITY_MISMATCH");
        assert_eq!(db.dynamic_objects("DatabaseNote").unwrap().len(), 0);
        assert!(db.commit_id().unwrap().is_none());
    }

    #[test]
    fn test_write_keeps_closure_error_when_cancel_fails() {
        register_note();
        let db = Database::in_memory();

        let err = db
            .write(|db| {
                db.cancel_write()?;
                db.create_dynamic("DatabaseNote", vec!["late".into(), false.into()])
            })
            .unwrap_err();

        assert_eq!(err, AccessorError::NotInTransaction);
        assert!(!db.is_in_write_transaction().unwrap());
    }

    #[test]
    fn test_write_invalidates_created_objects_on_err() {
        register_note();
        let db = Database::in_memory();
        let mut created = None;

        db.write(|db| {
            created = Some(db.create_dynamic("DatabaseNote", vec!["gone".into(), false.into()])?);
            Err::<(), _>(AccessorError::NotInTransaction)
        })
        .unwrap_err();

        let note = created.unwrap();
        assert!(note.is_persisted());
        assert!(!note.is_valid());
        assert_eq!(
            note.get("text").unwrap_err(),
            AccessorError::Tx(TxError::Invalidated)
        );
    }

    #[test]
    fn test_in_memory_matches_default_open() {
        let db = Database::in_memory();
        let opened = Database::open(DatabaseConfig::default()).unwrap();
        assert_eq!(db.config(), opened.config());
        assert_ne!(db.store.store_id(), opened.store.store_id());
    }

    #[test]
    fn test_create_outside_transaction() {
        register_note();
        let db = Database::in_memory();
        let err = db
            .create_dynamic("DatabaseNote", vec!["x".into(), false.into()])
            .unwrap_err();
        assert_eq!(err, AccessorError::NotInTransaction);
    }

    #[test]
    fn test_create_unknown_class() {
        let db = Database::in_memory();
        db.begin_write().unwrap();
        let err = db.create_dynamic("DatabaseGhost", vec![]).unwrap_err();
        assert_eq!(err.code(), "AERO_UNKNOWN_CLASS");
    }

    #[test]
    fn test_add_keeps_identity() {
        let schema = register_note();
        let db = Database::in_memory();
        let note = Object::new(schema);
        note.set("text", "draft").unwrap();
        let alias = note.clone();

        db.write(|db| db.add(&note)).unwrap();

        assert!(note.is_persisted());
        assert!(alias.is_persisted());
        assert_eq!(alias.get("text").unwrap(), Value::from("draft"));

        let stored = db.dynamic_objects("DatabaseNote").unwrap().first().unwrap();
        assert!(stored.same_object(&note));
    }

    #[test]
    fn test_add_twice_reuses_row() {
        let schema = register_note();
        let db = Database::in_memory();
        let note = Object::new(schema);

        db.write(|db| {
            db.add(&note)?;
            db.add(&note)
        })
        .unwrap();
        assert_eq!(db.dynamic_objects("DatabaseNote").unwrap().len(), 1);
    }

    #[test]
    fn test_add_to_other_database() {
        let schema = register_note();
        let first = Database::in_memory();
        let second = Database::in_memory();
        let note = Object::new(schema);

        first.write(|db| db.add(&note)).unwrap();
        let err = second.write(|db| db.add(&note)).unwrap_err();
        assert_eq!(
            err,
            AccessorError::Tx(TxError::ForeignObject {
                class_name: "DatabaseNote".into()
            })
        );
    }

    #[test]
    fn test_read_only_database() {
        let config = DatabaseConfig {
            read_only: true,
            ..DatabaseConfig::named("archive")
        };
        let db = Database::open(config).unwrap();
        let err = db.write(|_| Ok(())).unwrap_err();
        assert_eq!(err.code(), "AERO_TX_READ_ONLY");
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let config = DatabaseConfig {
            log_level: "loud".into(),
            ..DatabaseConfig::default()
        };
        let err = Database::open(config).unwrap_err();
        assert_eq!(err.code(), "AERO_CONFIG_INVALID");
    }

    #[test]
    fn test_dropped_database_invalidates_objects() {
        register_note();
        let db = Database::in_memory();
        let note = db
            .write(|db| db.create_dynamic("DatabaseNote", vec!["bye".into(), false.into()]))
            .unwrap();
        let results = db.dynamic_objects("DatabaseNote").unwrap();

        drop(db);

        assert!(!note.is_valid());
        assert_eq!(
            note.get("text").unwrap_err(),
            AccessorError::Tx(TxError::Invalidated)
        );
        assert!(!results.is_valid());
        assert!(results.is_empty());
    }
}
