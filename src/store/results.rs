//! Live query results
//!
//! A `Results` names a class in one database. Every access reads the current
//! row count, so rows inserted after the `Results` was created are visible.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use super::row::{RowRef, RowStore};
use crate::object::{FromObject, Object};
use crate::schema::ObjectSchema;

/// All objects of one class, in insertion order.
pub struct Results<T> {
    store: Weak<dyn RowStore>,
    schema: Arc<ObjectSchema>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromObject> Results<T> {
    pub(crate) fn new(store: &Arc<dyn RowStore>, schema: Arc<ObjectSchema>) -> Self {
        Self {
            store: Arc::downgrade(store),
            schema,
            _marker: PhantomData,
        }
    }

    pub fn class_name(&self) -> &str {
        self.schema.class_name()
    }

    /// False once the database is gone.
    pub fn is_valid(&self) -> bool {
        self.store.strong_count() > 0
    }

    /// Visible row count; 0 once the database is gone.
    pub fn len(&self) -> usize {
        self.store
            .upgrade()
            .and_then(|store| store.row_count(self.schema.class_name()).ok())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<T> {
        let store = self.store.upgrade()?;
        let class_name = self.schema.class_name();
        let row = store.row_id(class_name, index).ok()??;
        let object = Object::persisted(Arc::clone(&self.schema), RowRef::new(&store, class_name, row));
        Some(T::from_object(object))
    }

    pub fn first(&self) -> Option<T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<T> {
        self.len().checked_sub(1).and_then(|index| self.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}

impl<T> fmt::Debug for Results<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Results")
            .field("class_name", &self.schema.class_name())
            .field("valid", &(self.store.strong_count() > 0))
            .finish()
    }
}
