//! Row store contract and row references
//!
//! `RowStore` is the interface the object layer consumes: typed slot reads
//! and writes plus begin/commit/cancel. The object layer never owns a store;
//! it holds `RowRef`s, which become invalid once the store is dropped or the
//! row is discarded by a cancelled write transaction.

use std::fmt;
use std::sync::{Arc, Weak};

use super::commit::CommitId;
use super::errors::{TxError, TxResult};
use crate::error::AccessorResult;
use crate::schema::ObjectSchema;
use crate::value::CanonicalValue;

/// Transactional columnar row store.
///
/// At most one write transaction is active at a time. Reads see the open
/// write transaction's own changes, otherwise the latest committed snapshot.
pub trait RowStore: Send + Sync {
    /// Identity used to tell stores apart
    fn store_id(&self) -> u64;

    fn begin_write(&self) -> TxResult<()>;

    /// Applies every pending mutation atomically.
    fn commit_write(&self) -> TxResult<CommitId>;

    /// Discards every pending mutation.
    fn cancel_write(&self) -> TxResult<()>;

    fn is_in_write_transaction(&self) -> TxResult<bool>;

    /// Appends a row for `schema`; `values` are in slot order.
    ///
    /// Fails with `NotInTransaction` outside a write transaction.
    fn insert_row(&self, schema: &Arc<ObjectSchema>, values: Vec<CanonicalValue>) -> AccessorResult<RowId>;

    /// Fails with `Invalidated` if `row` was discarded.
    fn read_slot(&self, class_name: &str, row: RowId, slot: usize) -> AccessorResult<CanonicalValue>;

    /// Fails with `NotInTransaction` outside a write transaction, leaving the
    /// slot unchanged.
    fn write_slot(
        &self,
        class_name: &str,
        row: RowId,
        slot: usize,
        value: CanonicalValue,
    ) -> AccessorResult<()>;

    /// Visible rows of `class_name`; 0 for classes without rows.
    fn row_count(&self, class_name: &str) -> TxResult<usize>;

    /// Identity of the visible row at `index`.
    fn row_id(&self, class_name: &str, index: usize) -> TxResult<Option<RowId>>;

    /// Schema of the table holding `class_name`, if it has one.
    fn table_schema(&self, class_name: &str) -> TxResult<Option<Arc<ObjectSchema>>>;
}

/// Position of a row in its class table plus a serial unique within the
/// store. Serials are never reused, even when the row is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId {
    pub index: usize,
    pub serial: u64,
}

impl RowId {
    pub fn new(index: usize, serial: u64) -> Self {
        Self { index, serial }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

/// Non-owning handle to one row.
#[derive(Clone)]
pub struct RowRef {
    store: Weak<dyn RowStore>,
    store_id: u64,
    class_name: String,
    row: RowId,
}

impl RowRef {
    pub fn new(store: &Arc<dyn RowStore>, class_name: &str, row: RowId) -> Self {
        Self {
            store: Arc::downgrade(store),
            store_id: store.store_id(),
            class_name: class_name.to_string(),
            row,
        }
    }

    /// The backing store, or `Invalidated` once it is gone.
    pub fn store(&self) -> TxResult<Arc<dyn RowStore>> {
        self.store.upgrade().ok_or(TxError::Invalidated)
    }

    /// The store is alive and still holds this exact row.
    pub fn is_valid(&self) -> bool {
        self.store.upgrade().is_some_and(|store| {
            matches!(store.row_id(&self.class_name, self.row.index), Ok(Some(id)) if id == self.row)
        })
    }

    pub fn store_id(&self) -> u64 {
        self.store_id
    }

    pub fn row(&self) -> RowId {
        self.row
    }

    /// Same row of the same store
    pub fn same_row(&self, other: &RowRef) -> bool {
        self.store_id == other.store_id && self.row.serial == other.row.serial
    }
}

impl fmt::Debug for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowRef")
            .field("store_id", &self.store_id)
            .field("class_name", &self.class_name)
            .field("row", &self.row.index)
            .field("valid", &self.is_valid())
            .finish()
    }
}
