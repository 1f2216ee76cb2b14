//! In-process row store
//!
//! Copy-on-write snapshots:
//! - `committed` is the latest committed snapshot
//! - `begin_write` clones it into `pending`; all mutation goes to `pending`
//! - `commit_write` replaces `committed` with `pending` in one step
//! - `cancel_write` drops `pending`
//!
//! Rows of a class keep insertion order. Every inserted row also draws a
//! serial from a counter that lives outside the snapshots, so a row discarded
//! by `cancel_write` never shares its `RowId` with a later row at the same
//! index.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::commit::{CommitAuthority, CommitId};
use super::errors::{TxError, TxResult};
use super::row::{RowId, RowStore};
use crate::config::DatabaseConfig;
use crate::error::{AccessorError, AccessorResult};
use crate::observability::{Event, Logger};
use crate::schema::{ObjectSchema, SchemaError};
use crate::value::CanonicalValue;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
struct StoredRow {
    serial: u64,
    values: Vec<CanonicalValue>,
}

#[derive(Debug, Clone)]
struct Table {
    schema: Arc<ObjectSchema>,
    rows: Vec<StoredRow>,
}

impl Table {
    fn row_id(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|r| RowId::new(index, r.serial))
    }
}

#[derive(Debug, Clone, Default)]
struct Snapshot {
    tables: HashMap<String, Table>,
}

impl Snapshot {
    fn row(&self, class_name: &str, row: RowId) -> Option<&StoredRow> {
        self.tables
            .get(class_name)
            .and_then(|t| t.rows.get(row.index))
            .filter(|r| r.serial == row.serial)
    }

    fn row_mut(&mut self, class_name: &str, row: RowId) -> Option<&mut StoredRow> {
        self.tables
            .get_mut(class_name)
            .and_then(|t| t.rows.get_mut(row.index))
            .filter(|r| r.serial == row.serial)
    }

    fn row_count(&self, class_name: &str) -> usize {
        self.tables.get(class_name).map_or(0, |t| t.rows.len())
    }

    /// Link targets must name an existing row of the declared class.
    fn check_link(&self, schema: &ObjectSchema, slot: usize, value: &CanonicalValue) -> TxResult<()> {
        if let CanonicalValue::Link(Some(row)) = value {
            let target = schema
                .properties()
                .get(slot)
                .and_then(|p| p.object_class.as_deref())
                .unwrap_or_default();
            if *row >= self.row_count(target) {
                return Err(TxError::UnknownRow {
                    class_name: target.to_string(),
                    row: *row,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StoreState {
    committed: Snapshot,
    pending: Option<Snapshot>,
    authority: CommitAuthority,
    next_serial: u64,
}

impl StoreState {
    /// The open write transaction sees its own changes.
    fn visible(&self) -> &Snapshot {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    /// A serial this store handed out belongs to a row that was discarded.
    fn missing_row(&self, class_name: &str, row: RowId) -> AccessorError {
        if row.serial < self.next_serial {
            TxError::Invalidated.into()
        } else {
            TxError::UnknownRow {
                class_name: class_name.to_string(),
                row: row.index,
            }
            .into()
        }
    }
}

/// Row store held entirely in memory.
#[derive(Debug)]
pub struct MemoryRowStore {
    id: u64,
    config: DatabaseConfig,
    state: RwLock<StoreState>,
}

impl MemoryRowStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            config,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Highest committed identity, `None` before the first commit.
    pub fn last_commit_id(&self) -> TxResult<Option<CommitId>> {
        Ok(self.read_state()?.authority.highest_commit_id())
    }

    /// Logs `event` if this store's configuration allows it.
    pub(crate) fn emit(&self, event: Event, fields: &[(&str, &str)]) {
        if self.config.log_events && event.severity() >= self.config.min_severity() {
            let mut all = Vec::with_capacity(fields.len() + 1);
            all.push(("database", self.config.identifier.as_str()));
            all.extend_from_slice(fields);
            Logger::emit(event.severity(), event.as_str(), &all);
        }
    }

    fn read_state(&self) -> TxResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| TxError::Poisoned)
    }

    fn write_state(&self) -> TxResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| TxError::Poisoned)
    }
}

impl RowStore for MemoryRowStore {
    fn store_id(&self) -> u64 {
        self.id
    }

    fn begin_write(&self) -> TxResult<()> {
        if self.config.read_only {
            return Err(TxError::ReadOnly(self.config.identifier.clone()));
        }

        let mut state = self.write_state()?;
        if state.pending.is_some() {
            return Err(TxError::WriteInProgress);
        }
        state.pending = Some(state.committed.clone());
        drop(state);

        self.emit(Event::TxBegin, &[]);
        Ok(())
    }

    fn commit_write(&self) -> TxResult<CommitId> {
        let mut state = self.write_state()?;
        let pending = state.pending.take().ok_or(TxError::NoWriteTransaction)?;

        let commit_id = state.authority.next_commit_id();
        state.authority.mark_committed(commit_id)?;
        let table_count = pending.tables.len();
        state.committed = pending;
        drop(state);

        self.emit(
            Event::TxCommit,
            &[
                ("commit_id", commit_id.value().to_string().as_str()),
                ("tables", table_count.to_string().as_str()),
            ],
        );
        Ok(commit_id)
    }

    fn cancel_write(&self) -> TxResult<()> {
        let mut state = self.write_state()?;
        state.pending.take().ok_or(TxError::NoWriteTransaction)?;
        drop(state);

        self.emit(Event::TxCancel, &[]);
        Ok(())
    }

    fn is_in_write_transaction(&self) -> TxResult<bool> {
        Ok(self.read_state()?.pending.is_some())
    }

    fn insert_row(&self, schema: &Arc<ObjectSchema>, values: Vec<CanonicalValue>) -> AccessorResult<RowId> {
        if values.len() != schema.property_count() {
            return Err(AccessorError::ArityMismatch {
                class_name: schema.class_name().to_string(),
                expected: schema.property_count(),
                actual: values.len(),
            });
        }

        let mut state = self.write_state()?;
        let serial = state.next_serial;
        let pending = state.pending.as_mut().ok_or(AccessorError::NotInTransaction)?;

        for (slot, value) in values.iter().enumerate() {
            pending.check_link(schema, slot, value)?;
        }

        let table = pending
            .tables
            .entry(schema.class_name().to_string())
            .or_insert_with(|| Table {
                schema: Arc::clone(schema),
                rows: Vec::new(),
            });
        if table.schema != *schema {
            return Err(SchemaError::schema_immutable(schema.class_name()).into());
        }
        table.rows.push(StoredRow { serial, values });
        let row = RowId::new(table.rows.len() - 1, serial);
        state.next_serial += 1;
        drop(state);

        self.emit(
            Event::RowInserted,
            &[
                ("class", schema.class_name()),
                ("row", row.to_string().as_str()),
            ],
        );
        Ok(row)
    }

    fn read_slot(&self, class_name: &str, row: RowId, slot: usize) -> AccessorResult<CanonicalValue> {
        let state = self.read_state()?;
        let values = match state.visible().row(class_name, row) {
            Some(stored) => &stored.values,
            None => return Err(state.missing_row(class_name, row)),
        };
        values
            .get(slot)
            .cloned()
            .ok_or_else(|| AccessorError::IndexOutOfRange {
                class_name: class_name.to_string(),
                index: slot,
                count: values.len(),
            })
    }

    fn write_slot(
        &self,
        class_name: &str,
        row: RowId,
        slot: usize,
        value: CanonicalValue,
    ) -> AccessorResult<()> {
        let mut state = self.write_state()?;
        let missing = state.missing_row(class_name, row);
        let pending = state.pending.as_mut().ok_or(AccessorError::NotInTransaction)?;

        let schema = match (pending.row(class_name, row), pending.tables.get(class_name)) {
            (Some(_), Some(table)) => Arc::clone(&table.schema),
            _ => return Err(missing),
        };
        pending.check_link(&schema, slot, &value)?;

        let values = match pending.row_mut(class_name, row) {
            Some(stored) => &mut stored.values,
            None => return Err(missing),
        };
        let count = values.len();
        let cell = values
            .get_mut(slot)
            .ok_or_else(|| AccessorError::IndexOutOfRange {
                class_name: class_name.to_string(),
                index: slot,
                count,
            })?;
        *cell = value;
        Ok(())
    }

    fn row_count(&self, class_name: &str) -> TxResult<usize> {
        Ok(self.read_state()?.visible().row_count(class_name))
    }

    fn row_id(&self, class_name: &str, index: usize) -> TxResult<Option<RowId>> {
        Ok(self
            .read_state()?
            .visible()
            .tables
            .get(class_name)
            .and_then(|t| t.row_id(index)))
    }

    fn table_schema(&self, class_name: &str) -> TxResult<Option<Arc<ObjectSchema>>> {
        Ok(self
            .read_state()?
            .visible()
            .tables
            .get(class_name)
            .map(|t| Arc::clone(&t.schema)))
    }
}
