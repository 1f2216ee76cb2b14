//! Row store and transaction context
//!
//! - `RowStore` - the storage contract consumed by object proxies
//! - `MemoryRowStore` - copy-on-write in-process implementation
//! - `Database` - cloneable handle with transactions, creation and queries
//! - `Results` - live, ordered view over one class
//!
//! Single writer per database. Reads inside the write transaction see its
//! own changes; all other reads see the latest committed snapshot.

mod commit;
mod database;
mod errors;
mod memory;
mod results;
mod row;

pub use commit::{CommitAuthority, CommitId};
pub use database::Database;
pub use errors::{TxError, TxResult};
pub use memory::MemoryRowStore;
pub use results::Results;
pub use row::{RowId, RowRef, RowStore};
