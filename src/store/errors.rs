//! # Transaction Errors
//!
//! Failures surfaced by the row store and transaction context.

use thiserror::Error;

/// Result type for row store operations
pub type TxResult<T> = Result<T, TxError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// A write transaction is already active
    #[error("A write transaction is already in progress")]
    WriteInProgress,

    /// Commit or cancel without an active write transaction
    #[error("No write transaction is in progress")]
    NoWriteTransaction,

    /// Write transaction requested on a read-only database
    #[error("Database '{0}' is read-only")]
    ReadOnly(String),

    /// The store backing a persisted object no longer exists
    #[error("Object is no longer valid: its database has been closed")]
    Invalidated,

    /// Linked object belongs to another database
    #[error("Object of class '{class_name}' belongs to a different database")]
    ForeignObject { class_name: String },

    /// Row reference does not exist in the visible snapshot
    #[error("Row {row} of class '{class_name}' does not exist")]
    UnknownRow { class_name: String, row: usize },

    /// Store state lock was poisoned by a panicking writer
    #[error("Database state is poisoned")]
    Poisoned,

    /// Commit identity assigned out of order
    #[error("Commit ordering violated: {0}")]
    CommitOrder(String),
}

impl TxError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TxError::WriteInProgress => "AERO_TX_WRITE_IN_PROGRESS",
            TxError::NoWriteTransaction => "AERO_TX_NO_WRITE_TRANSACTION",
            TxError::ReadOnly(_) => "AERO_TX_READ_ONLY",
            TxError::Invalidated => "AERO_TX_INVALIDATED",
            TxError::ForeignObject { .. } => "AERO_TX_FOREIGN_OBJECT",
            TxError::UnknownRow { .. } => "AERO_TX_UNKNOWN_ROW",
            TxError::Poisoned => "AERO_TX_POISONED",
            TxError::CommitOrder(_) => "AERO_TX_COMMIT_ORDER",
        }
    }
}
