//! Observable events
//!
//! Events are explicit and typed; each carries its default severity.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    // Configuration
    /// Database configuration accepted
    DatabaseOpened,
    /// Schema definitions read from disk
    SchemasLoaded,
    /// A class schema entered the registry
    SchemaRegistered,

    // Transactions
    /// Write transaction started
    TxBegin,
    /// Write transaction committed
    TxCommit,
    /// Write transaction discarded
    TxCancel,
    /// Write transaction closure failed and was discarded
    TxAborted,
    /// Discarding a failed write transaction itself failed
    TxCancelFailed,

    // Objects
    /// Row inserted into the store
    RowInserted,
    /// Persisted object created from positional values
    ObjectCreated,
    /// Standalone object converted into a persisted one
    ObjectAdded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DatabaseOpened => "DATABASE_OPENED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaRegistered => "SCHEMA_REGISTERED",
            Event::TxBegin => "TX_BEGIN",
            Event::TxCommit => "TX_COMMIT",
            Event::TxCancel => "TX_CANCEL",
            Event::TxAborted => "TX_ABORTED",
            Event::TxCancelFailed => "TX_CANCEL_FAILED",
            Event::RowInserted => "ROW_INSERTED",
            Event::ObjectCreated => "OBJECT_CREATED",
            Event::ObjectAdded => "OBJECT_ADDED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaRegistered | Event::TxBegin | Event::RowInserted => Severity::Trace,
            Event::TxAborted => Severity::Warn,
            Event::TxCancelFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::DatabaseOpened,
            Event::SchemasLoaded,
            Event::SchemaRegistered,
            Event::TxBegin,
            Event::TxCommit,
            Event::TxCancel,
            Event::TxAborted,
            Event::TxCancelFailed,
            Event::RowInserted,
            Event::ObjectCreated,
            Event::ObjectAdded,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::TxBegin.severity(), Severity::Trace);
        assert_eq!(Event::TxCommit.severity(), Severity::Info);
        assert_eq!(Event::TxAborted.severity(), Severity::Warn);
        assert_eq!(Event::TxCancelFailed.severity(), Severity::Error);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::TxCommit), "TX_COMMIT");
    }
}
