//! Accessor error types
//!
//! Every failure of the accessor layer is reported to the immediate caller.
//! A failed `set` never changes the targeted slot.
//!
//! Error codes:
//! - AERO_TYPE_MISMATCH
//! - AERO_UNKNOWN_PROPERTY
//! - AERO_INDEX_OUT_OF_RANGE
//! - AERO_NOT_IN_TRANSACTION
//! - AERO_ARITY_MISMATCH
//! - schema, transaction and config codes are forwarded from their modules

use thiserror::Error;

use crate::config::ConfigError;
use crate::schema::SchemaError;
use crate::store::TxError;

/// Result type for accessor operations
pub type AccessorResult<T> = Result<T, AccessorError>;

/// Accessor errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessorError {
    /// Value requested or supplied as a type the property cannot hold
    #[error("Type mismatch on property '{property}': expected {expected}, got {actual}")]
    TypeMismatch {
        property: String,
        expected: String,
        actual: String,
    },

    /// Property name not declared by the schema
    #[error("Unknown property '{name}' on class '{class_name}'")]
    UnknownProperty { class_name: String, name: String },

    /// Slot index outside `[0, count)`
    #[error("Property index {index} out of range for class '{class_name}' ({count} properties)")]
    IndexOutOfRange {
        class_name: String,
        index: usize,
        count: usize,
    },

    /// Persisted mutation without an active write transaction
    #[error("Cannot modify a persisted object outside of a write transaction")]
    NotInTransaction,

    /// Positional initializer length differs from the property count
    #[error("Class '{class_name}' expects {expected} initializer values, got {actual}")]
    ArityMismatch {
        class_name: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Tx(#[from] TxError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AccessorError {
    /// Create a type mismatch error
    pub fn type_mismatch(
        property: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        AccessorError::TypeMismatch {
            property: property.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AccessorError::TypeMismatch { .. } => "AERO_TYPE_MISMATCH",
            AccessorError::UnknownProperty { .. } => "AERO_UNKNOWN_PROPERTY",
            AccessorError::IndexOutOfRange { .. } => "AERO_INDEX_OUT_OF_RANGE",
            AccessorError::NotInTransaction => "AERO_NOT_IN_TRANSACTION",
            AccessorError::ArityMismatch { .. } => "AERO_ARITY_MISMATCH",
            AccessorError::Schema(e) => e.code().code(),
            AccessorError::Tx(e) => e.code(),
            AccessorError::Config(_) => "AERO_CONFIG_INVALID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AccessorError::type_mismatch("intCol", "int64", "string").code(),
            "AERO_TYPE_MISMATCH"
        );
        assert_eq!(AccessorError::NotInTransaction.code(), "AERO_NOT_IN_TRANSACTION");
        assert_eq!(
            AccessorError::Tx(TxError::WriteInProgress).code(),
            "AERO_TX_WRITE_IN_PROGRESS"
        );
        assert_eq!(
            AccessorError::Schema(SchemaError::unknown_class("Ghost")).code(),
            "AERO_UNKNOWN_CLASS"
        );
    }

    #[test]
    fn test_display_names_property() {
        let err = AccessorError::UnknownProperty {
            class_name: "Dog".into(),
            name: "wings".into(),
        };
        let display = err.to_string();
        assert!(display.contains("wings"));
        assert!(display.contains("Dog"));
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = AccessorError::IndexOutOfRange {
            class_name: "Dog".into(),
            index: 7,
            count: 3,
        };
        assert!(err.to_string().contains('7'));
        assert_eq!(err.code(), "AERO_INDEX_OUT_OF_RANGE");
    }
}
