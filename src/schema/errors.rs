//! Schema error types
//!
//! Error codes:
//! - AERO_UNKNOWN_CLASS
//! - AERO_DUPLICATE_PROPERTY
//! - AERO_SCHEMA_IMMUTABLE
//! - AERO_MALFORMED_SCHEMA
//! - AERO_MISSING_LINK_TARGET

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Class name not registered
    AeroUnknownClass,
    /// Two properties share a name
    AeroDuplicateProperty,
    /// Different schema registered under an existing class name
    AeroSchemaImmutable,
    /// Schema definition could not be read or is structurally invalid
    AeroMalformedSchema,
    /// Link property without a target class
    AeroMissingLinkTarget,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::AeroUnknownClass => "AERO_UNKNOWN_CLASS",
            SchemaErrorCode::AeroDuplicateProperty => "AERO_DUPLICATE_PROPERTY",
            SchemaErrorCode::AeroSchemaImmutable => "AERO_SCHEMA_IMMUTABLE",
            SchemaErrorCode::AeroMalformedSchema => "AERO_MALFORMED_SCHEMA",
            SchemaErrorCode::AeroMissingLinkTarget => "AERO_MISSING_LINK_TARGET",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    class_name: Option<String>,
}

impl SchemaError {
    /// Create an unknown class error
    pub fn unknown_class(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            code: SchemaErrorCode::AeroUnknownClass,
            message: format!("Class '{}' is not registered", class_name),
            class_name: Some(class_name),
        }
    }

    /// Create a duplicate property error
    pub fn duplicate_property(class_name: impl Into<String>, property: &str) -> Self {
        let class_name = class_name.into();
        Self {
            code: SchemaErrorCode::AeroDuplicateProperty,
            message: format!(
                "Property '{}' declared more than once on class '{}'",
                property, class_name
            ),
            class_name: Some(class_name),
        }
    }

    /// Create a schema immutable error
    pub fn schema_immutable(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            code: SchemaErrorCode::AeroSchemaImmutable,
            message: format!(
                "Class '{}' is already registered with a different schema",
                class_name
            ),
            class_name: Some(class_name),
        }
    }

    /// Create a malformed schema error
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AeroMalformedSchema,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            class_name: None,
        }
    }

    /// Create a missing link target error
    pub fn missing_link_target(class_name: impl Into<String>, property: &str) -> Self {
        let class_name = class_name.into();
        Self {
            code: SchemaErrorCode::AeroMissingLinkTarget,
            message: format!(
                "Link property '{}' on class '{}' has no target class",
                property, class_name
            ),
            class_name: Some(class_name),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the class name if applicable
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
