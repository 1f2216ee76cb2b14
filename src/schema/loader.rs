//! Schema loader for JSON schema definitions
//!
//! - One file per class: `<dir>/schema_<class>.json`
//! - Non-JSON files are ignored
//! - Malformed files abort the load

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::registry::SchemaRegistry;
use super::types::{ObjectSchema, SchemaDefinition};

/// Reads schema definitions from a directory.
pub struct SchemaLoader {
    schema_dir: PathBuf,
}

impl SchemaLoader {
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Reads and validates every schema file, sorted by class name.
    ///
    /// A missing directory yields no schemas.
    pub fn read_all(&self) -> SchemaResult<Vec<ObjectSchema>> {
        if !self.schema_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut schemas = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            schemas.push(Self::read_schema_file(&path)?);
        }

        schemas.sort_by(|a, b| a.class_name().cmp(b.class_name()));
        Ok(schemas)
    }

    /// Reads all schemas and registers them.
    pub fn load_into(&self, registry: &SchemaRegistry) -> SchemaResult<Vec<Arc<ObjectSchema>>> {
        self.read_all()?
            .into_iter()
            .map(|schema| registry.register(schema))
            .collect()
    }

    /// Reads all schemas into the process-wide registry.
    pub fn load_all(&self) -> SchemaResult<Vec<Arc<ObjectSchema>>> {
        self.load_into(SchemaRegistry::global())
    }

    /// Reads a single schema file.
    pub fn read_schema_file(path: &Path) -> SchemaResult<ObjectSchema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let definition: SchemaDefinition = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        ObjectSchema::from_definition(definition)
    }

    /// Writes a schema file. Existing files are never overwritten.
    pub fn save_schema(&self, schema: &ObjectSchema) -> SchemaResult<PathBuf> {
        let path = self
            .schema_dir
            .join(format!("schema_{}.json", schema.class_name()));

        if path.exists() {
            return Err(SchemaError::schema_immutable(schema.class_name()));
        }

        fs::create_dir_all(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to create schema directory: {}", e),
            )
        })?;

        let content = serde_json::to_string_pretty(&schema.to_definition()).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })?;

        Ok(path)
    }
}
