//! CLI command implementations
//!
//! Commands read schema files only. They never open a database.

use std::io::{self, Write};
use std::path::Path;

use serde_json::json;

use crate::observability::{Event, Logger};
use crate::schema::{ObjectSchema, SchemaError, SchemaLoader, SchemaRegistry};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response_to;

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let mut stdout = io::stdout();
    match cmd {
        Command::Check { dir } => check(&dir, &mut stdout),
        Command::Describe { dir, class } => describe(&dir, &class, &mut stdout),
    }
}

/// Loads every schema in `dir` into a private registry.
///
/// Fails on malformed files, on two files declaring the same class with
/// different tables, and on links to classes no file declares.
fn load_checked(dir: &Path) -> CliResult<Vec<ObjectSchema>> {
    let loader = SchemaLoader::new(dir);
    let schemas = loader.read_all()?;

    let registry = SchemaRegistry::new();
    for schema in &schemas {
        registry.register(schema.clone())?;
    }

    for schema in &schemas {
        if let Some(missing) = schema.linked_classes().find(|c| !registry.contains(c)) {
            return Err(SchemaError::unknown_class(missing).into());
        }
    }

    Logger::event(
        Event::SchemasLoaded,
        &[
            ("classes", schemas.len().to_string().as_str()),
            ("dir", dir.display().to_string().as_str()),
        ],
    );
    Ok(schemas)
}

/// Validate every schema file and print the descriptor tables
pub fn check<W: Write>(dir: &Path, out: &mut W) -> CliResult<()> {
    let schemas = load_checked(dir)?;
    let classes = schemas
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    write_response_to(out, json!({ "classes": classes }))
}

/// Print one class schema as JSON
pub fn describe<W: Write>(dir: &Path, class_name: &str, out: &mut W) -> CliResult<()> {
    let schemas = load_checked(dir)?;
    let schema = schemas
        .iter()
        .find(|s| s.class_name() == class_name)
        .ok_or_else(|| CliError::unknown_class(class_name))?;

    write_response_to(out, serde_json::to_value(schema)?)
}
