//! JSON Schema generation for CLI output types.
//!
//! This module provides schema generation for all commands that support --json output.
//! Schemas are generated using the schemars crate and can be exported via the `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns all JSON schemas for commands that support --json output.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // bench command (the report itself)
    schemas.insert("bench", schema_for!(crate::bench::BenchReport));

    // generate-dataset command
    schemas.insert(
        "generate-dataset",
        schema_for!(crate::cmd::generate_dataset::GenerateDatasetJsonOutput),
    );

    // generate-schema command
    schemas.insert(
        "generate-schema",
        schema_for!(crate::cmd::generate_schema::GenerateSchemaJsonOutput),
    );

    // sample-request command
    schemas.insert(
        "sample-request",
        schema_for!(crate::cmd::sample_request::SampleRequestJsonOutput),
    );

    schemas
}

/// Generate a single schema by command name.
pub fn get_schema(command: &str) -> Option<Schema> {
    all_schemas().remove(command)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
