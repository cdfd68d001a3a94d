//! Generate-schema command CLI handler.

use crate::bench::schema_fingerprint;
use anyhow::Context;
use doc_gen::{Generator, SchemaConfig};
use schemars::JsonSchema;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// JSON output for generate-schema command
#[derive(Serialize, JsonSchema)]
pub(crate) struct GenerateSchemaJsonOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    output_file: Option<String>,
    seed: u64,
    requested_depth: usize,
    depth: usize,
    root_fields: usize,
    leaves: usize,
    objects: usize,
    fingerprint: String,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    output: Option<PathBuf>,
    depth: usize,
    min_keys_count: usize,
    max_keys_count: usize,
    min_keys_length: usize,
    max_keys_length: usize,
    seed: Option<u64>,
    pretty: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = SchemaConfig {
        depth,
        keys_count: min_keys_count..=max_keys_count,
        key_length: min_keys_length..=max_keys_length,
    };
    config.validate()?;

    let seed = seed.unwrap_or_else(rand::random);
    let schema = Generator::new(seed).schema(&config)?;

    let text = if pretty {
        serde_json::to_string_pretty(&schema.to_json())?
    } else {
        schema.to_json_string()
    };

    match &output {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("Failed to write schema: {}", path.display()))?,
        None => println!("{}", text),
    }

    let summary = GenerateSchemaJsonOutput {
        output_file: output.as_ref().map(|p| p.display().to_string()),
        seed,
        requested_depth: depth,
        depth: schema.depth(),
        root_fields: schema.len(),
        leaves: schema.leaf_count(),
        objects: schema.object_count(),
        fingerprint: schema_fingerprint(&schema),
    };

    if json {
        // Keep stdout for the schema itself when no output file is given.
        let rendered = serde_json::to_string_pretty(&summary)?;
        if output.is_some() {
            println!("{}", rendered);
        } else {
            eprintln!("{}", rendered);
        }
    } else {
        eprintln!(
            "Generated schema (seed {}, {} fields, depth {}, {} leaves, fingerprint {}) to {}",
            seed,
            summary.root_fields,
            summary.depth,
            summary.leaves,
            &summary.fingerprint[..12],
            output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "stdout".to_string())
        );
    }

    Ok(())
}
