//! Generate-dataset command CLI handler.

use crate::progress;
use crate::writer::{NdjsonWriter, WriteStats};
use anyhow::Context;
use doc_gen::{DocumentConfig, Generator};
use indicatif::ProgressBar;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

/// JSON output for generate-dataset command
#[derive(Serialize, JsonSchema)]
pub(crate) struct GenerateDatasetJsonOutput {
    schema_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_file: Option<String>,
    seed: u64,
    options: DatasetOptions,
    statistics: DatasetStatistics,
}

#[derive(Serialize, JsonSchema)]
struct DatasetOptions {
    sparsity: f64,
    min_list_size: usize,
    max_list_size: usize,
}

#[derive(Serialize, JsonSchema)]
struct DatasetStatistics {
    documents: u64,
    bytes_written: u64,
    elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    docs_per_sec: Option<f64>,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    schema_path: PathBuf,
    output: Option<PathBuf>,
    docs_count: usize,
    sparsity: f64,
    min_list_size: usize,
    max_list_size: usize,
    seed: Option<u64>,
    progress: bool,
    json: bool,
) -> anyhow::Result<()> {
    let schema = super::read_schema(&schema_path)?;

    let config = DocumentConfig {
        sparsity,
        list_size: min_list_size..=max_list_size,
    };
    config.validate()?;

    let seed = seed.unwrap_or_else(rand::random);
    let mut gen = Generator::new(seed);
    let docs = gen.stream(&schema, docs_count, &config)?;

    let pb = progress::document_bar(docs_count as u64, progress && output.is_some());
    let start_time = Instant::now();

    let stats = match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_documents(NdjsonWriter::new(file), docs, &pb)?
        }
        None => {
            let stdout = io::stdout();
            write_documents(NdjsonWriter::new(stdout.lock()), docs, &pb)?
        }
    };
    pb.finish_and_clear();

    let elapsed = start_time.elapsed();

    if json {
        let docs_per_sec = if elapsed.as_secs_f64() > 0.0 {
            Some(stats.documents as f64 / elapsed.as_secs_f64())
        } else {
            None
        };

        let output_json = GenerateDatasetJsonOutput {
            schema_path: schema_path.display().to_string(),
            output_file: output.as_ref().map(|p| p.display().to_string()),
            seed,
            options: DatasetOptions {
                sparsity,
                min_list_size,
                max_list_size,
            },
            statistics: DatasetStatistics {
                documents: stats.documents,
                bytes_written: stats.bytes,
                elapsed_secs: elapsed.as_secs_f64(),
                docs_per_sec,
            },
        };
        let rendered = serde_json::to_string_pretty(&output_json)?;
        if output.is_some() {
            println!("{}", rendered);
        } else {
            eprintln!("{}", rendered);
        }
    } else if let Some(path) = &output {
        eprintln!(
            "Generated {} documents ({} bytes, seed {}) to {} in {:.2}s",
            stats.documents,
            stats.bytes,
            seed,
            path.display(),
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}

fn write_documents<W, I>(
    mut writer: NdjsonWriter<W>,
    docs: I,
    pb: &ProgressBar,
) -> anyhow::Result<WriteStats>
where
    W: Write,
    I: Iterator<Item = Value>,
{
    for doc in docs {
        writer.write_document(&doc)?;
        pb.inc(1);
    }
    Ok(writer.finish()?)
}
