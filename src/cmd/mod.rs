mod bench;
pub(crate) mod generate_dataset;
pub(crate) mod generate_schema;
pub(crate) mod sample_request;
mod schema;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use crate::bench::DatasetSource;
use doc_gen::ObjectSchema;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docbench")]
#[command(version)]
#[command(about = "Generate synthetic document datasets and benchmark storage-format CLIs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a random nested schema
    GenerateSchema {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum nesting depth below the root object
        #[arg(long, default_value = "3")]
        depth: usize,

        /// Lower bound of fields per object
        #[arg(long, default_value = "5")]
        min_keys_count: usize,

        /// Upper bound of fields per object
        #[arg(long, default_value = "10")]
        max_keys_count: usize,

        /// Lower bound of field name length
        #[arg(long, default_value = "5")]
        min_keys_length: usize,

        /// Upper bound of field name length
        #[arg(long, default_value = "10")]
        max_keys_length: usize,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Pretty-print the schema
        #[arg(long)]
        pretty: bool,

        /// Output a JSON summary
        #[arg(long)]
        json: bool,
    },

    /// Generate documents for a schema as newline-delimited JSON
    GenerateDataset {
        /// Schema JSON file
        #[arg(long)]
        schema_path: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of documents to generate
        #[arg(long, default_value = "1000")]
        docs_count: usize,

        /// Probability that a leaf value is null
        #[arg(long, default_value = "0.05")]
        sparsity: f64,

        /// Lower bound of generated list lengths
        #[arg(long, default_value = "5")]
        min_list_size: usize,

        /// Upper bound of generated list lengths
        #[arg(long, default_value = "20")]
        max_list_size: usize,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Output a JSON summary
        #[arg(long)]
        json: bool,
    },

    /// Sample field paths for partial reads of a schema
    SampleRequest {
        /// Schema JSON file
        #[arg(long)]
        schema_path: PathBuf,

        /// Probability that each leaf path is included
        #[arg(long, default_value = "0.1")]
        ratio: f64,

        /// Number of requests to sample
        #[arg(long, default_value = "1")]
        count: usize,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// One path per line instead of comma-joined
        #[arg(long, conflicts_with = "json")]
        lines: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Benchmark an external format CLI on generated datasets
    Bench {
        /// YAML bench plan
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// External CLI binary
        #[arg(long, env = "DOCBENCH_BINARY")]
        binary: Option<PathBuf>,

        /// Target formats (comma-separated, e.g. json,bson,columnar)
        #[arg(long)]
        formats: Option<String>,

        /// Schema depths, one case each (comma-separated)
        #[arg(long)]
        depths: Option<String>,

        /// Documents per dataset
        #[arg(long)]
        docs_count: Option<usize>,

        /// Who generates case files: local, external
        #[arg(long)]
        dataset_source: Option<DatasetSource>,

        /// Probability that a leaf value is null
        #[arg(long)]
        sparsity: Option<f64>,

        /// Probability that each leaf path is part of a partial read
        #[arg(long)]
        request_ratio: Option<f64>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for case files (default: temporary directory)
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Keep case files in --work-dir after the run
        #[arg(long)]
        keep_files: bool,

        /// Record failed external calls instead of stopping
        #[arg(long)]
        keep_going: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print JSON Schemas for --json outputs
    Schema {
        /// Only this command's schema
        #[arg(long)]
        command: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::GenerateSchema {
            output,
            depth,
            min_keys_count,
            max_keys_count,
            min_keys_length,
            max_keys_length,
            seed,
            pretty,
            json,
        } => generate_schema::run(
            output,
            depth,
            min_keys_count,
            max_keys_count,
            min_keys_length,
            max_keys_length,
            seed,
            pretty,
            json,
        ),
        Commands::GenerateDataset {
            schema_path,
            output,
            docs_count,
            sparsity,
            min_list_size,
            max_list_size,
            seed,
            progress,
            json,
        } => generate_dataset::run(
            schema_path,
            output,
            docs_count,
            sparsity,
            min_list_size,
            max_list_size,
            seed,
            progress,
            json,
        ),
        Commands::SampleRequest {
            schema_path,
            ratio,
            count,
            seed,
            lines,
            json,
        } => sample_request::run(schema_path, ratio, count, seed, lines, json),
        Commands::Bench {
            config,
            binary,
            formats,
            depths,
            docs_count,
            dataset_source,
            sparsity,
            request_ratio,
            seed,
            work_dir,
            keep_files,
            keep_going,
            json,
        } => bench::run(
            config,
            binary,
            formats,
            depths,
            docs_count,
            dataset_source,
            sparsity,
            request_ratio,
            seed,
            work_dir,
            keep_files,
            keep_going,
            json,
        ),
        Commands::Schema { command } => schema::run(command),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "docbench", &mut io::stdout());
            Ok(())
        }
    }
}

/// Read and parse a schema JSON file.
fn read_schema(path: &Path) -> anyhow::Result<ObjectSchema> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
    ObjectSchema::parse(&text)
        .with_context(|| format!("Failed to parse schema file: {}", path.display()))
}

/// Split a comma-separated flag value, dropping empty items.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
