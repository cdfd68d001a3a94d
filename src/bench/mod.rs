//! Benchmark driver for the external format CLI.
//!
//! A run is a list of cases, one per configured schema depth. Each case:
//!
//! 1. synthesizes a schema and a JSON dataset on its own random stream, or has
//!    the external CLI generate them ([`DatasetSource::External`]),
//! 2. transforms the dataset into every configured format,
//! 3. reads each converted file in full, then with sampled partial requests.
//!
//! Every external call's stderr JSON is kept in the [`BenchReport`].

mod config;

pub use config::{BenchConfig, DatasetSection, DatasetSource, RequestSection, SchemaSection};

use crate::runner::{CliCommand, ExternalCli, RunnerError, Timings};
use crate::writer::{self, NdjsonWriter, WriteStats};
use anyhow::Context;
use doc_gen::{task_rng, Generator, ObjectSchema};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::TempDir;

/// Input format of generated datasets
pub const DATASET_FORMAT: &str = "json";

/// Hex SHA-256 of the schema's compact JSON
pub fn schema_fingerprint(schema: &ObjectSchema) -> String {
    hex::encode(Sha256::digest(schema.to_json_string().as_bytes()))
}

/// Outcome of one external call
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct StepReport {
    pub ok: bool,
    /// Wall-clock time around the process, in milliseconds
    pub wall_ms: f64,
    #[serde(flatten)]
    pub timings: Timings,
    /// Full stderr JSON reported by the external CLI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    fn succeeded(result: Value, wall_ms: f64) -> Self {
        Self {
            ok: true,
            wall_ms,
            timings: Timings::from_result(&result),
            result: Some(result),
            error: None,
        }
    }

    fn failed(error: &RunnerError, wall_ms: f64) -> Self {
        Self {
            ok: false,
            wall_ms,
            timings: Timings::default(),
            result: None,
            error: Some(error.to_string()),
        }
    }

    fn skipped(reason: &str) -> Self {
        Self {
            ok: false,
            wall_ms: 0.0,
            timings: Timings::default(),
            result: None,
            error: Some(reason.to_string()),
        }
    }
}

/// A read restricted to sampled field paths
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PartialReadReport {
    pub columns: Vec<String>,
    #[serde(flatten)]
    pub step: StepReport,
}

/// All steps for one target format
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FormatReport {
    pub format: String,
    pub transform: StepReport,
    pub full_read: StepReport,
    pub partial_reads: Vec<PartialReadReport>,
}

/// External `generate-schema` and `generate-dataset` calls of a case
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GenerationReport {
    pub schema: StepReport,
    pub dataset: StepReport,
}

/// One schema depth with its dataset
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CaseReport {
    pub index: usize,
    pub depth: usize,
    /// Present when the external CLI generated the case files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationReport>,
    pub schema_fingerprint: String,
    pub schema_leaves: usize,
    pub docs_count: u64,
    pub dataset_bytes: u64,
    pub formats: Vec<FormatReport>,
}

/// Result of a bench run
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BenchReport {
    pub binary: String,
    pub seed: u64,
    pub started_at: String,
    pub elapsed_secs: f64,
    pub failures: usize,
    pub cases: Vec<CaseReport>,
}

/// Run-time switches that are not part of the plan itself
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Record failed external calls instead of aborting the run
    pub keep_going: bool,
}

enum WorkDir {
    Temp(TempDir),
    Fixed(PathBuf),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Temp(dir) => dir.path(),
            WorkDir::Fixed(path) => path,
        }
    }
}

/// Run every case of `config` against `cli`.
pub fn run(config: &BenchConfig, cli: &ExternalCli, options: RunOptions) -> anyhow::Result<BenchReport> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let started_at = chrono::Utc::now().to_rfc3339();
    let start = Instant::now();

    let work_dir = match &config.work_dir {
        Some(path) => {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create work dir: {}", path.display()))?;
            WorkDir::Fixed(path.clone())
        }
        None => WorkDir::Temp(
            tempfile::Builder::new()
                .prefix("docbench-")
                .tempdir()
                .context("Failed to create temporary work dir")?,
        ),
    };

    tracing::info!(
        binary = %cli.binary().display(),
        seed,
        work_dir = %work_dir.path().display(),
        "starting bench run"
    );

    let mut runner = CaseRunner {
        config,
        cli,
        options,
        failures: 0,
    };

    let mut cases = Vec::with_capacity(config.schema.depths.len());
    for (index, &depth) in config.schema.depths.iter().enumerate() {
        let case_dir = work_dir.path().join(format!("case-{}-depth-{}", index, depth));
        fs::create_dir_all(&case_dir)
            .with_context(|| format!("Failed to create case dir: {}", case_dir.display()))?;

        let report = runner
            .run_case(seed, index, depth, &case_dir)
            .with_context(|| format!("Case {} (depth {}) failed", index, depth))?;
        cases.push(report);

        if matches!(work_dir, WorkDir::Fixed(_)) && !config.keep_files {
            fs::remove_dir_all(&case_dir)
                .with_context(|| format!("Failed to remove case dir: {}", case_dir.display()))?;
        }
    }

    Ok(BenchReport {
        binary: cli.binary().display().to_string(),
        seed,
        started_at,
        elapsed_secs: start.elapsed().as_secs_f64(),
        failures: runner.failures,
        cases,
    })
}

struct CaseRunner<'a> {
    config: &'a BenchConfig,
    cli: &'a ExternalCli,
    options: RunOptions,
    failures: usize,
}

impl CaseRunner<'_> {
    fn run_case(
        &mut self,
        seed: u64,
        index: usize,
        depth: usize,
        case_dir: &Path,
    ) -> anyhow::Result<CaseReport> {
        let mut gen = Generator::from_rng(task_rng(seed, index as u64));

        let schema_path = case_dir.join("schema.json");
        let dataset_path = case_dir.join(format!("dataset.{}", DATASET_FORMAT));

        let (schema, stats, generation) = match self.config.dataset_source {
            DatasetSource::Local => {
                let schema = gen.schema(&self.config.schema_config(depth))?;
                writer::write_schema(&schema_path, &schema).with_context(|| {
                    format!("Failed to write schema: {}", schema_path.display())
                })?;

                let mut out = NdjsonWriter::create(&dataset_path).with_context(|| {
                    format!("Failed to create dataset: {}", dataset_path.display())
                })?;
                let docs = gen.stream(
                    &schema,
                    self.config.dataset.docs_count,
                    &self.config.document_config(),
                )?;
                for doc in docs {
                    out.write_document(&doc)?;
                }
                (schema, out.finish()?, None)
            }
            DatasetSource::External => {
                let (schema, stats, report) =
                    self.generate_externally(depth, &schema_path, &dataset_path)?;
                (schema, stats, Some(report))
            }
        };

        let requests = self.sample_requests(&mut gen, &schema, index)?;

        tracing::info!(
            case = index,
            depth,
            leaves = schema.leaf_count(),
            docs = stats.documents,
            bytes = stats.bytes,
            "dataset ready"
        );

        let mut formats = Vec::with_capacity(self.config.formats.len());
        for format in &self.config.formats {
            formats.push(self.run_format(format, &dataset_path, &schema_path, &requests, case_dir)?);
        }

        Ok(CaseReport {
            index,
            depth,
            generation,
            schema_fingerprint: schema_fingerprint(&schema),
            schema_leaves: schema.leaf_count(),
            docs_count: stats.documents,
            dataset_bytes: stats.bytes,
            formats,
        })
    }

    /// Have the external CLI write the case schema and dataset, then load
    /// them back. Later steps need both files, so failures here always abort.
    fn generate_externally(
        &self,
        depth: usize,
        schema_path: &Path,
        dataset_path: &Path,
    ) -> anyhow::Result<(ObjectSchema, WriteStats, GenerationReport)> {
        let schema_step = self.required_step(&CliCommand::generate_schema(
            schema_path,
            &self.config.schema_config(depth),
        ))?;
        let dataset_step = self.required_step(&CliCommand::generate_dataset(
            schema_path,
            dataset_path,
            self.config.dataset.docs_count,
            &self.config.document_config(),
        ))?;

        let text = fs::read_to_string(schema_path)
            .with_context(|| format!("Failed to read schema: {}", schema_path.display()))?;
        let schema = ObjectSchema::parse(&text)
            .with_context(|| format!("Failed to parse schema: {}", schema_path.display()))?;
        let stats = writer::scan_dataset(dataset_path)
            .with_context(|| format!("Failed to read dataset: {}", dataset_path.display()))?;

        Ok((
            schema,
            stats,
            GenerationReport {
                schema: schema_step,
                dataset: dataset_step,
            },
        ))
    }

    /// Sampled column lists for partial reads.
    ///
    /// An empty sample would read every field, so it is dropped rather than
    /// timed as a partial read.
    fn sample_requests(
        &self,
        gen: &mut Generator,
        schema: &ObjectSchema,
        index: usize,
    ) -> anyhow::Result<Vec<Vec<String>>> {
        let mut requests = Vec::with_capacity(self.config.request.samples);
        for _ in 0..self.config.request.samples {
            let columns = gen.partial_request(schema, self.config.request.ratio)?;
            if !columns.is_empty() {
                requests.push(columns);
            }
        }
        if requests.len() < self.config.request.samples {
            tracing::debug!(
                case = index,
                dropped = self.config.request.samples - requests.len(),
                "empty partial requests dropped"
            );
        }
        Ok(requests)
    }

    fn run_format(
        &mut self,
        format: &str,
        dataset_path: &Path,
        schema_path: &Path,
        requests: &[Vec<String>],
        case_dir: &Path,
    ) -> anyhow::Result<FormatReport> {
        let data_path = case_dir.join(format!("data.{}", format));

        let transform = self.step(&CliCommand::transform(
            dataset_path,
            DATASET_FORMAT,
            &data_path,
            format,
        ))?;

        if !transform.ok {
            // Nothing to read back.
            return Ok(FormatReport {
                format: format.to_string(),
                transform,
                full_read: StepReport::skipped("transform failed"),
                partial_reads: Vec::new(),
            });
        }

        let full_read = self.step(&self.read_command(&data_path, format, &[], schema_path))?;

        let mut partial_reads = Vec::with_capacity(requests.len());
        for columns in requests {
            let cmd = self.read_command(&data_path, format, columns, schema_path);
            partial_reads.push(PartialReadReport {
                columns: columns.clone(),
                step: self.step(&cmd)?,
            });
        }

        Ok(FormatReport {
            format: format.to_string(),
            transform,
            full_read,
            partial_reads,
        })
    }

    fn read_command(
        &self,
        data_path: &Path,
        format: &str,
        columns: &[String],
        schema_path: &Path,
    ) -> CliCommand {
        let cmd = CliCommand::read(data_path, format, columns, self.config.columns_arg);
        if self.config.needs_schema_path(format) {
            cmd.with_schema_path(schema_path)
        } else {
            cmd
        }
    }

    fn required_step(&self, command: &CliCommand) -> anyhow::Result<StepReport> {
        let start = Instant::now();
        let result = self
            .cli
            .run(command)
            .with_context(|| format!("External {} failed", command.subcommand()))?;
        Ok(StepReport::succeeded(
            result,
            start.elapsed().as_secs_f64() * 1000.0,
        ))
    }

    fn step(&mut self, command: &CliCommand) -> anyhow::Result<StepReport> {
        let start = Instant::now();
        let outcome = self.cli.run(command);
        let wall_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(result) => Ok(StepReport::succeeded(result, wall_ms)),
            Err(e) if self.options.keep_going => {
                tracing::warn!(error = %e, "step failed, continuing");
                self.failures += 1;
                Ok(StepReport::failed(&e, wall_ms))
            }
            Err(e) => Err(e.into()),
        }
    }
}
