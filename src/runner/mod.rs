//! External format CLI invocation.
//!
//! The external binary reports results as a single JSON document on stderr.
//! Exit code 0 plus parseable stderr is success; anything else is an error
//! carrying the command line, exit code and captured stderr.

use doc_gen::{DocumentConfig, SchemaConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const SPAWN_ATTEMPTS: u32 = 5;
const SPAWN_RETRY_DELAY: Duration = Duration::from_millis(20);

/// How a partial read passes its comma-joined field paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColumnsArg {
    /// `--columns a.b,c`
    #[default]
    Flag,
    /// Trailing positional argument
    Positional,
}

impl std::str::FromStr for ColumnsArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flag" => Ok(ColumnsArg::Flag),
            "positional" => Ok(ColumnsArg::Positional),
            _ => Err(format!(
                "Unknown columns argument style: {}. Valid options: flag, positional",
                s
            )),
        }
    }
}

impl std::fmt::Display for ColumnsArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnsArg::Flag => write!(f, "flag"),
            ColumnsArg::Positional => write!(f, "positional"),
        }
    }
}

/// Error type for external command runs.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` failed ({}): {}", exit_label(.code), .stderr.trim())]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Command `{command}` did not report JSON on stderr: {source}")]
    InvalidJson {
        command: String,
        stderr: String,
        #[source]
        source: serde_json::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Arguments for one external invocation, subcommand first
#[derive(Debug, Clone, PartialEq)]
pub struct CliCommand {
    args: Vec<OsString>,
}

impl CliCommand {
    fn new(subcommand: &str) -> Self {
        Self {
            args: vec![OsString::from(subcommand)],
        }
    }

    fn flag(mut self, name: &str, value: impl AsRef<OsStr>) -> Self {
        self.args.push(OsString::from(name));
        self.args.push(value.as_ref().to_os_string());
        self
    }

    /// `transform`: convert a file between formats
    pub fn transform(
        input_path: &Path,
        input_format: &str,
        output_path: &Path,
        output_format: &str,
    ) -> Self {
        Self::new("transform")
            .flag("--input-path", input_path)
            .flag("--input-format", input_format)
            .flag("--output-path", output_path)
            .flag("--output-format", output_format)
    }

    /// `read`: read a file, optionally only `columns`.
    ///
    /// An empty column list reads every field and passes no list at all.
    pub fn read(path: &Path, format: &str, columns: &[String], style: ColumnsArg) -> Self {
        let cmd = Self::new("read").flag("--path", path).flag("--format", format);
        if columns.is_empty() {
            return cmd;
        }
        let joined = columns.join(",");
        match style {
            ColumnsArg::Flag => cmd.flag("--columns", joined),
            ColumnsArg::Positional => {
                let mut cmd = cmd;
                cmd.args.push(OsString::from(joined));
                cmd
            }
        }
    }

    /// `generate-schema` with the same shape parameters the local generator uses
    pub fn generate_schema(output_path: &Path, config: &SchemaConfig) -> Self {
        Self::new("generate-schema")
            .flag("--output-path", output_path)
            .flag("--depth", config.depth.to_string())
            .flag("--min-keys-count", config.keys_count.start().to_string())
            .flag("--max-keys-count", config.keys_count.end().to_string())
            .flag("--min-keys-length", config.key_length.start().to_string())
            .flag("--max-keys-length", config.key_length.end().to_string())
    }

    /// `generate-dataset` from an existing schema file
    pub fn generate_dataset(
        schema_path: &Path,
        output_path: &Path,
        docs_count: usize,
        config: &DocumentConfig,
    ) -> Self {
        Self::new("generate-dataset")
            .flag("--schema-path", schema_path)
            .flag("--output-path", output_path)
            .flag("--docs-count", docs_count.to_string())
            .flag("--sparsity", config.sparsity.to_string())
            .flag("--min-list-size", config.list_size.start().to_string())
            .flag("--max-list-size", config.list_size.end().to_string())
    }

    /// Append `--schema-path`, used by formats that need the schema to read.
    pub fn with_schema_path(self, schema_path: &Path) -> Self {
        self.flag("--schema-path", schema_path)
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn subcommand(&self) -> String {
        self.args
            .first()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Shell-like rendering for logs and error messages
    pub fn display(&self, binary: &Path) -> String {
        let mut line = binary.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Handle on the external binary
#[derive(Debug, Clone)]
pub struct ExternalCli {
    binary: PathBuf,
}

impl ExternalCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run `command` to completion and decode its stderr JSON.
    pub fn run(&self, command: &CliCommand) -> Result<Value, RunnerError> {
        let line = command.display(&self.binary);
        tracing::debug!(command = %line, "running external command");

        let start = Instant::now();
        let output = self.output(command).map_err(|source| RunnerError::Spawn {
            command: line.clone(),
            source,
        })?;
        let elapsed = start.elapsed();

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::warn!(
                command = %line,
                code = ?output.status.code(),
                "external command failed"
            );
            return Err(RunnerError::Failed {
                command: line,
                code: output.status.code(),
                stderr,
            });
        }

        let result = serde_json::from_str(stderr.trim()).map_err(|source| {
            RunnerError::InvalidJson {
                command: line.clone(),
                stderr: stderr.clone(),
                source,
            }
        })?;

        tracing::debug!(
            command = %line,
            elapsed_ms = elapsed.as_millis() as u64,
            "external command finished"
        );
        Ok(result)
    }
}

impl ExternalCli {
    /// Spawn and wait, retrying while the binary is still open for writing
    /// elsewhere (ETXTBSY right after it was written).
    fn output(&self, command: &CliCommand) -> io::Result<Output> {
        let mut attempt = 1;
        loop {
            match Command::new(&self.binary)
                .args(command.args())
                .stdin(Stdio::null())
                .output()
            {
                Err(e)
                    if e.kind() == io::ErrorKind::ExecutableFileBusy
                        && attempt < SPAWN_ATTEMPTS =>
                {
                    tracing::debug!(attempt, "binary busy, retrying spawn");
                    thread::sleep(SPAWN_RETRY_DELAY * attempt);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Durations the external CLI reports, in nanoseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Timings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_duration_ns: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_duration_ns: Option<u64>,
}

impl Timings {
    /// Pick the known duration keys out of a result; other keys are ignored.
    pub fn from_result(result: &Value) -> Self {
        Self {
            read_duration_ns: result.get("read_duration_ns").and_then(Value::as_u64),
            write_duration_ns: result.get("write_duration_ns").and_then(Value::as_u64),
        }
    }

    pub fn total_ns(&self) -> u64 {
        self.read_duration_ns.unwrap_or(0) + self.write_duration_ns.unwrap_or(0)
    }
}
