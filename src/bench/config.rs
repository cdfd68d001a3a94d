//! YAML configuration for the bench command.
//!
//! Every field has a default, so an empty file (or no file) is a valid plan:
//!
//! ```yaml
//! binary: ./build/cli
//! formats: [json, bson, columnar]
//! dataset_source: local
//! seed: 42
//! schema:
//!   depths: [1, 3, 5]
//!   min_keys_count: 5
//!   max_keys_count: 10
//! dataset:
//!   docs_count: 1000
//!   sparsity: 0.05
//! request:
//!   ratio: 0.1
//!   samples: 3
//! ```

use crate::runner::ColumnsArg;
use doc_gen::{DocumentConfig, SchemaConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Who writes each case's schema and dataset files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSource {
    /// Generated in-process from the case seed
    #[default]
    Local,
    /// The external CLI's own `generate-schema` and `generate-dataset`
    External,
}

impl std::str::FromStr for DatasetSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(DatasetSource::Local),
            "external" => Ok(DatasetSource::External),
            _ => Err(format!(
                "Unknown dataset source: {}. Valid options: local, external",
                s
            )),
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Local => write!(f, "local"),
            DatasetSource::External => write!(f, "external"),
        }
    }
}

/// Schema shape per case
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSection {
    /// One benchmark case per depth
    pub depths: Vec<usize>,
    pub min_keys_count: usize,
    pub max_keys_count: usize,
    pub min_keys_length: usize,
    pub max_keys_length: usize,
}

impl Default for SchemaSection {
    fn default() -> Self {
        Self {
            depths: vec![1, 3, 5],
            min_keys_count: 5,
            max_keys_count: 10,
            min_keys_length: 5,
            max_keys_length: 10,
        }
    }
}

/// Dataset size and shape per case
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSection {
    pub docs_count: usize,
    pub sparsity: f64,
    pub min_list_size: usize,
    pub max_list_size: usize,
}

impl Default for DatasetSection {
    fn default() -> Self {
        Self {
            docs_count: 1000,
            sparsity: 0.05,
            min_list_size: 5,
            max_list_size: 20,
        }
    }
}

/// Partial-read sampling per case
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSection {
    /// Probability that each leaf path is requested
    pub ratio: f64,
    /// Partial reads per format
    pub samples: usize,
}

impl Default for RequestSection {
    fn default() -> Self {
        Self {
            ratio: 0.1,
            samples: 3,
        }
    }
}

/// Complete YAML configuration for the bench command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// External CLI binary
    pub binary: Option<PathBuf>,
    /// Target formats; the generated dataset is always `json`
    pub formats: Vec<String>,
    /// Formats whose reads also get `--schema-path`
    pub schema_formats: Vec<String>,
    /// Base seed; random when absent
    pub seed: Option<u64>,
    /// Where case files go; a temporary directory when absent
    pub work_dir: Option<PathBuf>,
    /// Keep case files in `work_dir` after the run
    pub keep_files: bool,
    pub dataset_source: DatasetSource,
    pub columns_arg: ColumnsArg,
    pub schema: SchemaSection,
    pub dataset: DatasetSection,
    pub request: RequestSection,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            binary: None,
            formats: vec!["json".to_string(), "bson".to_string(), "columnar".to_string()],
            schema_formats: Vec::new(),
            seed: None,
            work_dir: None,
            keep_files: false,
            dataset_source: DatasetSource::default(),
            columns_arg: ColumnsArg::default(),
            schema: SchemaSection::default(),
            dataset: DatasetSection::default(),
            request: RequestSection::default(),
        }
    }
}

impl BenchConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: BenchConfig = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    pub fn schema_config(&self, depth: usize) -> SchemaConfig {
        SchemaConfig {
            depth,
            keys_count: self.schema.min_keys_count..=self.schema.max_keys_count,
            key_length: self.schema.min_keys_length..=self.schema.max_keys_length,
        }
    }

    pub fn document_config(&self) -> DocumentConfig {
        DocumentConfig {
            sparsity: self.dataset.sparsity,
            list_size: self.dataset.min_list_size..=self.dataset.max_list_size,
        }
    }

    pub fn needs_schema_path(&self, format: &str) -> bool {
        self.schema_formats.iter().any(|f| f == format)
    }

    /// Check everything a run depends on before any file is written.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.binary.is_none() {
            anyhow::bail!("No external binary configured (use --binary, DOCBENCH_BINARY or `binary:` in the config)");
        }
        if self.formats.is_empty() {
            anyhow::bail!("At least one format is required");
        }
        if self.schema.depths.is_empty() {
            anyhow::bail!("At least one schema depth is required");
        }
        for &depth in &self.schema.depths {
            self.schema_config(depth).validate()?;
        }
        self.document_config().validate()?;
        if !(0.0..=1.0).contains(&self.request.ratio) {
            anyhow::bail!(
                "request ratio must be between 0 and 1, got {}",
                self.request.ratio
            );
        }
        Ok(())
    }
}
