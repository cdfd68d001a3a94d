//! Tests for YAML bench plans.

use docbench::bench::{BenchConfig, DatasetSource};
use docbench::runner::ColumnsArg;
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_yaml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = create_temp_yaml("{}\n");
    let config = BenchConfig::load(file.path()).unwrap();

    assert_eq!(config.binary, None);
    assert_eq!(config.formats, vec!["json", "bson", "columnar"]);
    assert_eq!(config.schema.depths, vec![1, 3, 5]);
    assert_eq!(config.schema.min_keys_count, 5);
    assert_eq!(config.schema.max_keys_count, 10);
    assert_eq!(config.dataset.docs_count, 1000);
    assert_eq!(config.dataset.sparsity, 0.05);
    assert_eq!(config.dataset.min_list_size, 5);
    assert_eq!(config.dataset.max_list_size, 20);
    assert_eq!(config.request.ratio, 0.1);
    assert_eq!(config.request.samples, 3);
    assert_eq!(config.columns_arg, ColumnsArg::Flag);
    assert_eq!(config.dataset_source, DatasetSource::Local);
    assert!(!config.keep_files);
}

#[test]
fn test_full_plan() {
    let yaml = r#"
binary: ./build/cli
formats: [json, columnar]
schema_formats: [columnar]
seed: 7
columns_arg: positional
dataset_source: external
schema:
  depths: [2]
  min_keys_count: 1
  max_keys_count: 3
dataset:
  docs_count: 10
  sparsity: 0.5
request:
  ratio: 0.3
  samples: 2
"#;
    let file = create_temp_yaml(yaml);
    let config = BenchConfig::load(file.path()).unwrap();

    assert_eq!(config.binary.as_deref(), Some(std::path::Path::new("./build/cli")));
    assert_eq!(config.formats, vec!["json", "columnar"]);
    assert!(config.needs_schema_path("columnar"));
    assert!(!config.needs_schema_path("json"));
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.columns_arg, ColumnsArg::Positional);
    assert_eq!(config.dataset_source, DatasetSource::External);
    assert_eq!(config.schema.depths, vec![2]);
    // Unset fields in a section keep their defaults
    assert_eq!(config.schema.min_keys_length, 5);
    assert_eq!(config.dataset.docs_count, 10);
    assert_eq!(config.dataset.max_list_size, 20);
    assert_eq!(config.request.samples, 2);
    config.validate().unwrap();

    let schema = config.schema_config(2);
    assert_eq!(schema.depth, 2);
    assert_eq!(schema.keys_count, 1..=3);
    let docs = config.document_config();
    assert_eq!(docs.sparsity, 0.5);
    assert_eq!(docs.list_size, 5..=20);
}

#[test]
fn test_invalid_yaml_is_error() {
    let file = create_temp_yaml("formats: {not: [a list\n");
    assert!(BenchConfig::load(file.path()).is_err());
}

#[test]
fn test_validate_requires_binary() {
    let config = BenchConfig::default();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("binary"));
}

#[test]
fn test_validate_rejects_bad_values() {
    let base = BenchConfig {
        binary: Some("./cli".into()),
        ..Default::default()
    };
    base.validate().unwrap();

    let mut config = base.clone();
    config.formats.clear();
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.schema.depths.clear();
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.schema.min_keys_count = 12;
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.dataset.sparsity = 1.5;
    assert!(config.validate().is_err());

    let mut config = base.clone();
    config.dataset.min_list_size = 30;
    assert!(config.validate().is_err());

    let mut config = base;
    config.request.ratio = -0.1;
    assert!(config.validate().is_err());
}

#[test]
fn test_dataset_source_parse() {
    assert_eq!("local".parse::<DatasetSource>().unwrap(), DatasetSource::Local);
    assert_eq!("External".parse::<DatasetSource>().unwrap(), DatasetSource::External);
    assert!("remote".parse::<DatasetSource>().is_err());
    assert_eq!(DatasetSource::External.to_string(), "external");
}
