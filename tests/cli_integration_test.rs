//! Integration tests for the generate-schema, generate-dataset and
//! sample-request commands.

use doc_gen::ObjectSchema;
use serde_json::Value;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn docbench_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docbench"))
}

fn generate_schema(dir: &TempDir, depth: usize, seed: u64) -> std::path::PathBuf {
    let path = dir.path().join(format!("schema-{}-{}.json", depth, seed));
    let output = docbench_bin()
        .args(["generate-schema", "--depth", &depth.to_string()])
        .args(["--seed", &seed.to_string()])
        .arg("--output")
        .arg(&path)
        .output()
        .expect("Failed to execute command");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    path
}

#[test]
fn test_generate_schema_to_stdout() {
    let output = docbench_bin()
        .args(["generate-schema", "--depth", "2", "--seed", "1"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let schema = ObjectSchema::parse(stdout.trim()).unwrap();
    assert!(schema.depth() <= 2);
    assert!((5..=10).contains(&schema.len()));
}

#[test]
fn test_generate_schema_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let a = fs::read_to_string(generate_schema(&dir, 3, 99)).unwrap();

    let other = TempDir::new().unwrap();
    let b = fs::read_to_string(generate_schema(&other, 3, 99)).unwrap();
    assert_eq!(a, b);

    let c = fs::read_to_string(generate_schema(&dir, 3, 100)).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_generate_schema_rejects_inverted_range() {
    let output = docbench_bin()
        .args(["generate-schema", "--min-keys-count", "8", "--max-keys-count", "3"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("keys count"), "stderr: {}", stderr);
}

#[test]
fn test_generate_schema_many_keys_with_short_names() {
    let output = docbench_bin()
        .args(["generate-schema", "--depth", "0", "--seed", "1"])
        .args(["--min-keys-count", "200", "--max-keys-count", "200"])
        .args(["--min-keys-length", "1", "--max-keys-length", "3"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let schema = ObjectSchema::parse(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(schema.len(), 200);

    let output = docbench_bin()
        .args(["generate-schema", "--depth", "0"])
        .args(["--min-keys-count", "63", "--max-keys-count", "63"])
        .args(["--min-keys-length", "1", "--max-keys-length", "1"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot hold 63 unique field names"), "stderr: {}", stderr);
}

#[test]
fn test_generate_schema_json_summary() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.json");
    let output = docbench_bin()
        .args(["generate-schema", "--depth", "3", "--seed", "5", "--json"])
        .arg("--output")
        .arg(&path)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let schema = ObjectSchema::parse(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["seed"], 5);
    assert_eq!(json["requested_depth"], 3);
    assert_eq!(json["depth"], schema.depth() as u64);
    assert_eq!(json["leaves"], schema.leaf_count() as u64);
    assert_eq!(json["fingerprint"].as_str().unwrap().len(), 64);
}

#[test]
fn test_generate_dataset_matches_schema() {
    let dir = TempDir::new().unwrap();
    let schema_path = generate_schema(&dir, 2, 7);
    let schema = ObjectSchema::parse(&fs::read_to_string(&schema_path).unwrap()).unwrap();

    let output = docbench_bin()
        .arg("generate-dataset")
        .arg("--schema-path")
        .arg(&schema_path)
        .args(["--docs-count", "25", "--seed", "3"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let docs: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(docs.len(), 25);

    let root_keys: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
    for doc in &docs {
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, root_keys);
    }
}

#[test]
fn test_generate_dataset_to_file_with_json_summary() {
    let dir = TempDir::new().unwrap();
    let schema_path = generate_schema(&dir, 1, 11);
    let data_path = dir.path().join("dataset.json");

    let output = docbench_bin()
        .arg("generate-dataset")
        .arg("--schema-path")
        .arg(&schema_path)
        .arg("--output")
        .arg(&data_path)
        .args(["--docs-count", "40", "--sparsity", "0", "--seed", "3", "--json"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let content = fs::read_to_string(&data_path).unwrap();
    assert_eq!(json["statistics"]["documents"], 40);
    assert_eq!(json["statistics"]["bytes_written"], content.len() as u64);
    assert_eq!(json["options"]["sparsity"], 0.0);
    assert!(!content.contains("null"));
}

#[test]
fn test_generate_dataset_missing_schema_file() {
    let output = docbench_bin()
        .args(["generate-dataset", "--schema-path", "/nonexistent/schema.json"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read schema file"));
}

#[test]
fn test_generate_dataset_unknown_leaf_type() {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join("schema.json");
    fs::write(&schema_path, r#"{"a": "int", "b": "decimal"}"#).unwrap();

    let output = docbench_bin()
        .arg("generate-dataset")
        .arg("--schema-path")
        .arg(&schema_path)
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("decimal"));
}

#[test]
fn test_sample_request_formats() {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join("schema.json");
    fs::write(
        &schema_path,
        r#"{"id": "int", "user": {"name": "string", "tags": [{"label": "string"}]}}"#,
    )
    .unwrap();

    let output = docbench_bin()
        .arg("sample-request")
        .arg("--schema-path")
        .arg(&schema_path)
        .args(["--ratio", "1", "--seed", "1"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "id,user.name,user.tags.label"
    );

    let output = docbench_bin()
        .arg("sample-request")
        .arg("--schema-path")
        .arg(&schema_path)
        .args(["--ratio", "1", "--lines"])
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec!["id", "user.name", "user.tags.label"]
    );

    let output = docbench_bin()
        .arg("sample-request")
        .arg("--schema-path")
        .arg(&schema_path)
        .args(["--ratio", "0", "--count", "3", "--json"])
        .output()
        .expect("Failed to execute command");
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["leaf_paths"], 3);
    let requests = json["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.as_array().unwrap().is_empty()));
}

#[test]
fn test_sample_request_rejects_bad_ratio() {
    let dir = TempDir::new().unwrap();
    let schema_path = generate_schema(&dir, 1, 2);
    let output = docbench_bin()
        .arg("sample-request")
        .arg("--schema-path")
        .arg(&schema_path)
        .args(["--ratio", "1.5"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
}

#[test]
fn test_bench_without_binary_fails() {
    let output = docbench_bin()
        .arg("bench")
        .env_remove("DOCBENCH_BINARY")
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No external binary"));
}

#[test]
fn test_completions() {
    let output = docbench_bin()
        .args(["completions", "bash"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("docbench"));
}
