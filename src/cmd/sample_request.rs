//! Sample-request command CLI handler.

use doc_gen::Generator;
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;

/// JSON output for sample-request command
#[derive(Serialize, JsonSchema)]
pub(crate) struct SampleRequestJsonOutput {
    schema_path: String,
    seed: u64,
    ratio: f64,
    leaf_paths: usize,
    requests: Vec<Vec<String>>,
}

pub fn run(
    schema_path: PathBuf,
    ratio: f64,
    count: usize,
    seed: Option<u64>,
    lines: bool,
    json: bool,
) -> anyhow::Result<()> {
    let schema = super::read_schema(&schema_path)?;

    let seed = seed.unwrap_or_else(rand::random);
    let mut gen = Generator::new(seed);

    let requests = (0..count)
        .map(|_| gen.partial_request(&schema, ratio))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        let output_json = SampleRequestJsonOutput {
            schema_path: schema_path.display().to_string(),
            seed,
            ratio,
            leaf_paths: schema.leaf_count(),
            requests,
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
    } else if lines {
        for (i, request) in requests.iter().enumerate() {
            if i > 0 {
                println!();
            }
            for path in request {
                println!("{}", path);
            }
        }
    } else {
        for request in &requests {
            println!("{}", request.join(","));
        }
    }

    Ok(())
}
