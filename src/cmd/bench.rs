//! Bench command CLI handler.

use crate::bench::{self, BenchConfig, BenchReport, DatasetSource, RunOptions};
use crate::runner::ExternalCli;
use anyhow::Context;
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: Option<PathBuf>,
    binary: Option<PathBuf>,
    formats: Option<String>,
    depths: Option<String>,
    docs_count: Option<usize>,
    dataset_source: Option<DatasetSource>,
    sparsity: Option<f64>,
    request_ratio: Option<f64>,
    seed: Option<u64>,
    work_dir: Option<PathBuf>,
    keep_files: bool,
    keep_going: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut plan = match &config {
        Some(path) => BenchConfig::load(path)
            .with_context(|| format!("Failed to load bench config: {}", path.display()))?,
        None => BenchConfig::default(),
    };

    // Flags override the file
    if binary.is_some() {
        plan.binary = binary;
    }
    if let Some(formats) = formats {
        plan.formats = super::split_list(&formats);
    }
    if let Some(depths) = depths {
        plan.schema.depths = super::split_list(&depths)
            .iter()
            .map(|d| {
                d.parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("Invalid depth: {}", d))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
    }
    if let Some(docs_count) = docs_count {
        plan.dataset.docs_count = docs_count;
    }
    if let Some(source) = dataset_source {
        plan.dataset_source = source;
    }
    if let Some(sparsity) = sparsity {
        plan.dataset.sparsity = sparsity;
    }
    if let Some(ratio) = request_ratio {
        plan.request.ratio = ratio;
    }
    if seed.is_some() {
        plan.seed = seed;
    }
    if work_dir.is_some() {
        plan.work_dir = work_dir;
    }
    if keep_files {
        plan.keep_files = true;
    }

    plan.validate()?;
    let binary = plan
        .binary
        .clone()
        .ok_or_else(|| anyhow::anyhow!("No external binary configured"))?;
    let cli = ExternalCli::new(binary);

    let report = bench::run(&plan, &cli, RunOptions { keep_going })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &BenchReport) {
    eprintln!();
    eprintln!("Bench Results (seed {}):", report.seed);
    for case in &report.cases {
        eprintln!();
        eprintln!(
            "  Case {}: depth {}, {} leaves, {} docs, {} bytes",
            case.index, case.depth, case.schema_leaves, case.docs_count, case.dataset_bytes
        );
        for format in &case.formats {
            let partial: Vec<u64> = format
                .partial_reads
                .iter()
                .filter(|p| p.step.ok)
                .filter_map(|p| p.step.timings.read_duration_ns)
                .collect();
            let partial_avg = if partial.is_empty() {
                "-".to_string()
            } else {
                format_ns(partial.iter().sum::<u64>() / partial.len() as u64)
            };

            eprintln!(
                "    {:<10} write {:>10}  read {:>10}  partial read {:>10}{}",
                format.format,
                format
                    .transform
                    .timings
                    .write_duration_ns
                    .map(format_ns)
                    .unwrap_or_else(|| "-".to_string()),
                format
                    .full_read
                    .timings
                    .read_duration_ns
                    .map(format_ns)
                    .unwrap_or_else(|| "-".to_string()),
                partial_avg,
                if format.transform.ok && format.full_read.ok {
                    ""
                } else {
                    "  (failed)"
                }
            );
        }
    }

    eprintln!();
    eprintln!("  Elapsed: {:.2}s", report.elapsed_secs);
    if report.failures > 0 {
        eprintln!("  Warning: {} external calls failed", report.failures);
    }
}

fn format_ns(ns: u64) -> String {
    format!("{:.2}ms", ns as f64 / 1_000_000.0)
}
