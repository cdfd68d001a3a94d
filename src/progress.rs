//! Shared progress bar setup.
//!
//! Document generation counts items, not bytes, so bars are sized by the
//! number of documents requested.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Bar for `total` documents, or a hidden bar when `enabled` is false.
pub fn document_bar(total: u64, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} docs ({per_sec}) {msg}",
    ) {
        pb.set_style(
            style
                .progress_chars("█▓▒░  ")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
