//! Error type shared by all generators.

use std::ops::RangeInclusive;

/// Error type for schema parsing and generation.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// A schema value carries a type tag outside `int`, `float`, `double`, `string`, `bool`
    #[error("Unknown type in schema: {0}")]
    UnknownType(String),

    /// The schema has a shape the generators cannot walk
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Schema text is not valid JSON
    #[error("Malformed schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured `[min, max]` range is empty or otherwise unusable
    #[error("Invalid {what} range [{min}, {max}]")]
    InvalidRange {
        what: &'static str,
        min: usize,
        max: usize,
    },

    /// Objects may need more unique names than the key length range can spell
    #[error("Key length range [{min_len}, {max_len}] cannot hold {keys} unique field names")]
    NameSpace {
        keys: usize,
        min_len: usize,
        max_len: usize,
    },

    #[error("Sparsity must be within [0, 1], got {0}")]
    InvalidSparsity(f64),

    #[error("Request ratio must be within [0, 1], got {0}")]
    InvalidRatio(f64),
}

impl GenError {
    pub(crate) fn range(what: &'static str, range: &RangeInclusive<usize>) -> Self {
        GenError::InvalidRange {
            what,
            min: *range.start(),
            max: *range.end(),
        }
    }
}

/// Returns true for a probability usable with `random::<f64>() < p`.
pub(crate) fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}
