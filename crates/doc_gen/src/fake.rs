//! Random scalar helpers.
//!
//! Value ranges follow what the benchmark datasets have always used, including
//! the skewed float distribution.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Bound for generated integers, inclusive on both sides
pub const INT_BOUND: i64 = 1_000_000;

/// Longest generated string value
pub const MAX_STRING_LEN: usize = 25;

/// Symbols in `[A-Za-z0-9]`
pub const ALPHABET_SIZE: u128 = 62;

/// Random `[A-Za-z0-9]` string of exactly `len` characters
pub fn alphanumeric<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Uniform integer in `[-INT_BOUND, INT_BOUND]`
pub fn int<R: Rng>(rng: &mut R) -> i64 {
    rng.random_range(-INT_BOUND..=INT_BOUND)
}

/// `uniform(0, 1) * uniform_int(-INT_BOUND, INT_BOUND)`.
///
/// Not uniform over its range; downstream benchmark data depends on this shape.
pub fn float<R: Rng>(rng: &mut R) -> f64 {
    let scale: f64 = rng.random();
    let magnitude = int(rng);
    scale * magnitude as f64
}

/// Alphanumeric string with length uniform in `[0, MAX_STRING_LEN]`
pub fn string<R: Rng>(rng: &mut R) -> String {
    let len = rng.random_range(0..=MAX_STRING_LEN);
    alphanumeric(rng, len)
}

pub fn boolean<R: Rng>(rng: &mut R) -> bool {
    rng.random_bool(0.5)
}
