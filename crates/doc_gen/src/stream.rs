//! Random streams and lazy document iteration.
//!
//! One stream per independent task: `task_rng` mixes a task index into the
//! base seed, so tasks can run in any order (or in parallel) and still
//! reproduce the same output.

use crate::document::{object_document, DocumentConfig};
use crate::error::GenError;
use crate::schema::ObjectSchema;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::Value;

/// Golden-ratio increment used to spread task indices across the seed space
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Stream for the task at `index` under `seed`.
pub fn task_rng(seed: u64, index: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.wrapping_add(index.wrapping_mul(SEED_STRIDE)))
}

/// Bounded iterator of documents drawn from one stream.
///
/// Yields exactly the documents `synthesize_documents` would return for the
/// same stream state, one at a time.
pub struct DocumentStream<'a, R> {
    rng: &'a mut R,
    schema: &'a ObjectSchema,
    config: DocumentConfig,
    remaining: usize,
}

impl<'a, R: Rng> DocumentStream<'a, R> {
    pub fn new(
        rng: &'a mut R,
        schema: &'a ObjectSchema,
        count: usize,
        config: &DocumentConfig,
    ) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self {
            rng,
            schema,
            config: config.clone(),
            remaining: count,
        })
    }
}

impl<R: Rng> Iterator for DocumentStream<'_, R> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(object_document(&mut *self.rng, self.schema, &self.config))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Rng> ExactSizeIterator for DocumentStream<'_, R> {}
