//! Schema synthesis and the seeded [`Generator`] front end.
//!
//! Schemas are grown recursively: every object draws its field count and
//! field names, then a type per field. Nested fields spend one unit of depth.

use crate::document::{self, DocumentConfig};
use crate::error::GenError;
use crate::fake;
use crate::request;
use crate::schema::{LeafType, ObjectSchema, SchemaNode};
use crate::stream::DocumentStream;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use std::ops::RangeInclusive;

/// Schema shape parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaConfig {
    /// Maximum nesting levels below the root object
    pub depth: usize,
    /// Number of fields per object, drawn per object
    pub keys_count: RangeInclusive<usize>,
    /// Length of each field name, drawn per field
    pub key_length: RangeInclusive<usize>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            keys_count: 5..=10,
            key_length: 5..=10,
        }
    }
}

impl SchemaConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        if self.keys_count.is_empty() {
            return Err(GenError::range("keys count", &self.keys_count));
        }
        // A zero-length name can appear at most once per object, so redraws
        // could never terminate.
        if self.key_length.is_empty() || *self.key_length.start() == 0 {
            return Err(GenError::range("key length", &self.key_length));
        }
        // Name redraws only end while unused names remain.
        if !names_fit(&self.key_length, *self.keys_count.end()) {
            return Err(GenError::NameSpace {
                keys: *self.keys_count.end(),
                min_len: *self.key_length.start(),
                max_len: *self.key_length.end(),
            });
        }
        Ok(())
    }
}

/// Whether `lengths` admits at least `keys` distinct alphanumeric names.
fn names_fit(lengths: &RangeInclusive<usize>, keys: usize) -> bool {
    let needed = keys as u128;
    let mut available: u128 = 0;
    for len in lengths.clone() {
        let count = u32::try_from(len)
            .ok()
            .and_then(|len| fake::ALPHABET_SIZE.checked_pow(len))
            .unwrap_or(u128::MAX);
        available = available.saturating_add(count);
        if available >= needed {
            return true;
        }
    }
    available >= needed
}

/// Type choice for a single field
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldKind {
    Leaf(LeafType),
    Object,
    List,
}

const LEAF_KINDS: [FieldKind; 4] = [
    FieldKind::Leaf(LeafType::Int),
    FieldKind::Leaf(LeafType::Float),
    FieldKind::Leaf(LeafType::String),
    FieldKind::Leaf(LeafType::Bool),
];

const NESTED_KINDS: [FieldKind; 2] = [FieldKind::Object, FieldKind::List];

const ALL_KINDS: [FieldKind; 6] = [
    FieldKind::Leaf(LeafType::Int),
    FieldKind::Leaf(LeafType::Float),
    FieldKind::Leaf(LeafType::String),
    FieldKind::Leaf(LeafType::Bool),
    FieldKind::Object,
    FieldKind::List,
];

/// Synthesize an object schema.
///
/// At depth 0 only leaf types are drawn. Above it, the last field of an
/// object is forced to be an object or list when no earlier field was, so
/// every object above depth 0 has at least one nested field.
pub fn synthesize_schema<R: Rng>(
    rng: &mut R,
    config: &SchemaConfig,
) -> Result<ObjectSchema, GenError> {
    config.validate()?;
    let mut builder = SchemaBuilder { rng, config };
    Ok(builder.object(config.depth))
}

struct SchemaBuilder<'a, R> {
    rng: &'a mut R,
    config: &'a SchemaConfig,
}

impl<R: Rng> SchemaBuilder<'_, R> {
    fn object(&mut self, depth: usize) -> ObjectSchema {
        let count = self.rng.random_range(self.config.keys_count.clone());
        let mut object = ObjectSchema::with_capacity(count);
        let mut has_nested = false;

        for i in 0..count {
            let name = self.field_name(&object);

            let kind = if depth == 0 {
                self.pick(&LEAF_KINDS)
            } else if !has_nested && i == count - 1 {
                self.pick(&NESTED_KINDS)
            } else {
                self.pick(&ALL_KINDS)
            };

            let node = match kind {
                FieldKind::Leaf(leaf) => SchemaNode::Leaf(leaf),
                FieldKind::Object => {
                    has_nested = true;
                    SchemaNode::Object(self.object(depth - 1))
                }
                FieldKind::List => {
                    has_nested = true;
                    SchemaNode::List(Box::new(SchemaNode::Object(self.object(depth - 1))))
                }
            };
            object.push(name, node);
        }

        object
    }

    /// Redraws length and characters until the name is free.
    fn field_name(&mut self, object: &ObjectSchema) -> String {
        loop {
            let len = self.rng.random_range(self.config.key_length.clone());
            let name = fake::alphanumeric(&mut *self.rng, len);
            if !object.contains(&name) {
                return name;
            }
        }
    }

    fn pick(&mut self, kinds: &[FieldKind]) -> FieldKind {
        kinds[self.rng.random_range(0..kinds.len())]
    }
}

/// Seeded generator owning its own random stream.
///
/// All calls draw from the same stream in call order, so a fixed seed and a
/// fixed call sequence reproduce the same output.
pub struct Generator {
    rng: ChaCha8Rng,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    pub fn schema(&mut self, config: &SchemaConfig) -> Result<ObjectSchema, GenError> {
        synthesize_schema(&mut self.rng, config)
    }

    pub fn document(
        &mut self,
        schema: &ObjectSchema,
        config: &DocumentConfig,
    ) -> Result<Value, GenError> {
        document::synthesize_document(&mut self.rng, schema, config)
    }

    pub fn documents(
        &mut self,
        schema: &ObjectSchema,
        count: usize,
        config: &DocumentConfig,
    ) -> Result<Vec<Value>, GenError> {
        document::synthesize_documents(&mut self.rng, schema, count, config)
    }

    /// Lazily generate `count` documents from this generator's stream.
    pub fn stream<'a>(
        &'a mut self,
        schema: &'a ObjectSchema,
        count: usize,
        config: &DocumentConfig,
    ) -> Result<DocumentStream<'a, ChaCha8Rng>, GenError> {
        DocumentStream::new(&mut self.rng, schema, count, config)
    }

    pub fn partial_request(
        &mut self,
        schema: &ObjectSchema,
        request_ratio: f64,
    ) -> Result<Vec<String>, GenError> {
        request::sample_field_paths(&mut self.rng, schema, request_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_depth_bound(object: &ObjectSchema, depth: usize) {
        for field in object.fields() {
            match &field.node {
                SchemaNode::Leaf(_) => {}
                SchemaNode::Object(inner) => {
                    assert!(depth > 0, "nested field `{}` below depth 0", field.name);
                    assert_depth_bound(inner, depth - 1);
                }
                SchemaNode::List(element) => {
                    assert!(depth > 0, "list field `{}` below depth 0", field.name);
                    match element.as_ref() {
                        SchemaNode::Object(inner) => assert_depth_bound(inner, depth - 1),
                        other => panic!("generated list element is not an object: {:?}", other),
                    }
                }
            }
        }
    }

    fn for_each_object(object: &ObjectSchema, depth: usize, f: &mut dyn FnMut(&ObjectSchema, usize)) {
        f(object, depth);
        for field in object.fields() {
            match &field.node {
                SchemaNode::Leaf(_) => {}
                SchemaNode::Object(inner) => for_each_object(inner, depth - 1, f),
                SchemaNode::List(element) => {
                    if let SchemaNode::Object(inner) = element.as_ref() {
                        for_each_object(inner, depth - 1, f);
                    }
                }
            }
        }
    }

    fn config(depth: usize) -> SchemaConfig {
        SchemaConfig {
            depth,
            keys_count: 2..=5,
            key_length: 3..=6,
        }
    }

    #[test]
    fn test_schema_deterministic() {
        let a = Generator::new(42).schema(&config(4)).unwrap();
        let b = Generator::new(42).schema(&config(4)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_json_string(), b.to_json_string());

        let c = Generator::new(43).schema(&config(4)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_depth_bound() {
        for seed in 0..50 {
            for depth in 0..4 {
                let schema = Generator::new(seed).schema(&config(depth)).unwrap();
                assert_depth_bound(&schema, depth);
                // Forced nesting makes every level reachable.
                assert_eq!(schema.depth(), depth, "seed {} depth {}", seed, depth);
            }
        }
    }

    #[test]
    fn test_depth_zero_is_flat() {
        let schema = Generator::new(1).schema(&config(0)).unwrap();
        assert!(schema.fields().iter().all(|f| !f.node.is_nested()));
    }

    #[test]
    fn test_every_object_above_zero_has_nested_field() {
        for seed in 0..50 {
            let schema = Generator::new(seed).schema(&config(3)).unwrap();
            for_each_object(&schema, 3, &mut |object, depth| {
                if depth > 0 {
                    assert!(
                        object.fields().iter().any(|f| f.node.is_nested()),
                        "object at depth {} has no nested field",
                        depth
                    );
                }
            });
        }
    }

    #[test]
    fn test_field_names_unique_and_sized() {
        // Single-character names from 62 symbols force frequent redraws.
        let config = SchemaConfig {
            depth: 2,
            keys_count: 30..=40,
            key_length: 1..=1,
        };
        for seed in 0..10 {
            let schema = Generator::new(seed).schema(&config).unwrap();
            for_each_object(&schema, 2, &mut |object, _| {
                let mut names: Vec<&str> =
                    object.fields().iter().map(|f| f.name.as_str()).collect();
                assert!(names.iter().all(|n| n.len() == 1));
                names.sort_unstable();
                names.dedup();
                assert_eq!(names.len(), object.len());
            });
        }
    }

    #[test]
    fn test_keys_count_within_range() {
        let schema = Generator::new(9).schema(&config(2)).unwrap();
        for_each_object(&schema, 2, &mut |object, _| {
            assert!((2..=5).contains(&object.len()));
        });
    }

    #[test]
    fn test_invalid_ranges() {
        let mut gen = Generator::new(0);

        #[allow(clippy::reversed_empty_ranges)]
        let bad_count = SchemaConfig {
            keys_count: 5..=2,
            ..SchemaConfig::default()
        };
        assert!(matches!(
            gen.schema(&bad_count),
            Err(GenError::InvalidRange { what: "keys count", min: 5, max: 2 })
        ));

        let zero_length = SchemaConfig {
            key_length: 0..=4,
            ..SchemaConfig::default()
        };
        assert!(matches!(
            gen.schema(&zero_length),
            Err(GenError::InvalidRange { what: "key length", .. })
        ));
    }

    #[test]
    fn test_short_lengths_spill_into_longer_names() {
        // 62 one-character names run out well before 200 fields.
        let config = SchemaConfig {
            depth: 0,
            keys_count: 200..=200,
            key_length: 1..=3,
        };
        config.validate().unwrap();

        let schema = Generator::new(1).schema(&config).unwrap();
        assert_eq!(schema.len(), 200);
        let mut names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert!(names.iter().all(|n| (1..=3).contains(&n.len())));
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 200);
    }

    #[test]
    fn test_key_length_too_narrow_for_keys_count() {
        let too_many = SchemaConfig {
            depth: 0,
            keys_count: 10..=63,
            key_length: 1..=1,
        };
        assert!(matches!(
            Generator::new(0).schema(&too_many),
            Err(GenError::NameSpace { keys: 63, min_len: 1, max_len: 1 })
        ));

        let exactly_full = SchemaConfig {
            depth: 0,
            keys_count: 62..=62,
            key_length: 1..=1,
        };
        assert_eq!(Generator::new(0).schema(&exactly_full).unwrap().len(), 62);

        let wide = SchemaConfig {
            keys_count: 1..=usize::MAX,
            key_length: 1..=usize::MAX,
            ..SchemaConfig::default()
        };
        wide.validate().unwrap();
    }

    #[test]
    fn test_empty_objects_allowed() {
        let config = SchemaConfig {
            depth: 3,
            keys_count: 0..=0,
            key_length: 1..=2,
        };
        let schema = Generator::new(5).schema(&config).unwrap();
        assert!(schema.is_empty());
    }
}
