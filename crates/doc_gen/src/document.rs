//! Document synthesis against a schema.
//!
//! Every schema key is present in every generated document. Leaf values are
//! replaced with `null` with probability `sparsity`, drawn per leaf.

use crate::error::{is_probability, GenError};
use crate::fake;
use crate::schema::{LeafType, ObjectSchema, SchemaNode};
use rand::Rng;
use serde_json::{Map, Value};
use std::ops::RangeInclusive;

/// Document generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentConfig {
    /// Probability that a leaf value is `null`
    pub sparsity: f64,
    /// Element count of each generated list, drawn per list
    pub list_size: RangeInclusive<usize>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            sparsity: 0.05,
            list_size: 5..=20,
        }
    }
}

impl DocumentConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        if !is_probability(self.sparsity) {
            return Err(GenError::InvalidSparsity(self.sparsity));
        }
        if self.list_size.is_empty() {
            return Err(GenError::range("list size", &self.list_size));
        }
        Ok(())
    }
}

/// Generate one document for `schema`.
pub fn synthesize_document<R: Rng>(
    rng: &mut R,
    schema: &ObjectSchema,
    config: &DocumentConfig,
) -> Result<Value, GenError> {
    config.validate()?;
    Ok(object_document(rng, schema, config))
}

/// Generate `count` independent documents from one stream.
pub fn synthesize_documents<R: Rng>(
    rng: &mut R,
    schema: &ObjectSchema,
    count: usize,
    config: &DocumentConfig,
) -> Result<Vec<Value>, GenError> {
    config.validate()?;
    Ok((0..count)
        .map(|_| object_document(rng, schema, config))
        .collect())
}

/// `config` must already be validated.
pub(crate) fn object_document<R: Rng>(
    rng: &mut R,
    schema: &ObjectSchema,
    config: &DocumentConfig,
) -> Value {
    let mut doc = Map::with_capacity(schema.len());
    for field in schema.fields() {
        doc.insert(field.name.clone(), node_value(rng, &field.node, config));
    }
    Value::Object(doc)
}

fn node_value<R: Rng>(rng: &mut R, node: &SchemaNode, config: &DocumentConfig) -> Value {
    match node {
        SchemaNode::Leaf(leaf) => {
            if rng.random::<f64>() < config.sparsity {
                Value::Null
            } else {
                leaf_value(rng, *leaf)
            }
        }
        SchemaNode::Object(object) => object_document(rng, object, config),
        SchemaNode::List(element) => {
            let len = rng.random_range(config.list_size.clone());
            Value::Array((0..len).map(|_| node_value(rng, element, config)).collect())
        }
    }
}

fn leaf_value<R: Rng>(rng: &mut R, leaf: LeafType) -> Value {
    match leaf {
        LeafType::Int => Value::from(fake::int(rng)),
        LeafType::Float => Value::from(fake::float(rng)),
        LeafType::String => Value::String(fake::string(rng)),
        LeafType::Bool => Value::Bool(fake::boolean(rng)),
    }
}
