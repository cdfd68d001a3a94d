//! Schema model for generated documents.
//!
//! A schema is a tree of [`SchemaNode`]s rooted at an [`ObjectSchema`]. Its JSON
//! form is the one the external CLI reads with `--schema-path`:
//!
//! ```json
//! {"id": "int", "tags": [{"label": "string"}], "meta": {"score": "float"}}
//! ```
//!
//! Objects map to JSON objects, lists to a one-element array holding the
//! element schema, and leaves to their type tag.

use crate::error::GenError;
use serde_json::{Map, Value};
use std::fmt;

/// Scalar types a leaf field can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafType {
    Int,
    /// Written as `float`; `double` is accepted on input
    Float,
    String,
    Bool,
}

impl LeafType {
    pub const ALL: [LeafType; 4] = [
        LeafType::Int,
        LeafType::Float,
        LeafType::String,
        LeafType::Bool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeafType::Int => "int",
            LeafType::Float => "float",
            LeafType::String => "string",
            LeafType::Bool => "bool",
        }
    }
}

impl std::str::FromStr for LeafType {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(LeafType::Int),
            "float" | "double" => Ok(LeafType::Float),
            "string" => Ok(LeafType::String),
            "bool" => Ok(LeafType::Bool),
            _ => Err(GenError::UnknownType(s.to_string())),
        }
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Leaf(LeafType),
    Object(ObjectSchema),
    /// Homogeneous list; the node describes every element
    List(Box<SchemaNode>),
}

impl SchemaNode {
    /// Nesting levels below and including this node.
    ///
    /// A list and the object it wraps count as a single level, matching how
    /// the generator spends one unit of depth on either.
    pub fn depth(&self) -> usize {
        match self {
            SchemaNode::Leaf(_) => 0,
            SchemaNode::Object(object) => 1 + object.depth(),
            SchemaNode::List(element) => match element.as_ref() {
                SchemaNode::Object(object) => 1 + object.depth(),
                other => 1 + other.depth(),
            },
        }
    }

    pub fn is_nested(&self) -> bool {
        !matches!(self, SchemaNode::Leaf(_))
    }

    pub fn to_json(&self) -> Value {
        match self {
            SchemaNode::Leaf(leaf) => Value::String(leaf.as_str().to_string()),
            SchemaNode::Object(object) => object.to_json(),
            SchemaNode::List(element) => Value::Array(vec![element.to_json()]),
        }
    }

    fn from_json(name: &str, value: &Value) -> Result<Self, GenError> {
        match value {
            Value::String(tag) => Ok(SchemaNode::Leaf(tag.parse()?)),
            Value::Object(map) => Ok(SchemaNode::Object(ObjectSchema::from_map(map)?)),
            Value::Array(items) => match items.as_slice() {
                [element] => Ok(SchemaNode::List(Box::new(SchemaNode::from_json(
                    name, element,
                )?))),
                _ => Err(GenError::InvalidSchema(format!(
                    "list field `{}` must hold exactly one element schema, found {}",
                    name,
                    items.len()
                ))),
            },
            other => Err(GenError::UnknownType(other.to_string())),
        }
    }
}

/// A named field of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub node: SchemaNode,
}

/// Object schema with uniquely named fields in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    fields: Vec<Field>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Parse a schema from its JSON text.
    pub fn parse(text: &str) -> Result<Self, GenError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    /// Build a schema from its JSON form. The root must be an object.
    pub fn from_json(value: &Value) -> Result<Self, GenError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(GenError::InvalidSchema(
                "schema root must be a JSON object".to_string(),
            )),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self, GenError> {
        let mut object = Self::with_capacity(map.len());
        for (name, value) in map {
            object.push(name.clone(), SchemaNode::from_json(name, value)?);
        }
        Ok(object)
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.node.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Compact JSON text, field order preserved
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Add a field, rejecting a name already present.
    pub fn insert(&mut self, name: impl Into<String>, node: SchemaNode) -> Result<(), GenError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(GenError::InvalidSchema(format!(
                "duplicate field name `{}`",
                name
            )));
        }
        self.push(name, node);
        Ok(())
    }

    /// Callers guarantee `name` is not present yet.
    pub(crate) fn push(&mut self, name: String, node: SchemaNode) {
        self.fields.push(Field { name, node });
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.node)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deepest nesting level reachable from this object (0 for a flat object).
    pub fn depth(&self) -> usize {
        self.fields.iter().map(|f| f.node.depth()).max().unwrap_or(0)
    }

    /// Number of leaf fields in the whole tree
    pub fn leaf_count(&self) -> usize {
        self.fields.iter().map(|f| node_leaf_count(&f.node)).sum()
    }

    /// Number of object nodes in the whole tree, this one included
    pub fn object_count(&self) -> usize {
        1 + self
            .fields
            .iter()
            .map(|f| node_object_count(&f.node))
            .sum::<usize>()
    }
}

fn node_leaf_count(node: &SchemaNode) -> usize {
    match node {
        SchemaNode::Leaf(_) => 1,
        SchemaNode::Object(object) => object.leaf_count(),
        SchemaNode::List(element) => node_leaf_count(element),
    }
}

fn node_object_count(node: &SchemaNode) -> usize {
    match node {
        SchemaNode::Leaf(_) => 0,
        SchemaNode::Object(object) => object.object_count(),
        SchemaNode::List(element) => node_object_count(element),
    }
}
