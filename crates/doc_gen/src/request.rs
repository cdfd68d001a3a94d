//! Partial-request sampling: field paths for selective reads.
//!
//! Paths join object field names with `.`. Lists add no segment, so a leaf
//! `name` inside list field `items` is addressed as `items.name`.

use crate::error::{is_probability, GenError};
use crate::schema::{ObjectSchema, SchemaNode};
use rand::Rng;

/// Sample leaf paths of `schema`, each kept with probability `request_ratio`.
///
/// Paths come back in schema traversal order and never repeat.
pub fn sample_field_paths<R: Rng>(
    rng: &mut R,
    schema: &ObjectSchema,
    request_ratio: f64,
) -> Result<Vec<String>, GenError> {
    if !is_probability(request_ratio) {
        return Err(GenError::InvalidRatio(request_ratio));
    }

    let mut paths = Vec::new();
    walk_object(schema, "", &mut |path: &str| {
        if rng.random::<f64>() < request_ratio {
            paths.push(path.to_string());
        }
    });
    Ok(paths)
}

/// Every leaf path of `schema`, in traversal order.
pub fn leaf_paths(schema: &ObjectSchema) -> Vec<String> {
    let mut paths = Vec::new();
    walk_object(schema, "", &mut |path: &str| paths.push(path.to_string()));
    paths
}

fn walk_object(object: &ObjectSchema, prefix: &str, visit: &mut dyn FnMut(&str)) {
    for field in object.fields() {
        let path = join_path(prefix, &field.name);
        walk_node(&field.node, &path, visit);
    }
}

fn walk_node(node: &SchemaNode, path: &str, visit: &mut dyn FnMut(&str)) {
    match node {
        SchemaNode::Leaf(_) => visit(path),
        SchemaNode::Object(object) => walk_object(object, path, visit),
        SchemaNode::List(element) => walk_node(element, path, visit),
    }
}

/// Append `name` to `prefix`, escaping `\` and `.` inside the name.
pub fn join_path(prefix: &str, name: &str) -> String {
    let segment = escape_segment(name);
    if prefix.is_empty() {
        segment
    } else {
        format!("{}.{}", prefix, segment)
    }
}

fn escape_segment(name: &str) -> String {
    if !name.contains(['.', '\\']) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 2);
    for ch in name.chars() {
        if ch == '.' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
