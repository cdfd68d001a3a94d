//! Synthetic document generator for docbench.
//!
//! Builds random nested schemas, documents that conform to them, and partial
//! field-path requests for selective reads. Every function takes an explicit
//! random stream, so output is reproducible from a seed.
//!
//! # Example
//!
//! ```rust
//! use doc_gen::{DocumentConfig, Generator, SchemaConfig};
//!
//! // Same seed, same schema, same documents
//! let mut gen = Generator::new(42);
//! let schema = gen.schema(&SchemaConfig::default()).unwrap();
//! let docs = gen.documents(&schema, 10, &DocumentConfig::default()).unwrap();
//! let paths = gen.partial_request(&schema, 0.5).unwrap();
//!
//! assert_eq!(docs.len(), 10);
//! println!("{} -> {:?}", schema.to_json_string(), paths);
//! ```

pub mod document;
pub mod error;
pub mod fake;
pub mod generator;
pub mod request;
pub mod schema;
pub mod stream;

pub use document::{synthesize_document, synthesize_documents, DocumentConfig};
pub use error::GenError;
pub use generator::{synthesize_schema, Generator, SchemaConfig};
pub use request::{leaf_paths, sample_field_paths};
pub use schema::{Field, LeafType, ObjectSchema, SchemaNode};
pub use stream::{task_rng, DocumentStream};
