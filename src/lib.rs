//! REST documentation snippets from statically-declared type descriptors.
//!
//! This library generates API documentation field tables by walking the
//! serialized shape of request/response types, merging in doc comments
//! extracted at compile time and validation-constraint metadata. It handles
//! cyclic and polymorphic type graphs: every reachable type is expanded at
//! most once per branch, and polymorphic subtypes are fanned out and merged
//! onto shared JSON paths.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`types`] - Statically-declared type descriptor tables and the type index
//! 2. [`docstore`] - Reads pre-extracted doc comments from side-channel JSON files
//! 3. [`constraints`] - Resolves validation constraints into human-readable text
//! 4. [`registry`] - Tracks already-expanded types per branch to terminate cycles
//! 5. [`generator`] - Walks a root type and accumulates one descriptor per JSON path
//! 6. [`params`] - Documents path/query/header parameters of handler methods
//! 7. [`snippet`] - Assembles descriptors into Markdown/AsciiDoc/JSON/YAML tables
//!
//! # Example Usage
//!
//! ```no_run
//! use restdocs_from_types::{
//!     constraints::ConstraintReader,
//!     docstore::DocStore,
//!     generator::FieldDocumentationGenerator,
//!     snippet,
//!     types::{Property, ScalarKind, TypeDescriptor, TypeIndex, TypeRef},
//! };
//! use std::path::PathBuf;
//!
//! // Describe the documented types once, at a build step
//! let mut index = TypeIndex::new();
//! index.register(TypeDescriptor::object(
//!     "com.example.Person",
//!     vec![
//!         Property::new("name", "name", TypeRef::Scalar(ScalarKind::String)),
//!         Property::new("age", "age", TypeRef::Scalar(ScalarKind::Integer)),
//!     ],
//! ));
//!
//! // Point the doc store at the extracted doc-comment files
//! let docs = DocStore::new(vec![PathBuf::from("./generated-javadoc-json")]);
//! let reader = ConstraintReader::new();
//!
//! // Generate the field table for a root type
//! let generator = FieldDocumentationGenerator::new(&index, &docs, &reader);
//! let fields = generator.generate("com.example.Person").unwrap();
//! let table = snippet::to_markdown(&snippet::rows(&fields));
//! println!("{}", table);
//! ```

pub mod constraints;
pub mod docstore;
pub mod error;
pub mod generator;
pub mod params;
pub mod registry;
pub mod snippet;
pub mod types;

pub use error::{Error, Result};
