//! # Schema Unify
//!
//! Merges vendor-specific API specification documents (OpenAPI JSON or YAML)
//! into one unified specification fit for SDK generation.
//!
//! A run loads a base document and its overlays, deep merges them with
//! type-aware rules, then prunes unwanted endpoints, makes numeric fields
//! nullable and turns single-key nested objects into dynamic maps. Two
//! independent tools reuse the same tree model: a field-mode comparator for
//! the datacenter and campus variants of an API, and a partial-attribute
//! merger for infrastructure test fixtures.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of JSON/YAML trees
//! - [`document`] - Loading and serializing specification documents
//! - [`schema`] - Typed view over schema nodes
//! - [`merge`] - Deep merge and the endpoint, component and server mergers
//! - [`transform`] - Pruning, nullability and property-to-map passes
//! - [`pipeline`] - All passes in order
//! - [`compare`] - Field-mode comparison and lookup tables
//! - [`fixture`] - Partial resource overrides for test fixtures
//! - [`config`] - Exclusion lists and limits

pub mod compare;
pub mod config;
pub mod document;
pub mod error;
pub mod fixture;
pub mod merge;
pub mod pipeline;
pub mod schema;
pub mod transform;
pub mod value;

pub use compare::{Comparator, ComparisonReport, FieldMode, LookupTable, Mode, Scope};
pub use config::{Config, Exclusions};
pub use document::{Document, Format};
pub use error::{ConfigError, Error, LoadError, Result, StructureError};
pub use fixture::{merge_resources, render_resources, ResourceSet};
pub use merge::{merge_all, merge_documents};
pub use pipeline::{Pipeline, PipelineReport, Stage};
pub use schema::{SchemaNode, SchemaType};
pub use value::{Map, Value};
