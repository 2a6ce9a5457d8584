//! Schema module - Typed access to OpenAPI schema nodes.
//!
//! Schema nodes stay plain [`Map`](crate::value::Map)s inside the document so
//! the merge engine can treat them generically; passes that care about the
//! type discriminator go through [`SchemaType`] and [`SchemaNode`].

mod node;

pub use node::*;
