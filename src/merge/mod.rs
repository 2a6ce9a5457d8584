//! Merge module - Combining API specification documents.
//!
//! [`deep`] holds the generic tree merge; the other submodules apply
//! domain rules for endpoints, shared definitions and servers, and
//! [`merge_documents`] drives them over whole documents.

pub mod components;
pub mod deep;
mod document;
pub mod paths;
pub mod servers;

#[cfg(test)]
mod merge_test;

pub use components::merge_components;
pub use deep::{merge, merge_into, merge_value, union_lists};
pub use document::*;
pub use paths::{merge_operation, merge_paths};
pub use servers::merge_servers;
