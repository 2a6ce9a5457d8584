//! Value module - In-memory representation of JSON/YAML documents.
//!
//! Every pass in this crate reads and rewrites trees of [`Value`].

mod value;

pub use value::*;
