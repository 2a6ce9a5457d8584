//! Compare module - Field-mode classification across two API documents.
//!
//! The datacenter and campus variants of a vendor API expose overlapping
//! request bodies. A [`Comparator`] splits every body field into common,
//! datacenter-only and campus-only, and a [`LookupTable`] flattens the result
//! for consumers that need to ask whether a field applies to a mode.

mod comparator;
mod field;
mod lookup;

pub use comparator::*;
pub use field::{FieldInfo, FieldMode, Mode};
pub use lookup::*;
