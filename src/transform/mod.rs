//! Transform module - Passes applied to a merged document before SDK generation.

mod nullable;
mod property_map;
mod prune;

pub use nullable::*;
pub use property_map::*;
pub use prune::*;
