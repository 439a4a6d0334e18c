//! Transformation module.
//!
//! - Remap: the row transformer
//! - Pipeline: read, remap and write a whole run

pub mod pipeline;
pub mod remap;

pub use pipeline::*;
pub use remap::{RemappedRow, RowTransformer};
