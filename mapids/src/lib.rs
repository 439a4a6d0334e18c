//! # Mapids - reconcile identifier columns against a mapping table
//!
//! Mapids rewrites the user and author identifier columns of a CSV export
//! after a data migration, using a JSON table of canonical `{ id, name }`
//! entries, and numbers every row.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│    Remap    │────▶│   out.csv   │
//! │  (any enc.) │     │ (auto-delim)│     │ mapping.json│     │ (same delim)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mapids::{MappingTable, RowTransformer};
//!
//! let table = MappingTable::load("mapping.json")?;
//! let transformer = RowTransformer::new(&table);
//! let row = transformer.transform_row(0, &["x", "u1", "", "a9", ""])?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Column layout, defaults and run options
//! - [`logs`] - Leveled logs on stderr
//! - [`models`] - Mapping entries and lookups
//! - [`mapping`] - Mapping table loading
//! - [`parser`] - CSV input with auto-detection
//! - [`transform`] - Row transformer and pipeline

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Mapping table
pub mod mapping;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{NameFallback, RemapOptions};

pub use error::{CsvError, MappingError, OutputError, PipelineError, RowError};

pub use models::{Lookup, MappingEntry};

pub use mapping::MappingTable;

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_records,
    read_input, read_inputs, InputSource, ParseResult,
};

pub use transform::{
    open_output, remap_to_writer, run, RemapStats, RemappedRow, RowTransformer, RunSummary,
};
