//! Error types for the identifier remapping pipeline.
//!
//! One enum per concern, composed into [`PipelineError`]:
//!
//! - [`MappingError`] - mapping document could not be read or parsed
//! - [`CsvError`] - input could not be read, decoded or split into records
//! - [`RowError`] - an input record does not fit the fixed column layout
//! - [`OutputError`] - output sink could not be opened or written
//! - [`PipelineError`] - top-level run errors
//!
//! Conversion is automatic via `From`, so `?` works across boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Mapping Errors
// =============================================================================

/// Errors while loading the mapping table.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Mapping file is missing or unreadable.
    #[error("Cannot read mapping file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mapping document is not an object of `{ "id", "name" }` entries.
    #[error("Malformed mapping file '{}': {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Mapping document given inline (no file) is malformed.
    #[error("Malformed mapping document: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading and splitting the input.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Input file or stdin could not be read.
    #[error("Cannot read input '{source_name}': {source}")]
    Read {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// Bytes could not be decoded with the detected encoding.
    #[error("Cannot decode input as {encoding}: {message}")]
    Encoding { encoding: String, message: String },

    /// Record-level CSV syntax error.
    #[error("Invalid CSV in '{source_name}': {source}")]
    Parse {
        source_name: String,
        #[source]
        source: csv::Error,
    },
}

// =============================================================================
// Row Errors
// =============================================================================

/// Errors for a single input record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    /// The record is shorter than the fixed layout requires.
    #[error("Row {row}: expected at least {required} columns, found {found}")]
    TooFewColumns {
        row: usize,
        found: usize,
        required: usize,
    },
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors on the output sink.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output path could not be opened for writing.
    #[error("Cannot open output '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing a record failed.
    #[error("Cannot write output: {0}")]
    Write(#[from] csv::Error),

    /// Final flush failed.
    #[error("Cannot flush output: {0}")]
    Flush(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level run errors, returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Mapping table could not be loaded.
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Input could not be read.
    #[error("Input error: {0}")]
    Csv(#[from] CsvError),

    /// An input row is malformed.
    #[error("Row error: {0}")]
    Row(#[from] RowError),

    /// Output could not be written.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for input parsing.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
