//! Run configuration.
//!
//! Fixed column layout of the export, default locations, and the options
//! struct the pipeline is driven by. CLI flags and `MAPIDS_*` environment
//! variables override the defaults.

use std::path::PathBuf;

/// Default mapping document, relative to the working directory.
pub const DEFAULT_MAPPING_PATH: &str = "./mapping.json";

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "./out.csv";

/// Environment variable overriding the mapping path.
pub const MAPPING_ENV: &str = "MAPIDS_MAPPING";

/// Environment variable overriding the output path.
pub const OUTPUT_ENV: &str = "MAPIDS_OUTPUT";

/// Path argument meaning stdin (input) or stdout (output).
pub const STDIO_PATH: &str = "-";

/// Column holding the user identifier.
pub const USER_ID_COLUMN: usize = 1;

/// Column holding the user name.
pub const USER_NAME_COLUMN: usize = 2;

/// Column holding the author identifier.
pub const AUTHOR_ID_COLUMN: usize = 3;

/// Column holding the author name.
pub const AUTHOR_NAME_COLUMN: usize = 4;

/// Minimum number of columns an input row must have.
pub const REQUIRED_COLUMNS: usize = AUTHOR_NAME_COLUMN + 1;

/// Which raw value fills a name slot when its identifier is not mapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum NameFallback {
    /// Keep the input's own name column (`row[2]` / `row[4]`).
    #[default]
    Column,
    /// Repeat the raw identifier (`row[1]` / `row[3]`).
    Identifier,
}

/// Options for a remapping run
#[derive(Debug, Clone)]
pub struct RemapOptions {
    /// Mapping document path
    pub mapping_path: PathBuf,

    /// Input files, read in order; empty means stdin
    pub inputs: Vec<PathBuf>,

    /// Output file, `-` for stdout
    pub output_path: PathBuf,

    /// Field delimiter (auto-detect if not specified)
    pub delimiter: Option<u8>,

    /// Name slot fallback for unmapped identifiers
    pub name_fallback: NameFallback,
}

impl Default for RemapOptions {
    fn default() -> Self {
        Self {
            mapping_path: PathBuf::from(DEFAULT_MAPPING_PATH),
            inputs: Vec::new(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            delimiter: None,
            name_fallback: NameFallback::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RemapOptions::default();
        assert_eq!(opts.mapping_path, PathBuf::from("./mapping.json"));
        assert_eq!(opts.output_path, PathBuf::from("./out.csv"));
        assert!(opts.inputs.is_empty());
        assert!(opts.delimiter.is_none());
        assert_eq!(opts.name_fallback, NameFallback::Column);
    }

    #[test]
    fn test_layout_requires_five_columns() {
        assert_eq!(REQUIRED_COLUMNS, 5);
    }
}
