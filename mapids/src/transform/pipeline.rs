//! End-to-end remapping run.
//!
//! Combines every step: load the mapping table, read the inputs, transform
//! each row and write it to the output sink.
//!
//! # Example
//!
//! ```rust,ignore
//! use mapids::{run, RemapOptions};
//!
//! let summary = run(&RemapOptions::default())?;
//! println!("Wrote {} rows", summary.rows);
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::remap::RowTransformer;
use crate::config::{NameFallback, RemapOptions, STDIO_PATH};
use crate::error::{OutputError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::mapping::MappingTable;
use crate::parser::{format_delimiter, read_inputs, InputSource};

/// Counters collected while writing rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemapStats {
    /// Rows written
    pub rows: usize,
    /// Rows whose user identifier was found in the table
    pub users_mapped: usize,
    /// Rows whose author identifier was found in the table
    pub authors_mapped: usize,
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: RemapStats,
    /// Entries in the mapping table
    pub mapping_entries: usize,
    /// Delimiter used for input and output
    pub delimiter: char,
    /// Input encoding(s)
    pub encoding: String,
}

/// Run a complete remapping.
///
/// Steps, each fatal on failure:
/// 1. Load the mapping table
/// 2. Read and decode every input
/// 3. Open the output sink
/// 4. Transform and write each row, stopping at the first malformed one
pub fn run(options: &RemapOptions) -> PipelineResult<RunSummary> {
    log_info(format!("📖 Loading mapping: {}", options.mapping_path.display()));
    let table = MappingTable::load(&options.mapping_path)?;
    if table.is_empty() {
        log_warning("Mapping table is empty, every row will pass through");
    } else {
        log_success(format!("{} mapping entries", table.len()));
    }

    let sources = InputSource::from_args(&options.inputs);
    log_info(format!("📄 Reading {} input(s)...", sources.len()));
    for source in &sources {
        log_info_indent(source.name(), 1);
    }
    let parsed = read_inputs(&sources, options.delimiter)?;
    log_success(format!("Encoding: {}", parsed.encoding));
    log_success(format!(
        "Delimiter: '{}'{}",
        format_delimiter(parsed.delimiter),
        if options.delimiter.is_none() { " (auto-detected)" } else { "" }
    ));
    log_success(format!("Read {} rows", parsed.records.len()));

    let sink = open_output(&options.output_path)?;

    log_info("⚙️  Remapping identifiers...");
    let stats = remap_to_writer(
        &table,
        &parsed.records,
        sink,
        parsed.delimiter,
        options.name_fallback,
    )?;
    print_stats(&stats);
    log_success(format!("💾 Output written to: {}", options.output_path.display()));

    Ok(RunSummary {
        stats,
        mapping_entries: table.len(),
        delimiter: parsed.delimiter as char,
        encoding: parsed.encoding,
    })
}

/// Open the output sink; `-` is stdout.
pub fn open_output(path: &Path) -> Result<Box<dyn Write>, OutputError> {
    if path == Path::new(STDIO_PATH) {
        return Ok(Box::new(std::io::stdout()));
    }
    let file = File::create(path).map_err(|source| OutputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(file))
}

/// Transform `records` and write each one to `writer` as it is produced.
///
/// Output uses the given delimiter with minimal quoting. Rows written before
/// a malformed row stay in the sink.
pub fn remap_to_writer<W: Write>(
    table: &MappingTable,
    records: &[Vec<String>],
    writer: W,
    delimiter: u8,
    name_fallback: NameFallback,
) -> PipelineResult<RemapStats> {
    let transformer = RowTransformer::new(table).with_name_fallback(name_fallback);
    let mut out = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);

    let mut stats = RemapStats::default();
    for (index, record) in records.iter().enumerate() {
        let remapped = transformer.remap(index, record.as_slice())?;
        out.write_record(&remapped.fields).map_err(OutputError::Write)?;

        stats.rows += 1;
        stats.users_mapped += usize::from(remapped.user_mapped);
        stats.authors_mapped += usize::from(remapped.author_mapped);
    }
    out.flush().map_err(OutputError::Flush)?;

    Ok(stats)
}

fn print_stats(stats: &RemapStats) {
    log_success(format!("Wrote {} rows", stats.rows));
    log_info_indent(format!("users mapped: {}/{}", stats.users_mapped, stats.rows), 1);
    log_info_indent(format!("authors mapped: {}/{}", stats.authors_mapped, stats.rows), 1);
    if stats.rows > 0 && stats.users_mapped == 0 && stats.authors_mapped == 0 {
        log_warning("No identifier matched the mapping table");
    }
}
