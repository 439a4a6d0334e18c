//! Mapids CLI - remap identifier columns of a CSV export
//!
//! # Main Command
//!
//! ```bash
//! mapids export.csv                    # -> ./out.csv using ./mapping.json
//! mapids -m ids.json -o - < export.csv # stdin to stdout
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! mapids check-mapping --list          # Load and list the mapping table
//! mapids parse export.csv              # Show how the input is split
//! ```

use clap::{Args, Parser, Subcommand};
use mapids::config::{
    DEFAULT_MAPPING_PATH, DEFAULT_OUTPUT_PATH, MAPPING_ENV, OUTPUT_ENV, REQUIRED_COLUMNS,
};
use mapids::logs::{log_error, log_info, log_info_indent, log_success, log_warning, LogFormat, LOGGER};
use mapids::parser::format_delimiter;
use mapids::{read_inputs, run, InputSource, MappingTable, NameFallback, RemapOptions};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mapids")]
#[command(about = "Rewrite user/author identifier columns of a CSV export from a JSON mapping", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    remap: RemapArgs,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
}

#[derive(Args, Clone)]
struct RemapArgs {
    /// Input CSV files, read in order (default: stdin, `-` for stdin)
    inputs: Vec<PathBuf>,

    /// Mapping JSON file
    #[arg(short, long, env = MAPPING_ENV, default_value = DEFAULT_MAPPING_PATH)]
    mapping: PathBuf,

    /// Output CSV file (`-` for stdout)
    #[arg(short, long, env = OUTPUT_ENV, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// What fills a name column when its identifier is not mapped
    #[arg(long, value_enum, default_value_t = NameFallback::Column)]
    name_fallback: NameFallback,
}

impl From<RemapArgs> for RemapOptions {
    fn from(args: RemapArgs) -> Self {
        Self {
            mapping_path: args.mapping,
            inputs: args.inputs,
            output_path: args.output,
            delimiter: args.delimiter,
            name_fallback: args.name_fallback,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Remap identifiers (default when no command is given)
    Remap(RemapArgs),

    /// Load the mapping file and report on it
    CheckMapping {
        /// Mapping JSON file
        #[arg(short, long, env = MAPPING_ENV, default_value = DEFAULT_MAPPING_PATH)]
        mapping: PathBuf,

        /// Print every entry
        #[arg(short, long)]
        list: bool,
    },

    /// Parse CSV input and print its records as JSON
    Parse {
        /// Input CSV files (default: stdin)
        inputs: Vec<PathBuf>,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,
    },
}

fn main() {
    // Load .env file (if present) before clap reads MAPIDS_* variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.configure(cli.quiet, cli.log_format);

    let result = match cli.command {
        Some(Commands::Remap(args)) => cmd_remap(args),
        Some(Commands::CheckMapping { mapping, list }) => cmd_check_mapping(&mapping, list),
        Some(Commands::Parse { inputs, delimiter }) => cmd_parse(&inputs, delimiter),
        None => cmd_remap(cli.remap),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_remap(args: RemapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = RemapOptions::from(args);
    let summary = run(&options)?;

    log_info(format!(
        "✨ Done! {} rows, {} mapping entries",
        summary.stats.rows, summary.mapping_entries
    ));
    Ok(())
}

fn cmd_check_mapping(path: &Path, list: bool) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📖 Checking mapping: {}", path.display()));

    let table = MappingTable::load(path)?;
    log_success(format!("{} entries", table.len()));

    // Several source ids collapsing onto one canonical id is legal but worth a look
    let mut by_id: HashMap<&str, Vec<&str>> = HashMap::new();
    for (key, entry) in table.iter() {
        by_id.entry(entry.id.as_str()).or_default().push(key);
    }
    let mut shared: Vec<_> = by_id.into_iter().filter(|(_, keys)| keys.len() > 1).collect();
    shared.sort();
    if !shared.is_empty() {
        log_warning(format!("{} canonical ids are shared by several keys", shared.len()));
        for (id, mut keys) in shared.into_iter().take(5) {
            keys.sort_unstable();
            log_info_indent(format!("{} <- {}", id, keys.join(", ")), 1);
        }
    }

    if list {
        let mut entries: Vec<_> = table.iter().collect();
        entries.sort_by_key(|(key, _)| *key);
        for (key, entry) in entries {
            println!("{} -> {} ({})", key, entry.id, entry.name);
        }
    }

    Ok(())
}

fn cmd_parse(inputs: &[PathBuf], delimiter: Option<u8>) -> Result<(), Box<dyn std::error::Error>> {
    let sources = InputSource::from_args(inputs);
    for source in &sources {
        log_info(format!("📄 Parsing CSV: {}", source.name()));
    }

    let result = read_inputs(&sources, delimiter)?;
    log_success(format!("Encoding: {}", result.encoding));
    log_success(format!(
        "Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    ));
    log_success(format!("Parsed {} records", result.records.len()));

    let short: Vec<usize> = result
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.len() < REQUIRED_COLUMNS)
        .map(|(i, _)| i + 1)
        .collect();
    if !short.is_empty() {
        let sample: Vec<String> = short.iter().take(5).map(|r| r.to_string()).collect();
        let more = if short.len() > 5 { format!("... +{}", short.len() - 5) } else { String::new() };
        log_warning(format!(
            "{} rows have fewer than {} columns (rows: {}{})",
            short.len(),
            REQUIRED_COLUMNS,
            sample.join(", "),
            more
        ));
    }

    println!("{}", serde_json::to_string_pretty(&result.records)?);
    Ok(())
}

/// Accept a single ASCII character, or `\t` / `tab`.
fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
            }
        }
    }
}
