//! Headerless CSV input with encoding and delimiter auto-detection.
//!
//! Every record is data; nothing here knows about the column layout.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::STDIO_PATH;
use crate::error::{CsvError, CsvResult};

/// Where input bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` means stdin, anything else is a file path.
    pub fn from_arg(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path == Path::new(STDIO_PATH) {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// Sources for a list of CLI paths; no paths means stdin.
    pub fn from_args(paths: &[PathBuf]) -> Vec<Self> {
        if paths.is_empty() {
            vec![Self::Stdin]
        } else {
            paths.iter().map(Self::from_arg).collect()
        }
    }

    /// Human-readable name for logs and errors
    pub fn name(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Read the whole source into memory
    pub fn read_bytes(&self) -> CsvResult<Vec<u8>> {
        let read_err = |source| CsvError::Read { source_name: self.name(), source };
        match self {
            Self::Stdin => {
                let mut bytes = Vec::new();
                std::io::stdin().lock().read_to_end(&mut bytes).map_err(read_err)?;
                Ok(bytes)
            }
            Self::File(path) => fs::read(path).map_err(read_err),
        }
    }
}

/// Result of parsing with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// Records in input order
    pub records: Vec<Vec<String>>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: u8,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is always `utf-8`; chardet only guesses for anything else.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding, dropping any BOM
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let content = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => {
            String::from_utf8(bytes.to_vec()).map_err(|e| CsvError::Encoding {
                encoding: encoding.to_string(),
                message: e.to_string(),
            })?
        }
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    if content.starts_with('\u{feff}') {
        Ok(content['\u{feff}'.len_utf8()..].to_string())
    } else {
        Ok(content)
    }
}

/// Detect the delimiter by counting occurrences in the first non-empty line.
///
/// Ties go to the earlier candidate; `,` when none appear.
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    let separators = [b',', b';', b'\t', b'|'];
    let mut best_sep = b',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.bytes().filter(|&b| b == sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Split CSV text into records.
///
/// No header row, ragged rows allowed, blank lines skipped.
pub fn parse_records(content: &str, delimiter: u8, source_name: &str) -> CsvResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| CsvError::Parse {
            source_name: source_name.to_string(),
            source,
        })?;
        records.push(record.iter().map(String::from).collect());
    }

    Ok(records)
}

/// Parse CSV bytes, auto-detecting the encoding and (unless given) the delimiter.
pub fn parse_bytes_auto(bytes: &[u8], delimiter: Option<u8>, source_name: &str) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let records = parse_records(&content, delimiter, source_name)?;

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
    })
}

/// Read one input source.
pub fn read_input(source: &InputSource, delimiter: Option<u8>) -> CsvResult<ParseResult> {
    let bytes = source.read_bytes()?;
    parse_bytes_auto(&bytes, delimiter, &source.name())
}

/// Read several sources in order and concatenate their records.
///
/// The first source decides the delimiter unless one is given.
pub fn read_inputs(sources: &[InputSource], delimiter: Option<u8>) -> CsvResult<ParseResult> {
    let mut combined = ParseResult {
        records: Vec::new(),
        encoding: String::new(),
        delimiter: delimiter.unwrap_or(b','),
    };
    let mut fixed = delimiter;
    let mut encodings: Vec<String> = Vec::new();

    for source in sources {
        let parsed = read_input(source, fixed)?;
        if fixed.is_none() {
            fixed = Some(parsed.delimiter);
        }
        combined.delimiter = parsed.delimiter;
        if !encodings.contains(&parsed.encoding) {
            encodings.push(parsed.encoding);
        }
        combined.records.extend(parsed.records);
    }

    combined.encoding = if encodings.is_empty() {
        "utf-8".to_string()
    } else {
        encodings.join(", ")
    };
    Ok(combined)
}

/// Printable form of a delimiter byte
pub fn format_delimiter(d: u8) -> String {
    match d {
        b'\t' => "\\t".to_string(),
        c => (c as char).to_string(),
    }
}
