// Pricebook - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors preserve the causal
// chain for diagnostic logging, and every failure is reported to the
// operator as a status line rather than terminating the process.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all Pricebook operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum PricebookError {
    /// A record in a catalogue stream did not decode.
    Parse(ParseError),

    /// CSV serialisation failed while saving the catalogue.
    Csv { path: PathBuf, source: csv::Error },

    /// A row index was outside the catalogue bounds.
    Range { index: usize, len: usize },

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for PricebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Csv { path, source } => {
                write!(f, "CSV write error '{}': {source}", path.display())
            }
            Self::Range { index, len } => write!(
                f,
                "Row {index} is out of range for a catalogue of {len} products"
            ),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for PricebookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Csv { source, .. } => Some(source),
            Self::Range { .. } => None,
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors produced while decoding a catalogue CSV stream.
///
/// Every variant carries the 1-based line number of the offending record so
/// the operator can fix the file and retry. A short record is a hard error,
/// never a zero-filled product.
#[derive(Debug)]
pub enum ParseError {
    /// A record did not have exactly the expected number of fields.
    FieldCount { line: u64, found: usize },

    /// A numeric field did not parse as a number.
    InvalidNumber {
        line: u64,
        field: &'static str,
        value: String,
    },

    /// The underlying CSV reader failed (I/O, encoding, malformed quoting).
    Csv { source: csv::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount { line, found } => write!(
                f,
                "line {line}: expected {} fields, found {found}",
                crate::util::constants::CSV_FIELD_COUNT
            ),
            Self::InvalidNumber { line, field, value } => {
                write!(f, "line {line}: field '{field}' is not a number: '{value}'")
            }
            Self::Csv { source } => write!(f, "{source}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for PricebookError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading the config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for PricebookError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for Pricebook results.
pub type Result<T> = std::result::Result<T, PricebookError>;
