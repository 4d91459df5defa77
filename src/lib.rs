//! Rowbind Library
//!
//! A Rust library for binding tabular records (rows of text cells with an
//! optional header row) to typed record objects, and for writing those
//! records back out as rows with a deterministic header.
//!
//! This library provides tools for:
//! - Resolving columns to fields by position, exact header name, or header pattern
//! - Converting cell text into typed values through a memoized converter registry
//! - Detecting missing mandatory headers and blank mandatory cells
//! - Regenerating a sorted, round-trip-consistent header on output
//! - Driving whole row sequences with an optional row filter

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod binding_engine;
        pub mod converter_registry;
        pub mod field_map;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod csv_source;
}

// Re-export commonly used types
pub use app::models::declaration::MappingDeclaration;
pub use app::models::{
    AddressingKey, AddressingMode, DynamicRecord, FieldDescriptor, FieldKind, MissingRequiredEntry,
    Record, Value,
};
pub use app::services::binding_engine::{BindingEngine, BindingSession, RowFilter, RowSource};
pub use app::services::converter_registry::{Converter, ConverterRegistry};
pub use app::services::field_map::{FieldMap, NameFieldMap, PositionFieldMap};
pub use config::BindConfig;

/// Result type alias for binding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for binding operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Header capture failed; the whole session is aborted
    #[error("Error capturing header after {lines_processed} lines: {source}")]
    HeaderCapture {
        lines_processed: usize,
        #[source]
        source: Box<Error>,
    },

    /// Mandatory headers were absent from the captured header
    #[error("Header is missing required fields: {}", format_missing(.missing))]
    MissingRequiredHeaders { missing: Vec<MissingRequiredEntry> },

    /// Cell text could not be parsed as the declared type
    #[error("Cannot convert '{value}' to {kind}: {reason}")]
    Conversion {
        value: String,
        kind: FieldKind,
        reason: String,
    },

    /// A mandatory field is blank on read, or unsatisfiable on write
    #[error("Required field(s) empty: {}", .fields.join(", "))]
    RequiredFieldEmpty { fields: Vec<String> },

    /// A field declares a type with no converter available
    #[error(
        "Unsupported type {kind} for field '{field}': use a primitive or text kind, or declare a converter"
    )]
    UnsupportedFieldType { field: String, kind: FieldKind },

    /// A single row failed; the sequence conversion is aborted
    #[error("Error binding row {row} (values: {values:?}): {source}")]
    RowConversion {
        row: usize,
        values: Vec<String>,
        #[source]
        source: Box<Error>,
    },

    /// The record type rejected a value
    #[error("Cannot assign field '{field}': {message}")]
    FieldAssignment { field: String, message: String },

    /// Row length does not match the captured header
    #[error("Number of data fields ({found}) does not match number of headers ({expected})")]
    LineLength { expected: usize, found: usize },

    /// Mapping declaration or configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The row source failed to produce a row
    #[error("Row source error: {message}")]
    RowSource {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

fn format_missing(missing: &[MissingRequiredEntry]) -> String {
    missing
        .iter()
        .map(|entry| entry.identifier.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Wrap a header capture failure
    pub fn header_capture(source: Error) -> Self {
        Self::HeaderCapture {
            lines_processed: 0,
            source: Box::new(source),
        }
    }

    /// Create a conversion error
    pub fn conversion(value: impl Into<String>, kind: FieldKind, reason: impl ToString) -> Self {
        Self::Conversion {
            value: value.into(),
            kind,
            reason: reason.to_string(),
        }
    }

    /// Create a required-field-empty error for a single field
    pub fn required_field_empty(field: impl Into<String>) -> Self {
        Self::RequiredFieldEmpty {
            fields: vec![field.into()],
        }
    }

    /// Create an unsupported field type error
    pub fn unsupported_field_type(field: impl Into<String>, kind: FieldKind) -> Self {
        Self::UnsupportedFieldType {
            field: field.into(),
            kind,
        }
    }

    /// Wrap a per-row failure with its 1-based index and raw values
    pub fn row_conversion(row: usize, values: &[String], source: Error) -> Self {
        Self::RowConversion {
            row,
            values: values.to_vec(),
            source: Box::new(source),
        }
    }

    /// Create a field assignment error
    pub fn field_assignment(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FieldAssignment {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a row source error
    pub fn row_source(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::RowSource {
            message: message.into(),
            source,
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// The innermost error, looking through header and row wrappers
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::HeaderCapture { source, .. } | Self::RowConversion { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::RowSource {
            message: "CSV reading failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<regex::Error> for Error {
    fn from(error: regex::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid header pattern: {}", error),
        }
    }
}
