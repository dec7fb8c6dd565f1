#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Source definitions and shared normalization logic for the SF crime
//! pipeline.
//!
//! Each raw SFPD export is described by a [`source_def::SourceDefinition`]
//! that says how its columns map onto the shared schema and how its
//! datetimes are encoded. The grouping stage's category lookup table also
//! lives here, in [`type_mapping`].

pub mod config;
pub mod normalize;
pub mod output;
pub mod parsing;
pub mod paths;
pub mod progress;
pub mod registry;
pub mod source_def;
pub mod type_mapping;

/// Errors that can occur while reading, normalizing, or writing incident data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML config could not be parsed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A column required by the source definition is absent from the file.
    #[error("{source_id}: missing required column '{column}'")]
    MissingColumn {
        /// Source whose file is missing the column.
        source_id: String,
        /// Header name that was expected.
        column: String,
    },

    /// A datetime cell did not match the source's declared format.
    #[error("{source_id}: line {line}: cannot parse datetime '{value}' with format '{format}'")]
    DateParse {
        /// Source the row came from.
        source_id: String,
        /// 1-based line number in the input file.
        line: u64,
        /// The offending cell contents.
        value: String,
        /// The format the cell was expected to match.
        format: String,
    },

    /// A numeric cell (latitude/longitude) held something other than a number.
    #[error("{source_id}: line {line}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        /// Source the row came from.
        source_id: String,
        /// 1-based line number in the input file.
        line: u64,
        /// Column the value came from.
        column: String,
        /// The offending cell contents.
        value: String,
    },

    /// The requested source id is not in the registry.
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// Pipeline configuration is inconsistent.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}
