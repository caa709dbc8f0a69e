//! Error types for alert extraction

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, parsing or writing listings
#[derive(Error, Debug)]
pub enum Error {
    /// Reading an email or directory failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Numeric text did not parse under the configured locale
    #[error("Invalid number {raw:?} for locale {locale}: {reason}")]
    InvalidNumber {
        raw: String,
        locale: String,
        reason: String,
    },

    /// A price token could not be read while parsing an email
    #[error("Invalid price {raw:?} for property {property_number} in {source_id}: {reason}")]
    InvalidPrice {
        source_id: String,
        property_number: u32,
        raw: String,
        reason: String,
    },

    /// Locale name not in the built-in table
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    /// Unrecognised value for a configuration option
    #[error("Invalid value {value:?} for {option}")]
    InvalidOption { option: &'static str, value: String },

    /// Failed to decode a MIME message
    #[error("Failed to decode message {}: {details}", .path.display())]
    Mime { path: PathBuf, details: String },

    /// Spreadsheet serialization failed
    #[error("Failed to write spreadsheet: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization failed
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, Error>;
