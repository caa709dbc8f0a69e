// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Property Alert Extractor
//!
//! Reads saved property-alert emails and extracts one structured [`Listing`]
//! per advertised property: price, bedrooms, property type, contract type,
//! location and the date of the alert.
//!
//! # Features
//!
//! - Line-oriented parser that tolerates boilerplate between fields
//! - Explicit number locale for price tokens, no process-wide state
//! - Raw or MIME-decoded input
//! - Spreadsheet (XLSX) or JSON output
//!
//! # Example
//!
//! ```rust
//! use property_alerts::{ContractType, ParserConfig, parse_lines};
//!
//! let lines = [
//!     "Date: Mon, 1 Jan 2024",
//!     "Subject: Alert, 1 new matching property",
//!     "Property 1:",
//!     "  &pound;250,000",
//!     "2 bedroom flat for sale",
//!     "  Main Street, London",
//! ];
//! let email = parse_lines("alert.eml", lines, &ParserConfig::default()).unwrap();
//!
//! assert_eq!(email.listings.len(), 1);
//! assert_eq!(email.listings[0].price, 250_000.0);
//! assert_eq!(email.listings[0].contract_type, ContractType::ForSale);
//! ```

mod batch;
mod config;
mod error;
mod locale;
mod output;
mod parser;
mod source;
mod types;

pub use batch::{extract_directory, parse_source};
pub use config::{InputMode, ParserConfig, PricePolicy};
pub use error::{Error, Result};
pub use locale::Locale;
pub use output::{OutputFormat, SheetOptions, write_json, write_listings, write_xlsx};
pub use parser::{
    Description, Expect, LineParser, ParsedEmail, Step, match_date, match_description,
    match_price, match_property, match_subject, parse_lines,
};
pub use source::{EMAIL_EXTENSION, EmailSource, discover, load};
pub use types::*;
