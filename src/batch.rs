//! Directory driver: every alert email in a folder to one list of listings

use crate::config::ParserConfig;
use crate::error::Result;
use crate::parser::{ParsedEmail, parse_lines};
use crate::source::{self, EmailSource};
use crate::types::Listing;
use std::path::Path;
use tracing::info;

/// Parse one loaded email
pub fn parse_source(email: &EmailSource, config: &ParserConfig) -> Result<ParsedEmail> {
    parse_lines(email.id.as_str(), &email.lines, config)
}

/// Extract listings from every `.eml` file in `dir`.
///
/// Files are processed one at a time in file-name order; listings keep the
/// order of their files and, within a file, the order of their blocks.
pub fn extract_directory(dir: impl AsRef<Path>, config: &ParserConfig) -> Result<Vec<Listing>> {
    let dir = dir.as_ref();
    let paths = source::discover(dir)?;
    info!("Found {} emails in {}", paths.len(), dir.display());

    let mut listings = Vec::new();
    for path in &paths {
        let email = source::load(path, config.input)?;
        let parsed = parse_source(&email, config)?;
        info!(
            "File: {} ({} listings{})",
            parsed.source,
            parsed.listings.len(),
            if parsed.terminated_early {
                ", stopped at declared count"
            } else {
                ""
            }
        );
        listings.extend(parsed.listings);
    }

    info!(
        "Extracted {} listings from {} emails",
        listings.len(),
        paths.len()
    );
    Ok(listings)
}
