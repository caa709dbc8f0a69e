//! Writing listings to a spreadsheet or JSON file

use crate::error::{Error, Result};
use crate::types::Listing;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Json,
}

impl OutputFormat {
    /// Pick a format from the file extension; anything but `.json` is a spreadsheet
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Xlsx,
        }
    }
}

/// Spreadsheet layout options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetOptions {
    /// Prepend an unlabelled column holding the 0-based row index
    pub index_column: bool,
}

/// Write `listings` to `path` in the format its extension implies
pub fn write_listings(path: &Path, listings: &[Listing], options: &SheetOptions) -> Result<()> {
    match OutputFormat::from_path(path) {
        OutputFormat::Xlsx => write_xlsx(path, listings, options),
        OutputFormat::Json => write_json(path, listings),
    }
}

/// Write one header row plus one row per listing
pub fn write_xlsx(path: &Path, listings: &[Listing], options: &SheetOptions) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    let first_col = u16::from(options.index_column);
    for (col, header) in (first_col..).zip(Listing::COLUMNS) {
        worksheet.write_string_with_format(0, col, header, &bold)?;
    }

    for (row, listing) in (1u32..).zip(listings) {
        if options.index_column {
            worksheet.write_number_with_format(row, 0, f64::from(row - 1), &bold)?;
        }
        write_row(worksheet, row, first_col, listing)?;
    }

    workbook.save(path)?;
    info!("Wrote {} listings to {}", listings.len(), path.display());
    Ok(())
}

fn write_row(worksheet: &mut Worksheet, row: u32, first_col: u16, listing: &Listing) -> Result<()> {
    worksheet.write_string(row, first_col, &listing.source)?;
    worksheet.write_number(row, first_col + 1, f64::from(listing.property_number))?;
    worksheet.write_string(row, first_col + 2, &listing.date)?;
    worksheet.write_number(row, first_col + 3, listing.price)?;
    worksheet.write_number(row, first_col + 4, f64::from(listing.bedrooms))?;
    worksheet.write_string(row, first_col + 5, &listing.property_type)?;
    worksheet.write_string(row, first_col + 6, listing.contract_type.as_str())?;
    worksheet.write_string(row, first_col + 7, &listing.location)?;
    Ok(())
}

/// Write listings as a pretty-printed JSON array
pub fn write_json(path: &Path, listings: &[Listing]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, listings)?;
    writer.flush().map_err(|e| Error::io(path, e))?;
    info!("Wrote {} listings to {}", listings.len(), path.display());
    Ok(())
}
