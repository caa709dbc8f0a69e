//! Core types for extracted listings

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One property entry extracted from an alert email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Originating email (file path)
    pub source: String,

    /// Number from the `Property N:` line
    pub property_number: u32,

    /// Date as written in the email's `Date:` line, e.g. `1 Jan 2024`
    pub date: String,

    /// Asking price or rent
    pub price: f64,

    /// Bedroom count from the description line
    pub bedrooms: u32,

    /// Free text between `bedroom` and the contract phrase, e.g. `terraced house`
    pub property_type: String,

    /// Sale or rental
    pub contract_type: ContractType,

    /// Raw line following the description, whitespace included
    pub location: String,
}

impl Listing {
    /// Column names in output order
    pub const COLUMNS: [&'static str; 8] = [
        "File",
        "Property Number",
        "Date",
        "Price",
        "Bedrooms",
        "Property type",
        "Contract type",
        "Location",
    ];
}

/// Whether a listing is offered for sale or to rent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "for sale")]
    ForSale,
    #[serde(rename = "to rent")]
    ToRent,
}

impl ContractType {
    /// The phrase as it appears in alert emails
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForSale => "for sale",
            Self::ToRent => "to rent",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "for sale" => Ok(Self::ForSale),
            "to rent" => Ok(Self::ToRent),
            other => Err(Error::InvalidOption {
                option: "contract type",
                value: other.to_string(),
            }),
        }
    }
}
