//! Parser configuration

use crate::error::Error;
use crate::locale::Locale;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Settings threaded through loading and parsing of every email
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Locale used to read price tokens
    pub locale: Locale,

    /// What to do when a price token does not parse
    pub price_policy: PricePolicy,

    /// How email files are turned into lines
    pub input: InputMode,
}

impl ParserConfig {
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub const fn with_price_policy(mut self, price_policy: PricePolicy) -> Self {
        self.price_policy = price_policy;
        self
    }

    #[must_use]
    pub const fn with_input(mut self, input: InputMode) -> Self {
        self.input = input;
        self
    }
}

/// Handling of price tokens that fail to parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricePolicy {
    /// Abort with [`Error::InvalidPrice`]
    #[default]
    Fail,

    /// Drop the property being parsed and wait for the next `Property N:` line
    SkipProperty,
}

impl fmt::Display for PricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::SkipProperty => "skip-property",
        })
    }
}

impl FromStr for PricePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "skip-property" | "skip" => Ok(Self::SkipProperty),
            _ => Err(Error::InvalidOption {
                option: "price policy",
                value: s.to_string(),
            }),
        }
    }
}

/// How an email file is turned into the lines the parser scans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputMode {
    /// File text as stored, one line per text line
    #[default]
    Raw,

    /// Decoded MIME message: headers as `Key: value` lines, then the text body
    Mime,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Mime => "mime",
        })
    }
}

impl FromStr for InputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "mime" => Ok(Self::Mime),
            _ => Err(Error::InvalidOption {
                option: "input mode",
                value: s.to_string(),
            }),
        }
    }
}
