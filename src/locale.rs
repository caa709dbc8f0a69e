//! Locale-aware decimal parsing for price tokens

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number formatting conventions of a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    /// Locale name, e.g. `en_GB`
    #[serde(skip_deserializing)]
    pub name: &'static str,

    /// Digit grouping character, if the locale groups digits
    pub thousands_separator: Option<char>,

    /// Character separating the fractional part
    pub decimal_separator: char,
}

impl Locale {
    pub const EN_GB: Self = Self {
        name: "en_GB",
        thousands_separator: Some(','),
        decimal_separator: '.',
    };

    pub const EN_US: Self = Self {
        name: "en_US",
        thousands_separator: Some(','),
        decimal_separator: '.',
    };

    pub const DE_DE: Self = Self {
        name: "de_DE",
        thousands_separator: Some('.'),
        decimal_separator: ',',
    };

    pub const FR_FR: Self = Self {
        name: "fr_FR",
        thousands_separator: Some('\u{202f}'),
        decimal_separator: ',',
    };

    const KNOWN: [Self; 4] = [Self::EN_GB, Self::EN_US, Self::DE_DE, Self::FR_FR];

    /// Parse a locale-formatted number.
    ///
    /// Grouping characters are removed wherever they appear, then the decimal
    /// separator is mapped to `.`. Negative and non-finite values are rejected
    /// since prices are never below zero.
    pub fn parse_decimal(&self, raw: &str) -> Result<f64> {
        let invalid = |reason: &str| Error::InvalidNumber {
            raw: raw.to_string(),
            locale: self.name.to_string(),
            reason: reason.to_string(),
        };

        let normalized: String = raw
            .chars()
            .filter(|c| Some(*c) != self.thousands_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();

        if normalized.is_empty() {
            return Err(invalid("no digits"));
        }
        if !normalized.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(invalid("unexpected characters"));
        }

        let value: f64 = normalized.parse().map_err(|_| invalid("not a number"))?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid("out of range"));
        }
        Ok(value)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::EN_GB
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for Locale {
    type Err = Error;

    /// Accepts POSIX-style names with an optional encoding suffix
    /// (`en_GB`, `en_GB.UTF-8`, `de-DE`).
    fn from_str(s: &str) -> Result<Self> {
        let base = s.split('.').next().unwrap_or_default().replace('-', "_");
        Self::KNOWN
            .into_iter()
            .find(|locale| locale.name.eq_ignore_ascii_case(&base))
            .ok_or_else(|| Error::UnknownLocale(s.to_string()))
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.name.to_string()
    }
}
