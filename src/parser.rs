//! Line-oriented state machine over alert email text
//!
//! An alert is read top to bottom as a fixed grammar: a `Date:` line, a
//! `Subject:` line declaring how many properties follow, then one block per
//! property (`Property N:`, price, description, location). Lines that do not
//! match the field currently expected are skipped, so blank lines and
//! boilerplate between fields are harmless.

use crate::config::{ParserConfig, PricePolicy};
use crate::error::{Error, Result};
use crate::types::{ContractType, Listing};
use regex::Regex;
use std::fmt;
use tracing::{debug, info, warn};

static DATE_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^Date: .* ([0-9]+ \w\w\w [0-9]{4})").unwrap()
});

static SUBJECT_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^Subject: \w+, ([0-9]+) new").unwrap());

static PROPERTY_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^Property ([0-9]+):").unwrap());

static PRICE_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"&pound;(\S+)").unwrap());

static DECODED_PRICE_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"£(\S+)").unwrap());

static DESCRIPTION_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"([0-9]) bedroom (.*) (for sale|to rent)").unwrap()
});

/// The field the parser is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expect {
    Date,
    Subject,
    Property,
    Price,
    Description,
    Location,
}

impl Expect {
    /// State entered after the current field has been captured
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Date => Self::Subject,
            Self::Subject | Self::Location => Self::Property,
            Self::Property => Self::Price,
            Self::Price => Self::Description,
            Self::Description => Self::Location,
        }
    }
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::Subject => "subject",
            Self::Property => "property",
            Self::Price => "price",
            Self::Description => "description",
            Self::Location => "location",
        })
    }
}

/// Fields captured from a description line such as `2 bedroom flat for sale`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub bedrooms: u32,
    pub property_type: String,
    pub contract_type: ContractType,
}

/// Date token from a `Date:` header line, e.g. `1 Jan 2024`
#[must_use]
pub fn match_date(line: &str) -> Option<String> {
    DATE_REGEX
        .captures(line)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Declared property count from a `Subject: Alert, N new ...` line
#[must_use]
pub fn match_subject(line: &str) -> Option<u32> {
    SUBJECT_REGEX
        .captures(line)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Property number from a `Property N:` line
#[must_use]
pub fn match_property(line: &str) -> Option<u32> {
    PROPERTY_REGEX
        .captures(line)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Raw numeric token following a pound sign.
///
/// The `&pound;` entity wins over a literal `£` anywhere on the same line.
#[must_use]
pub fn match_price(line: &str) -> Option<&str> {
    PRICE_REGEX
        .captures(line)
        .or_else(|| DECODED_PRICE_REGEX.captures(line))
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Bedrooms, property type and contract type from a description line
#[must_use]
pub fn match_description(line: &str) -> Option<Description> {
    let cap = DESCRIPTION_REGEX.captures(line)?;
    let bedrooms = cap.get(1)?.as_str().parse().ok()?;
    let property_type = cap.get(2)?.as_str().to_string();
    let contract_type = cap.get(3)?.as_str().parse().ok()?;

    Some(Description {
        bedrooms,
        property_type,
        contract_type,
    })
}

/// Result of feeding one line to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Line did not match the expected field
    Skipped,

    /// Field captured, parser moved to the next state
    Advanced,

    /// Declared count exceeded; remaining lines must be ignored
    Stop,
}

/// Outcome of parsing one email
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEmail {
    pub source: String,

    /// Date captured from the `Date:` line, if any
    pub date: Option<String>,

    /// Count declared by the `Subject:` line, if any
    pub declared_count: Option<u32>,

    /// Completed listings in the order their blocks appear
    pub listings: Vec<Listing>,

    /// Whether scanning stopped because the declared count was exceeded
    pub terminated_early: bool,
}

#[derive(Debug)]
struct Draft {
    property_number: u32,
    price: Option<f64>,
    description: Option<Description>,
}

/// State machine for a single email
#[derive(Debug)]
pub struct LineParser<'a> {
    source: String,
    config: &'a ParserConfig,
    expect: Expect,
    date: Option<String>,
    declared_count: Option<u32>,
    property_number: Option<u32>,
    current: Option<Draft>,
    listings: Vec<Listing>,
    stopped: bool,
}

impl<'a> LineParser<'a> {
    pub fn new(source: impl Into<String>, config: &'a ParserConfig) -> Self {
        Self {
            source: source.into(),
            config,
            expect: Expect::Date,
            date: None,
            declared_count: None,
            property_number: None,
            current: None,
            listings: Vec::new(),
            stopped: false,
        }
    }

    /// Field the next matching line will fill
    #[must_use]
    pub const fn expecting(&self) -> Expect {
        self.expect
    }

    /// Listings completed so far
    #[must_use]
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Feed the next line.
    ///
    /// A miss leaves all state untouched. After a match the declared count is
    /// checked against the most recent property number; with no declared count
    /// the parser never stops early.
    pub fn step(&mut self, line: &str) -> Result<Step> {
        if self.stopped {
            return Ok(Step::Stop);
        }
        if !self.apply(line)? {
            return Ok(Step::Skipped);
        }

        if let (Some(number), Some(count)) = (self.property_number, self.declared_count)
            && number > count
        {
            debug!(
                source = %self.source,
                "Property {number} exceeds declared count {count}, stopping"
            );
            self.stopped = true;
            return Ok(Step::Stop);
        }

        Ok(Step::Advanced)
    }

    /// Feed every line in order, stopping early if the declared count is exceeded
    pub fn run<I, S>(mut self, lines: I) -> Result<ParsedEmail>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            if self.step(line.as_ref())? == Step::Stop {
                break;
            }
        }
        Ok(self.into_parsed())
    }

    /// Consume the parser, returning what has been extracted
    #[must_use]
    pub fn into_parsed(self) -> ParsedEmail {
        if let Some(count) = self.declared_count
            && !self.stopped
            && u32::try_from(self.listings.len()).is_ok_and(|found| found < count)
        {
            warn!(
                source = %self.source,
                "Email declares {count} properties but only {} were found",
                self.listings.len()
            );
        }

        ParsedEmail {
            source: self.source,
            date: self.date,
            declared_count: self.declared_count,
            listings: self.listings,
            terminated_early: self.stopped,
        }
    }

    /// Try the current state's matcher, returning whether the line was consumed
    fn apply(&mut self, line: &str) -> Result<bool> {
        match self.expect {
            Expect::Date => {
                let Some(date) = match_date(line) else {
                    return Ok(false);
                };
                debug!(source = %self.source, "Date {date}");
                self.date = Some(date);
            }
            Expect::Subject => {
                let Some(count) = match_subject(line) else {
                    return Ok(false);
                };
                info!(source = %self.source, "Email has {count} properties");
                self.declared_count = Some(count);
            }
            Expect::Property => {
                let Some(number) = match_property(line) else {
                    return Ok(false);
                };
                debug!(source = %self.source, "Property number {number}");
                self.property_number = Some(number);
                self.current = Some(Draft {
                    property_number: number,
                    price: None,
                    description: None,
                });
            }
            Expect::Price => {
                let Some(raw) = match_price(line) else {
                    return Ok(false);
                };
                debug!(source = %self.source, "Price {raw}");
                match self.config.locale.parse_decimal(raw) {
                    Ok(price) => {
                        if let Some(draft) = self.current.as_mut() {
                            draft.price = Some(price);
                        }
                    }
                    Err(err) => return self.reject_price(raw, &err),
                }
            }
            Expect::Description => {
                let Some(description) = match_description(line) else {
                    return Ok(false);
                };
                debug!(
                    source = %self.source,
                    "Bedrooms: {}, property type: {}, contract type: {}",
                    description.bedrooms,
                    description.property_type,
                    description.contract_type
                );
                if let Some(draft) = self.current.as_mut() {
                    draft.description = Some(description);
                }
            }
            Expect::Location => {
                debug!(source = %self.source, "Location: {}", line.trim());
                self.complete(line);
            }
        }

        self.expect = self.expect.next();
        Ok(true)
    }

    fn reject_price(&mut self, raw: &str, err: &Error) -> Result<bool> {
        let property_number = self
            .current
            .as_ref()
            .map_or(0, |draft| draft.property_number);

        match self.config.price_policy {
            PricePolicy::Fail => Err(Error::InvalidPrice {
                source_id: self.source.clone(),
                property_number,
                raw: raw.to_string(),
                reason: err.to_string(),
            }),
            PricePolicy::SkipProperty => {
                warn!(
                    source = %self.source,
                    "Skipping property {property_number}: {err}"
                );
                self.current = None;
                self.expect = Expect::Property;
                Ok(true)
            }
        }
    }

    fn complete(&mut self, location: &str) {
        let Some(draft) = self.current.take() else {
            return;
        };
        let (Some(price), Some(description)) = (draft.price, draft.description) else {
            return;
        };

        self.listings.push(Listing {
            source: self.source.clone(),
            property_number: draft.property_number,
            date: self.date.clone().unwrap_or_default(),
            price,
            bedrooms: description.bedrooms,
            property_type: description.property_type,
            contract_type: description.contract_type,
            location: location.to_string(),
        });
    }
}

/// Parse the lines of one email into listings
pub fn parse_lines<I, S>(
    source: impl Into<String>,
    lines: I,
    config: &ParserConfig,
) -> Result<ParsedEmail>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    LineParser::new(source, config).run(lines)
}
