//! Order tracking numbers.
//!
//! Format: `CB` + order date as `YYMMDD` + a random uppercase alphanumeric
//! suffix, e.g. `CB261019K3J9QX`. Lookups are case-insensitive, so every
//! value is stored uppercased.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TrackingNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingNumberError {
    #[error("tracking number cannot be empty")]
    Empty,
    #[error("tracking number must be at most {max} characters")]
    TooLong { max: usize },
    #[error("tracking number may only contain letters, digits and hyphens")]
    InvalidCharacter,
}

/// A public order tracking code.
///
/// The default value is the empty, unassigned code; it only appears while
/// loading order records written before tracking numbers existed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Prefix shared by all generated codes.
    pub const PREFIX: &'static str = "CB";
    /// Maximum accepted length.
    pub const MAX_LENGTH: usize = 40;

    /// Parse a tracking number typed by a customer, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, too long, or contains
    /// anything other than ASCII letters, digits and hyphens.
    pub fn parse(s: &str) -> Result<Self, TrackingNumberError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TrackingNumberError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(TrackingNumberError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(TrackingNumberError::InvalidCharacter);
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Build a code from the order date and a random suffix.
    ///
    /// # Errors
    ///
    /// Returns an error if the suffix contains characters a tracking number
    /// may not hold.
    pub fn compose(date: NaiveDate, suffix: &str) -> Result<Self, TrackingNumberError> {
        Self::parse(&format!("{}{}{suffix}", Self::PREFIX, date.format("%y%m%d")))
    }

    /// Whether this is the empty placeholder of a legacy record.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TrackingNumber {
    type Error = TrackingNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TrackingNumber> for String {
    fn from(code: TrackingNumber) -> Self {
        code.0
    }
}
