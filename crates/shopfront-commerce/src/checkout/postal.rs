//! Postal code input handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;

/// Number of digits in a complete postal code.
pub const POSTAL_CODE_DIGITS: usize = 8;

/// Digits after which the hyphen goes.
const PREFIX_DIGITS: usize = 5;

/// Keep only the digits of `input`, at most eight of them.
pub fn postal_digits(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(POSTAL_CODE_DIGITS)
        .collect()
}

/// Format free-form input as it is typed.
///
/// ```
/// use shopfront_commerce::checkout::format_postal_code;
/// assert_eq!(format_postal_code("01310100"), "01310-100");
/// assert_eq!(format_postal_code("0131"), "0131");
/// assert_eq!(format_postal_code("01.310-1009"), "01310-100");
/// ```
pub fn format_postal_code(input: &str) -> String {
    let digits = postal_digits(input);
    if digits.len() > PREFIX_DIGITS {
        format!("{}-{}", &digits[..PREFIX_DIGITS], &digits[PREFIX_DIGITS..])
    } else {
        digits
    }
}

/// A complete eight-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse input that must contain exactly eight digits once formatting
    /// characters are removed.
    pub fn parse(input: &str) -> Result<Self, CommerceError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != POSTAL_CODE_DIGITS {
            return Err(CommerceError::InvalidPostalCode(input.to_string()));
        }
        Ok(Self(digits))
    }

    /// The bare digits, as sent to the lookup endpoint.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// The hyphenated display form.
    pub fn formatted(&self) -> String {
        format_postal_code(&self.0)
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl FromStr for PostalCode {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = CommerceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}
