//! Order numbers.
//!
//! Orders are identified to shoppers by `FS-YYYYMMDD-XXXXXX`: the UTC date the
//! order was placed and six random uppercase hex digits.

use std::{fmt, str::FromStr};

use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;
use rand::Rng;
use thiserror::Error;

/// Prefix shared by every order number.
pub const ORDER_NUMBER_PREFIX: &str = "FS";

const SUFFIX_LEN: usize = 6;
const SUFFIX_MAX: u32 = 0x00FF_FFFF;

/// Human-readable, unique order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Build the order number for `at` with the given random suffix.
    ///
    /// Only the low 24 bits of `suffix` are used.
    #[must_use]
    pub fn from_parts(at: Timestamp, suffix: u32) -> Self {
        let date = at.to_zoned(TimeZone::UTC).date();

        Self(format!(
            "{ORDER_NUMBER_PREFIX}-{:04}{:02}{:02}-{:06X}",
            date.year(),
            date.month(),
            date.day(),
            suffix & SUFFIX_MAX
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed order number: {0}")]
pub struct MalformedOrderNumber(pub String);

impl FromStr for OrderNumber {
    type Err = MalformedOrderNumber;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedOrderNumber(value.to_string());

        let mut parts = value.split('-');

        let (Some(prefix), Some(date), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let date_ok = date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit());
        let suffix_ok = suffix.len() == SUFFIX_LEN
            && suffix
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));

        if prefix != ORDER_NUMBER_PREFIX || !date_ok || !suffix_ok {
            return Err(malformed());
        }

        Ok(Self(value.to_string()))
    }
}

/// Source of candidate order numbers.
#[automock]
pub trait OrderNumbers: Send + Sync {
    /// Produce a candidate number for an order placed at `at`.
    fn generate(&self, at: Timestamp) -> OrderNumber;
}

/// Draws the suffix from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderNumbers;

impl OrderNumbers for RandomOrderNumbers {
    fn generate(&self, at: Timestamp) -> OrderNumber {
        let suffix = rand::thread_rng().gen_range(0..=SUFFIX_MAX);

        OrderNumber::from_parts(at, suffix)
    }
}
