//! Rate-limit expressions such as `10 per second` or `100/5 minutes`.
//!
//! Grammar: `<count> (per|/) [<multiple>] <unit>`, where unit is one of
//! second, minute, hour, day, month or year (plural accepted). Several
//! items may be joined with `;` or `,`; a request must satisfy all of them.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Errors produced while parsing a rate-limit expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitParseError {
    #[error("rate limit expression is empty")]
    Empty,

    #[error("'{0}' is not of the form '<count> per [<multiple>] <unit>'")]
    Malformed(String),

    #[error("invalid count in '{0}'")]
    InvalidCount(String),

    #[error("invalid multiple in '{0}'")]
    InvalidMultiple(String),

    #[error("unknown time unit '{0}'")]
    UnknownUnit(String),
}

/// Window granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Granularity {
    pub fn seconds(self) -> u64 {
        match self {
            Granularity::Second => 1,
            Granularity::Minute => 60,
            Granularity::Hour => 60 * 60,
            Granularity::Day => 24 * 60 * 60,
            Granularity::Month => 30 * 24 * 60 * 60,
            Granularity::Year => 365 * 24 * 60 * 60,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Granularity::Second => "second",
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

impl FromStr for Granularity {
    type Err = RateLimitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = s.strip_suffix('s').unwrap_or(s);
        match unit {
            "second" => Ok(Granularity::Second),
            "minute" => Ok(Granularity::Minute),
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            _ => Err(RateLimitParseError::UnknownUnit(s.to_string())),
        }
    }
}

/// A single `<count> per <multiple> <unit>` limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitItem {
    pub count: u64,
    pub multiple: u64,
    pub granularity: Granularity,
}

impl RateLimitItem {
    /// Length of one fixed window.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.multiple * self.granularity.seconds())
    }
}

impl fmt::Display for RateLimitItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} per {} {}",
            self.count,
            self.multiple,
            self.granularity.as_str()
        )
    }
}

impl FromStr for RateLimitItem {
    type Err = RateLimitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let item = s.trim().to_ascii_lowercase();
        let malformed = || RateLimitParseError::Malformed(s.trim().to_string());

        let (count, period) = item
            .split_once('/')
            .or_else(|| item.split_once(" per "))
            .ok_or_else(malformed)?;

        let count: u64 = count
            .trim()
            .parse()
            .map_err(|_| RateLimitParseError::InvalidCount(s.trim().to_string()))?;
        if count == 0 {
            return Err(RateLimitParseError::InvalidCount(s.trim().to_string()));
        }

        let mut words = period.split_whitespace();
        let (multiple, unit) = match (words.next(), words.next(), words.next()) {
            (Some(unit), None, None) => (1, unit),
            (Some(multiple), Some(unit), None) => {
                let multiple: u64 = multiple
                    .parse()
                    .ok()
                    .filter(|m| *m > 0)
                    .ok_or_else(|| RateLimitParseError::InvalidMultiple(s.trim().to_string()))?;
                (multiple, unit)
            }
            _ => return Err(malformed()),
        };

        let granularity: Granularity = unit.parse()?;
        if multiple.checked_mul(granularity.seconds()).is_none() {
            return Err(RateLimitParseError::InvalidMultiple(s.trim().to_string()));
        }

        Ok(Self {
            count,
            multiple,
            granularity,
        })
    }
}

/// One or more limits applied together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    items: Vec<RateLimitItem>,
}

impl RateLimitPolicy {
    pub fn new(items: Vec<RateLimitItem>) -> Result<Self, RateLimitParseError> {
        if items.is_empty() {
            return Err(RateLimitParseError::Empty);
        }
        Ok(Self { items })
    }

    pub fn single(item: RateLimitItem) -> Self {
        Self { items: vec![item] }
    }

    pub fn items(&self) -> &[RateLimitItem] {
        &self.items
    }
}

impl FromStr for RateLimitPolicy {
    type Err = RateLimitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let items = s
            .split([';', ','])
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(items)
    }
}

impl fmt::Display for RateLimitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}
