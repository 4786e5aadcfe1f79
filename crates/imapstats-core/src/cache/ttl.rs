//! Cache time-to-live.

use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

/// How long a cache entry stays usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ttl {
    /// Entries never go stale.
    #[default]
    Infinite,
    /// Entries older than this are stale.
    Finite(Duration),
}

impl Ttl {
    /// Parses a TTL flag value.
    ///
    /// `""` is infinite. A bare integer counts seconds; one trailing `s`,
    /// `m` or `h` selects seconds, minutes or hours. Anything unparseable
    /// is infinite rather than an error. Negative values give a zero TTL.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.is_empty() {
            return Self::Infinite;
        }

        let (digits, unit) = match value.as_bytes().last() {
            Some(b's') => (&value[..value.len() - 1], 1),
            Some(b'm') => (&value[..value.len() - 1], 60),
            Some(b'h') => (&value[..value.len() - 1], 3600),
            _ => (value, 1),
        };

        let Ok(n) = digits.parse::<i64>() else {
            return Self::Infinite;
        };
        if n < 0 {
            return Self::Finite(Duration::ZERO);
        }
        n.unsigned_abs()
            .checked_mul(unit)
            .map_or(Self::Infinite, |secs| Self::Finite(Duration::from_secs(secs)))
    }

    /// Returns true if an entry of the given age is stale.
    #[must_use]
    pub fn is_expired(self, age: Duration) -> bool {
        match self {
            Self::Infinite => false,
            Self::Finite(ttl) => age > ttl,
        }
    }
}

impl FromStr for Ttl {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
