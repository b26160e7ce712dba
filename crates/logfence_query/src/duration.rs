//! Range durations for log-range expressions.
//!
//! Durations use the Prometheus syntax: an integer count per unit, largest
//! unit first, e.g. `5m`, `90s`, `1h30m`. Printing is canonical (largest
//! units first, zero components omitted), so `90s` prints as `1m30s`; the
//! printed form always re-parses to an equal duration.

use std::fmt;

/// Milliseconds per unit, largest first, paired with the unit suffix.
const UNITS: [(u64, &str); 7] = [
    (365 * 24 * 60 * 60 * 1000, "y"),
    (7 * 24 * 60 * 60 * 1000, "w"),
    (24 * 60 * 60 * 1000, "d"),
    (60 * 60 * 1000, "h"),
    (60 * 1000, "m"),
    (1000, "s"),
    (1, "ms"),
];

/// A query range duration with millisecond resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryDuration {
    /// Total duration in milliseconds.
    millis: u64,
}

impl QueryDuration {
    /// Creates a duration from a millisecond count.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Returns the total duration in milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.millis
    }

    /// Parses a duration literal like `5m`, `90s`, or `1h30m`.
    ///
    /// # Errors
    /// Returns a message describing the malformed literal.
    pub fn parse(text: &str) -> Result<Self, String> {
        if text.is_empty() {
            return Err("empty duration".to_string());
        }

        let mut millis: u64 = 0;
        let mut rest = text;
        while !rest.is_empty() {
            let digits = rest.chars().take_while(char::is_ascii_digit).count();
            if digits == 0 {
                return Err(format!("invalid duration: {text}"));
            }
            let count: u64 = rest[..digits]
                .parse()
                .map_err(|_| format!("invalid duration: {text}"))?;
            rest = &rest[digits..];

            let unit_len = rest.chars().take_while(|c| c.is_ascii_alphabetic()).count();
            if unit_len == 0 {
                return Err(format!("missing unit in duration: {text}"));
            }
            let unit = &rest[..unit_len];
            rest = &rest[unit_len..];

            let Some(&(scale, _)) = UNITS.iter().find(|(_, suffix)| *suffix == unit) else {
                return Err(format!("unknown duration unit '{unit}' in: {text}"));
            };
            let scaled = count
                .checked_mul(scale)
                .ok_or_else(|| format!("duration overflow: {text}"))?;
            millis = millis
                .checked_add(scaled)
                .ok_or_else(|| format!("duration overflow: {text}"))?;
        }

        if millis == 0 {
            return Err(format!("zero duration: {text}"));
        }
        Ok(Self { millis })
    }
}

impl fmt::Display for QueryDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut remaining = self.millis;
        for (scale, suffix) in UNITS {
            if remaining >= scale {
                write!(f, "{}{suffix}", remaining / scale)?;
                remaining %= scale;
            }
        }
        Ok(())
    }
}
