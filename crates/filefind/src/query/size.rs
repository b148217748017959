//! Size range parsing and matching.
//!
//! | input | meaning |
//! |-------|---------|
//! | `-N`  | size <= N |
//! | `N`   | size == N |
//! | `N-`  | size >= N |
//! | `N-M` | min(N, M) <= size <= max(N, M) |
//!
//! `N` is a number with an optional binary unit letter (`k m g t p e z y`,
//! case-insensitive). A bare unit letter means one of that unit. Values past
//! `u64::MAX` saturate.

use crate::error::{FilefindError, Result};

/// A parsed size range for filtering by file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRange {
    AtMost(u64),
    Exactly(u64),
    AtLeast(u64),
    /// Bounds are normalized so `lo <= hi`.
    Between { lo: u64, hi: u64 },
}

impl SizeRange {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FilefindError::invalid_size(raw, "requires a value"));
        }

        let Some(split) = trimmed.find('-') else {
            return Ok(Self::Exactly(parse_size_literal(trimmed, raw)?));
        };
        let start = trimmed[..split].trim();
        let end = trimmed[split + 1..].trim();
        if end.contains('-') {
            return Err(FilefindError::invalid_size(raw, "more than one '-'"));
        }

        match (start.is_empty(), end.is_empty()) {
            (true, true) => Err(FilefindError::invalid_size(raw, "range has no bounds")),
            (true, false) => Ok(Self::AtMost(parse_size_literal(end, raw)?)),
            (false, true) => Ok(Self::AtLeast(parse_size_literal(start, raw)?)),
            (false, false) => {
                let first = parse_size_literal(start, raw)?;
                let second = parse_size_literal(end, raw)?;
                Ok(Self::Between {
                    lo: first.min(second),
                    hi: first.max(second),
                })
            }
        }
    }

    pub fn matches(&self, size: u64) -> bool {
        match *self {
            Self::AtMost(bound) => size <= bound,
            Self::Exactly(bound) => size == bound,
            Self::AtLeast(bound) => size >= bound,
            Self::Between { lo, hi } => lo <= size && size <= hi,
        }
    }
}

fn parse_size_literal(literal: &str, raw: &str) -> Result<u64> {
    let split = literal
        .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
        .unwrap_or(literal.len());
    let (number_part, unit_part) = literal.split_at(split);

    let multiplier = size_unit_multiplier(unit_part.trim(), raw)?;
    let value: f64 = if number_part.is_empty() {
        if unit_part.is_empty() {
            return Err(FilefindError::invalid_size(raw, "expected a number"));
        }
        1.0
    } else {
        number_part.parse().map_err(|_| {
            FilefindError::invalid_size(raw, format!("malformed number {number_part:?}"))
        })?
    };

    let bytes = (value * multiplier).round();
    if bytes >= u64::MAX as f64 {
        Ok(u64::MAX)
    } else {
        Ok(bytes as u64)
    }
}

fn size_unit_multiplier(unit: &str, raw: &str) -> Result<f64> {
    let power = match unit.to_ascii_lowercase().as_str() {
        "" => 0,
        "k" => 1,
        "m" => 2,
        "g" => 3,
        "t" => 4,
        "p" => 5,
        "e" => 6,
        "z" => 7,
        "y" => 8,
        _ => {
            return Err(FilefindError::invalid_size(
                raw,
                format!("unknown size unit {unit:?}"),
            ))
        }
    };
    Ok(1024f64.powi(power))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_dash_is_at_most() {
        let range = SizeRange::parse("-100").expect("parse");
        assert!(range.matches(0));
        assert!(range.matches(100));
        assert!(!range.matches(101));
    }

    #[test]
    fn trailing_dash_is_at_least() {
        let range = SizeRange::parse("100-").expect("parse");
        assert!(!range.matches(99));
        assert!(range.matches(100));
        assert!(range.matches(u64::MAX));
    }

    #[test]
    fn reversed_bounds_are_normalized() {
        let range = SizeRange::parse("50-20").expect("parse");
        assert_eq!(range, SizeRange::Between { lo: 20, hi: 50 });
        assert!(range.matches(20));
        assert!(range.matches(50));
        assert!(!range.matches(19));
        assert!(!range.matches(51));
    }

    #[test]
    fn unit_suffix_is_binary() {
        assert_eq!(SizeRange::parse("1k").expect("parse"), SizeRange::Exactly(1024));
        assert_eq!(
            SizeRange::parse("2M").expect("parse"),
            SizeRange::Exactly(2 * 1024 * 1024)
        );
        assert_eq!(
            SizeRange::parse("1g-").expect("parse"),
            SizeRange::AtLeast(1024 * 1024 * 1024)
        );
        assert_eq!(SizeRange::parse("k").expect("parse"), SizeRange::Exactly(1024));
    }

    #[test]
    fn mixed_units_in_range() {
        let range = SizeRange::parse("1k-1m").expect("parse");
        assert!(range.matches(4096));
        assert!(!range.matches(1023));
    }

    #[test]
    fn unknown_letter_is_rejected() {
        assert!(SizeRange::parse("10q").is_err());
        assert!(SizeRange::parse("10kb").is_err());
        assert!(SizeRange::parse("abc").is_err());
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(SizeRange::parse("").is_err());
        assert!(SizeRange::parse("-").is_err());
        assert!(SizeRange::parse("1-2-3").is_err());
        assert!(SizeRange::parse("1..2k").is_err());
    }

    #[test]
    fn oversized_units_saturate() {
        let at_most = SizeRange::parse("-1z").expect("parse");
        assert_eq!(at_most, SizeRange::AtMost(u64::MAX));
        assert!(at_most.matches(0));
        assert!(at_most.matches(u64::MAX));

        let at_least = SizeRange::parse("1y-").expect("parse");
        assert_eq!(at_least, SizeRange::AtLeast(u64::MAX));
        assert!(!at_least.matches(u64::MAX - 1));
        assert!(at_least.matches(u64::MAX));

        assert_eq!(
            SizeRange::parse("16e").expect("parse"),
            SizeRange::Exactly(u64::MAX)
        );
        assert_eq!(
            SizeRange::parse("1e").expect("parse"),
            SizeRange::Exactly(1 << 60)
        );
    }
}
