use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Bits 0..=8, one per possible Moore-neighborhood count.
pub const RULE_MASK: u16 = 0b1_1111_1111;

/// Birth and survival masks. Bit `i` set means "exactly `i` live
/// neighbors triggers the outcome".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleSet {
    pub born: u16,
    pub survive: u16,
}

impl Default for RuleSet {
    /// Classic life: born on 3, survive on 2 or 3.
    fn default() -> Self {
        Self {
            born: 0b000_001_000,
            survive: 0b000_001_100,
        }
    }
}

impl RuleSet {
    /// Builds a rule set, discarding bits above 8.
    #[must_use]
    pub const fn new(born: u16, survive: u16) -> Self {
        Self {
            born: born & RULE_MASK,
            survive: survive & RULE_MASK,
        }
    }

    pub fn from_counts(born: &[u8], survive: &[u8]) -> Result<Self, DataError> {
        Ok(Self {
            born: counts_to_mask(born)?,
            survive: counts_to_mask(survive)?,
        })
    }

    /// Parses `B3/S23` style notation. Either half may come first, either
    /// may be empty and letters are case-insensitive.
    pub fn from_notation(notation: &str) -> Result<Self, DataError> {
        let invalid = || DataError::RuleNotation(notation.to_string());
        let mut born = None;
        let mut survive = None;

        for part in notation.trim().split('/') {
            let mut chars = part.trim().chars();
            let slot = match chars.next().map(|c| c.to_ascii_uppercase()) {
                Some('B') => &mut born,
                Some('S') => &mut survive,
                _ => return Err(invalid()),
            };
            if slot.is_some() {
                return Err(invalid());
            }
            let mut mask = 0u16;
            for c in chars {
                let digit = c.to_digit(10).filter(|d| *d <= 8).ok_or_else(invalid)?;
                mask |= 1 << digit;
            }
            *slot = Some(mask);
        }

        match (born, survive) {
            (Some(born), Some(survive)) => Ok(Self { born, survive }),
            _ => Err(invalid()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn born_on(&self, live_neighbors: u8) -> bool {
        live_neighbors <= 8 && (self.born >> live_neighbors) & 1 == 1
    }

    #[inline]
    #[must_use]
    pub const fn survives_on(&self, live_neighbors: u8) -> bool {
        live_neighbors <= 8 && (self.survive >> live_neighbors) & 1 == 1
    }

    /// True when neither mask has bits outside 0..=8.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.born & !RULE_MASK == 0 && self.survive & !RULE_MASK == 0
    }

    #[must_use]
    pub fn notation(&self) -> String {
        self.to_string()
    }
}

fn counts_to_mask(counts: &[u8]) -> Result<u16, DataError> {
    counts.iter().try_fold(0u16, |mask, &n| {
        if n > 8 {
            Err(DataError::NeighborCount(n))
        } else {
            Ok(mask | (1 << n))
        }
    })
}

fn write_digits(f: &mut fmt::Formatter<'_>, mask: u16) -> fmt::Result {
    for n in 0..=8u8 {
        if (mask >> n) & 1 == 1 {
            write!(f, "{n}")?;
        }
    }
    Ok(())
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        write_digits(f, self.born)?;
        f.write_str("/S")?;
        write_digits(f, self.survive)
    }
}

impl FromStr for RuleSet {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}
