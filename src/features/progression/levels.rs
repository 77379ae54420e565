use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CEFR proficiency levels, ordered from beginner to mastery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

/// XP needed to reach each level (inclusive lower bound).
pub const LEVEL_THRESHOLDS: [(CefrLevel, i64); 6] = [
    (CefrLevel::A1, 0),
    (CefrLevel::A2, 50),
    (CefrLevel::B1, 150),
    (CefrLevel::B2, 300),
    (CefrLevel::C1, 600),
    (CefrLevel::C2, 1000),
];

#[derive(Error, Debug, PartialEq)]
#[error("Unknown level: {0}")]
pub struct UnknownLevel(pub String);

impl CefrLevel {
    pub fn threshold(self) -> i64 {
        LEVEL_THRESHOLDS
            .iter()
            .find(|(level, _)| *level == self)
            .map(|(_, xp)| *xp)
            .unwrap_or(0)
    }

    pub fn next(self) -> Option<CefrLevel> {
        let idx = LEVEL_THRESHOLDS.iter().position(|(level, _)| *level == self)?;
        LEVEL_THRESHOLDS.get(idx + 1).map(|(level, _)| *level)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl FromStr for CefrLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LEVEL_THRESHOLDS
            .iter()
            .map(|(level, _)| *level)
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_increasing() {
        assert!(LEVEL_THRESHOLDS.windows(2).all(|w| w[0].1 < w[1].1));
        assert!(LEVEL_THRESHOLDS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("b2".parse::<CefrLevel>(), Ok(CefrLevel::B2));
        assert_eq!(CefrLevel::C1.to_string(), "C1");
        assert_eq!("D1".parse::<CefrLevel>(), Err(UnknownLevel("D1".to_string())));
    }

    #[test]
    fn test_next_level() {
        assert_eq!(CefrLevel::A1.next(), Some(CefrLevel::A2));
        assert_eq!(CefrLevel::C1.next(), Some(CefrLevel::C2));
        assert_eq!(CefrLevel::C2.next(), None);
    }
}
