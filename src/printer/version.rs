//! RINEX revisions we know how to produce
use std::str::FromStr;

use super::Error;

/// Supported RINEX revisions
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Version {
    V2_10,
    #[default]
    V2_11,
    V3_01,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::V2_10 => write!(f, "2.10"),
            Self::V2_11 => write!(f, "2.11"),
            Self::V3_01 => write!(f, "3.01"),
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2.10" => Ok(Self::V2_10),
            "2.11" => Ok(Self::V2_11),
            "3.01" => Ok(Self::V3_01),
            other => Err(Error::UnknownVersion(other.to_string())),
        }
    }
}

impl Version {
    /// Major revision number
    pub fn major(&self) -> u8 {
        match self {
            Self::V2_10 | Self::V2_11 => 2,
            Self::V3_01 => 3,
        }
    }

    /// Exponent marker of floating point fields
    pub fn exponent_marker(&self) -> char {
        if self.major() < 3 { 'D' } else { 'E' }
    }
}
