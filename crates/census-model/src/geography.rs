//! ASGS statistical area levels.
//!
//! Codes are prefix-nested: an SA4 code is the leading 3 characters of each
//! of its SA3 codes, and an SA3 code is the leading 5 characters of each of
//! its SA2 codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CensusError;

/// Statistical Area level of a geography code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeogLevel {
    /// Statistical Area Level 2 (finest, 9-digit code).
    Sa2,
    /// Statistical Area Level 3 (5-digit code).
    Sa3,
    /// Statistical Area Level 4 (coarsest, 3-digit code).
    Sa4,
}

impl GeogLevel {
    pub const ALL: [GeogLevel; 3] = [GeogLevel::Sa2, GeogLevel::Sa3, GeogLevel::Sa4];

    /// The `geog_type` value used by the census tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            GeogLevel::Sa2 => "SA2",
            GeogLevel::Sa3 => "SA3",
            GeogLevel::Sa4 => "SA4",
        }
    }

    /// Width of a code at this level.
    pub fn code_len(&self) -> usize {
        match self {
            GeogLevel::Sa2 => 9,
            GeogLevel::Sa3 => 5,
            GeogLevel::Sa4 => 3,
        }
    }

    /// Column holding the code for this level in denormalized tables.
    pub fn code_column(&self) -> &'static str {
        match self {
            GeogLevel::Sa2 => "sa2_code",
            GeogLevel::Sa3 => "sa3_code",
            GeogLevel::Sa4 => "sa4_code",
        }
    }

    /// Column holding the name for this level in denormalized tables.
    pub fn name_column(&self) -> &'static str {
        match self {
            GeogLevel::Sa2 => "sa2_name",
            GeogLevel::Sa3 => "sa3_name",
            GeogLevel::Sa4 => "sa4_name",
        }
    }

    /// Returns true when `code` has the width expected at this level.
    pub fn is_valid_code(&self, code: &str) -> bool {
        code.chars().count() == self.code_len()
    }

    /// Truncates `code` to the width of this level.
    ///
    /// Codes shorter than the level width are returned whole.
    pub fn prefix_of<'a>(&self, code: &'a str) -> &'a str {
        match code.char_indices().nth(self.code_len()) {
            Some((idx, _)) => &code[..idx],
            None => code,
        }
    }
}

impl fmt::Display for GeogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GeogLevel {
    type Err = CensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SA2" => Ok(GeogLevel::Sa2),
            "SA3" => Ok(GeogLevel::Sa3),
            "SA4" => Ok(GeogLevel::Sa4),
            _ => Err(CensusError::UnknownGeogLevel(s.to_string())),
        }
    }
}

/// Codes of a row at every level of the hierarchy.
///
/// A level is `None` when the row sits above it (an SA4 row has no SA2 or
/// SA3 code) or when the row's own level is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyCodes {
    pub sa2: Option<String>,
    pub sa3: Option<String>,
    pub sa4: Option<String>,
}

impl HierarchyCodes {
    pub fn get(&self, level: GeogLevel) -> Option<&str> {
        match level {
            GeogLevel::Sa2 => self.sa2.as_deref(),
            GeogLevel::Sa3 => self.sa3.as_deref(),
            GeogLevel::Sa4 => self.sa4.as_deref(),
        }
    }
}
