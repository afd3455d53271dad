//! Structured competition rank codes (`MS1`, `XD2`, ...).

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Errors produced while parsing a raw rank string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankParseError {
    #[error("rank code is empty")]
    Empty,

    #[error("unknown rank category in {0:?}")]
    UnknownCategory(String),

    #[error("missing rank index in {0:?}")]
    MissingIndex(String),

    #[error("invalid rank index in {0:?}")]
    InvalidIndex(String),
}

/// Competition category
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum RankCategory {
    /// Men's singles
    MS,
    /// Women's singles
    WS,
    /// Men's doubles
    MD,
    /// Women's doubles
    WD,
    /// Mixed doubles
    XD,
}

impl RankCategory {
    pub const ALL: [RankCategory; 5] = [Self::MS, Self::WS, Self::MD, Self::WD, Self::XD];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MS => "MS",
            Self::WS => "WS",
            Self::MD => "MD",
            Self::WD => "WD",
            Self::XD => "XD",
        }
    }
}

impl fmt::Display for RankCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single competition slot a player can hold, e.g. the school's first
/// men's singles player is `MS1`.
///
/// Raw strings are parsed once at the ingestion boundary (serde or
/// [`FromStr`]); everything downstream works with the structured value.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct RankCode {
    category: RankCategory,
    index: u32,
}

impl RankCode {
    /// Build a rank code, rejecting a zero index.
    pub fn new(category: RankCategory, index: u32) -> Result<Self, RankParseError> {
        if index == 0 {
            return Err(RankParseError::InvalidIndex(format!("{category}0")));
        }
        Ok(Self { category, index })
    }

    #[must_use]
    pub fn category(&self) -> RankCategory {
        self.category
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for RankCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.category, self.index)
    }
}

impl FromStr for RankCode {
    type Err = RankParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RankParseError::Empty);
        }

        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| RankParseError::MissingIndex(raw.to_string()))?;
        let (prefix, digits) = trimmed.split_at(split);

        let category = match prefix.to_ascii_uppercase().as_str() {
            "MS" => RankCategory::MS,
            "WS" => RankCategory::WS,
            "MD" => RankCategory::MD,
            "WD" => RankCategory::WD,
            "XD" => RankCategory::XD,
            _ => return Err(RankParseError::UnknownCategory(raw.to_string())),
        };

        let index: u32 = digits
            .parse()
            .map_err(|_| RankParseError::InvalidIndex(raw.to_string()))?;
        if index == 0 {
            return Err(RankParseError::InvalidIndex(raw.to_string()));
        }

        Ok(Self { category, index })
    }
}

impl TryFrom<String> for RankCode {
    type Error = RankParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RankCode> for String {
    fn from(value: RankCode) -> Self {
        value.to_string()
    }
}
