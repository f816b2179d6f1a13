use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EnergyError;

static REGION_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Two-letter U.S. state or DC code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct Region(&'static str);

impl Region {
    pub fn parse(code: &str) -> Result<Self, EnergyError> {
        let upper = code.trim().to_ascii_uppercase();
        REGION_CODES
            .iter()
            .find(|c| **c == upper)
            .map(|c| Region(*c))
            .ok_or_else(|| EnergyError::UnknownRegion(code.to_string()))
    }

    pub fn code(&self) -> &'static str {
        self.0
    }

    /// All 51 regions in catalog order.
    pub fn all() -> impl Iterator<Item = Region> {
        REGION_CODES.iter().map(|c| Region(*c))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for Region {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::parse(s)
    }
}

impl TryFrom<String> for Region {
    type Error = EnergyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Region::parse(&value)
    }
}

// Goes through an owned `String`: the inner `&'static str` must never
// borrow from the input.
impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Region::try_from(code).map_err(serde::de::Error::custom)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0.to_string()
    }
}
