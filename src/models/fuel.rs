//! Generation fuel catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EnergyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FuelCode {
    Coal,
    PetroleumLiquids,
    PetroleumCoke,
    NaturalGas,
    OtherGases,
    Nuclear,
    ConventionalHydro,
    OtherRenewables,
    Wind,
    UtilitySolar,
    UtilityPhotovoltaic,
    UtilityThermal,
    Geothermal,
    Wood,
    OtherBiomass,
    PumpedStorage,
    Other,
    AllSolar,
    SmallScalePhotovoltaic,
}

impl FuelCode {
    pub const ALL: [FuelCode; 19] = [
        FuelCode::Coal,
        FuelCode::PetroleumLiquids,
        FuelCode::PetroleumCoke,
        FuelCode::NaturalGas,
        FuelCode::OtherGases,
        FuelCode::Nuclear,
        FuelCode::ConventionalHydro,
        FuelCode::OtherRenewables,
        FuelCode::Wind,
        FuelCode::UtilitySolar,
        FuelCode::UtilityPhotovoltaic,
        FuelCode::UtilityThermal,
        FuelCode::Geothermal,
        FuelCode::Wood,
        FuelCode::OtherBiomass,
        FuelCode::PumpedStorage,
        FuelCode::Other,
        FuelCode::AllSolar,
        FuelCode::SmallScalePhotovoltaic,
    ];

    /// Code used in remote series identifiers
    pub fn code(&self) -> &'static str {
        match self {
            FuelCode::Coal => "COW",
            FuelCode::PetroleumLiquids => "PEL",
            FuelCode::PetroleumCoke => "PC",
            FuelCode::NaturalGas => "NG",
            FuelCode::OtherGases => "OOG",
            FuelCode::Nuclear => "NUC",
            FuelCode::ConventionalHydro => "HYC",
            FuelCode::OtherRenewables => "AOR",
            FuelCode::Wind => "WND",
            FuelCode::UtilitySolar => "SUN",
            FuelCode::UtilityPhotovoltaic => "SPV",
            FuelCode::UtilityThermal => "STH",
            FuelCode::Geothermal => "GEO",
            FuelCode::Wood => "WWW",
            FuelCode::OtherBiomass => "WAS",
            FuelCode::PumpedStorage => "HPS",
            FuelCode::Other => "OTH",
            FuelCode::AllSolar => "TSN",
            FuelCode::SmallScalePhotovoltaic => "DPV",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FuelCode::Coal => "Coal",
            FuelCode::PetroleumLiquids => "Petroleum liquids",
            FuelCode::PetroleumCoke => "Petroleum coke",
            FuelCode::NaturalGas => "Natural gas",
            FuelCode::OtherGases => "Other gases",
            FuelCode::Nuclear => "Nuclear",
            FuelCode::ConventionalHydro => "Conventional hydroelectric",
            FuelCode::OtherRenewables => "Other renewables",
            FuelCode::Wind => "Wind",
            FuelCode::UtilitySolar => "All utility-scale solar",
            FuelCode::UtilityPhotovoltaic => "Utility-scale photovoltaic",
            FuelCode::UtilityThermal => "Utility-scale thermal",
            FuelCode::Geothermal => "Geothermal",
            FuelCode::Wood => "Wood and wood-derived fuels",
            FuelCode::OtherBiomass => "Other biomass",
            FuelCode::PumpedStorage => "Hydro-electric pumped storage",
            FuelCode::Other => "Other",
            FuelCode::AllSolar => "All solar",
            FuelCode::SmallScalePhotovoltaic => "Small-scale solar photovoltaic",
        }
    }

    pub fn parse(code: &str) -> Result<Self, EnergyError> {
        let upper = code.trim().to_ascii_uppercase();
        FuelCode::ALL
            .iter()
            .copied()
            .find(|f| f.code() == upper)
            .ok_or_else(|| EnergyError::UnknownFuel(code.to_string()))
    }

    /// Deduplicate a caller selection, keeping first occurrences in order.
    pub fn dedup(fuels: &[FuelCode]) -> Vec<FuelCode> {
        let mut seen = Vec::with_capacity(fuels.len());
        for fuel in fuels {
            if !seen.contains(fuel) {
                seen.push(*fuel);
            }
        }
        seen
    }
}

impl fmt::Display for FuelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FuelCode {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelCode::parse(s)
    }
}

impl TryFrom<String> for FuelCode {
    type Error = EnergyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FuelCode::parse(&value)
    }
}

impl From<FuelCode> for String {
    fn from(fuel: FuelCode) -> Self {
        fuel.code().to_string()
    }
}

/// Catalog entry exposed to the presentation layer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FuelInfo {
    pub code: FuelCode,
    pub name: &'static str,
}

impl From<FuelCode> for FuelInfo {
    fn from(code: FuelCode) -> Self {
        Self {
            code,
            name: code.display_name(),
        }
    }
}
