//! Ordinal scales and category vocabularies shared by every calculation.
//!
//! Each vocabulary parses from its snake_case name and rejects anything else.
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for consistency with the reporting frontend.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Error types for standards tables and vocabularies.
#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    /// Text that is not a member of a named vocabulary
    #[error("Unknown {kind} value: {value:?}")]
    UnknownOrdinal { kind: &'static str, value: String },

    /// A lookup table has no entry for a vocabulary member
    #[error("Table {table} has no entry for {key}")]
    MissingScaleEntry { table: &'static str, key: String },

    /// A table is present but internally inconsistent
    #[error("Invalid standards table: {0}")]
    InvalidTable(String),

    /// YAML (de)serialization failure
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StandardsError>;

fn parse_member<T: Copy>(
    kind: &'static str,
    members: &[T],
    name: fn(&T) -> &'static str,
    value: &str,
) -> Result<T> {
    members
        .iter()
        .copied()
        .find(|member| name(member) == value)
        .ok_or_else(|| StandardsError::UnknownOrdinal {
            kind,
            value: value.to_string(),
        })
}

/// Likelihood that a risk materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    Rare,
    Unlikely,
    Possible,
    Likely,
    AlmostCertain,
}

impl Likelihood {
    /// All levels in ascending order.
    pub fn all() -> [Self; 5] {
        [
            Self::Rare,
            Self::Unlikely,
            Self::Possible,
            Self::Likely,
            Self::AlmostCertain,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rare => "rare",
            Self::Unlikely => "unlikely",
            Self::Possible => "possible",
            Self::Likely => "likely",
            Self::AlmostCertain => "almost_certain",
        }
    }
}

impl FromStr for Likelihood {
    type Err = StandardsError;

    fn from_str(s: &str) -> Result<Self> {
        parse_member("likelihood", &Self::all(), Self::as_str, s)
    }
}

/// Severity of a risk's consequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Insignificant,
    Minor,
    Moderate,
    Major,
    Catastrophic,
}

impl Impact {
    /// All levels in ascending order.
    pub fn all() -> [Self; 5] {
        [
            Self::Insignificant,
            Self::Minor,
            Self::Moderate,
            Self::Major,
            Self::Catastrophic,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insignificant => "insignificant",
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Major => "major",
            Self::Catastrophic => "catastrophic",
        }
    }
}

impl FromStr for Impact {
    type Err = StandardsError;

    fn from_str(s: &str) -> Result<Self> {
        parse_member("impact", &Self::all(), Self::as_str, s)
    }
}

/// How well a mitigating control works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ControlEffectiveness {
    NotEffective,
    PartiallyEffective,
    Effective,
    HighlyEffective,
}

impl ControlEffectiveness {
    /// All levels in ascending order.
    pub fn all() -> [Self; 4] {
        [
            Self::NotEffective,
            Self::PartiallyEffective,
            Self::Effective,
            Self::HighlyEffective,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotEffective => "not_effective",
            Self::PartiallyEffective => "partially_effective",
            Self::Effective => "effective",
            Self::HighlyEffective => "highly_effective",
        }
    }
}

impl FromStr for ControlEffectiveness {
    type Err = StandardsError;

    fn from_str(s: &str) -> Result<Self> {
        parse_member("control effectiveness", &Self::all(), Self::as_str, s)
    }
}

/// Band a numeric risk score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Priority bucket of a material topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum PriorityBucket {
    High,
    Medium,
    Low,
}

impl PriorityBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// GHG Protocol scope 3 categories, numbered 1 to 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Scope3Category {
    PurchasedGoodsAndServices = 1,
    CapitalGoods = 2,
    FuelAndEnergyRelatedActivities = 3,
    UpstreamTransportation = 4,
    WasteGenerated = 5,
    BusinessTravel = 6,
    EmployeeCommuting = 7,
    UpstreamLeasedAssets = 8,
    DownstreamTransportation = 9,
    ProcessingOfSoldProducts = 10,
    UseOfSoldProducts = 11,
    EndOfLifeTreatment = 12,
    DownstreamLeasedAssets = 13,
    Franchises = 14,
    Investments = 15,
}

impl Scope3Category {
    /// Category number as published by the GHG Protocol.
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn all() -> [Self; 15] {
        [
            Self::PurchasedGoodsAndServices,
            Self::CapitalGoods,
            Self::FuelAndEnergyRelatedActivities,
            Self::UpstreamTransportation,
            Self::WasteGenerated,
            Self::BusinessTravel,
            Self::EmployeeCommuting,
            Self::UpstreamLeasedAssets,
            Self::DownstreamTransportation,
            Self::ProcessingOfSoldProducts,
            Self::UseOfSoldProducts,
            Self::EndOfLifeTreatment,
            Self::DownstreamLeasedAssets,
            Self::Franchises,
            Self::Investments,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PurchasedGoodsAndServices => "purchased_goods_and_services",
            Self::CapitalGoods => "capital_goods",
            Self::FuelAndEnergyRelatedActivities => "fuel_and_energy_related_activities",
            Self::UpstreamTransportation => "upstream_transportation",
            Self::WasteGenerated => "waste_generated",
            Self::BusinessTravel => "business_travel",
            Self::EmployeeCommuting => "employee_commuting",
            Self::UpstreamLeasedAssets => "upstream_leased_assets",
            Self::DownstreamTransportation => "downstream_transportation",
            Self::ProcessingOfSoldProducts => "processing_of_sold_products",
            Self::UseOfSoldProducts => "use_of_sold_products",
            Self::EndOfLifeTreatment => "end_of_life_treatment",
            Self::DownstreamLeasedAssets => "downstream_leased_assets",
            Self::Franchises => "franchises",
            Self::Investments => "investments",
        }
    }
}

impl FromStr for Scope3Category {
    type Err = StandardsError;

    fn from_str(s: &str) -> Result<Self> {
        parse_member("scope 3 category", &Self::all(), Self::as_str, s)
    }
}
