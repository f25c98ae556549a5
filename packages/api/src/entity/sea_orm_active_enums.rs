use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed storage unit size categories.
///
/// Variant order is the natural size order, which is also the key order of the
/// per-size breakdown maps.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum UnitSize {
    #[sea_orm(string_value = "5m²")]
    #[serde(rename = "5m²")]
    FiveSqm,
    #[sea_orm(string_value = "10m²")]
    #[serde(rename = "10m²")]
    TenSqm,
    #[sea_orm(string_value = "15m²")]
    #[serde(rename = "15m²")]
    FifteenSqm,
    #[sea_orm(string_value = "20m²")]
    #[serde(rename = "20m²")]
    TwentySqm,
    #[sea_orm(string_value = "30m²")]
    #[serde(rename = "30m²")]
    ThirtySqm,
}

impl UnitSize {
    pub fn label(&self) -> &'static str {
        match self {
            UnitSize::FiveSqm => "5m²",
            UnitSize::TenSqm => "10m²",
            UnitSize::FifteenSqm => "15m²",
            UnitSize::TwentySqm => "20m²",
            UnitSize::ThirtySqm => "30m²",
        }
    }
}

impl fmt::Display for UnitSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UnitSize {
    type Err = String;

    /// Accepts `5m²`, `5m2`, `5sqm` and bare `5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        let digits = trimmed
            .trim_end_matches("m²")
            .trim_end_matches("m2")
            .trim_end_matches("sqm");
        match digits {
            "5" => Ok(UnitSize::FiveSqm),
            "10" => Ok(UnitSize::TenSqm),
            "15" => Ok(UnitSize::FifteenSqm),
            "20" => Ok(UnitSize::TwentySqm),
            "30" => Ok(UnitSize::ThirtySqm),
            _ => Err(format!(
                "Size must be one of: 5m², 10m², 15m², 20m², 30m² (got {s})"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    #[sea_orm(string_value = "private")]
    Private,
    #[sea_orm(string_value = "business")]
    Business,
}

impl FromStr for CustomerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "private" => Ok(CustomerType::Private),
            "business" => Ok(CustomerType::Business),
            other => Err(format!("Type must be private or business (got {other})")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "staff")]
    Staff,
}
