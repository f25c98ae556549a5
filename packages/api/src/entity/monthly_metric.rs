//! `SeaORM` Entity for monthly metric snapshots
//! One row per calendar month, keyed by `YYYY-MM`. Rows are written through an
//! upsert on `month`, so a month never has more than one snapshot.

use std::collections::BTreeMap;

use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UnitSize;

/// Revenue of occupied units per size. Sizes without occupied units are absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct RevenueBySize(#[serde(with = "crate::money::map")] pub BTreeMap<UnitSize, i64>);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeOccupancy {
    pub total: i64,
    pub occupied: i64,
    /// Percentage with two decimals
    pub rate: f64,
}

/// Occupancy per size. Sizes without any units are absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct OccupancyBySize(pub BTreeMap<UnitSize, SizeOccupancy>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "metrics")]
pub struct Model {
    /// Calendar month (YYYY-MM)
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub month: String,
    /// Sum of monthly prices over occupied units
    #[sea_orm(column_name = "totalRevenue")]
    #[serde(with = "crate::money")]
    pub total_revenue: i64,
    /// Occupied share of all units in percent
    #[sea_orm(column_name = "occupancyRate")]
    pub occupancy_rate: f64,
    #[sea_orm(column_name = "totalUnits")]
    pub total_units: i64,
    #[sea_orm(column_name = "occupiedUnits")]
    pub occupied_units: i64,
    #[sea_orm(column_name = "newCustomers")]
    pub new_customers: i64,
    #[sea_orm(column_name = "churnedCustomers")]
    pub churned_customers: i64,
    /// Mean age of active rentals in 30-day months
    #[sea_orm(column_name = "averageRentalDuration")]
    pub average_rental_duration: f64,
    #[sea_orm(column_name = "revenueBySize", column_type = "JsonBinary")]
    pub revenue_by_size: RevenueBySize,
    #[sea_orm(column_name = "occupancyBySize", column_type = "JsonBinary")]
    pub occupancy_by_size: OccupancyBySize,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
