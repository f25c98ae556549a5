//! `SeaORM` Entity for storage units

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UnitSize;

/// A rentable storage unit.
///
/// `customer_id` and `rented_since` are set together when the unit is rented
/// and cleared together when it is released, so both are `Some` exactly when
/// `is_occupied` is true.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    pub size: UnitSize,
    /// Monthly rent in cents, decimal currency in JSON
    #[sea_orm(column_name = "pricePerMonth")]
    #[serde(with = "crate::money")]
    pub price_per_month: i64,
    #[sea_orm(column_name = "isOccupied")]
    pub is_occupied: bool,
    #[sea_orm(column_name = "customerId", column_type = "Text", nullable)]
    pub customer_id: Option<String>,
    #[sea_orm(column_name = "rentedSince", nullable)]
    pub rented_since: Option<Date>,
    #[sea_orm(nullable)]
    pub floor: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Customer,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
