//! Live and historical breakdowns behind `/metrics/revenue`, `/metrics/occupancy`,
//! `/units/stats` and `/customers/stats`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use serde::Serialize;

use super::{
    dashboard::recent_snapshots,
    snapshot::{
        MonthWindow, occupancy_by_size, occupied_revenue, percentage, potential_revenue, round2,
    },
};
use crate::entity::{
    customer,
    monthly_metric::{self, OccupancyBySize, RevenueBySize},
    sea_orm_active_enums::{CustomerType, UnitSize},
    unit,
};

pub const DEFAULT_TREND_MONTHS: u64 = 12;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SizeRevenue {
    pub size: UnitSize,
    #[serde(with = "crate::money")]
    pub revenue: i64,
    pub units: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevenueTrendPoint {
    pub month: String,
    #[serde(with = "crate::money")]
    pub total_revenue: i64,
    pub revenue_by_size: RevenueBySize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevenueAnalytics {
    #[serde(with = "crate::money")]
    pub current_revenue: i64,
    #[serde(with = "crate::money")]
    pub potential_revenue: i64,
    #[serde(with = "crate::money")]
    pub lost_revenue: i64,
    pub revenue_by_size: Vec<SizeRevenue>,
    pub monthly_trend: Vec<RevenueTrendPoint>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SizeAvailability {
    pub size: UnitSize,
    pub total: i64,
    pub occupied: i64,
    pub available: i64,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyTrendPoint {
    pub month: String,
    pub occupancy_rate: f64,
    pub total_units: i64,
    pub occupied_units: i64,
    pub occupancy_by_size: OccupancyBySize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyAnalytics {
    pub current_occupancy: Vec<SizeAvailability>,
    pub monthly_trend: Vec<OccupancyTrendPoint>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SizeStats {
    pub size: UnitSize,
    pub total: i64,
    pub occupied: i64,
    pub available: i64,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnitStats {
    pub total_units: i64,
    pub occupied_units: i64,
    pub available_units: i64,
    pub occupancy_rate: f64,
    pub by_size: Vec<SizeStats>,
    /// Mean monthly price per size in currency units, two decimals
    pub avg_price_by_size: BTreeMap<UnitSize, f64>,
    #[serde(with = "crate::money")]
    pub total_potential_revenue: i64,
    #[serde(with = "crate::money")]
    pub current_monthly_revenue: i64,
    pub revenue_utilization: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub total_customers: i64,
    pub active_customers: i64,
    pub inactive_customers: i64,
    pub by_type: BTreeMap<CustomerType, i64>,
    pub new_this_month: i64,
    pub churned_this_month: i64,
    pub churn_rate: f64,
}

fn size_availability(units: &[unit::Model]) -> Vec<SizeAvailability> {
    occupancy_by_size(units)
        .0
        .into_iter()
        .map(|(size, entry)| SizeAvailability {
            size,
            total: entry.total,
            occupied: entry.occupied,
            available: entry.total - entry.occupied,
            rate: entry.rate,
        })
        .collect()
}

/// `history` newest first, as returned by `recent_snapshots`.
pub fn revenue_analytics(
    units: &[unit::Model],
    history: Vec<monthly_metric::Model>,
) -> RevenueAnalytics {
    let current_revenue = occupied_revenue(units);
    let potential_revenue = potential_revenue(units);

    let mut by_size: BTreeMap<UnitSize, (i64, i64)> = BTreeMap::new();
    for unit in units.iter().filter(|u| u.is_occupied) {
        let entry = by_size.entry(unit.size).or_default();
        entry.0 += unit.price_per_month;
        entry.1 += 1;
    }

    RevenueAnalytics {
        current_revenue,
        potential_revenue,
        lost_revenue: potential_revenue - current_revenue,
        revenue_by_size: by_size
            .into_iter()
            .map(|(size, (revenue, units))| SizeRevenue {
                size,
                revenue,
                units,
            })
            .collect(),
        monthly_trend: history
            .into_iter()
            .rev()
            .map(|m| RevenueTrendPoint {
                month: m.month,
                total_revenue: m.total_revenue,
                revenue_by_size: m.revenue_by_size,
            })
            .collect(),
    }
}

/// `history` newest first, as returned by `recent_snapshots`.
pub fn occupancy_analytics(
    units: &[unit::Model],
    history: Vec<monthly_metric::Model>,
) -> OccupancyAnalytics {
    OccupancyAnalytics {
        current_occupancy: size_availability(units),
        monthly_trend: history
            .into_iter()
            .rev()
            .map(|m| OccupancyTrendPoint {
                month: m.month,
                occupancy_rate: m.occupancy_rate,
                total_units: m.total_units,
                occupied_units: m.occupied_units,
                occupancy_by_size: m.occupancy_by_size,
            })
            .collect(),
    }
}

pub fn unit_stats(units: &[unit::Model]) -> UnitStats {
    let total_units = units.len() as i64;
    let occupied_units = units.iter().filter(|u| u.is_occupied).count() as i64;
    let total_potential_revenue = potential_revenue(units);
    let current_monthly_revenue = occupied_revenue(units);

    let mut prices: BTreeMap<UnitSize, (i64, i64)> = BTreeMap::new();
    for unit in units {
        let entry = prices.entry(unit.size).or_default();
        entry.0 += unit.price_per_month;
        entry.1 += 1;
    }

    UnitStats {
        total_units,
        occupied_units,
        available_units: total_units - occupied_units,
        occupancy_rate: percentage(occupied_units, total_units),
        by_size: size_availability(units)
            .into_iter()
            .map(|s| SizeStats {
                size: s.size,
                total: s.total,
                occupied: s.occupied,
                available: s.available,
                occupancy_rate: s.rate,
            })
            .collect(),
        avg_price_by_size: prices
            .into_iter()
            .map(|(size, (sum, count))| (size, round2(sum as f64 / count as f64 / 100.0)))
            .collect(),
        total_potential_revenue,
        current_monthly_revenue,
        revenue_utilization: percentage(current_monthly_revenue, total_potential_revenue),
    }
}

pub fn customer_stats(customers: &[customer::Model], today: NaiveDate) -> CustomerStats {
    let first_of_month = MonthWindow::containing(today).first_day;

    let total_customers = customers.len() as i64;
    let active_customers = customers.iter().filter(|c| c.is_active_on(today)).count() as i64;
    let new_this_month = customers
        .iter()
        .filter(|c| c.start_date >= first_of_month)
        .count() as i64;
    let churned_this_month = customers
        .iter()
        .filter(|c| {
            c.end_date
                .is_some_and(|end| end >= first_of_month && end <= today)
        })
        .count() as i64;

    let mut by_type = BTreeMap::new();
    for customer in customers {
        *by_type.entry(customer.customer_type).or_insert(0) += 1;
    }

    CustomerStats {
        total_customers,
        active_customers,
        inactive_customers: total_customers - active_customers,
        by_type,
        new_this_month,
        churned_this_month,
        churn_rate: percentage(churned_this_month, active_customers),
    }
}

pub async fn load_revenue_analytics<C: ConnectionTrait>(
    db: &C,
    months: u64,
) -> Result<RevenueAnalytics, DbErr> {
    let units = unit::Entity::find().all(db).await?;
    let history = recent_snapshots(db, months).await?;
    Ok(revenue_analytics(&units, history))
}

pub async fn load_occupancy_analytics<C: ConnectionTrait>(
    db: &C,
    months: u64,
) -> Result<OccupancyAnalytics, DbErr> {
    let units = unit::Entity::find().all(db).await?;
    let history = recent_snapshots(db, months).await?;
    Ok(occupancy_analytics(&units, history))
}

pub async fn load_unit_stats<C: ConnectionTrait>(db: &C) -> Result<UnitStats, DbErr> {
    let units = unit::Entity::find().all(db).await?;
    Ok(unit_stats(&units))
}

pub async fn load_customer_stats<C: ConnectionTrait>(
    db: &C,
    today: NaiveDate,
) -> Result<CustomerStats, DbErr> {
    let customers = customer::Entity::find().all(db).await?;
    Ok(customer_stats(&customers, today))
}
