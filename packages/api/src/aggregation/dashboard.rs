use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;

use super::snapshot::{self, percentage, round2};
use crate::entity::{customer, monthly_metric, unit};

/// Number of snapshots the dashboard looks back on.
pub const HISTORY_MONTHS: u64 = 12;

/// Figures read from the live tables at request time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveTotals {
    pub total_units: i64,
    pub occupied_units: i64,
    pub total_customers: i64,
    pub active_customers: i64,
    pub current_revenue: i64,
    pub potential_revenue: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_units: i64,
    pub occupied_units: i64,
    pub available_units: i64,
    pub occupancy_rate: f64,
    pub total_customers: i64,
    pub active_customers: i64,
    #[serde(with = "crate::money")]
    pub current_revenue: i64,
    #[serde(with = "crate::money")]
    pub potential_revenue: i64,
    pub revenue_utilization: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    /// Relative change of total revenue against the previous snapshot, in percent
    pub revenue_change: f64,
    /// Relative change of the occupancy rate against the previous snapshot, in percent
    pub occupancy_change: f64,
    /// Occupancy rate difference in percentage points
    pub occupancy_point_change: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub overview: Overview,
    pub trends: Trends,
    /// Oldest first
    pub historical_metrics: Vec<monthly_metric::Model>,
}

/// `(current - previous) / previous * 100`, or 0 when there is nothing to compare against.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        round2((current - previous) / previous * 100.0)
    }
}

/// Builds the dashboard from snapshots (any order) and live totals.
pub fn summarize(mut history: Vec<monthly_metric::Model>, live: LiveTotals) -> DashboardSummary {
    history.sort_by(|a, b| b.month.cmp(&a.month));

    let trends = match history.as_slice() {
        [latest, previous, ..] => Trends {
            revenue_change: percent_change(
                latest.total_revenue as f64,
                previous.total_revenue as f64,
            ),
            occupancy_change: percent_change(latest.occupancy_rate, previous.occupancy_rate),
            occupancy_point_change: round2(latest.occupancy_rate - previous.occupancy_rate),
        },
        _ => Trends {
            revenue_change: 0.0,
            occupancy_change: 0.0,
            occupancy_point_change: 0.0,
        },
    };

    history.reverse();

    DashboardSummary {
        overview: Overview {
            total_units: live.total_units,
            occupied_units: live.occupied_units,
            available_units: live.total_units - live.occupied_units,
            occupancy_rate: percentage(live.occupied_units, live.total_units),
            total_customers: live.total_customers,
            active_customers: live.active_customers,
            current_revenue: live.current_revenue,
            potential_revenue: live.potential_revenue,
            revenue_utilization: percentage(live.current_revenue, live.potential_revenue),
        },
        trends,
        historical_metrics: history,
    }
}

/// Most recent snapshots, newest first.
pub async fn recent_snapshots<C: ConnectionTrait>(
    db: &C,
    months: u64,
) -> Result<Vec<monthly_metric::Model>, DbErr> {
    monthly_metric::Entity::find()
        .order_by_desc(monthly_metric::Column::Month)
        .limit(months)
        .all(db)
        .await
}

/// Customers without an end date or with one that has not passed yet.
pub fn active_on(today: NaiveDate) -> Condition {
    Condition::any()
        .add(customer::Column::EndDate.is_null())
        .add(customer::Column::EndDate.gte(today))
}

pub async fn live_totals<C: ConnectionTrait>(
    db: &C,
    today: NaiveDate,
) -> Result<LiveTotals, DbErr> {
    let units = unit::Entity::find().all(db).await?;
    let total_customers = customer::Entity::find().count(db).await? as i64;
    let active_customers = customer::Entity::find()
        .filter(active_on(today))
        .count(db)
        .await? as i64;

    Ok(LiveTotals {
        total_units: units.len() as i64,
        occupied_units: units.iter().filter(|u| u.is_occupied).count() as i64,
        total_customers,
        active_customers,
        current_revenue: snapshot::occupied_revenue(&units),
        potential_revenue: snapshot::potential_revenue(&units),
    })
}

#[tracing::instrument(name = "load_dashboard", skip(db))]
pub async fn load_dashboard<C: ConnectionTrait>(
    db: &C,
    today: NaiveDate,
) -> Result<DashboardSummary, DbErr> {
    let history = recent_snapshots(db, HISTORY_MONTHS).await?;
    let live = live_totals(db, today).await?;
    Ok(summarize(history, live))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::monthly_metric::{OccupancyBySize, RevenueBySize};

    fn snapshot(month: &str, revenue: i64, rate: f64) -> monthly_metric::Model {
        let stamp = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        monthly_metric::Model {
            month: month.to_string(),
            total_revenue: revenue,
            occupancy_rate: rate,
            total_units: 10,
            occupied_units: 0,
            new_customers: 0,
            churned_customers: 0,
            average_rental_duration: 0.0,
            revenue_by_size: RevenueBySize::default(),
            occupancy_by_size: OccupancyBySize::default(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_single_snapshot_has_flat_trends() {
        let summary = summarize(vec![snapshot("2025-03", 30000, 60.0)], LiveTotals::default());
        assert_eq!(summary.trends.revenue_change, 0.0);
        assert_eq!(summary.trends.occupancy_change, 0.0);
        assert_eq!(summary.historical_metrics.len(), 1);
    }

    #[test]
    fn test_empty_history() {
        let summary = summarize(Vec::new(), LiveTotals::default());
        assert!(summary.historical_metrics.is_empty());
        assert_eq!(summary.trends.occupancy_point_change, 0.0);
        assert_eq!(summary.overview.occupancy_rate, 0.0);
        assert_eq!(summary.overview.revenue_utilization, 0.0);
    }

    #[test]
    fn test_trends_compare_two_newest_months() {
        let summary = summarize(
            vec![
                snapshot("2025-01", 10000, 40.0),
                snapshot("2025-03", 24000, 60.0),
                snapshot("2025-02", 20000, 50.0),
            ],
            LiveTotals::default(),
        );

        assert_eq!(summary.trends.revenue_change, 20.0);
        assert_eq!(summary.trends.occupancy_change, 20.0);
        assert_eq!(summary.trends.occupancy_point_change, 10.0);

        let months: Vec<_> = summary
            .historical_metrics
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(months, ["2025-01", "2025-02", "2025-03"]);
    }

    #[test]
    fn test_zero_previous_month_gives_zero_change() {
        let summary = summarize(
            vec![snapshot("2025-02", 0, 0.0), snapshot("2025-03", 5000, 10.0)],
            LiveTotals::default(),
        );
        assert_eq!(summary.trends.revenue_change, 0.0);
        assert_eq!(summary.trends.occupancy_change, 0.0);
        assert_eq!(summary.trends.occupancy_point_change, 10.0);
    }

    #[test]
    fn test_overview_from_live_totals() {
        let summary = summarize(
            Vec::new(),
            LiveTotals {
                total_units: 8,
                occupied_units: 3,
                total_customers: 5,
                active_customers: 4,
                current_revenue: 15000,
                potential_revenue: 45000,
            },
        );

        let overview = summary.overview;
        assert_eq!(overview.available_units, 5);
        assert_eq!(overview.occupancy_rate, 37.5);
        assert_eq!(overview.revenue_utilization, 33.33);
        assert_eq!(overview.active_customers, 4);
    }

    #[test]
    fn test_percent_change_rounding() {
        assert_eq!(percent_change(2.0, 3.0), -33.33);
        assert_eq!(percent_change(5.0, 0.0), 0.0);
    }
}
