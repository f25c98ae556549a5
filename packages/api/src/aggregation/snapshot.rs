//! Pure snapshot arithmetic.
//!
//! Everything here works on already-loaded rows so the numbers can be checked
//! without a database. The aggregator feeds it rows read inside one transaction.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use sea_orm::ActiveValue::Set;

use super::MetricsError;
use crate::entity::{
    customer,
    monthly_metric::{self, OccupancyBySize, RevenueBySize, SizeOccupancy},
    unit,
};

/// Rental durations are expressed in 30-day months.
const DAYS_PER_MONTH: f64 = 30.0;

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100` with two decimals, or 0 when `whole` is 0.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

/// Inclusive first/last day of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl MonthWindow {
    pub fn containing(date: NaiveDate) -> Self {
        let first_day = date - Days::new(u64::from(date.day0()));
        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self {
            first_day,
            last_day,
        }
    }

    /// Parses a `YYYY-MM` key.
    pub fn from_key(key: &str) -> Result<Self, MetricsError> {
        let bytes = key.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || b.is_ascii_digit());
        if !well_formed {
            return Err(MetricsError::Validation(format!(
                "Month must be formatted as YYYY-MM (got {key})"
            )));
        }

        NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
            .map(Self::containing)
            .map_err(|_| MetricsError::Validation(format!("Invalid month: {key}")))
    }

    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.first_day.year(), self.first_day.month())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }
}

/// The metric values of one month, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFigures {
    pub month: String,
    pub total_revenue: i64,
    pub occupancy_rate: f64,
    pub total_units: i64,
    pub occupied_units: i64,
    pub new_customers: i64,
    pub churned_customers: i64,
    pub average_rental_duration: f64,
    pub revenue_by_size: RevenueBySize,
    pub occupancy_by_size: OccupancyBySize,
}

impl SnapshotFigures {
    /// Computes the snapshot for `window` as seen on `today`.
    ///
    /// `customers` may contain rows outside the window; only start and end dates
    /// inside it are counted.
    pub fn compute(
        window: &MonthWindow,
        today: NaiveDate,
        units: &[unit::Model],
        customers: &[customer::Model],
    ) -> Self {
        let total_units = units.len() as i64;
        let occupied_units = units.iter().filter(|u| u.is_occupied).count() as i64;

        let new_customers = customers
            .iter()
            .filter(|c| window.contains(c.start_date))
            .count() as i64;
        let churned_customers = customers
            .iter()
            .filter(|c| c.end_date.is_some_and(|end| window.contains(end)))
            .count() as i64;

        Self {
            month: window.key(),
            total_revenue: occupied_revenue(units),
            occupancy_rate: percentage(occupied_units, total_units),
            total_units,
            occupied_units,
            new_customers,
            churned_customers,
            average_rental_duration: average_rental_duration(units, today),
            revenue_by_size: revenue_by_size(units),
            occupancy_by_size: occupancy_by_size(units),
        }
    }

    /// Active model for an insert; `created_at` only sticks on first insert.
    pub fn into_active_model(self, now: NaiveDateTime) -> monthly_metric::ActiveModel {
        monthly_metric::ActiveModel {
            month: Set(self.month),
            total_revenue: Set(self.total_revenue),
            occupancy_rate: Set(self.occupancy_rate),
            total_units: Set(self.total_units),
            occupied_units: Set(self.occupied_units),
            new_customers: Set(self.new_customers),
            churned_customers: Set(self.churned_customers),
            average_rental_duration: Set(self.average_rental_duration),
            revenue_by_size: Set(self.revenue_by_size),
            occupancy_by_size: Set(self.occupancy_by_size),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// Sum of monthly prices over occupied units (cents).
pub fn occupied_revenue(units: &[unit::Model]) -> i64 {
    units
        .iter()
        .filter(|u| u.is_occupied)
        .map(|u| u.price_per_month)
        .sum()
}

/// Sum of monthly prices over all units, as if every unit were rented (cents).
pub fn potential_revenue(units: &[unit::Model]) -> i64 {
    units.iter().map(|u| u.price_per_month).sum()
}

pub fn revenue_by_size(units: &[unit::Model]) -> RevenueBySize {
    let mut by_size = BTreeMap::new();
    for unit in units.iter().filter(|u| u.is_occupied) {
        *by_size.entry(unit.size).or_insert(0) += unit.price_per_month;
    }
    RevenueBySize(by_size)
}

pub fn occupancy_by_size(units: &[unit::Model]) -> OccupancyBySize {
    let mut counts: BTreeMap<_, (i64, i64)> = BTreeMap::new();
    for unit in units {
        let entry = counts.entry(unit.size).or_default();
        entry.0 += 1;
        if unit.is_occupied {
            entry.1 += 1;
        }
    }

    OccupancyBySize(
        counts
            .into_iter()
            .map(|(size, (total, occupied))| {
                (
                    size,
                    SizeOccupancy {
                        total,
                        occupied,
                        rate: percentage(occupied, total),
                    },
                )
            })
            .collect(),
    )
}

/// Mean whole-day age of active rentals divided by 30, two decimals.
pub fn average_rental_duration(units: &[unit::Model], today: NaiveDate) -> f64 {
    let days: Vec<i64> = units
        .iter()
        .filter(|u| u.is_occupied)
        .filter_map(|u| u.rented_since)
        .map(|since| (today - since).num_days().max(0))
        .collect();

    if days.is_empty() {
        return 0.0;
    }

    let total: i64 = days.iter().sum();
    round2(total as f64 / days.len() as f64 / DAYS_PER_MONTH)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::entity::sea_orm_active_enums::{CustomerType, UnitSize};

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn unit(
        id: &str,
        size: UnitSize,
        price: i64,
        rented_since: Option<NaiveDate>,
    ) -> unit::Model {
        let stamp = date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        unit::Model {
            id: id.to_string(),
            size,
            price_per_month: price,
            is_occupied: rented_since.is_some(),
            customer_id: rented_since.map(|_| "C001".to_string()),
            rented_since,
            floor: Some(1),
            notes: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    pub(crate) fn customer(id: &str, start: NaiveDate, end: Option<NaiveDate>) -> customer::Model {
        let stamp = start.and_hms_opt(0, 0, 0).unwrap();
        customer::Model {
            id: id.to_string(),
            name: format!("Customer {id}"),
            email: None,
            phone: None,
            customer_type: CustomerType::Private,
            company_name: None,
            address: None,
            start_date: start,
            end_date: end,
            notes: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_month_window_bounds() {
        let window = MonthWindow::containing(date(2024, 2, 17));
        assert_eq!(window.first_day, date(2024, 2, 1));
        assert_eq!(window.last_day, date(2024, 2, 29));
        assert_eq!(window.key(), "2024-02");

        let december = MonthWindow::containing(date(2025, 12, 31));
        assert_eq!(december.first_day, date(2025, 12, 1));
        assert_eq!(december.last_day, date(2025, 12, 31));
    }

    #[test]
    fn test_month_key_parsing() {
        let window = MonthWindow::from_key("2025-03").unwrap();
        assert_eq!(window.first_day, date(2025, 3, 1));
        assert_eq!(window.last_day, date(2025, 3, 31));

        for bad in ["2025-3", "2025-13", "25-03-01", "march", "2025/03", ""] {
            assert!(
                matches!(MonthWindow::from_key(bad), Err(MetricsError::Validation(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_ten_units_six_occupied() {
        let today = date(2025, 3, 20);
        let units: Vec<_> = (0..10)
            .map(|i| {
                let rented = (i < 6).then(|| date(2025, 3, 1));
                unit(&format!("A{i:02}"), UnitSize::FiveSqm, 5000, rented)
            })
            .collect();

        let figures = SnapshotFigures::compute(&MonthWindow::containing(today), today, &units, &[]);

        assert_eq!(figures.total_revenue, 30000);
        assert_eq!(figures.occupancy_rate, 60.0);
        assert_eq!(figures.total_units, 10);
        assert_eq!(figures.occupied_units, 6);
        assert_eq!(figures.revenue_by_size.0.get(&UnitSize::FiveSqm), Some(&30000));
        let five = &figures.occupancy_by_size.0[&UnitSize::FiveSqm];
        assert_eq!((five.total, five.occupied, five.rate), (10, 6, 60.0));
    }

    #[test]
    fn test_no_units_yields_zeroes() {
        let today = date(2025, 3, 20);
        let figures = SnapshotFigures::compute(&MonthWindow::containing(today), today, &[], &[]);

        assert_eq!(figures.occupancy_rate, 0.0);
        assert_eq!(figures.total_revenue, 0);
        assert_eq!(figures.average_rental_duration, 0.0);
        assert!(figures.occupancy_by_size.0.is_empty());
        assert!(figures.revenue_by_size.0.is_empty());
    }

    #[test]
    fn test_breakdowns_add_up_to_totals() {
        let today = date(2025, 6, 10);
        let units = vec![
            unit("A1", UnitSize::FiveSqm, 4999, Some(date(2025, 1, 1))),
            unit("A2", UnitSize::FiveSqm, 4999, None),
            unit("B1", UnitSize::TenSqm, 8950, Some(date(2024, 11, 15))),
            unit("C1", UnitSize::ThirtySqm, 21000, Some(date(2025, 6, 1))),
            unit("C2", UnitSize::ThirtySqm, 21000, None),
            unit("D1", UnitSize::TwentySqm, 15000, None),
        ];

        let figures = SnapshotFigures::compute(&MonthWindow::containing(today), today, &units, &[]);

        let revenue_sum: i64 = figures.revenue_by_size.0.values().sum();
        assert_eq!(revenue_sum, figures.total_revenue);
        assert_eq!(figures.total_revenue, 4999 + 8950 + 21000);

        let occupied_sum: i64 = figures.occupancy_by_size.0.values().map(|s| s.occupied).sum();
        let total_sum: i64 = figures.occupancy_by_size.0.values().map(|s| s.total).sum();
        assert_eq!(occupied_sum, figures.occupied_units);
        assert_eq!(total_sum, figures.total_units);

        // Sizes with units but no rentals stay in the occupancy map only.
        assert!(!figures.revenue_by_size.0.contains_key(&UnitSize::TwentySqm));
        assert_eq!(figures.occupancy_by_size.0[&UnitSize::TwentySqm].rate, 0.0);
        assert!(!figures.occupancy_by_size.0.contains_key(&UnitSize::FifteenSqm));

        assert!((0.0..=100.0).contains(&figures.occupancy_rate));
        assert_eq!(figures.occupancy_rate, 50.0);
    }

    #[test]
    fn test_occupancy_rate_rounds_to_two_decimals() {
        let today = date(2025, 6, 10);
        let units = vec![
            unit("A1", UnitSize::FiveSqm, 100, Some(today)),
            unit("A2", UnitSize::FiveSqm, 100, None),
            unit("A3", UnitSize::FiveSqm, 100, None),
        ];

        let figures = SnapshotFigures::compute(&MonthWindow::containing(today), today, &units, &[]);
        assert_eq!(figures.occupancy_rate, 33.33);
        assert_eq!(figures.occupancy_by_size.0[&UnitSize::FiveSqm].rate, 33.33);
    }

    #[test]
    fn test_customers_counted_only_in_their_month() {
        let customers = vec![customer("C001", date(2025, 3, 5), None)];

        for (month, expected) in [(2, 0), (3, 1), (4, 0)] {
            let today = date(2025, month, 15);
            let figures =
                SnapshotFigures::compute(&MonthWindow::containing(today), today, &[], &customers);
            assert_eq!(figures.new_customers, expected, "month {month}");
            assert_eq!(figures.churned_customers, 0);
        }
    }

    #[test]
    fn test_window_is_inclusive_on_both_ends() {
        let customers = vec![
            customer("C001", date(2025, 4, 1), None),
            customer("C002", date(2025, 4, 30), None),
            customer("C003", date(2024, 1, 1), Some(date(2025, 4, 1))),
            customer("C004", date(2024, 1, 1), Some(date(2025, 4, 30))),
            customer("C005", date(2025, 3, 31), Some(date(2025, 5, 1))),
        ];
        let today = date(2025, 4, 12);

        let figures =
            SnapshotFigures::compute(&MonthWindow::containing(today), today, &[], &customers);
        assert_eq!(figures.new_customers, 2);
        assert_eq!(figures.churned_customers, 2);
    }

    #[test]
    fn test_average_rental_duration() {
        let today = date(2025, 7, 1);
        let units = vec![
            // 60 days and 30 days -> mean 45 days -> 1.5 months
            unit("A1", UnitSize::FiveSqm, 100, Some(today - Days::new(60))),
            unit("A2", UnitSize::FiveSqm, 100, Some(today - Days::new(30))),
            unit("A3", UnitSize::FiveSqm, 100, None),
        ];
        assert_eq!(average_rental_duration(&units, today), 1.5);

        let mut occupied_without_date = unit("A4", UnitSize::TenSqm, 100, None);
        occupied_without_date.is_occupied = true;
        assert_eq!(average_rental_duration(&[occupied_without_date], today), 0.0);

        let future = unit("A5", UnitSize::FiveSqm, 100, Some(today + Days::new(10)));
        assert_eq!(average_rental_duration(&[future], today), 0.0);
    }

    #[test]
    fn test_potential_revenue_includes_vacant_units() {
        let today = date(2025, 7, 1);
        let units = vec![
            unit("A1", UnitSize::FiveSqm, 1000, Some(today)),
            unit("A2", UnitSize::FiveSqm, 2500, None),
        ];
        assert_eq!(potential_revenue(&units), 3500);
        assert_eq!(occupied_revenue(&units), 1000);
    }
}
