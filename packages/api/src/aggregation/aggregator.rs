//! Computes and stores the snapshot of the current month.
//! Called from `POST /metrics/calculate` and from the scheduled job of the server.

use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    DbErr, EntityTrait, IsolationLevel, QueryFilter, TransactionTrait, sea_query::OnConflict,
};
use serde::Serialize;

use super::{
    MetricsError,
    snapshot::{MonthWindow, SnapshotFigures},
};
use crate::entity::{customer, monthly_metric, unit};

#[derive(Debug, Clone, Serialize)]
pub struct CalculatedSnapshot {
    pub metric: monthly_metric::Model,
    /// `false` when an existing snapshot of the month was overwritten
    pub created: bool,
}

pub async fn compute_current_snapshot(
    db: &DatabaseConnection,
) -> Result<CalculatedSnapshot, MetricsError> {
    compute_snapshot_at(db, Utc::now().naive_utc()).await
}

/// Recomputes the snapshot of the month containing `now` and upserts it.
///
/// Reads and write share one transaction. On Postgres it runs with
/// `REPEATABLE READ`, so all figures come from the same view of the store.
#[tracing::instrument(name = "compute_snapshot", skip(db))]
pub async fn compute_snapshot_at(
    db: &DatabaseConnection,
    now: NaiveDateTime,
) -> Result<CalculatedSnapshot, MetricsError> {
    let result = run(db, now).await;

    let outcome = match &result {
        Ok(snapshot) if snapshot.created => "created",
        Ok(_) => "updated",
        Err(err) => {
            tracing::error!("Snapshot calculation failed: {}", err);
            "failed"
        }
    };
    metrics::counter!("snapshot_calculations_total", "outcome" => outcome).increment(1);

    result
}

async fn run(db: &DatabaseConnection, now: NaiveDateTime) -> Result<CalculatedSnapshot, MetricsError> {
    let today = now.date();
    let window = MonthWindow::containing(today);

    let txn = begin(db).await?;

    let units = unit::Entity::find().all(&txn).await?;
    let customers = customer::Entity::find()
        .filter(
            Condition::any()
                .add(customer::Column::StartDate.between(window.first_day, window.last_day))
                .add(customer::Column::EndDate.between(window.first_day, window.last_day)),
        )
        .all(&txn)
        .await?;

    let figures = SnapshotFigures::compute(&window, today, &units, &customers);
    let month = figures.month.clone();

    let created = monthly_metric::Entity::find_by_id(month.clone())
        .one(&txn)
        .await?
        .is_none();

    upsert(&txn, figures, now).await?;

    let metric = monthly_metric::Entity::find_by_id(month.clone())
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("metrics row {month} after upsert")))?;

    txn.commit().await?;

    tracing::info!(
        month = %metric.month,
        created,
        total_units = metric.total_units,
        occupied_units = metric.occupied_units,
        "Snapshot stored"
    );

    Ok(CalculatedSnapshot { metric, created })
}

async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction, DbErr> {
    match db.get_database_backend() {
        DbBackend::Postgres => {
            db.begin_with_config(Some(IsolationLevel::RepeatableRead), None)
                .await
        }
        _ => db.begin().await,
    }
}

async fn upsert(
    txn: &DatabaseTransaction,
    figures: SnapshotFigures,
    now: NaiveDateTime,
) -> Result<(), DbErr> {
    use monthly_metric::Column;

    monthly_metric::Entity::insert(figures.into_active_model(now))
        .on_conflict(
            OnConflict::column(Column::Month)
                .update_columns([
                    Column::TotalRevenue,
                    Column::OccupancyRate,
                    Column::TotalUnits,
                    Column::OccupiedUnits,
                    Column::NewCustomers,
                    Column::ChurnedCustomers,
                    Column::AverageRentalDuration,
                    Column::RevenueBySize,
                    Column::OccupancyBySize,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;

    Ok(())
}
