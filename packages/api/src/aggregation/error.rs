use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("{0}")]
    Validation(String),
    #[error("metrics aggregation failed: {0}")]
    AggregationFailure(#[from] DbErr),
}
