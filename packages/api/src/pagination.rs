use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QuerySelect, Select};
use serde::Serialize;

use crate::config::PaginationConfig;

/// Page and limit after defaulting and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Unparseable or missing values fall back to page 1 and the default limit.
    pub fn resolve(page: Option<&str>, limit: Option<&str>, config: &PaginationConfig) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<u64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<u64>().ok())
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit.max(1));
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Counts the matching rows and loads the requested page.
    pub async fn fetch<E, C>(&self, db: &C, select: Select<E>) -> Result<Paginated<E::Model>, DbErr>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
        C: ConnectionTrait,
    {
        let total = select.clone().count(db).await?;
        let items = select
            .offset(self.offset())
            .limit(self.limit)
            .all(db)
            .await?;
        Ok(Paginated::new(items, *self, total))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(request.limit),
        }
    }
}
