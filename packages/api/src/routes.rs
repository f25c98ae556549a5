use axum::extract::{FromRequest, FromRequestParts};
use serde::{Deserialize, Deserializer, de};

use crate::error::ApiError;

pub mod auth;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod units;

/// Accepts `true`/`false`/`1`/`0` in query strings; anything else counts as absent.
pub(crate) fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }))
}

/// Parses an optional `YYYY-MM-DD` body or query value.
pub(crate) fn deserialize_opt_date<'de, D>(
    deserializer: D,
) -> Result<Option<chrono::NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid date {value}, expected YYYY-MM-DD"))),
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn deserialize_patch_date<'de, D>(
    deserializer: D,
) -> Result<Option<Option<chrono::NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_opt_date(deserializer).map(Some)
}

/// `axum::Json` whose rejections answer with the `ApiError` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub(crate) struct JsonBody<T>(pub T);

/// `axum::extract::Query` whose rejections answer with the `ApiError` envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub(crate) struct QueryParams<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Unknown values fall back to `default`.
    pub fn parse(value: Option<&str>, default: SortOrder) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            _ => default,
        }
    }

    pub fn into_order(self) -> sea_orm::Order {
        match self {
            SortOrder::Asc => sea_orm::Order::Asc,
            SortOrder::Desc => sea_orm::Order::Desc,
        }
    }
}
