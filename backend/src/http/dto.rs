//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies for records and analytics reuse the serializable types
//! in [`crate::api`]; this module adds the query-string and envelope types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::api::{
    FilterCriteria, HistoricalInsight, NewProperty, Pagination, PropertyRecord, PropertyUpdate,
    StatisticsSummary,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Query parameters for plain listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn pagination(&self, default_limit: usize) -> Pagination {
        Pagination::new(self.skip.unwrap_or(0), self.limit.unwrap_or(default_limit))
    }
}

/// Filter constraints plus pagination, as accepted by search and outlier endpoints.
///
/// Fields are spelled out rather than flattened because query-string
/// decoding cannot type flattened numeric fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub skip: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// IQR multiplier, only read by the outlier endpoint
    #[serde(default)]
    pub factor: Option<f64>,
}

impl FilterQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min_price: self.min_price,
            max_price: self.max_price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            city: self.city.clone(),
        }
    }

    pub fn pagination(&self, default_limit: usize) -> Pagination {
        Pagination::new(self.skip.unwrap_or(0), self.limit.unwrap_or(default_limit))
    }
}

/// Query parameters for historical insights (RFC 3339 timestamps).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightsQuery {
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// Response for bulk creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateResponse {
    pub inserted: usize,
    pub properties: Vec<PropertyRecord>,
}
