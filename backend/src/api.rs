//! Public API surface for the property backend.
//!
//! This file consolidates the domain and DTO types shared by the repository,
//! the analytics services and the HTTP layer.
//! All types derive Serialize/Deserialize for JSON serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Property identifier (primary key, caller-assigned or generated on insert).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PropertyId(pub i64);

impl PropertyId {
    pub fn new(value: i64) -> Self {
        PropertyId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PropertyId> for i64 {
    fn from(id: PropertyId) -> Self {
        id.0
    }
}

// =========================================================
// Property records
// =========================================================

/// A stored property listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub property_id: PropertyId,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub price: Option<f64>,
    pub bedrooms: Option<u32>,
    /// Fractional values allowed (e.g. 2.5 for a half bath).
    pub bathrooms: Option<f64>,
    pub square_feet: Option<u32>,
    pub date_listed: DateTime<Utc>,
}

/// Payload for creating a property.
///
/// `property_id` is assigned by the repository when omitted and
/// `date_listed` defaults to the ingestion time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    #[serde(default)]
    pub property_id: Option<PropertyId>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub square_feet: Option<u32>,
    #[serde(default)]
    pub date_listed: Option<DateTime<Utc>>,
}

impl NewProperty {
    /// Materialize the record with the given id, stamping `now` when no
    /// listing date was supplied.
    pub fn into_record(self, property_id: PropertyId, now: DateTime<Utc>) -> PropertyRecord {
        PropertyRecord {
            property_id,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_feet: self.square_feet,
            date_listed: self.date_listed.unwrap_or(now),
        }
    }
}

/// Partial update; only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub square_feet: Option<u32>,
    #[serde(default)]
    pub date_listed: Option<DateTime<Utc>>,
}

impl PropertyUpdate {
    pub fn apply_to(self, record: &mut PropertyRecord) {
        if let Some(address) = self.address {
            record.address = address;
        }
        if let Some(city) = self.city {
            record.city = city;
        }
        if let Some(state) = self.state {
            record.state = state;
        }
        if let Some(zip_code) = self.zip_code {
            record.zip_code = zip_code;
        }
        if self.price.is_some() {
            record.price = self.price;
        }
        if self.bedrooms.is_some() {
            record.bedrooms = self.bedrooms;
        }
        if self.bathrooms.is_some() {
            record.bathrooms = self.bathrooms;
        }
        if self.square_feet.is_some() {
            record.square_feet = self.square_feet;
        }
        if let Some(date_listed) = self.date_listed {
            record.date_listed = date_listed;
        }
    }
}

// =========================================================
// Query types
// =========================================================

/// Optional constraints on a property listing. Absent fields don't constrain.
///
/// Precondition: when both price bounds are set, `min_price <= max_price`.
/// This is not checked here; an inverted range simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
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
}

/// Offset pagination.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub skip: usize,
    pub limit: usize,
}

impl Pagination {
    pub const DEFAULT_LIMIT: usize = 10;

    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// Skip then limit.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().skip(self.skip).take(self.limit).collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

// =========================================================
// Analytics outputs
// =========================================================

/// Aggregate price statistics over a filtered property set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub average_price: Option<f64>,
    pub median_price: Option<f64>,
    pub average_price_per_sqft: Option<f64>,
    pub total_properties: usize,
}

/// Listing activity for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalInsight {
    pub year: i32,
    pub month: u32,
    pub count: usize,
    pub average_price: Option<f64>,
    pub average_square_feet: Option<f64>,
}
