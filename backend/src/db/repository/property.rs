//! Property repository trait for CRUD and query operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::api::{
    FilterCriteria, NewProperty, Pagination, PropertyId, PropertyRecord, PropertyUpdate,
};

/// Repository trait for property listings.
///
/// Query methods return records ordered by ascending `property_id` so that
/// downstream computations (median, percentiles, pagination) are
/// deterministic for a fixed dataset.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the storage backend is healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Property CRUD ====================

    /// Store a new property.
    ///
    /// Assigns the next free id when `property.property_id` is `None`.
    ///
    /// # Returns
    /// * `Ok(PropertyRecord)` - The stored record
    /// * `Err(RepositoryError::Conflict)` - If the id is already taken
    async fn store_property(&self, property: NewProperty) -> RepositoryResult<PropertyRecord>;

    /// Store several properties at once. Either all are stored or none.
    async fn store_properties(
        &self,
        properties: Vec<NewProperty>,
    ) -> RepositoryResult<Vec<PropertyRecord>>;

    /// Retrieve a property by ID.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the property doesn't exist
    async fn get_property(&self, property_id: PropertyId) -> RepositoryResult<PropertyRecord>;

    /// List properties in id order, paginated.
    async fn list_properties(&self, page: Pagination) -> RepositoryResult<Vec<PropertyRecord>>;

    /// Apply a partial update and return the updated record.
    async fn update_property(
        &self,
        property_id: PropertyId,
        update: PropertyUpdate,
    ) -> RepositoryResult<PropertyRecord>;

    /// Remove a property and return it.
    async fn delete_property(&self, property_id: PropertyId) -> RepositoryResult<PropertyRecord>;

    // ==================== Queries ====================

    /// All properties matching `criteria`, in id order.
    async fn query_properties(
        &self,
        criteria: &FilterCriteria,
    ) -> RepositoryResult<Vec<PropertyRecord>>;

    /// All properties listed within the inclusive window, in id order.
    async fn properties_listed_between(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<PropertyRecord>>;

    /// Total number of stored properties.
    async fn count_properties(&self) -> RepositoryResult<usize>;
}
