//! In-memory local repository implementation.
//!
//! This module provides a local implementation of [`PropertyRepository`]
//! suitable for unit testing and local development. All data lives in a
//! `BTreeMap` keyed by property id, which keeps query results in id order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{
    FilterCriteria, NewProperty, Pagination, PropertyId, PropertyRecord, PropertyUpdate,
};
use crate::db::repository::*;
use crate::services::history::within_window;

/// In-memory local repository.
///
/// Cloning is cheap and clones share the same underlying data.
///
/// # Example
/// ```
/// use propstats::db::repositories::LocalRepository;
/// use propstats::db::repository::PropertyRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = LocalRepository::new();
/// let properties = repo.list_properties(Default::default()).await?;
/// assert!(properties.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    properties: BTreeMap<PropertyId, PropertyRecord>,
    /// `None` once an id of `i64::MAX` has been used.
    next_property_id: Option<PropertyId>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            properties: BTreeMap::new(),
            next_property_id: Some(PropertyId(1)),
            is_healthy: true,
        }
    }
}

impl LocalData {
    /// Resolve the id for a new record without inserting it.
    fn resolve_id(&self, requested: Option<PropertyId>) -> RepositoryResult<PropertyId> {
        match requested {
            Some(id) if self.properties.contains_key(&id) => {
                Err(RepositoryError::conflict_with_context(
                    format!("Property {} already exists", id),
                    ErrorContext::new("store_property")
                        .with_entity("property")
                        .with_entity_id(id),
                ))
            }
            Some(id) => Ok(id),
            None => self.next_property_id.ok_or_else(|| {
                RepositoryError::internal("Property id sequence exhausted")
                    .with_operation("store_property")
            }),
        }
    }

    /// Keep generated ids above every stored id.
    fn advance_past(&mut self, id: PropertyId) {
        if let Some(next) = self.next_property_id {
            if id >= next {
                self.next_property_id = id.0.checked_add(1).map(PropertyId);
            }
        }
    }

    fn insert(
        &mut self,
        property: NewProperty,
        now: DateTime<Utc>,
    ) -> RepositoryResult<PropertyRecord> {
        let id = self.resolve_id(property.property_id)?;
        let record = property.into_record(id, now);
        self.properties.insert(id, record.clone());
        self.advance_past(id);
        Ok(record)
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with `records`.
    ///
    /// Records keep their ids; later records with a duplicate id replace
    /// earlier ones.
    pub fn with_records(records: impl IntoIterator<Item = PropertyRecord>) -> Self {
        let repo = Self::new();
        {
            let mut data = repo.data.write();
            for record in records {
                data.advance_past(record.property_id);
                data.properties.insert(record.property_id, record);
            }
        }
        repo
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Check if a property exists.
    pub fn has_property(&self, property_id: PropertyId) -> bool {
        self.data.read().properties.contains_key(&property_id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }

    fn property_not_found(property_id: PropertyId, operation: &str) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Property {} not found", property_id),
            ErrorContext::new(operation)
                .with_entity("property")
                .with_entity_id(property_id),
        )
    }

    /// Copy out the records matching `keep`, in id order.
    fn select(&self, keep: impl Fn(&PropertyRecord) -> bool) -> Vec<PropertyRecord> {
        self.data
            .read()
            .properties
            .values()
            .filter(|r| keep(r))
            .cloned()
            .collect()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PropertyRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn store_property(&self, property: NewProperty) -> RepositoryResult<PropertyRecord> {
        self.check_health()?;
        self.data.write().insert(property, Utc::now())
    }

    async fn store_properties(
        &self,
        properties: Vec<NewProperty>,
    ) -> RepositoryResult<Vec<PropertyRecord>> {
        self.check_health()?;
        let now = Utc::now();
        let mut data = self.data.write();

        // Stage into a copy so a conflict halfway through leaves no trace.
        let mut staged = LocalData {
            properties: data.properties.clone(),
            next_property_id: data.next_property_id,
            is_healthy: data.is_healthy,
        };
        let mut stored = Vec::with_capacity(properties.len());
        for property in properties {
            let record = staged
                .insert(property, now)
                .map_err(|e| e.with_operation("store_properties"))?;
            stored.push(record);
        }

        *data = staged;
        Ok(stored)
    }

    async fn get_property(&self, property_id: PropertyId) -> RepositoryResult<PropertyRecord> {
        self.check_health()?;
        self.data
            .read()
            .properties
            .get(&property_id)
            .cloned()
            .ok_or_else(|| Self::property_not_found(property_id, "get_property"))
    }

    async fn list_properties(&self, page: Pagination) -> RepositoryResult<Vec<PropertyRecord>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(page.apply(data.properties.values().cloned()))
    }

    async fn update_property(
        &self,
        property_id: PropertyId,
        update: PropertyUpdate,
    ) -> RepositoryResult<PropertyRecord> {
        self.check_health()?;
        let mut data = self.data.write();
        let record = data
            .properties
            .get_mut(&property_id)
            .ok_or_else(|| Self::property_not_found(property_id, "update_property"))?;
        update.apply_to(record);
        Ok(record.clone())
    }

    async fn delete_property(&self, property_id: PropertyId) -> RepositoryResult<PropertyRecord> {
        self.check_health()?;
        self.data
            .write()
            .properties
            .remove(&property_id)
            .ok_or_else(|| Self::property_not_found(property_id, "delete_property"))
    }

    async fn query_properties(
        &self,
        criteria: &FilterCriteria,
    ) -> RepositoryResult<Vec<PropertyRecord>> {
        self.check_health()?;
        Ok(self.select(|r| criteria.matches(r)))
    }

    async fn properties_listed_between(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<PropertyRecord>> {
        self.check_health()?;
        Ok(self.select(|r| within_window(r.date_listed, start, end)))
    }

    async fn count_properties(&self) -> RepositoryResult<usize> {
        self.check_health()?;
        Ok(self.data.read().properties.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_property(id: Option<i64>, city: &str, price: Option<f64>) -> NewProperty {
        NewProperty {
            property_id: id.map(PropertyId),
            address: "123 Main St".to_string(),
            city: city.to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            price,
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            square_feet: Some(1500),
            date_listed: None,
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        assert!(matches!(
            repo.count_properties().await,
            Err(RepositoryError::ConnectionError { .. })
        ));
    }

    #[tokio::test]
    async fn test_store_assigns_sequential_ids() {
        let repo = LocalRepository::new();
        let a = repo.store_property(new_property(None, "A", None)).await.unwrap();
        let b = repo.store_property(new_property(None, "B", None)).await.unwrap();
        assert_eq!(a.property_id, PropertyId(1));
        assert_eq!(b.property_id, PropertyId(2));
    }

    #[tokio::test]
    async fn test_caller_assigned_id_and_conflict() {
        let repo = LocalRepository::new();
        let stored = repo
            .store_property(new_property(Some(10), "A", Some(1.0)))
            .await
            .unwrap();
        assert_eq!(stored.property_id, PropertyId(10));

        let err = repo
            .store_property(new_property(Some(10), "B", Some(2.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict { .. }));

        let next = repo.store_property(new_property(None, "C", None)).await.unwrap();
        assert_eq!(next.property_id, PropertyId(11));
    }

    #[tokio::test]
    async fn test_generated_id_follows_highest_id() {
        let repo = LocalRepository::new();
        repo.store_property(new_property(Some(7), "A", None)).await.unwrap();
        repo.store_property(new_property(Some(2), "B", None)).await.unwrap();
        let c = repo.store_property(new_property(None, "C", None)).await.unwrap();
        assert_eq!(c.property_id, PropertyId(8));
    }

    #[tokio::test]
    async fn test_max_id_exhausts_generated_ids() {
        let repo = LocalRepository::new();
        let top = repo
            .store_property(new_property(Some(i64::MAX), "A", None))
            .await
            .unwrap();
        assert_eq!(top.property_id, PropertyId(i64::MAX));

        // Explicit ids still work, generated ones do not wrap around.
        repo.store_property(new_property(Some(5), "B", None)).await.unwrap();
        let err = repo
            .store_property(new_property(None, "C", None))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InternalError { .. }));
        assert_eq!(repo.count_properties().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_with_records_at_max_id() {
        let record =
            new_property(None, "A", Some(1.0)).into_record(PropertyId(i64::MAX), Utc::now());
        let repo = LocalRepository::with_records(vec![record]);
        assert!(repo.has_property(PropertyId(i64::MAX)));
        assert!(repo.store_property(new_property(None, "B", None)).await.is_err());
    }

    #[tokio::test]
    async fn test_bulk_store_is_all_or_nothing() {
        let repo = LocalRepository::new();
        repo.store_property(new_property(Some(2), "A", None)).await.unwrap();

        let err = repo
            .store_properties(vec![
                new_property(Some(1), "B", None),
                new_property(Some(2), "C", None),
            ])
            .await
            .unwrap_err();
        assert_eq!(err.context().operation.as_deref(), Some("store_properties"));
        assert!(!repo.has_property(PropertyId(1)));
        assert_eq!(repo.count_properties().await.unwrap(), 1);

        let stored = repo
            .store_properties(vec![new_property(None, "D", None), new_property(None, "E", None)])
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(repo.count_properties().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_get_update_delete() {
        let repo = LocalRepository::new();
        let stored = repo
            .store_property(new_property(None, "Springfield", Some(100_000.0)))
            .await
            .unwrap();
        let id = stored.property_id;

        assert_eq!(repo.get_property(id).await.unwrap(), stored);

        let updated = repo
            .update_property(
                id,
                PropertyUpdate {
                    price: Some(120_000.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, Some(120_000.0));

        let deleted = repo.delete_property(id).await.unwrap();
        assert_eq!(deleted.price, Some(120_000.0));
        assert!(matches!(
            repo.get_property(id).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete_property(id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_paginated_in_id_order() {
        let repo = LocalRepository::new();
        for id in [5, 3, 9, 1] {
            repo.store_property(new_property(Some(id), "X", None)).await.unwrap();
        }
        let page = repo.list_properties(Pagination::new(1, 2)).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|r| r.property_id.value()).collect();
        assert_eq!(ids, vec![3, 5]);
    }

    #[tokio::test]
    async fn test_query_and_window() {
        let listed = |m| Utc.with_ymd_and_hms(2021, m, 1, 0, 0, 0).unwrap();
        let mut a = new_property(None, "Springfield", Some(100.0));
        a.date_listed = Some(listed(1));
        let mut b = new_property(None, "Shelbyville", Some(200.0));
        b.date_listed = Some(listed(2));
        let repo = LocalRepository::new();
        repo.store_properties(vec![a, b]).await.unwrap();

        let springfield = repo
            .query_properties(&FilterCriteria {
                city: Some("Springfield".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(springfield.len(), 1);

        let feb = repo
            .properties_listed_between(Some(listed(2)), None)
            .await
            .unwrap();
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].city, "Shelbyville");
    }

    #[tokio::test]
    async fn test_clear_keeps_health_flag() {
        let repo = LocalRepository::new();
        repo.store_property(new_property(None, "A", None)).await.unwrap();
        repo.set_healthy(false);
        repo.clear();
        assert!(!repo.health_check().await.unwrap());
        repo.set_healthy(true);
        assert_eq!(repo.count_properties().await.unwrap(), 0);
    }
}
