//! High-level database service layer.
//!
//! This module provides repository-agnostic operations that work with any
//! [`PropertyRepository`] implementation. Input validation lives here so
//! that every storage backend enforces the same rules on property values.
//!
//! # Usage
//!
//! ```no_run
//! use propstats::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let count = services::count_properties(&repo).await?;
//!     println!("Found {} properties", count);
//!     Ok(())
//! }
//! ```

use log::{info, warn};

use super::repository::{ErrorContext, PropertyRepository, RepositoryError, RepositoryResult};
use crate::api::{
    FilterCriteria, NewProperty, Pagination, PropertyId, PropertyRecord, PropertyUpdate,
};

// ==================== Validation ====================

fn check_non_negative(field: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(format!("{} must be a finite non-negative number, got {}", field, v))
        }
        _ => Ok(()),
    }
}

fn check_values(
    price: Option<f64>,
    bathrooms: Option<f64>,
    square_feet: Option<u32>,
) -> Result<(), String> {
    check_non_negative("price", price)?;
    check_non_negative("bathrooms", bathrooms)?;
    if square_feet == Some(0) {
        return Err("square_feet must be positive".to_string());
    }
    Ok(())
}

/// Validate a create payload.
pub fn validate_new_property(property: &NewProperty) -> RepositoryResult<()> {
    check_values(property.price, property.bathrooms, property.square_feet).map_err(|msg| {
        let mut context = ErrorContext::new("validate_property").with_entity("property");
        if let Some(id) = property.property_id {
            context = context.with_entity_id(id);
        }
        RepositoryError::validation_with_context(msg, context)
    })
}

/// Validate a partial update.
pub fn validate_update(property_id: PropertyId, update: &PropertyUpdate) -> RepositoryResult<()> {
    check_values(update.price, update.bathrooms, update.square_feet).map_err(|msg| {
        RepositoryError::validation_with_context(
            msg,
            ErrorContext::new("validate_update")
                .with_entity("property")
                .with_entity_id(property_id),
        )
    })
}

// ==================== Health & Connection ====================

/// Check if the storage backend is healthy.
pub async fn health_check<R: PropertyRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Property Operations ====================

/// Validate and store a single property.
pub async fn create_property<R: PropertyRepository + ?Sized>(
    repo: &R,
    property: NewProperty,
) -> RepositoryResult<PropertyRecord> {
    if let Err(e) = validate_new_property(&property) {
        warn!("Rejected property: {}", e);
        return Err(e);
    }

    let record = repo.store_property(property).await?;
    info!(
        "Stored property {} ({}, {})",
        record.property_id, record.address, record.city
    );
    Ok(record)
}

/// Validate every payload, then store them all in one batch.
///
/// Nothing is stored if any payload is invalid or any id conflicts.
pub async fn create_properties<R: PropertyRepository + ?Sized>(
    repo: &R,
    properties: Vec<NewProperty>,
) -> RepositoryResult<Vec<PropertyRecord>> {
    for (index, property) in properties.iter().enumerate() {
        if let Err(e) = validate_new_property(property) {
            warn!("Rejected bulk import at row {}: {}", index, e);
            return Err(e.with_operation(format!("create_properties[{}]", index)));
        }
    }

    let records = repo.store_properties(properties).await?;
    info!("Bulk stored {} properties", records.len());
    Ok(records)
}

/// Parse a CSV document with a header row into create payloads.
///
/// Columns are matched by header name and may appear in any order;
/// optional columns can be omitted or left empty.
pub fn parse_properties_csv(input: &str) -> RepositoryResult<Vec<NewProperty>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let mut properties = Vec::new();
    for (index, row) in reader.deserialize::<NewProperty>().enumerate() {
        let property = row.map_err(|e| {
            RepositoryError::validation_with_context(
                format!("Invalid CSV row {}", index + 1),
                ErrorContext::new("parse_properties_csv")
                    .with_entity("property")
                    .with_details(e.to_string()),
            )
        })?;
        properties.push(property);
    }

    if properties.is_empty() {
        return Err(RepositoryError::validation_with_context(
            "CSV contains no rows",
            ErrorContext::new("parse_properties_csv").with_entity("property"),
        ));
    }
    Ok(properties)
}

/// Parse a CSV upload and store every row, or none of them.
pub async fn import_properties_csv<R: PropertyRepository + ?Sized>(
    repo: &R,
    input: &str,
) -> RepositoryResult<Vec<PropertyRecord>> {
    let properties = match parse_properties_csv(input) {
        Ok(properties) => properties,
        Err(e) => {
            warn!("Rejected CSV upload: {}", e);
            return Err(e);
        }
    };
    info!("Parsed {} properties from CSV", properties.len());
    create_properties(repo, properties).await
}

/// Get a property by id.
pub async fn get_property<R: PropertyRepository + ?Sized>(
    repo: &R,
    property_id: PropertyId,
) -> RepositoryResult<PropertyRecord> {
    repo.get_property(property_id).await
}

/// List properties in id order.
pub async fn list_properties<R: PropertyRepository + ?Sized>(
    repo: &R,
    page: Pagination,
) -> RepositoryResult<Vec<PropertyRecord>> {
    repo.list_properties(page).await
}

/// Filtered listing: the same predicate the analytics use, then pagination.
pub async fn search_properties<R: PropertyRepository + ?Sized>(
    repo: &R,
    criteria: &FilterCriteria,
    page: Pagination,
) -> RepositoryResult<Vec<PropertyRecord>> {
    let matching = repo.query_properties(criteria).await?;
    Ok(page.apply(matching))
}

/// Validate and apply a partial update.
pub async fn update_property<R: PropertyRepository + ?Sized>(
    repo: &R,
    property_id: PropertyId,
    update: PropertyUpdate,
) -> RepositoryResult<PropertyRecord> {
    if let Err(e) = validate_update(property_id, &update) {
        warn!("Rejected update for property {}: {}", property_id, e);
        return Err(e);
    }

    let record = repo.update_property(property_id, update).await?;
    info!("Updated property {}", property_id);
    Ok(record)
}

/// Delete a property and return what was removed.
pub async fn delete_property<R: PropertyRepository + ?Sized>(
    repo: &R,
    property_id: PropertyId,
) -> RepositoryResult<PropertyRecord> {
    match repo.delete_property(property_id).await {
        Ok(record) => {
            info!("Deleted property {}", property_id);
            Ok(record)
        }
        Err(e) => {
            warn!("Failed to delete property {}: {}", property_id, e);
            Err(e)
        }
    }
}

/// Total number of stored properties.
pub async fn count_properties<R: PropertyRepository + ?Sized>(repo: &R) -> RepositoryResult<usize> {
    repo.count_properties().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(
        price: Option<f64>,
        bathrooms: Option<f64>,
        square_feet: Option<u32>,
    ) -> NewProperty {
        NewProperty {
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            price,
            bathrooms,
            square_feet,
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_nullable_fields() {
        assert!(validate_new_property(&payload(None, None, None)).is_ok());
        assert!(validate_new_property(&payload(Some(0.0), Some(1.5), Some(1))).is_ok());
    }

    #[test]
    fn test_rejects_negative_price() {
        let err = validate_new_property(&payload(Some(-1.0), None, None)).unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[test]
    fn test_rejects_non_finite_bathrooms() {
        assert!(validate_new_property(&payload(None, Some(f64::NAN), None)).is_err());
    }

    #[test]
    fn test_rejects_zero_square_feet() {
        assert!(validate_new_property(&payload(None, None, Some(0))).is_err());
        let update = PropertyUpdate {
            square_feet: Some(0),
            ..Default::default()
        };
        assert!(validate_update(PropertyId(1), &update).is_err());
    }

    #[test]
    fn test_parse_csv_with_optional_columns() {
        let input = "\
address,city,state,zip_code,price,bedrooms,square_feet,date_listed
1 Main St,Springfield,IL,62701,250000,3,1800,2021-01-05T00:00:00Z
2 Oak Ave, Shelbyville ,IL,62565,,,,
";
        let rows = parse_properties_csv(input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].price, Some(250_000.0));
        assert_eq!(rows[0].square_feet, Some(1800));
        assert!(rows[0].date_listed.is_some());
        assert!(rows[0].bathrooms.is_none());
        assert_eq!(rows[1].city, "Shelbyville");
        assert!(rows[1].price.is_none());
        assert!(rows[1].date_listed.is_none());
    }

    #[test]
    fn test_parse_csv_reports_bad_row() {
        let input = "\
address,city,state,zip_code,price
1 Main St,Springfield,IL,62701,100
2 Oak Ave,Springfield,IL,62701,cheap
";
        let err = parse_properties_csv(input).unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert!(err.to_string().contains("Invalid CSV row 2"));
    }

    #[test]
    fn test_parse_csv_without_rows_is_rejected() {
        assert!(parse_properties_csv("address,city,state,zip_code\n").is_err());
        assert!(parse_properties_csv("").is_err());
    }
}
