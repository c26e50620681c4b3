//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    BulkCreateResponse, FilterQuery, HealthResponse, HistoricalInsight, InsightsQuery, ListQuery,
    NewProperty, PropertyRecord, PropertyUpdate, StatisticsSummary,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::PropertyId;
use crate::db::services as db_services;
use crate::services::{PropertyAnalytics, DEFAULT_IQR_FACTOR};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Property CRUD
// =============================================================================

/// POST /api/properties
pub async fn create_property(
    State(state): State<AppState>,
    Json(request): Json<NewProperty>,
) -> Result<(StatusCode, Json<PropertyRecord>), AppError> {
    let record = db_services::create_property(state.repository.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /api/properties/bulk
///
/// Store a batch of properties; nothing is stored if any entry is rejected.
pub async fn create_properties_bulk(
    State(state): State<AppState>,
    Json(request): Json<Vec<NewProperty>>,
) -> Result<(StatusCode, Json<BulkCreateResponse>), AppError> {
    if request.is_empty() {
        return Err(AppError::BadRequest("Bulk request contains no properties".to_string()));
    }

    let properties = db_services::create_properties(state.repository.as_ref(), request).await?;
    Ok((
        StatusCode::CREATED,
        Json(BulkCreateResponse {
            inserted: properties.len(),
            properties,
        }),
    ))
}

/// POST /api/properties/upload
///
/// CSV body with a header row naming the property columns. All rows are
/// stored or none are.
pub async fn upload_properties_csv(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<BulkCreateResponse>), AppError> {
    let properties = db_services::import_properties_csv(state.repository.as_ref(), &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(BulkCreateResponse {
            inserted: properties.len(),
            properties,
        }),
    ))
}

/// GET /api/properties
pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> HandlerResult<Vec<PropertyRecord>> {
    let page = query.pagination(state.config.api.default_page_size);
    let properties = db_services::list_properties(state.repository.as_ref(), page).await?;
    Ok(Json(properties))
}

/// GET /api/properties/search
///
/// Filtered listing using the same criteria as the analytics endpoints.
pub async fn search_properties(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<Vec<PropertyRecord>> {
    let page = query.pagination(state.config.api.default_page_size);
    let properties =
        db_services::search_properties(state.repository.as_ref(), &query.criteria(), page).await?;
    Ok(Json(properties))
}

/// GET /api/properties/{property_id}
pub async fn get_property(
    State(state): State<AppState>,
    Path(property_id): Path<i64>,
) -> HandlerResult<PropertyRecord> {
    let record =
        db_services::get_property(state.repository.as_ref(), PropertyId::new(property_id)).await?;
    Ok(Json(record))
}

/// PUT /api/properties/{property_id}
pub async fn update_property(
    State(state): State<AppState>,
    Path(property_id): Path<i64>,
    Json(update): Json<PropertyUpdate>,
) -> HandlerResult<PropertyRecord> {
    let record = db_services::update_property(
        state.repository.as_ref(),
        PropertyId::new(property_id),
        update,
    )
    .await?;
    Ok(Json(record))
}

/// DELETE /api/properties/{property_id}
pub async fn delete_property(
    State(state): State<AppState>,
    Path(property_id): Path<i64>,
) -> HandlerResult<PropertyRecord> {
    let record =
        db_services::delete_property(state.repository.as_ref(), PropertyId::new(property_id))
            .await?;
    Ok(Json(record))
}

// =============================================================================
// Analytics Endpoints
// =============================================================================

/// GET /api/properties/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<StatisticsSummary> {
    let analytics = PropertyAnalytics::new(state.repository.as_ref());
    let summary = analytics.compute_statistics(&query.criteria()).await?;
    Ok(Json(summary))
}

/// GET /api/properties/outliers
///
/// Price outliers by the IQR rule; `factor` defaults to 1.5.
pub async fn get_outliers(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> HandlerResult<Vec<PropertyRecord>> {
    let factor = query.factor.unwrap_or(DEFAULT_IQR_FACTOR);
    if !factor.is_finite() || factor < 0.0 {
        return Err(AppError::BadRequest(format!(
            "factor must be a finite non-negative number, got {}",
            factor
        )));
    }

    let page = query.pagination(state.config.api.default_page_size);
    let analytics = PropertyAnalytics::new(state.repository.as_ref());
    let outliers = analytics
        .detect_outliers(&query.criteria(), factor, page)
        .await?;
    Ok(Json(outliers))
}

/// GET /api/properties/insights
pub async fn get_historical_insights(
    State(state): State<AppState>,
    Query(query): Query<InsightsQuery>,
) -> HandlerResult<Vec<HistoricalInsight>> {
    let analytics = PropertyAnalytics::new(state.repository.as_ref());
    let insights = analytics
        .historical_insights(query.start_date, query.end_date)
        .await?;
    Ok(Json(insights))
}
