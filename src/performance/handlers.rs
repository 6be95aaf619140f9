// HTTP handlers for vendor performance endpoints

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::performance::{HistoricalPerformance, PerformanceRepository, VendorPerformance};
use crate::vendors::VendorRepository;
use crate::{ApiPath, AppState};

/// Handler for GET /api/vendors/{id}/performance/
///
/// Returns the cached metrics; nothing is recomputed on read.
#[utoipa::path(
    get,
    path = "/api/vendors/{id}/performance/",
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Cached performance metrics", body = VendorPerformance),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Vendor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "performance"
)]
pub async fn get_vendor_performance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<VendorPerformance>, ApiError> {
    let vendor = VendorRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Vendor", id))?;

    Ok(Json(VendorPerformance::from(&vendor)))
}

/// Handler for GET /api/vendors/{id}/history/
#[utoipa::path(
    get,
    path = "/api/vendors/{id}/history/",
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Metric snapshots, newest first", body = Vec<HistoricalPerformance>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Vendor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "performance"
)]
pub async fn get_vendor_history(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<HistoricalPerformance>>, ApiError> {
    if !VendorRepository::exists(&state.db, id).await? {
        return Err(ApiError::not_found("Vendor", id));
    }

    let history = PerformanceRepository::list_history(&state.db, id).await?;
    tracing::debug!("Retrieved {} history entries for vendor {}", history.len(), id);
    Ok(Json(history))
}
