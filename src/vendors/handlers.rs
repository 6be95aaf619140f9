// HTTP handlers for vendor endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::vendors::{Vendor, VendorPatch, VendorRepository, VendorRequest};
use crate::{ApiJson, ApiPath, AppState};

/// Handler for POST /api/vendors/
#[utoipa::path(
    post,
    path = "/api/vendors/",
    request_body = VendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = Vendor),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "vendor_code already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<VendorRequest>,
) -> Result<(StatusCode, Json<Vendor>), ApiError> {
    tracing::debug!("Creating vendor with code: {}", payload.vendor_code);
    payload.validate()?;

    let vendor = VendorRepository::create(&state.db, &payload).await?;

    tracing::info!("Created vendor {} ({})", vendor.id, vendor.vendor_code);
    Ok((StatusCode::CREATED, Json(vendor)))
}

/// Handler for GET /api/vendors/
#[utoipa::path(
    get,
    path = "/api/vendors/",
    responses(
        (status = 200, description = "All vendors", body = Vec<Vendor>),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_auth" = [])),
    tag = "vendors"
)]
pub async fn list_vendors(State(state): State<AppState>) -> Result<Json<Vec<Vendor>>, ApiError> {
    let vendors = VendorRepository::list(&state.db).await?;
    tracing::debug!("Retrieved {} vendors", vendors.len());
    Ok(Json(vendors))
}

/// Handler for GET /api/vendors/{id}/
#[utoipa::path(
    get,
    path = "/api/vendors/{id}/",
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 200, description = "Vendor found", body = Vendor),
        (status = 404, description = "Vendor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vendor>, ApiError> {
    let vendor = VendorRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Vendor", id))?;

    Ok(Json(vendor))
}

/// Handler for PUT /api/vendors/{id}/
#[utoipa::path(
    put,
    path = "/api/vendors/{id}/",
    params(("id" = i64, Path, description = "Vendor ID")),
    request_body = VendorRequest,
    responses(
        (status = 200, description = "Vendor replaced", body = Vendor),
        (status = 400, description = "Invalid input data"),
        (status = 404, description = "Vendor not found"),
        (status = 409, description = "vendor_code already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<VendorRequest>,
) -> Result<Json<Vendor>, ApiError> {
    payload.validate()?;

    let vendor = VendorRepository::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Vendor", id))?;

    tracing::info!("Updated vendor {}", id);
    Ok(Json(vendor))
}

/// Handler for PATCH /api/vendors/{id}/
#[utoipa::path(
    patch,
    path = "/api/vendors/{id}/",
    params(("id" = i64, Path, description = "Vendor ID")),
    request_body = VendorPatch,
    responses(
        (status = 200, description = "Vendor updated", body = Vendor),
        (status = 400, description = "Invalid input data"),
        (status = 404, description = "Vendor not found"),
        (status = 409, description = "vendor_code already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "vendors"
)]
pub async fn patch_vendor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<VendorPatch>,
) -> Result<Json<Vendor>, ApiError> {
    patch.validate()?;

    let mut tx = state.db.begin().await?;

    let existing = VendorRepository::lock_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Vendor", id))?;

    let merged = patch.apply_to(&existing);
    let vendor = VendorRepository::update(&mut *tx, id, &merged)
        .await?
        .ok_or_else(|| ApiError::not_found("Vendor", id))?;

    tx.commit().await?;

    tracing::info!("Patched vendor {}", id);
    Ok(Json(vendor))
}

/// Handler for DELETE /api/vendors/{id}/
/// Purchase orders and performance history of the vendor are removed with it
#[utoipa::path(
    delete,
    path = "/api/vendors/{id}/",
    params(("id" = i64, Path, description = "Vendor ID")),
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 404, description = "Vendor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "vendors"
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    let mut tx = state.db.begin().await?;

    let orders = VendorRepository::lock_orders(&mut *tx, id).await?;
    if !VendorRepository::delete(&mut *tx, id).await? {
        return Err(ApiError::not_found("Vendor", id));
    }

    tx.commit().await?;

    tracing::info!("Deleted vendor {} with {} purchase orders", id, orders);
    Ok(StatusCode::NO_CONTENT)
}
