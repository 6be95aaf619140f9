// HTTP handlers for purchase-order endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiError;
use crate::purchase_orders::{PurchaseOrderPatch, PurchaseOrderRequest, PurchaseOrderResponse};
use crate::query::PurchaseOrderQuery;
use crate::{ApiJson, ApiPath, ApiQuery, AppState};

/// Handler for POST /api/purchase_orders/
#[utoipa::path(
    post,
    path = "/api/purchase_orders/",
    request_body = PurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = PurchaseOrderResponse),
        (status = 400, description = "Invalid input data or unknown vendor"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "po_number already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "purchase_orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PurchaseOrderRequest>,
) -> Result<(StatusCode, Json<PurchaseOrderResponse>), ApiError> {
    tracing::debug!("Creating purchase order {} for vendor {}", payload.po_number, payload.vendor);
    let order = state.purchase_order_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Handler for GET /api/purchase_orders/
#[utoipa::path(
    get,
    path = "/api/purchase_orders/",
    params(PurchaseOrderQuery),
    responses(
        (status = 200, description = "Purchase orders", body = Vec<PurchaseOrderResponse>),
        (status = 400, description = "Unknown ordering field"),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer_auth" = [])),
    tag = "purchase_orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PurchaseOrderQuery>,
) -> Result<Json<Vec<PurchaseOrderResponse>>, ApiError> {
    let orders = state.purchase_order_service.list(params).await?;
    Ok(Json(orders))
}

/// Handler for GET /api/purchase_orders/{id}/
#[utoipa::path(
    get,
    path = "/api/purchase_orders/{id}/",
    params(("id" = i64, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order found", body = PurchaseOrderResponse),
        (status = 404, description = "Purchase order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "purchase_orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PurchaseOrderResponse>, ApiError> {
    let order = state.purchase_order_service.get(id).await?;
    Ok(Json(order))
}

/// Handler for PUT /api/purchase_orders/{id}/
#[utoipa::path(
    put,
    path = "/api/purchase_orders/{id}/",
    params(("id" = i64, Path, description = "Purchase order ID")),
    request_body = PurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order replaced", body = PurchaseOrderResponse),
        (status = 400, description = "Invalid input data or unknown vendor"),
        (status = 404, description = "Purchase order not found"),
        (status = 409, description = "po_number already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "purchase_orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<PurchaseOrderRequest>,
) -> Result<Json<PurchaseOrderResponse>, ApiError> {
    let order = state.purchase_order_service.update(id, payload).await?;
    Ok(Json(order))
}

/// Handler for PATCH /api/purchase_orders/{id}/
#[utoipa::path(
    patch,
    path = "/api/purchase_orders/{id}/",
    params(("id" = i64, Path, description = "Purchase order ID")),
    request_body = PurchaseOrderPatch,
    responses(
        (status = 200, description = "Purchase order updated", body = PurchaseOrderResponse),
        (status = 400, description = "Invalid input data or unknown vendor"),
        (status = 404, description = "Purchase order not found"),
        (status = 409, description = "po_number already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "purchase_orders"
)]
pub async fn patch_purchase_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<PurchaseOrderPatch>,
) -> Result<Json<PurchaseOrderResponse>, ApiError> {
    let order = state.purchase_order_service.patch(id, patch).await?;
    Ok(Json(order))
}

/// Handler for DELETE /api/purchase_orders/{id}/
#[utoipa::path(
    delete,
    path = "/api/purchase_orders/{id}/",
    params(("id" = i64, Path, description = "Purchase order ID")),
    responses(
        (status = 204, description = "Purchase order deleted"),
        (status = 404, description = "Purchase order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "purchase_orders"
)]
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.purchase_order_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PATCH and PUT /api/purchase_orders/{id}/acknowledge/
///
/// The request body, if any, is ignored.
#[utoipa::path(
    patch,
    path = "/api/purchase_orders/{id}/acknowledge/",
    params(("id" = i64, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order acknowledged", body = PurchaseOrderResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Purchase order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "purchase_orders"
)]
pub async fn acknowledge_purchase_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PurchaseOrderResponse>, ApiError> {
    let order = state.purchase_order_service.acknowledge(id).await?;
    Ok(Json(order))
}
