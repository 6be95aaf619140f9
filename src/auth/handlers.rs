// HTTP handlers for token endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{AccessTokenResponse, RefreshRequest, TokenPairResponse, TokenRequest},
};
use crate::{ApiJson, AppState};

/// Obtain an access/refresh token pair
/// POST /token/
#[utoipa::path(
    post,
    path = "/token/",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 401, description = "Unknown user or wrong password")
    ),
    tag = "auth"
)]
pub async fn obtain_token_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> Result<Json<TokenPairResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let tokens = state
        .auth_service
        .obtain_token_pair(&request.username, &request.password)
        .await?;

    Ok(Json(tokens))
}

/// Refresh an access token
/// POST /token/refresh/
#[utoipa::path(
    post,
    path = "/token/refresh/",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, AuthError> {
    let token = state
        .auth_service
        .refresh_access_token(&request.refresh)
        .await?;

    Ok(Json(token))
}
