// Authentication service - business logic layer

use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    models::{AccessTokenResponse, TokenPairResponse},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};

/// Authentication service coordinating credential checks and token issuance
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    token_service: Arc<TokenService>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(user_repo: UserRepository, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// Exchange username and password for an access/refresh token pair
    pub async fn obtain_token_pair(&self, username: &str, password: &str) -> Result<TokenPairResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (access, refresh) = self.token_service.generate_token_pair(user.id, &user.username)?;
        tracing::info!("Issued token pair for user {}", user.id);
        Ok(TokenPairResponse { access, refresh })
    }

    /// Issue a new access token from a valid refresh token
    ///
    /// The user must still exist and be active.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessTokenResponse, AuthError> {
        let claims = self.token_service.validate_refresh_token(refresh_token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AuthError::InvalidToken)?;

        let access = self.token_service.generate_access_token(user.id, &user.username)?;
        tracing::debug!("Refreshed access token for user {}", user.id);
        Ok(AccessTokenResponse { access })
    }

    /// Create a user with the given credentials if the username is free
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let password_hash = PasswordService::hash_password(password)?;
        if self.user_repo.create_if_missing(username, &password_hash).await? {
            tracing::info!("Created bootstrap user '{}'", username);
        } else {
            tracing::debug!("Bootstrap user '{}' already exists", username);
        }
        Ok(())
    }
}
