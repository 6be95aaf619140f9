// JWT token generation and validation service

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Distinguishes short-lived access tokens from refresh tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // user_id
    pub username: String,
    pub token_type: TokenType,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Token service for JWT operations
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_duration: i64,  // in seconds
    refresh_token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a TokenService with the default lifetimes:
    /// access tokens expire in 15 minutes, refresh tokens in 7 days
    pub fn new(secret: &str) -> Self {
        Self::with_durations(secret, 900, 604_800)
    }

    /// Create a TokenService with explicit lifetimes in seconds
    pub fn with_durations(secret: &str, access_token_duration: i64, refresh_token_duration: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_duration,
            refresh_token_duration,
        }
    }

    /// Generate an access token
    pub fn generate_access_token(&self, user_id: i64, username: &str) -> Result<String, AuthError> {
        self.generate(user_id, username, TokenType::Access, self.access_token_duration)
    }

    /// Generate a refresh token
    pub fn generate_refresh_token(&self, user_id: i64, username: &str) -> Result<String, AuthError> {
        self.generate(user_id, username, TokenType::Refresh, self.refresh_token_duration)
    }

    /// Generate both access and refresh tokens
    pub fn generate_token_pair(&self, user_id: i64, username: &str) -> Result<(String, String), AuthError> {
        let access_token = self.generate_access_token(user_id, username)?;
        let refresh_token = self.generate_refresh_token(user_id, username)?;
        Ok((access_token, refresh_token))
    }

    /// Validate an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token(token, TokenType::Access)
    }

    /// Validate a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token(token, TokenType::Refresh)
    }

    fn generate(
        &self,
        user_id: i64,
        username: &str,
        token_type: TokenType,
        duration: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            token_type,
            iat: now,
            exp: now + duration,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    fn validate_token(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })?;

        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_token_service() -> TokenService {
        TokenService::new(TEST_SECRET)
    }

    #[test]
    fn test_access_token_expiration_is_15_minutes() {
        let service = test_token_service();
        let token = service.generate_access_token(1, "test_user").unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_token_expiration_is_7_days() {
        let service = test_token_service();
        let token = service.generate_refresh_token(1, "test_user").unwrap();
        let claims = service.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 604_800);
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_custom_durations() {
        let service = TokenService::with_durations(TEST_SECRET, 60, 120);
        let (access, refresh) = service.generate_token_pair(5, "ops").unwrap();

        let access_claims = service.validate_access_token(&access).unwrap();
        let refresh_claims = service.validate_refresh_token(&refresh).unwrap();
        assert_eq!(access_claims.exp - access_claims.iat, 60);
        assert_eq!(refresh_claims.exp - refresh_claims.iat, 120);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let service = test_token_service();
        let (access, refresh) = service.generate_token_pair(1, "test_user").unwrap();

        assert!(matches!(
            service.validate_access_token(&refresh),
            Err(AuthError::WrongTokenType)
        ));
        assert!(matches!(
            service.validate_refresh_token(&access),
            Err(AuthError::WrongTokenType)
        ));
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let claims = Claims {
            sub: 1,
            username: "test_user".to_string(),
            token_type: TokenType::Access,
            iat: Utc::now().timestamp() - 1000,
            exp: Utc::now().timestamp() - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let result = test_token_service().validate_access_token(&token);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.validate_access_token("").is_err());
        assert!(service.validate_access_token("not.a.token").is_err());
        assert!(service
            .validate_access_token("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1");
        let service2 = TokenService::new("secret2");

        let token = service1.generate_access_token(1, "test_user").unwrap();

        assert!(service1.validate_access_token(&token).is_ok());
        assert!(matches!(
            service2.validate_access_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    proptest! {
        #[test]
        fn prop_token_claims_contain_identity(
            user_id in 1i64..1_000_000,
            username in "[a-z][a-z0-9_]{2,20}"
        ) {
            let service = test_token_service();

            let access_token = service.generate_access_token(user_id, &username)?;
            let access_claims = service.validate_access_token(&access_token)?;
            prop_assert_eq!(access_claims.sub, user_id);
            prop_assert_eq!(access_claims.username, username.clone());

            let refresh_token = service.generate_refresh_token(user_id, &username)?;
            let refresh_claims = service.validate_refresh_token(&refresh_token)?;
            prop_assert_eq!(refresh_claims.sub, user_id);
            prop_assert_eq!(refresh_claims.username, username);
        }

        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.validate_access_token(&malformed).is_err());
        }
    }
}
