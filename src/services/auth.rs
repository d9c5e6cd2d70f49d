//! Authentication service for accounts and JWT handling
//!
//! Provides:
//! - User registration and login
//! - Password hashing with bcrypt
//! - Access token issuance and verification

use anyhow::anyhow;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::{CreateUser, Database, UserRecord};
use crate::error::{CatalogError, CatalogResult};
use crate::graphql::auth::AuthUser;

const ACCESS_TOKEN_TYPE: &str = "access";

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims structure for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID (subject)
    pub sub: String,
    pub username: String,
    pub token_type: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_lifetime: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            access_token_lifetime: config.access_token_lifetime,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a new account. Returns `true` once the user is stored.
    pub async fn register(&self, username: &str, password: &str) -> CatalogResult<bool> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CatalogError::validation("username must not be empty"));
        }
        if password.is_empty() {
            return Err(CatalogError::validation("password must not be empty"));
        }

        let users = self.db.users();
        if users.get_by_username(username).await?.is_some() {
            return Err(CatalogError::Conflict(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let hashed_password = self.hash_password(password)?;
        let user = users
            .create(CreateUser {
                username: username.to_string(),
                hashed_password,
            })
            .await
            .map_err(|e| {
                CatalogError::unique_or_database(
                    e,
                    format!("Username '{}' is already taken", username),
                )
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(true)
    }

    /// Check credentials and issue an access token.
    ///
    /// Unknown usernames and wrong passwords fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> CatalogResult<String> {
        let user = match self.db.users().get_by_username(username.trim()).await? {
            Some(u) => u,
            None => {
                tracing::warn!(username, "Login attempt for unknown user");
                return Err(CatalogError::InvalidCredentials);
            }
        };

        if !self.verify_password(password, &user.hashed_password)? {
            tracing::warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(CatalogError::InvalidCredentials);
        }

        let token = self.generate_access_token(&user)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    /// Validate an access token and return the caller it names
    pub fn verify_token(&self, token: &str) -> CatalogResult<AuthUser> {
        let claims = self.decode_access_token(token)?;
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| CatalogError::Unauthenticated)?;

        Ok(AuthUser {
            user_id,
            username: claims.username,
        })
    }

    /// Look up the stored account behind an authenticated caller
    pub async fn current_user(&self, auth: &AuthUser) -> CatalogResult<Option<UserRecord>> {
        Ok(self.db.users().get_by_id(auth.user_id).await?)
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    fn hash_password(&self, password: &str) -> CatalogResult<String> {
        hash(password, self.config.bcrypt_cost)
            .map_err(|e| CatalogError::Internal(anyhow!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> CatalogResult<bool> {
        verify(password, hash)
            .map_err(|e| CatalogError::Internal(anyhow!("Failed to verify password: {}", e)))
    }

    fn generate_access_token(&self, user: &UserRecord) -> CatalogResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_lifetime);

        let claims = AccessTokenClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| CatalogError::Internal(anyhow!("Failed to create access token: {}", e)))
    }

    fn decode_access_token(&self, token: &str) -> CatalogResult<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            CatalogError::Unauthenticated
        })?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(CatalogError::Unauthenticated);
        }

        Ok(token_data.claims)
    }
}
