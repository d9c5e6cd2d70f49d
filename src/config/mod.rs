//! Application configuration management

use std::env;

use anyhow::{Context, Result};
use base64::Engine;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite connection URL (e.g. `sqlite:./data/catalog.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Upper bound on pooled connections
    pub database_max_connections: u32,

    /// HS256 signing secret for access tokens
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    pub access_token_lifetime: i64,

    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Prefer DATABASE_PATH (a bare file path), fall back to DATABASE_URL
        let database_url = match env::var("DATABASE_PATH") {
            Ok(path) => format!("sqlite:{}", path),
            Err(_) => env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/catalog.db".to_string()),
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret.trim().to_string(),
            _ => {
                tracing::warn!(
                    "JWT_SECRET not set; generated an ephemeral secret, tokens will not survive a restart"
                );
                generate_jwt_secret()
            }
        };

        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            jwt_secret,

            access_token_lifetime: env::var("ACCESS_TOKEN_LIFETIME")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30 * 60),

            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
        })
    }
}

fn generate_jwt_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
