use yamdb_core::confirmation::{CodeSigner, DEFAULT_CODE_TTL_SECS};
use yamdb_core::pagination::{clamp_page_size, DEFAULT_PAGE_SIZE};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Items per page on list endpoints (default: `10`).
    pub page_size: i64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Confirmation code signing configuration.
    pub confirmation: ConfirmationConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PAGE_SIZE`            | `10`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let page_size: i64 = std::env::var("PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse()
            .expect("PAGE_SIZE must be a valid i64");

        let jwt = JwtConfig::from_env();
        let confirmation = ConfirmationConfig::from_env(&jwt.secret);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            page_size: clamp_page_size(page_size),
            jwt,
            confirmation,
        }
    }
}

/// Secret and lifetime for signup confirmation codes.
#[derive(Clone)]
pub struct ConfirmationConfig {
    pub secret: String,
    pub ttl_secs: i64,
}

impl std::fmt::Debug for ConfirmationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationConfig")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl ConfirmationConfig {
    /// Load from the environment.
    ///
    /// | Env Var                 | Default          |
    /// |-------------------------|------------------|
    /// | `CONFIRMATION_SECRET`   | `JWT_SECRET`     |
    /// | `CONFIRMATION_TTL_SECS` | `259200` (3 days)|
    pub fn from_env(jwt_secret: &str) -> Self {
        let secret = std::env::var("CONFIRMATION_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| jwt_secret.to_string());

        let ttl_secs: i64 = std::env::var("CONFIRMATION_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_CODE_TTL_SECS.to_string())
            .parse()
            .expect("CONFIRMATION_TTL_SECS must be a valid i64");

        Self { secret, ttl_secs }
    }

    pub fn signer(&self) -> CodeSigner {
        CodeSigner::new(self.secret.as_bytes(), self.ttl_secs)
    }
}
