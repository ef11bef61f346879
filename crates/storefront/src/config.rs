//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFRONT_API_URL` - Base URL of the product backend (e.g., <https://shop.example/api>)
//!
//! ## Optional
//! - `SHOPFRONT_DATA_DIR` - Directory for durable client-local documents (default: .shopfront)
//! - `SHOPFRONT_SESSION_DIR` - Directory for session-scoped documents (default: `<data dir>/session`)
//! - `SHOPFRONT_HTTP_TIMEOUT_SECS` - Product API request timeout (default: 10)
//! - `SHOPFRONT_ACCESS_TOKEN` - Bearer token for privileged writes (signed-in identity)
//! - `SHOPFRONT_ROLES` - Comma-separated role strings for the signed-in identity
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".shopfront";
const DEFAULT_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product backend configuration
    pub api: ApiConfig,
    /// Client-local storage locations
    pub storage: StorageConfig,
    /// Signed-in identity, if any
    pub identity: Option<IdentityConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Product backend configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; resource paths are appended as segments
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Locations of the durable and session-scoped key-value documents.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Durable documents (the cart)
    pub data_dir: PathBuf,
    /// Session-scoped documents (popup messages)
    pub session_dir: PathBuf,
}

/// Identity handed over by the authentication provider.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct IdentityConfig {
    /// Access token for privileged writes
    pub access_token: SecretString,
    /// Role strings granted to the identity
    pub roles: Vec<String>,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("access_token", &"[REDACTED]")
            .field("roles", &self.roles)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;
        let storage = StorageConfig::from_env();
        let identity = IdentityConfig::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            api,
            storage,
            identity,
            sentry_dsn,
            sentry_environment,
        })
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&get_required_env("SHOPFRONT_API_URL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_API_URL".to_string(), e))?;
        let timeout_secs = get_env_or_default("SHOPFRONT_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl StorageConfig {
    fn from_env() -> Self {
        let data_dir = PathBuf::from(get_env_or_default("SHOPFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let session_dir = get_optional_env("SHOPFRONT_SESSION_DIR")
            .map_or_else(|| data_dir.join("session"), PathBuf::from);
        Self {
            data_dir,
            session_dir,
        }
    }
}

impl IdentityConfig {
    fn from_env() -> Option<Self> {
        let access_token = get_optional_env("SHOPFRONT_ACCESS_TOKEN")?;
        let roles = get_optional_env("SHOPFRONT_ROLES")
            .map(|raw| parse_roles(&raw))
            .unwrap_or_default();
        Some(Self {
            access_token: SecretString::from(access_token),
            roles,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the backend base URL. It must be an absolute http(s) URL that can
/// take path segments.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot be used as a base".to_string());
    }
    Ok(url)
}

/// Split a comma-separated role list, dropping blanks.
fn parse_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}
