//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Session cookie signing secret (min 64 chars, high entropy)
//! - `SESSION_STORE_URL` - Base URL of the external identity/cart service
//! - `SESSION_STORE_API_KEY` - API key for the session store
//! - `MEDIA_HOST_UPLOAD_URL` - Upload endpoint of the external media host
//! - `MEDIA_HOST_API_KEY` - API key for the media host
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! Secrets are rejected at startup when they look like placeholders or carry
//! too little entropy to be randomly generated.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const SESSION_SECRET_MIN_LEN: usize = 64;

/// Random API keys sit well above this; English words and repeated
/// characters sit well below.
const SECRET_MIN_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a secret as a template value (matched lowercase).
const PLACEHOLDER_MARKERS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// External session store (identity + cart) configuration
    pub session_store: SessionStoreConfig,
    /// External media host configuration
    pub media: MediaHostConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// External session store configuration.
///
/// `Debug` is implemented by hand so the API key never reaches a log line.
#[derive(Clone)]
pub struct SessionStoreConfig {
    /// Base URL of the session store API (e.g., <https://api.luxora.shop>)
    pub base_url: String,
    /// API key sent with every session store request
    pub api_key: SecretString,
}

impl std::fmt::Debug for SessionStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStoreConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// External media host configuration.
///
/// `Debug` is implemented by hand so the API key never reaches a log line.
#[derive(Clone)]
pub struct MediaHostConfig {
    /// Full upload endpoint URL of the media host
    pub upload_url: String,
    /// API key sent with every upload request
    pub api_key: SecretString,
}

impl std::fmt::Debug for MediaHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaHostConfig")
            .field("upload_url", &self.upload_url)
            .field("api_key", &"[REDACTED]")
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
    /// Returns `ConfigError` when a required variable is missing or
    /// unparseable, or when a secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = require_env("STOREFRONT_BASE_URL")?;

        let session_secret = secret_env("STOREFRONT_SESSION_SECRET")?;
        check_session_secret_length(&session_secret)?;

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            session_store: SessionStoreConfig::from_env()?,
            media: MediaHostConfig::from_env()?,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SessionStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: require_env("SESSION_STORE_URL")?,
            api_key: secret_env("SESSION_STORE_API_KEY")?,
        })
    }
}

impl MediaHostConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            upload_url: require_env("MEDIA_HOST_UPLOAD_URL")?,
            api_key: secret_env("MEDIA_HOST_API_KEY")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Read an environment variable (falling back to `default`) and parse it.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Read a required secret and reject placeholder or low-entropy values.
fn secret_env(key: &str) -> Result<SecretString, ConfigError> {
    let value = require_env(key)?;
    check_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// The cookie signing key requires at least 64 bytes of secret material.
fn check_session_secret_length(secret: &SecretString) -> Result<(), ConfigError> {
    if secret.expose_secret().len() < SESSION_SECRET_MIN_LEN {
        return Err(ConfigError::InsecureSecret(
            "STOREFRONT_SESSION_SECRET".to_string(),
            format!("must be at least {SESSION_SECRET_MIN_LEN} characters"),
        ));
    }
    Ok(())
}

fn check_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    if let Some(marker) = PLACEHOLDER_MARKERS.iter().find(|m| lower.contains(**m)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{marker}')"),
        ));
    }

    let entropy = bits_per_char(secret);
    if entropy < SECRET_MIN_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {SECRET_MIN_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Shannon entropy of the character distribution, in bits per character.
fn bits_per_char(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // secret lengths are tiny
    let total = s.chars().count() as f64;
    counts
        .values()
        .map(|&n| {
            #[allow(clippy::cast_precision_loss)]
            let p = n as f64 / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entropy_of_uniform_string_is_zero() {
        assert!(bits_per_char("").abs() < f64::EPSILON);
        assert!(bits_per_char("aaaaaaa").abs() < f64::EPSILON);
    }

    #[test]
    fn entropy_of_two_symbol_string_is_one_bit() {
        assert!((bits_per_char("abababab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn placeholder_secrets_are_rejected() {
        let err = check_secret_strength("your-api-key-here", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn low_entropy_secrets_are_rejected() {
        assert!(check_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR").is_err());
    }

    #[test]
    fn random_looking_secrets_pass() {
        assert!(check_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn session_secret_below_key_minimum_is_rejected() {
        let short = SecretString::from("s".repeat(SESSION_SECRET_MIN_LEN - 1));
        assert!(matches!(
            check_session_secret_length(&short),
            Err(ConfigError::InsecureSecret(_, _))
        ));

        let exact = SecretString::from("s".repeat(SESSION_SECRET_MIN_LEN));
        assert!(check_session_secret_length(&exact).is_ok());
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            session_store: SessionStoreConfig {
                base_url: "http://localhost:9000".to_string(),
                api_key: SecretString::from("k".repeat(32)),
            },
            media: MediaHostConfig {
                upload_url: "http://localhost:9100/upload".to_string(),
                api_key: SecretString::from("k".repeat(32)),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn collaborator_config_debug_redacts_secrets() {
        let store = SessionStoreConfig {
            base_url: "https://api.luxora.shop".to_string(),
            api_key: SecretString::from("super_sensitive_store_key"),
        };
        let media = MediaHostConfig {
            upload_url: "https://media.example.net/v1/upload".to_string(),
            api_key: SecretString::from("super_sensitive_media_key"),
        };

        let debug_output = format!("{store:?} {media:?}");

        assert!(debug_output.contains("https://api.luxora.shop"));
        assert!(debug_output.contains("https://media.example.net/v1/upload"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_sensitive_store_key"));
        assert!(!debug_output.contains("super_sensitive_media_key"));
    }
}
