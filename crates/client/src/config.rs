//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TANDEM_API_URL` - Base URL of the Tandem backend (e.g., `http://localhost:8000`)
//!
//! ## Optional
//! - `TANDEM_DATA_DIR` - Directory for the durable preference file
//!   (default: platform data dir + `tandem/`)
//! - `TANDEM_TIMEOUT_SECS` - Per-request timeout in seconds (default: 15)
//! - `TANDEM_MAX_RETRIES` - Extra attempts for reads that fail transiently (default: 2)
//! - `TANDEM_RETRY_BACKOFF_MS` - Base delay before the first retry (default: 250)
//! - `TANDEM_TOKEN` - Bearer token override for headless scripting; normally the
//!   token comes from the preference store after login

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// File name of the durable preference store inside the data directory.
const PREFERENCES_FILE: &str = "preferences.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the Tandem backend. Always carries a trailing slash so
    /// relative endpoint paths join underneath it rather than replacing the
    /// last path segment.
    pub api_url: Url,
    /// Directory holding the durable preference file.
    pub data_dir: PathBuf,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// How many extra attempts a transiently failed read gets before the
    /// error surfaces.
    pub max_retries: u32,
    /// Base delay before the first retry. Doubles per attempt, with jitter.
    pub retry_backoff: Duration,
    /// Static bearer token override for headless scripting.
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("data_dir", &self.data_dir)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field(
                "token",
                &self.token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `TANDEM_API_URL` is missing or unparseable,
    /// if a numeric knob fails to parse, or if no data directory could be
    /// resolved for this platform.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_base_url("TANDEM_API_URL", &get_required_env("TANDEM_API_URL")?)?;
        let data_dir = resolve_data_dir()?;

        let timeout_secs = get_parsed_env("TANDEM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TANDEM_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let max_retries = get_parsed_env("TANDEM_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
        let backoff_ms = get_parsed_env("TANDEM_RETRY_BACKOFF_MS", DEFAULT_RETRY_BACKOFF_MS)?;

        let token = get_optional_env("TANDEM_TOKEN")
            .filter(|value| !value.is_empty())
            .map(SecretString::from);

        Ok(Self {
            api_url,
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
            max_retries,
            retry_backoff: Duration::from_millis(backoff_ms),
            token,
        })
    }

    /// Configuration for a backend at `api_url` with data under `data_dir`,
    /// with every other knob at its default. Used by tests and by callers
    /// that manage their own environment.
    #[must_use]
    pub fn for_base(api_url: Url, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: with_trailing_slash(api_url),
            data_dir: data_dir.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            token: None,
        }
    }

    /// Path of the durable preference file.
    #[must_use]
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable parsed into `T`, falling back to `default`
/// when the variable is unset.
fn get_parsed_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Parse and normalize the backend base URL.
///
/// The URL must be absolute with an `http` or `https` scheme. The path is
/// normalized to end with `/` because `Url::join` treats a base without a
/// trailing slash as a file and would drop its last segment.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(with_trailing_slash(url))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Resolve the data directory from `TANDEM_DATA_DIR` or the platform default.
fn resolve_data_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = get_optional_env("TANDEM_DATA_DIR").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|base| base.join("tandem"))
        .ok_or_else(|| ConfigError::MissingEnvVar("TANDEM_DATA_DIR".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("TANDEM_API_URL", "http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_parse_base_url_keeps_existing_slash() {
        let url = parse_base_url("TANDEM_API_URL", "http://localhost:8000/api/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn test_parse_base_url_joins_under_subpath() {
        let url = parse_base_url("TANDEM_API_URL", "https://tandem.example.com/api").unwrap();
        let joined = url.join("activities/").unwrap();
        assert_eq!(joined.as_str(), "https://tandem.example.com/api/activities/");
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        let err = parse_base_url("TANDEM_API_URL", "ftp://tandem.example.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        let err = parse_base_url("TANDEM_API_URL", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_for_base_defaults() {
        let config = ClientConfig::for_base(
            Url::parse("http://localhost:8000").unwrap(),
            "/tmp/tandem-test",
        );
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_backoff, Duration::from_millis(250));
        assert!(config.token.is_none());
        assert_eq!(config.api_url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_preferences_path() {
        let config = ClientConfig::for_base(
            Url::parse("http://localhost:8000").unwrap(),
            "/tmp/tandem-test",
        );
        assert!(config.preferences_path().ends_with("preferences.json"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = ClientConfig::for_base(
            Url::parse("http://localhost:8000").unwrap(),
            "/tmp/tandem-test",
        );
        config.token = Some(SecretString::from("super-secret-bearer"));
        let output = format!("{config:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("super-secret-bearer"));
    }
}
