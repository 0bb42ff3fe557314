//! Configuration file parser for ~/.config/newsdesk/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Provider API keys resolve environment-first (`NEWSAPI_KEY`,
//! `GUARDIAN_API_KEY`, `NYT_API_KEY`), falling back to the config file.
//! A provider with no key at all is simply excluded from aggregation.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use url::Url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid base URL for {provider}: {url}")]
    InvalidBaseUrl { provider: &'static str, url: String },
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified. Missing keys fall back to `Default::default()`.
///
/// The custom `Debug` impl masks API keys to keep credentials out of logs
/// and error messages.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// NewsAPI key (alternative to the NEWSAPI_KEY env var).
    pub newsapi_key: Option<String>,
    /// Guardian content API key (alternative to GUARDIAN_API_KEY).
    pub guardian_key: Option<String>,
    /// New York Times article-search API key (alternative to NYT_API_KEY).
    pub nyt_key: Option<String>,

    /// Base endpoint overrides; defaults point at the public APIs.
    pub newsapi_base_url: String,
    pub guardian_base_url: String,
    pub nyt_base_url: String,

    /// Per-provider request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            newsapi_key: None,
            guardian_key: None,
            nyt_key: None,
            newsapi_base_url: "https://newsapi.org/v2".to_string(),
            guardian_base_url: "https://content.guardianapis.com".to_string(),
            nyt_base_url: "https://api.nytimes.com/svc/search/v2".to_string(),
            request_timeout_secs: 20,
        }
    }
}

/// Mask API keys in Debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("newsapi_key", &self.newsapi_key.as_ref().map(|_| "[REDACTED]"))
            .field("guardian_key", &self.guardian_key.as_ref().map(|_| "[REDACTED]"))
            .field("nyt_key", &self.nyt_key.as_ref().map(|_| "[REDACTED]"))
            .field("newsapi_base_url", &self.newsapi_base_url)
            .field("guardian_base_url", &self.guardian_base_url)
            .field("nyt_base_url", &self.nyt_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as a warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw table first to surface likely typos
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "newsapi_key",
                "guardian_key",
                "nyt_key",
                "newsapi_base_url",
                "guardian_base_url",
                "nyt_base_url",
                "request_timeout_secs",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file (possible typo)");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate_base_urls()?;
        Ok(config)
    }

    /// Reject base URLs that do not parse as absolute URLs.
    fn validate_base_urls(&self) -> Result<(), ConfigError> {
        for (provider, url) in [
            ("newsapi", &self.newsapi_base_url),
            ("guardian", &self.guardian_base_url),
            ("nyt", &self.nyt_base_url),
        ] {
            if Url::parse(url).is_err() {
                return Err(ConfigError::InvalidBaseUrl {
                    provider,
                    url: url.clone(),
                });
            }
        }
        Ok(())
    }

    /// Resolve a provider key: env var first, then config file.
    fn resolve_key(env_var: &str, fallback: Option<&String>) -> Option<SecretString> {
        std::env::var(env_var)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| fallback.cloned())
            .map(SecretString::from)
    }

    pub fn resolved_newsapi_key(&self) -> Option<SecretString> {
        Self::resolve_key("NEWSAPI_KEY", self.newsapi_key.as_ref())
    }

    pub fn resolved_guardian_key(&self) -> Option<SecretString> {
        Self::resolve_key("GUARDIAN_API_KEY", self.guardian_key.as_ref())
    }

    pub fn resolved_nyt_key(&self) -> Option<SecretString> {
        Self::resolve_key("NYT_API_KEY", self.nyt_key.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("newsdesk_config_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("newsdesk_no_such_config.toml");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.newsapi_base_url, "https://newsapi.org/v2");
        assert!(config.newsapi_key.is_none());
        assert_eq!(config.request_timeout_secs, 20);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = write_config(
            "partial.toml",
            r#"
guardian_key = "g-key"
request_timeout_secs = 5
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.guardian_key.as_deref(), Some("g-key"));
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.guardian_base_url, "https://content.guardianapis.com");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let path = write_config("invalid.toml", "newsapi_key = [unterminated");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_base_url_is_an_error() {
        let path = write_config("badurl.toml", r#"nyt_base_url = "not a url""#);
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::InvalidBaseUrl { provider: "nyt", .. })
        ));
    }

    #[test]
    fn test_debug_output_masks_keys() {
        let config = Config {
            newsapi_key: Some("secret-value".to_string()),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_config_key_used_when_env_unset() {
        let config = Config {
            nyt_key: Some("from-config".to_string()),
            ..Config::default()
        };
        // NYT_KEY env var is not set in the test environment
        assert!(config.resolved_nyt_key().is_some());
    }

    #[test]
    fn test_no_key_resolves_to_none() {
        let config = Config::default();
        assert!(config.resolved_guardian_key().is_none());
    }
}
