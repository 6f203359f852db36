//! Configuration management.
//!
//! Configuration is an explicit value passed to the client at construction
//! time. Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML config file (`--config`, `RAINDROP_MCP_CONFIG_PATH`, or the
//!    platform config dir `raindrop-mcp/config.toml`)
//! 3. Environment variables (`RAINDROP_ACCESS_TOKEN`, `RAINDROP_API_URL`,
//!    `RAINDROP_TIMEOUT_SECS`, `RAINDROP_COLLECTION_FETCH`)
//!
//! ```toml
//! api_url = "https://api.raindrop.io/rest/v1"
//! access_token = "..."
//! timeout_secs = 30
//! collection_fetch = "roots-and-children"
//!
//! [logging]
//! format = "json"
//! filter = "raindrop_mcp=debug"
//! file = "/tmp/raindrop-mcp.log"
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default base URL of the Raindrop.io REST API.
pub const DEFAULT_API_URL: &str = "https://api.raindrop.io/rest/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the test token / OAuth access token.
pub const ENV_ACCESS_TOKEN: &str = "RAINDROP_ACCESS_TOKEN";

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "RAINDROP_API_URL";

/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "RAINDROP_TIMEOUT_SECS";

/// Environment variable selecting the collection fetch strategy.
pub const ENV_COLLECTION_FETCH: &str = "RAINDROP_COLLECTION_FETCH";

/// Environment variable pointing at a config file.
pub const ENV_CONFIG_PATH: &str = "RAINDROP_MCP_CONFIG_PATH";

/// Which endpoints supply the flat collection batch for tree building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionFetch {
    /// `GET /collections` followed by `GET /collections/childrens`.
    ///
    /// Child records come second, so they win the identity merge.
    #[default]
    RootsAndChildren,
    /// Single `GET /collections/all` request.
    All,
}

impl CollectionFetch {
    /// Parses a strategy name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "roots-and-children" | "roots_and_children" | "split" => Some(Self::RootsAndChildren),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Returns the canonical strategy name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RootsAndChildren => "roots-and-children",
            Self::All => "all",
        }
    }
}

impl fmt::Display for CollectionFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` (default) or `json`.
    pub format: Option<String>,
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: Option<String>,
    /// Log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Main configuration for raindrop-mcp.
#[derive(Debug, Clone)]
pub struct RaindropConfig {
    /// API base URL without trailing slash.
    pub api_url: String,
    /// Bearer token presented on every request.
    pub access_token: Option<SecretString>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Endpoints used to fetch collections for tree building.
    pub collection_fetch: CollectionFetch,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// API base URL.
    pub api_url: Option<String>,
    /// Access token.
    pub access_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Collection fetch strategy name.
    pub collection_fetch: Option<String>,
    /// Logging configuration.
    pub logging: Option<LoggingSettings>,
}

impl Default for RaindropConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            collection_fetch: CollectionFetch::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl RaindropConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the platform config dir first, then `~/.config/raindrop-mcp/`.
    /// Returns the default configuration if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the first existing file cannot be read or parsed.
    pub fn load_default() -> crate::Result<Self> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Ok(Self::default());
        };

        let candidates = [
            base_dirs.config_dir().join("raindrop-mcp").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("raindrop-mcp")
                .join("config.toml"),
        ];

        Self::load_first_existing(&candidates)
    }

    /// Loads the first candidate that exists, or the defaults if none does.
    fn load_first_existing(candidates: &[PathBuf]) -> crate::Result<Self> {
        match candidates.iter().find(|p| p.exists()) {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Converts a `ConfigFile` to `RaindropConfig`.
    fn from_config_file(file: ConfigFile) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(api_url) = file.api_url {
            config = config.with_api_url(api_url);
        }
        if let Some(token) = file.access_token.filter(|t| !t.trim().is_empty()) {
            config.access_token = Some(SecretString::from(token));
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(name) = file.collection_fetch {
            config.collection_fetch = CollectionFetch::parse(&name).ok_or_else(|| {
                crate::Error::InvalidInput(format!("unknown collection_fetch: {name}"))
            })?;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout or fetch strategy override is malformed.
    pub fn with_env_overrides(self) -> crate::Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] for an unparseable timeout or an
    /// unknown fetch strategy.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.access_token = Some(SecretString::from(token));
        }
        if let Some(url) = get(ENV_API_URL) {
            self = self.with_api_url(url);
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                crate::Error::InvalidInput(format!("{ENV_TIMEOUT_SECS}={raw}: {e}"))
            })?;
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get(ENV_COLLECTION_FETCH) {
            self.collection_fetch = CollectionFetch::parse(&raw).ok_or_else(|| {
                crate::Error::InvalidInput(format!(
                    "{ENV_COLLECTION_FETCH}={raw}: unknown collection fetch strategy"
                ))
            })?;
        }

        Ok(self)
    }

    /// Sets the API base URL, dropping any trailing slash.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the collection fetch strategy.
    #[must_use]
    pub const fn with_collection_fetch(mut self, fetch: CollectionFetch) -> Self {
        self.collection_fetch = fetch;
        self
    }

    /// Returns `true` if a non-empty access token is configured.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.access_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().trim().is_empty())
    }

    /// Renders the configuration as TOML with the token redacted.
    #[must_use]
    pub fn to_redacted_toml(&self) -> String {
        let token = if self.has_access_token() {
            "***REDACTED***"
        } else {
            "(not set)"
        };
        let mut out = format!(
            "api_url = \"{}\"\naccess_token = \"{token}\"\ntimeout_secs = {}\ncollection_fetch = \"{}\"\n",
            self.api_url,
            self.timeout.as_secs(),
            self.collection_fetch
        );
        out.push_str("\n[logging]\n");
        if let Some(format) = &self.logging.format {
            out.push_str(&format!("format = \"{format}\"\n"));
        }
        if let Some(filter) = &self.logging.filter {
            out.push_str(&format!("filter = \"{filter}\"\n"));
        }
        if let Some(file) = &self.logging.file {
            out.push_str(&format!("file = \"{}\"\n", file.display()));
        }
        out
    }
}
