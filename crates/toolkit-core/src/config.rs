//! Engine configuration.
//!
//! Configuration is resolved in three layers:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file at `<home>/config.toml`,
//! 3. the `TOOLKIT_ENGINE_HOME` environment variable selecting the home
//!    directory itself.
//!
//! The home directory defaults to `~/.toolkit_engine`.
//!
//! # Examples
//!
//! ```toml
//! [http]
//! timeout_seconds = 30
//!
//! [retry]
//! max_attempts = 3
//! initial_backoff_ms = 500
//! max_backoff_ms = 8000
//! retry_writes_on_network_error = false
//!
//! [selection]
//! max_attempts = 3
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the optional configuration file inside the home directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the home directory.
pub const HOME_ENV_VAR: &str = "TOOLKIT_ENGINE_HOME";

const DEFAULT_HOME_DIR: &str = ".toolkit_engine";

/// Retry policy for transient request failures.
///
/// # Examples
///
/// ```
/// use toolkit_engine_core::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 3);
/// assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
/// assert_eq!(policy.backoff_for(2), Duration::from_millis(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
    /// Retry create/update after network errors
    pub retry_writes_on_network_error: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            retry_writes_on_network_error: false,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// Doubles per attempt starting at `initial_backoff`, capped at
    /// `max_backoff`.
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

/// Runtime configuration of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory holding persisted records and `config.toml`
    pub home_dir: PathBuf,
    /// Per-request timeout of generated clients
    pub request_timeout: Duration,
    /// Retry policy of generated clients
    pub retry: RetryPolicy,
    /// Attempts allowed per ambiguous group in interactive selection
    pub selection_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            home_dir: default_home_dir(),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            selection_attempts: 3,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from the environment and the home directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration file exists but cannot
    /// be read or parsed, or if the resulting values are invalid.
    pub fn load() -> Result<Self> {
        let home = std::env::var_os(HOME_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map_or_else(default_home_dir, PathBuf::from);
        Self::from_home(home)
    }

    /// Loads configuration for an explicit home directory.
    ///
    /// A missing `config.toml` yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on unreadable or invalid files.
    pub fn from_home(home_dir: impl Into<PathBuf>) -> Result<Self> {
        let home_dir = home_dir.into();
        let mut config = Self {
            home_dir,
            ..Self::default()
        };

        let path = config.config_path();
        if path.exists() {
            let file = read_config_file(&path)?;
            file.apply(&mut config);
            tracing::debug!("Loaded configuration from {}", path.display());
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
        }

        config.validate()?;
        Ok(config)
    }

    /// Path of the configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.home_dir.join(CONFIG_FILE)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for zero timeouts or attempt counts, or a
    /// maximum backoff smaller than the initial one.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(config_error("request timeout must be greater than zero"));
        }
        if self.retry.max_attempts == 0 {
            return Err(config_error("retry.max_attempts must be at least 1"));
        }
        if self.retry.max_backoff < self.retry.initial_backoff {
            return Err(config_error(
                "retry.max_backoff_ms must not be smaller than retry.initial_backoff_ms",
            ));
        }
        if self.selection_attempts == 0 {
            return Err(config_error("selection.max_attempts must be at least 1"));
        }
        Ok(())
    }
}

fn default_home_dir() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(DEFAULT_HOME_DIR),
        |home| home.join(DEFAULT_HOME_DIR),
    )
}

fn config_error(message: &str) -> Error {
    Error::Config {
        message: message.to_string(),
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    toml::from_str(&content).map_err(|e| Error::Config {
        message: format!("failed to parse {}: {e}", path.display()),
    })
}

/// On-disk layout of `config.toml`. Every key is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    http: HttpSection,
    #[serde(default)]
    retry: RetrySection,
    #[serde(default)]
    selection: SelectionSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct HttpSection {
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RetrySection {
    max_attempts: Option<u32>,
    initial_backoff_ms: Option<u64>,
    max_backoff_ms: Option<u64>,
    retry_writes_on_network_error: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SelectionSection {
    max_attempts: Option<u32>,
}

impl ConfigFile {
    fn apply(self, config: &mut EngineConfig) {
        if let Some(secs) = self.http.timeout_seconds {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = self.retry.max_attempts {
            config.retry.max_attempts = n;
        }
        if let Some(ms) = self.retry.initial_backoff_ms {
            config.retry.initial_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = self.retry.max_backoff_ms {
            config.retry.max_backoff = Duration::from_millis(ms);
        }
        if let Some(flag) = self.retry.retry_writes_on_network_error {
            config.retry.retry_writes_on_network_error = flag;
        }
        if let Some(n) = self.selection.max_attempts {
            config.selection_attempts = n;
        }
    }
}
