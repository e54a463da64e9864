//! Configuration management for CoverMe.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Desktop Chrome user agent presented to job sites.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main application configuration.
///
/// This is loaded from `~/.config/coverme/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Scrape pipeline tuning
    pub scraper: ScraperConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults if it doesn't exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        let config: Self = if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("Config file not found, using defaults");
            Self::default()
        };

        config.scraper.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `COVERME_HEADLESS`: Override browser headless mode (true/false)
    /// - `COVERME_CHROME_EXECUTABLE`: Path to the Chrome/Chromium binary
    /// - `COVERME_NAVIGATION_TIMEOUT_MS`: Override the navigation timeout
    /// - `COVERME_MAX_CONTENT_LENGTH`: Override the extracted content cap
    pub fn load_with_env(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.scraper.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("COVERME_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(val) = lookup("COVERME_CHROME_EXECUTABLE") {
            if !val.is_empty() {
                tracing::debug!("Override browser.chrome_executable from env: {}", val);
                self.browser.chrome_executable = Some(PathBuf::from(val));
            }
        }

        if let Some(val) = lookup("COVERME_NAVIGATION_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                self.scraper.navigation_timeout_ms = ms;
                tracing::debug!("Override scraper.navigation_timeout_ms from env: {}", ms);
            }
        }

        if let Some(val) = lookup("COVERME_MAX_CONTENT_LENGTH") {
            if let Ok(len) = val.parse() {
                self.scraper.max_content_length = len;
                tracing::debug!("Override scraper.max_content_length from env: {}", len);
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/coverme/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "coverme", "coverme").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// User agent sent with every request
    pub user_agent: String,
    /// Disable the Chromium sandbox (required in containers and serverless hosts)
    pub no_sandbox: bool,
    /// Chrome/Chromium binary; auto-detected when unset
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            no_sandbox: true,
            chrome_executable: None,
        }
    }
}

/// Scrape pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Upper bound on navigation, in milliseconds
    pub navigation_timeout_ms: u64,
    /// Fixed wait after navigation for client-rendered content, in milliseconds
    pub settle_delay_ms: u64,
    /// A content candidate must be longer than this many characters
    pub min_content_length: usize,
    /// Extracted content is truncated to this many characters
    pub max_content_length: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: 10_000,
            settle_delay_ms: 2_000,
            min_content_length: 100,
            max_content_length: 10_000,
        }
    }
}

impl ScraperConfig {
    /// Navigation timeout as a `Duration`.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Settle delay as a `Duration`.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Check that the length bounds are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_content_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraper.max_content_length".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.min_content_length >= self.max_content_length {
            return Err(ConfigError::InvalidValue {
                field: "scraper.min_content_length".to_string(),
                reason: format!(
                    "must be less than max_content_length ({})",
                    self.max_content_length
                ),
            });
        }
        Ok(())
    }
}
