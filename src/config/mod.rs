use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, ScrapingError};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "REALTOR_SCRAPER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "scraper.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub pagination: PaginationConfig,
    pub selectors: SelectorConfig,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: u32,
}

/// CSS selectors for the directory markup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub summary: String,
    pub agent_card: String,
    pub name: String,
    pub business_name: String,
    pub phone: String,
    pub profile_link: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub stealth: bool,
    pub launch_attempts: u32,
    pub settle_delay_ms: u64,
    pub navigation_timeout_secs: u64,
    pub chrome_executable: Option<PathBuf>,
    /// Parent of the per-session profile dirs; the system temp dir when unset.
    pub user_data_root: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output.csv"),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            summary: ".search-result".to_string(),
            agent_card: r#"[data-testid="component-agentCard"]"#.to_string(),
            name: ".agent-name".to_string(),
            business_name: ".agent-group".to_string(),
            phone: ".agent-phone".to_string(),
            profile_link: r#"[aria-label="link name"]"#.to_string(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            stealth: true,
            launch_attempts: 3,
            settle_delay_ms: 0,
            navigation_timeout_secs: 30,
            chrome_executable: None,
            user_data_root: None,
        }
    }
}

impl BrowserConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

pub trait ConfigManager {
    fn load_config(&self) -> Result<Config>;
    fn validate_config(&self, config: &Config) -> Result<()>;
}

pub struct FileConfigManager {
    config_path: PathBuf,
}

impl FileConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Uses `REALTOR_SCRAPER_CONFIG` when set, `scraper.toml` otherwise.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::new(path)
    }
}

impl ConfigManager for FileConfigManager {
    fn load_config(&self) -> Result<Config> {
        // a missing file means defaults; nothing is written back
        let config = if self.config_path.exists() {
            info!("Loading configuration from {:?}", self.config_path);
            let config_content = fs::read_to_string(&self.config_path)
                .map_err(|e| ScrapingError::ConfigError(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&config_content)
                .map_err(|e| ScrapingError::ConfigError(format!("Failed to parse TOML config: {}", e)))?
        } else {
            debug!("No configuration file at {:?}, using defaults", self.config_path);
            Config::default()
        };

        self.validate_config(&config)?;
        Ok(config)
    }

    fn validate_config(&self, config: &Config) -> Result<()> {
        debug!("Validating configuration");

        if config.output.path.as_os_str().is_empty() {
            return Err(ScrapingError::ConfigError("output.path cannot be empty".to_string()));
        }

        if config.pagination.page_size == 0 {
            return Err(ScrapingError::ConfigError("page_size must be greater than 0".to_string()));
        }

        let selectors = [
            ("summary", &config.selectors.summary),
            ("agent_card", &config.selectors.agent_card),
            ("name", &config.selectors.name),
            ("business_name", &config.selectors.business_name),
            ("phone", &config.selectors.phone),
            ("profile_link", &config.selectors.profile_link),
        ];
        for (key, selector) in selectors {
            if selector.trim().is_empty() {
                return Err(ScrapingError::ConfigError(format!("Selector '{}' cannot be empty", key)));
            }
        }

        if config.browser.launch_attempts == 0 {
            return Err(ScrapingError::ConfigError("launch_attempts must be greater than 0".to_string()));
        }
        if config.browser.launch_attempts > 10 {
            return Err(ScrapingError::ConfigError("launch_attempts cannot exceed 10".to_string()));
        }
        if config.browser.navigation_timeout_secs == 0 {
            return Err(ScrapingError::ConfigError("navigation_timeout_secs must be greater than 0".to_string()));
        }

        if let Some(ref executable) = config.browser.chrome_executable {
            if !executable.exists() {
                return Err(ScrapingError::ConfigError(format!("Chrome executable not found: {:?}", executable)));
            }
        }

        if let Some(ref root) = config.browser.user_data_root {
            if !root.is_dir() {
                return Err(ScrapingError::ConfigError(format!("user_data_root is not a directory: {:?}", root)));
            }
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}
