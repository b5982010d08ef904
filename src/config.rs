use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Crawl budgets and HTTP settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Maximum number of pages fetched across the whole crawl
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Maximum link-following depth from the seed page (0 = seed only)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl CrawlConfig {
    /// Load configuration from file and environment variables
    ///
    /// See [`load_config`] for the source priority.
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Request timeout; never shorter than one second
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// Default value functions
fn default_max_pages() -> usize {
    5
}

fn default_max_depth() -> usize {
    1
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with RECIPE_CRAWL__ prefix
/// 2. recipe-crawl.toml file in current directory
/// 3. Default values
///
/// Environment variable format: RECIPE_CRAWL__MAX_PAGES
pub fn load_config() -> Result<CrawlConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-crawl").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_CRAWL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
