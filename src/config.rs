//! Configuration for the footballower API.

use serde::{Deserialize, Serialize};

use crate::scraper::DEFAULT_STANDINGS_URL;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_standings_url")]
    pub standings_url: String,
    /// Whole-request deadline per fetch
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Bound on pooled idle connections per upstream host
    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_standings_url() -> String {
    DEFAULT_STANDINGS_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_idle_connections() -> usize {
    8
}

fn default_user_agent() -> String {
    format!("footballower-api/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            standings_url: default_standings_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_idle_connections: default_max_idle_connections(),
            user_agent: default_user_agent(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/footballower.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_session_ttl_minutes() -> i64 {
    60
}

fn default_bcrypt_cost() -> u32 {
    10
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: default_session_ttl_minutes(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Frontend origin allowed to send credentialed requests
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

fn default_allowed_origin() -> String {
    "https://footballower.vercel.app".to_string()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (FOOTY_SERVER_PORT, etc.)
            .add_source(
                config::Environment::with_prefix("FOOTY")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
