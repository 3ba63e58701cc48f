use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::credentials::ConfigCredentials;
use crate::eligibility::RegionProfile;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub region: RegionProfile,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// When false the server runs without history, saved items or
    /// preferences.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            enabled: true,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("litscout.db")
}

fn default_true() -> bool {
    true
}

/// Which adapter variant serves the search engines.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    #[default]
    Synthetic,
    Live,
}

/// Source adapter configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub mode: SourceMode,
    /// Timeout for one live lookup, in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Delay between successive requests of one live adapter (default: 2000)
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,
    /// Results requested from each live provider (default: 10)
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// API keys per source name, e.g. `[sources.credentials.Google]`.
    #[serde(default)]
    pub credentials: HashMap<String, HashMap<String, String>>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            timeout_secs: default_timeout(),
            request_delay_ms: default_request_delay(),
            max_results: default_max_results(),
            credentials: HashMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_request_delay() -> u64 {
    2000
}

fn default_max_results() -> usize {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sources: SanitizedSourcesConfig,
    pub region: RegionProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSourcesConfig {
    pub mode: SourceMode,
    pub timeout_secs: u64,
    pub request_delay_ms: u64,
    pub max_results: usize,
    /// Configured credential key names per source; values never leave.
    pub credentials: HashMap<String, Vec<String>>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let credentials = ConfigCredentials::without_env(&config.sources.credentials);
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            sources: SanitizedSourcesConfig {
                mode: config.sources.mode,
                timeout_secs: config.sources.timeout_secs,
                request_delay_ms: config.sources.request_delay_ms,
                max_results: config.sources.max_results,
                credentials: credentials.configured_key_names(),
            },
            region: config.region.clone(),
        }
    }
}
