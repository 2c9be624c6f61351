//! Configuration module for Thimble

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Seed data shape
    #[serde(default)]
    pub fixtures: FixtureConfig,

    /// Accepted login
    #[serde(default)]
    pub auth: AuthConfig,

    /// Settings for the bundled client commands
    #[serde(default)]
    pub client: ClientConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Simulated upload latency for `POST /posts`, in milliseconds
    #[serde(default = "default_upload_delay_ms")]
    pub upload_delay_ms: u64,

    /// Largest multipart body accepted, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Seed data shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// RNG seed; equal seeds give equal fixtures
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Generated users besides the demo user
    #[serde(default = "default_user_count")]
    pub user_count: usize,

    /// Posts per user (the demo user included)
    #[serde(default = "default_posts_per_user")]
    pub posts_per_user: usize,

    /// Search suggestions
    #[serde(default = "default_search_entries")]
    pub search_entries: usize,

    /// Activities per user (the demo user included)
    #[serde(default = "default_activities_per_user")]
    pub activities_per_user: usize,
}

/// The one credential pair the login stub accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Accepted username; also the demo user's id
    #[serde(default = "default_username")]
    pub username: String,

    /// Accepted password
    #[serde(default = "default_password")]
    pub password: String,

    /// Access token handed out on success
    #[serde(default = "default_access_token")]
    pub access_token: String,

    /// Refresh token handed out on success
    #[serde(default = "default_refresh_token")]
    pub refresh_token: String,
}

/// Settings for the bundled client commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Fixture server base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Quiet period before a search query is sent, in milliseconds
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_bind() -> String {
    "127.0.0.1:4000".to_string()
}

fn default_upload_delay_ms() -> u64 {
    3000
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_seed() -> u64 {
    42
}

fn default_user_count() -> usize {
    10
}

fn default_posts_per_user() -> usize {
    5
}

fn default_search_entries() -> usize {
    20
}

fn default_activities_per_user() -> usize {
    10
}

fn default_username() -> String {
    "user0".to_string()
}

fn default_password() -> String {
    "1234".to_string()
}

fn default_access_token() -> String {
    "access-token".to_string()
}

fn default_refresh_token() -> String {
    "refresh-token".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:4000".to_string()
}

fn default_search_debounce_ms() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            upload_delay_ms: default_upload_delay_ms(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    /// Upload delay as a `Duration`
    pub const fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            user_count: default_user_count(),
            posts_per_user: default_posts_per_user(),
            search_entries: default_search_entries(),
            activities_per_user: default_activities_per_user(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            access_token: default_access_token(),
            refresh_token: default_refresh_token(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl ClientConfig {
    /// Search debounce as a `Duration`
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.upload_delay(), Duration::from_secs(3));
        assert_eq!(config.server.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.auth.password, "1234");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[auth]\npassword = \"1235\"\n\n[server]\nupload_delay_ms = 0\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.auth.password, "1235");
        assert_eq!(config.auth.username, "user0");
        assert_eq!(config.server.upload_delay_ms, 0);
        assert_eq!(config.server.bind, "127.0.0.1:4000");
        assert_eq!(config.server.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.fixtures, FixtureConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.fixtures.seed = 7;
        config.client.base_url = "http://localhost:9999".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = 12").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
