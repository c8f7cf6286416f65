//! Configuration management for spotdash.
//!
//! This module loads configuration values from environment variables and a `.env`
//! file. The `.env` file lives in the platform-specific local data directory
//! under `spotdash/.env`:
//! - Linux: `~/.local/share/spotdash/.env`
//! - macOS: `~/Library/Application Support/spotdash/.env`
//! - Windows: `%LOCALAPPDATA%/spotdash/.env`
//!
//! Variables already present in the environment take precedence over the file.
//! Only the client credentials are required; every URL has a default pointing at
//! the public Spotify endpoints so tests can override them one by one.

use std::{env, path::PathBuf, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

/// Scopes needed to read profile, playback and library data.
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email user-read-currently-playing user-read-playback-state user-read-recently-played user-top-read playlist-read-private playlist-read-collaborative";

const DEFAULT_POLL_SECONDS: u64 = 30;
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_REFRESH_SKEW_SECONDS: u64 = 60;

/// Runtime configuration for the API-access layer and the terminal front-end.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_address: String,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
    /// Stored tokens expiring within this window are refreshed before first use.
    pub refresh_skew: Duration,
}

impl Config {
    /// Builds a configuration with the given client credentials and all defaults.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECONDS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
            refresh_skew: Duration::from_secs(DEFAULT_REFRESH_SKEW_SECONDS),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when a client credential is not set and
    /// [`ConfigError::Invalid`] when a numeric setting is not a positive
    /// number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let seconds = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            match lookup(key) {
                // zero would stall the poll timer and time out every request
                Some(raw) => match raw.trim().parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                    _ => Err(ConfigError::Invalid { key, value: raw }),
                },
                None => Ok(Duration::from_secs(default)),
            }
        };

        let mut config = Self::new(
            required("SPOTIFY_CLIENT_ID")?,
            required("SPOTIFY_CLIENT_SECRET")?,
        );

        if let Some(v) = lookup("SPOTIFY_REDIRECT_URI") {
            config.redirect_uri = v;
        }
        if let Some(v) = lookup("SPOTIFY_SCOPE") {
            config.scope = v;
        }
        if let Some(v) = lookup("SPOTIFY_AUTH_URL") {
            config.auth_url = v;
        }
        if let Some(v) = lookup("SPOTIFY_TOKEN_URL") {
            config.token_url = v;
        }
        if let Some(v) = lookup("SPOTIFY_API_URL") {
            config.api_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("SERVER_ADDRESS") {
            config.server_address = v;
        }

        config.poll_interval = seconds("SPOTDASH_POLL_SECONDS", DEFAULT_POLL_SECONDS)?;
        config.http_timeout = seconds("SPOTDASH_HTTP_TIMEOUT_SECONDS", DEFAULT_HTTP_TIMEOUT_SECONDS)?;

        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }
}

/// Returns the spotdash directory inside the local data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotdash");
    path
}

/// Loads environment variables from the `.env` file in the local data directory.
///
/// The directory is created when it does not exist yet. A missing `.env` file is
/// not an error, since every variable can come from the environment instead.
///
/// # Example
///
/// ```
/// use spotdash::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| ConfigError::Env(e.to_string()))?;

    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| ConfigError::Env(e.to_string()))
}
