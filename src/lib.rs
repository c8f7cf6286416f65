//! spotdash - a terminal dashboard for Spotify listening data.
//!
//! The library is built around an authenticated API-access layer: a token
//! lifecycle manager that keeps a user's access/refresh-token pair valid across
//! a persistent store, and a typed client that renews an expired token
//! transparently (once) around any upstream call.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local sign-in callback server
//! - `cli` - Command implementations of the terminal front-end
//! - `config` - Configuration from environment variables and `.env`
//! - `error` - Error types of the API-access layer
//! - `management` - Token store and token lifecycle manager
//! - `server` - Local HTTP server for the authorization callback
//! - `session` - Token records and the caller-visible session
//! - `spotify` - Typed Spotify Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use spotdash::{config::{self, Config}, management::{FileTokenStore, TokenManager}, spotify::SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() -> spotdash::error::Result<()> {
//!     config::load_env().await?;
//!     let config = Config::from_env()?;
//!     let manager = Arc::new(TokenManager::new(&config, Arc::new(FileTokenStore::new(config::data_dir())))?);
//!     if let Some(client) = SpotifyClient::create("user-id", &config, manager).await? {
//!         let playing = client.currently_playing().await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints a status line prefixed with a blue `o`.
///
/// ```
/// info!("Waiting for the authorization callback...");
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line prefixed with a green `✓`.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line and exits with status 1.
///
/// Front-end only. Library code returns [`error::Error`] instead.
///
/// ```
/// error!("No session found. Please run spotdash auth");
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line for problems the command can live with.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
