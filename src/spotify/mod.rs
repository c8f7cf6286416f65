//! # Spotify Integration Module
//!
//! Authenticated access to the Spotify Web API for one signed-in user.
//!
//! ## Architecture
//!
//! ```text
//! Front-end (CLI commands)
//!          ↓
//! SpotifyClient typed methods (profile, player, stats, playlists, search)
//!          ↓
//! SpotifyClient::request (bearer auth, 204 → None, refresh-once on 401)
//!          ↓                         ↘ (401)
//! reqwest                      TokenManager::refresh_for → TokenStore
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Token renewal
//!
//! A 401 from the resource API triggers exactly one refresh through the
//! [`crate::management::TokenManager`] and exactly one retry. If the refresh
//! fails, the error is a [`crate::error::RefreshFailure`] and the session is
//! over. If the retry is answered with 401 again, it is an ordinary
//! [`crate::error::ApiError`]. No other status is retried.
//!
//! ## API Coverage
//!
//! - `GET /me` - [`SpotifyClient::profile`]
//! - `GET /me/player/currently-playing` - [`SpotifyClient::currently_playing`]
//! - `GET /me/player/recently-played` - [`SpotifyClient::recently_played`]
//! - `GET /me/top/{artists|tracks}` - [`SpotifyClient::top_items`], [`SpotifyClient::top_artists`], [`SpotifyClient::top_tracks`]
//! - `GET /me/playlists` - [`SpotifyClient::user_playlists`]
//! - `GET /playlists/{id}` - [`SpotifyClient::playlist`]
//! - `GET /search` - [`SpotifyClient::search`]
//!
//! Every typed method returns `Result<Option<T>>`: any endpoint may answer
//! `204 No Content`, and that is a valid result rather than an error.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let manager = Arc::new(TokenManager::new(&config, Arc::new(FileTokenStore::new(config::data_dir())))?);
//! match SpotifyClient::create(&user_id, &config, manager).await? {
//!     Some(client) => {
//!         let playing = client.currently_playing().await?;
//!     }
//!     None => { /* sign in again */ }
//! }
//! ```

pub mod auth;
mod client;
mod player;
mod playlists;
mod search;
mod stats;
mod user;

pub use client::RequestOptions;
pub use client::SpotifyClient;
