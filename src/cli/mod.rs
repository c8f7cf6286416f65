//! # CLI Module
//!
//! Terminal front-end of spotdash. Every command is a thin consumer of the
//! API-access layer: it obtains a [`crate::spotify::SpotifyClient`] through the
//! [`Context`], calls one typed method, and renders the result.
//!
//! ## Commands
//!
//! - [`auth`] / [`logout`] - sign in through the browser, forget the session
//! - [`profile`] - the signed-in account
//! - [`now_playing`] - current playback, optionally polled
//! - [`recent`] - recently played tracks
//! - [`top`] - top artists or tracks for a time range
//! - [`playlists`] / [`playlist`] - library playlists and one playlist's tracks
//! - [`search`] - catalog search across types
//! - [`receipt`] - top items rendered as a shop receipt
//!
//! ## Error handling
//!
//! Commands never return errors. A "no content" answer is reported as a
//! warning. Any other failure ends the program through the `error!` macro;
//! an expired session additionally points the user at `spotdash auth`.

mod auth;
mod context;
mod player;
mod playlist;
mod profile;
mod receipt;
mod search;
mod stats;

pub use auth::auth;
pub use auth::logout;
pub use context::Context;
pub use player::now_playing;
pub use player::recent;
pub use playlist::playlist;
pub use playlist::playlists;
pub use profile::profile;
pub use receipt::Receipt;
pub use receipt::receipt;
pub use search::search;
pub use stats::top;
