//! # API Module
//!
//! HTTP endpoints of the local server that runs during `spotdash auth`.
//!
//! - [`callback`] - receives the authorization redirect and exchanges the code
//!   for the first token pair through the token manager.
//! - [`health`] - reports that the server is up, with name and version.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotdash::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
