use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, management::TokenManager, types::PkceState};

/// State shared between the sign-in flow and the callback handler.
#[derive(Clone)]
pub struct AuthServerState {
    pub pending: Arc<Mutex<Option<PkceState>>>,
    pub manager: Arc<TokenManager>,
    pub redirect_uri: String,
}

pub fn router(state: AuthServerState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

pub async fn bind(addr: &str) -> std::io::Result<TcpListener> {
    TcpListener::bind(addr).await
}

pub async fn serve(listener: TcpListener, state: AuthServerState) {
    if let Err(e) = axum::serve(listener, router(state)).await {
        log::error!("Callback server stopped: {}", e);
    }
}
