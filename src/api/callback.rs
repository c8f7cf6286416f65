use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::server::AuthServerState;

/// Completes the authorization-code flow.
///
/// Spotify redirects here with either `code` and `state`, or `error`. The
/// outcome is written to the pending sign-in so the waiting flow can pick it up.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(server): Extension<AuthServerState>,
) -> Html<&'static str> {
    let mut pending = server.pending.lock().await;
    let Some(pkce) = pending.as_mut() else {
        return Html("<h4>No sign-in in progress.</h4>");
    };

    if let Some(error) = params.get("error") {
        pkce.error = Some(format!("authorization denied: {}", error));
        return Html("<h4>Login cancelled.</h4>");
    }

    if params.get("state") != Some(&pkce.state) {
        pkce.error = Some("state mismatch in authorization callback".to_string());
        return Html("<h4>Login failed.</h4>");
    }

    let Some(code) = params.get("code") else {
        pkce.error = Some("authorization callback without code".to_string());
        return Html("<h4>Missing authorization code.</h4>");
    };

    match server
        .manager
        .exchange_code(code, &pkce.code_verifier, &server.redirect_uri)
        .await
    {
        Ok(grant) => {
            pkce.grant = Some(grant);
            Html("<h2>Authentication successful.</h2><p>You can close this window.</p>")
        }
        Err(e) => {
            log::warn!("Token exchange failed: {}", e);
            pkce.error = Some(e.to_string());
            Html("<h4>Login failed.</h4>")
        }
    }
}
