use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::Url;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::{ApiError, Error, Result},
    management::TokenManager,
    server::{self, AuthServerState},
    session::{self, Session, SessionUser},
    types::{PkceState, TokenResponse, UserProfile},
    utils, warning,
};

const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the authorization URL the user is sent to.
pub fn authorize_url(config: &Config, code_challenge: &str, state: &str) -> Result<String> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
            ("state", state),
            ("scope", config.scope.as_str()),
        ],
    )
    .map_err(|e| Error::Authorization(format!("invalid authorization url: {}", e)))?;

    Ok(url.into())
}

/// Runs the interactive authorization-code flow.
///
/// 1. Generates the PKCE verifier, its S256 challenge and a random state
/// 2. Binds the local callback server
/// 3. Opens the authorization URL in the browser
/// 4. Waits for the callback to exchange the code
/// 5. Looks up the user, seeds the token store and projects the session
///
/// Commands later rebuild a client from the seeded store with
/// [`super::SpotifyClient::create`].
pub async fn sign_in(config: &Config, manager: Arc<TokenManager>) -> Result<Session> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    let pending = Arc::new(Mutex::new(Some(PkceState {
        code_verifier,
        state: state.clone(),
        grant: None,
        error: None,
    })));

    let listener = server::bind(&config.server_address).await.map_err(|e| {
        Error::Authorization(format!(
            "cannot listen on {}: {}",
            config.server_address, e
        ))
    })?;
    let server_state = AuthServerState {
        pending: Arc::clone(&pending),
        manager: Arc::clone(&manager),
        redirect_uri: config.redirect_uri.clone(),
    };
    let server = tokio::spawn(server::serve(listener, server_state));

    let auth_url = authorize_url(config, &code_challenge, &state)?;
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let grant = wait_for_grant(pending, SIGN_IN_TIMEOUT).await;
    server.abort();
    let grant = grant?;

    let profile = whoami(&manager, &config.api_url, &grant.access_token).await?;
    let record = manager.seed(&profile.id, &grant).await?;
    Ok(session::project(SessionUser::from(&profile), &record))
}

/// Polls the shared state until the callback handler stored a grant or an error.
async fn wait_for_grant(
    pending: Arc<Mutex<Option<PkceState>>>,
    max_wait: Duration,
) -> Result<TokenResponse> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        {
            let lock = pending.lock().await;
            if let Some(pkce) = lock.as_ref() {
                if let Some(grant) = &pkce.grant {
                    return Ok(grant.clone());
                }
                if let Some(error) = &pkce.error {
                    return Err(Error::Authorization(error.clone()));
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Err(Error::Authorization(
        "timed out waiting for the authorization callback".to_string(),
    ))
}

/// Fetches the profile behind a freshly issued access token.
///
/// The token is seconds old, so a 401 here is an authorization problem rather
/// than an expiry and is not refreshed.
async fn whoami(manager: &TokenManager, api_url: &str, access_token: &str) -> Result<UserProfile> {
    let response = manager
        .http()
        .get(format!("{}/me", api_url))
        .bearer_auth(access_token)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::from_status(status).into());
    }

    Ok(response.json::<UserProfile>().await?)
}
