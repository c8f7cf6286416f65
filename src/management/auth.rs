use std::sync::Arc;

use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    config::Config,
    error::{Error, RefreshFailure, Result},
    management::TokenStore,
    session,
    types::{RefreshedToken, TokenRecord, TokenResponse},
    utils,
};

/// Keeps a user's access token usable.
///
/// The manager is the only component that talks to the authorization endpoint
/// and the only one that writes to the [`TokenStore`]. It never retries: one
/// call to [`TokenManager::refresh`] is one request upstream.
pub struct TokenManager {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    store: Arc<dyn TokenStore>,
}

impl TokenManager {
    /// Builds a manager with its own HTTP client using the configured timeout.
    pub fn new(config: &Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self::with_http(http, config, store))
    }

    pub fn with_http(http: Client, config: &Config, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            store,
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// When the upstream omits `refresh_token` in its answer, the one passed in
    /// stays valid and is returned unchanged. Nothing is persisted here; see
    /// [`TokenManager::refresh_for`].
    ///
    /// # Errors
    ///
    /// Any non-2xx answer, an unreachable endpoint, or an unreadable body is a
    /// [`RefreshFailure`]. Callers must treat it as the end of the session.
    pub async fn refresh(
        &self,
        refresh_token: &str,
    ) -> std::result::Result<RefreshedToken, RefreshFailure> {
        let record = self.refresh_record(refresh_token).await?;
        Ok(RefreshedToken::from(&record))
    }

    /// Refreshes and persists the new pair for `user_id` before returning.
    ///
    /// A successful return guarantees that a subsequent store read for the user
    /// yields the returned tokens.
    pub async fn refresh_for(&self, user_id: &str, refresh_token: &str) -> Result<RefreshedToken> {
        log::debug!("Refreshing access token for user {}", user_id);

        let record = self.refresh_record(refresh_token).await.map_err(|e| {
            log::warn!("Refreshing access token for user {} failed: {}", user_id, e);
            e
        })?;
        self.store.set(user_id, &record).await?;

        Ok(RefreshedToken::from(&record))
    }

    async fn refresh_record(
        &self,
        refresh_token: &str,
    ) -> std::result::Result<TokenRecord, RefreshFailure> {
        let grant = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        // a previous refresh token is passed, so a record always comes back
        session::record_from_grant(&grant, Some(refresh_token), utils::now_millis()).ok_or_else(
            || RefreshFailure {
                status: None,
                body: "token response without refresh token".to_string(),
            },
        )
    }

    /// Persists the first token pair obtained at sign-in.
    pub async fn seed(&self, user_id: &str, grant: &TokenResponse) -> Result<TokenRecord> {
        let record = session::record_from_grant(grant, None, utils::now_millis())
            .ok_or_else(|| {
                Error::Authorization("authorization server returned no refresh token".to_string())
            })?;

        self.store.set(user_id, &record).await?;
        Ok(record)
    }

    /// Exchanges an authorization code (with its PKCE verifier) for a first token pair.
    pub async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("code_verifier", verifier),
        ])
        .await
        .map_err(|e| Error::Authorization(e.to_string()))
    }

    async fn token_request(
        &self,
        form: &[(&str, &str)],
    ) -> std::result::Result<TokenResponse, RefreshFailure> {
        let response = self
            .http
            .post(&self.token_url)
            .header(
                AUTHORIZATION,
                utils::basic_auth(&self.client_id, &self.client_secret),
            )
            .form(form)
            .send()
            .await
            .map_err(|e| RefreshFailure {
                status: None,
                body: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RefreshFailure {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(RefreshFailure {
                status: Some(status.as_u16()),
                body,
            });
        }

        serde_json::from_str::<TokenResponse>(&body).map_err(|e| RefreshFailure {
            status: Some(status.as_u16()),
            body: format!("unexpected token response: {}", e),
        })
    }
}
