use std::sync::Arc;

use reqwest::{
    Client, Method, Response, StatusCode,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, RwLock};

use crate::{
    config::Config,
    error::{ApiError, Error, Result},
    management::TokenManager,
    types::SessionIdentity,
    utils,
};

/// Caller-supplied parts of a request besides method and path.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    access_token: String,
    refresh_token: String,
}

/// Where a request stands in the refresh-once cycle.
///
/// `Initial` may move to `Retry` once, through a refresh. `Retry` never
/// refreshes again: its 401 is returned as an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retry,
}

/// Authenticated client for one signed-in user.
///
/// Methods take `&self`, so one client can be shared behind an `Arc`. When
/// several requests hit a 401 at the same time only the first refreshes; the
/// others pick up the token it obtained.
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    user_id: String,
    credentials: RwLock<Credentials>,
    refresh_gate: Mutex<()>,
    manager: Arc<TokenManager>,
}

impl SpotifyClient {
    pub fn new(identity: SessionIdentity, config: &Config, manager: Arc<TokenManager>) -> Self {
        Self {
            http: manager.http().clone(),
            base_url: config.api_url.clone(),
            user_id: identity.user_id,
            credentials: RwLock::new(Credentials {
                access_token: identity.access_token,
                refresh_token: identity.refresh_token,
            }),
            refresh_gate: Mutex::new(()),
            manager,
        }
    }

    /// Rebuilds a client for `user_id` from the token store.
    ///
    /// Returns `Ok(None)` when no record exists or when the stored token is
    /// (nearly) expired and cannot be refreshed. Both mean the user has to sign
    /// in again.
    pub async fn create(
        user_id: &str,
        config: &Config,
        manager: Arc<TokenManager>,
    ) -> Result<Option<Self>> {
        let Some(record) = manager.store().get(user_id).await? else {
            return Ok(None);
        };

        let mut identity = SessionIdentity {
            user_id: user_id.to_string(),
            access_token: record.access_token,
            refresh_token: record.refresh_token,
        };

        let skew_ms = config.refresh_skew.as_millis() as i64;
        if record.expires_at <= utils::now_millis() + skew_ms {
            match manager.refresh_for(user_id, &identity.refresh_token).await {
                Ok(refreshed) => {
                    identity.access_token = refreshed.access_token;
                    identity.refresh_token = refreshed.refresh_token;
                }
                Err(Error::Refresh(e)) => {
                    log::warn!("Stored token for user {} cannot be renewed: {}", user_id, e);
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Some(Self::new(identity, config, manager)))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Snapshot of the tokens this client currently uses.
    pub async fn identity(&self) -> SessionIdentity {
        let creds = self.credentials.read().await;
        SessionIdentity {
            user_id: self.user_id.clone(),
            access_token: creds.access_token.clone(),
            refresh_token: creds.refresh_token.clone(),
        }
    }

    /// Executes one authenticated call against the resource API.
    ///
    /// A `204 No Content` or empty body yields `Ok(None)`. A 401 triggers exactly
    /// one refresh and one retry; a failed refresh is returned as
    /// [`Error::Refresh`] and a second 401 as [`Error::Api`].
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<Option<T>> {
        let mut attempt = Attempt::Initial;

        loop {
            let token = self.credentials.read().await.access_token.clone();
            let response = self.send(method.clone(), endpoint, options, &token).await?;

            if response.status() == StatusCode::UNAUTHORIZED && attempt == Attempt::Initial {
                log::debug!("{} {} answered 401, refreshing", method, endpoint);
                self.refresh_after_unauthorized(&token).await?;
                attempt = Attempt::Retry;
                continue;
            }

            return read_body(response).await;
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<T>> {
        self.request(Method::GET, endpoint, &options).await
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        options: &RequestOptions,
        token: &str,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut builder = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .headers(options.headers.clone());

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    async fn refresh_after_unauthorized(&self, stale_access_token: &str) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;

        let refresh_token = {
            let creds = self.credentials.read().await;
            if creds.access_token != stale_access_token {
                // another request refreshed while we waited for the gate
                return Ok(());
            }
            creds.refresh_token.clone()
        };

        let refreshed = self
            .manager
            .refresh_for(&self.user_id, &refresh_token)
            .await?;

        let mut creds = self.credentials.write().await;
        creds.access_token = refreshed.access_token;
        creds.refresh_token = refreshed.refresh_token;
        Ok(())
    }
}

async fn read_body<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ApiError::from_status(status).into());
    }
    if response.content_length() == Some(0) {
        return Ok(None);
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_slice(&bytes)?))
}
