use crate::{error::Result, types::UserProfile};

use super::{RequestOptions, SpotifyClient};

impl SpotifyClient {
    /// `GET /me`
    pub async fn profile(&self) -> Result<Option<UserProfile>> {
        self.get("/me", RequestOptions::new()).await
    }
}
