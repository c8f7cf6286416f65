use crate::{
    error::Result,
    types::{Playlist, Playlists},
};

use super::{RequestOptions, SpotifyClient};

impl SpotifyClient {
    /// Playlists owned or followed by the user, first page only.
    pub async fn user_playlists(&self, limit: u32) -> Result<Option<Playlists>> {
        self.get("/me/playlists", RequestOptions::new().query("limit", limit))
            .await
    }

    pub async fn playlist(&self, playlist_id: &str) -> Result<Option<Playlist>> {
        let endpoint = format!("/playlists/{id}", id = playlist_id);
        self.get(&endpoint, RequestOptions::new()).await
    }
}
