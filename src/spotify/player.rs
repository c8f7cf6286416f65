use crate::{
    error::Result,
    types::{CurrentlyPlaying, RecentlyPlayed},
};

use super::{RequestOptions, SpotifyClient};

impl SpotifyClient {
    /// What the user is listening to right now.
    ///
    /// Spotify answers `204 No Content` when nothing is playing, which comes
    /// back as `Ok(None)`.
    pub async fn currently_playing(&self) -> Result<Option<CurrentlyPlaying>> {
        self.get("/me/player/currently-playing", RequestOptions::new())
            .await
    }

    pub async fn recently_played(&self, limit: u32) -> Result<Option<RecentlyPlayed>> {
        self.get(
            "/me/player/recently-played",
            RequestOptions::new().query("limit", limit),
        )
        .await
    }
}
