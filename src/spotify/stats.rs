use crate::{
    error::Result,
    types::{TimeRangeOptions, TopArtists, TopItem, TopItemKind, TopItems, TopTracks},
};

use super::{RequestOptions, SpotifyClient};

impl SpotifyClient {
    /// The user's top artists or tracks, as a mixed list.
    pub async fn top_items(
        &self,
        kind: TopItemKind,
        options: TimeRangeOptions,
    ) -> Result<Option<TopItems>> {
        let endpoint = format!("/me/top/{kind}", kind = kind);
        self.get(
            &endpoint,
            RequestOptions::new()
                .query("time_range", options.time_range)
                .query("limit", options.limit),
        )
        .await
    }

    pub async fn top_artists(&self, options: TimeRangeOptions) -> Result<Option<TopArtists>> {
        let page = self.top_items(TopItemKind::Artists, options).await?;
        Ok(page.map(|p| {
            p.narrow(|item| match item {
                TopItem::Artist(artist) => Some(artist),
                TopItem::Track(_) => None,
            })
        }))
    }

    pub async fn top_tracks(&self, options: TimeRangeOptions) -> Result<Option<TopTracks>> {
        let page = self.top_items(TopItemKind::Tracks, options).await?;
        Ok(page.map(|p| {
            p.narrow(|item| match item {
                TopItem::Track(track) => Some(track),
                TopItem::Artist(_) => None,
            })
        }))
    }
}
