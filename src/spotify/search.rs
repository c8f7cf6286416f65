use crate::{
    error::Result,
    types::{SearchResults, SearchType},
};

use super::{RequestOptions, SpotifyClient};

const ALL_TYPES: [SearchType; 4] = [
    SearchType::Track,
    SearchType::Artist,
    SearchType::Album,
    SearchType::Playlist,
];

impl SpotifyClient {
    /// Searches the catalog. An empty `types` slice searches every type.
    pub async fn search(
        &self,
        query: &str,
        types: &[SearchType],
        limit: u32,
    ) -> Result<Option<SearchResults>> {
        let types = if types.is_empty() { &ALL_TYPES[..] } else { types };
        let type_param = types
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",");

        self.get(
            "/search",
            RequestOptions::new()
                .query("q", query)
                .query("type", type_param)
                .query("limit", limit),
        )
        .await
    }
}
