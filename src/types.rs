use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Persisted token pair for one user. Times are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub last_updated: i64,
}

/// The minimal triple needed to construct a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Response of the authorization endpoint for both the code and refresh grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Outcome of a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    /// Epoch milliseconds.
    pub access_token_expires: i64,
    pub refresh_token: String,
}

impl From<&TokenRecord> for RefreshedToken {
    fn from(record: &TokenRecord) -> Self {
        Self {
            access_token: record.access_token.clone(),
            access_token_expires: record.expires_at,
            refresh_token: record.refresh_token.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PkceState {
    pub code_verifier: String,
    pub state: String,
    pub grant: Option<TokenResponse>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub followers: Option<Followers>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// A playable item. Local files carry no id, so most fields are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub album: Option<Album>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Track {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackContext {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub context: Option<PlaybackContext>,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub item: Option<Track>,
    #[serde(default)]
    pub currently_playing_type: String,
    #[serde(default)]
    pub is_playing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
    pub played_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub context: Option<PlaybackContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub cursors: Option<Cursors>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub href: String,
}

pub type RecentlyPlayed = CursorPage<PlayHistory>;

/// Offset-paginated list, the common envelope of most list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Page<T> {
    /// Keeps the pagination metadata and converts the items, dropping those
    /// `f` rejects.
    pub fn narrow<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> Option<U>,
    {
        Page {
            items: self.items.into_iter().filter_map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
            href: self.href,
            next: self.next,
            previous: self.previous,
        }
    }
}

/// An entry of the top-items list before it is narrowed to one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TopItem {
    Artist(Artist),
    Track(Track),
}

pub type TopItems = Page<TopItem>;
pub type TopArtists = Page<Artist>;
pub type TopTracks = Page<Track>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TimeRange {
    /// Roughly the last four weeks
    #[value(name = "short")]
    ShortTerm,
    /// Roughly the last six months
    #[default]
    #[value(name = "medium")]
    MediumTerm,
    /// Several years of data
    #[value(name = "long")]
    LongTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "Last 4 weeks",
            TimeRange::MediumTerm => "Last 6 months",
            TimeRange::LongTerm => "All time",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRangeOptions {
    pub time_range: TimeRange,
    pub limit: u32,
}

impl Default for TimeRangeOptions {
    fn default() -> Self {
        Self {
            time_range: TimeRange::MediumTerm,
            limit: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TopItemKind {
    Artists,
    Tracks,
}

impl fmt::Display for TopItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopItemKind::Artists => f.write_str("artists"),
            TopItemKind::Tracks => f.write_str("tracks"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SearchType {
    Track,
    Album,
    Artist,
    Playlist,
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchType::Track => f.write_str("track"),
            SearchType::Album => f.write_str("album"),
            SearchType::Artist => f.write_str("artist"),
            SearchType::Playlist => f.write_str("playlist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub tracks: PlaylistTracksRef,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

pub type Playlists = Page<SimplifiedPlaylist>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedBy {
    pub id: String,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub added_by: Option<AddedBy>,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    pub owner: PlaylistOwner,
    pub tracks: Page<PlaylistTrack>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// Result of a multi-type search. Only the requested types are present.
///
/// Playlist results may contain `null` entries, hence the optional items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub tracks: Option<Page<Track>>,
    #[serde(default)]
    pub albums: Option<Page<Album>>,
    #[serde(default)]
    pub artists: Option<Page<Artist>>,
    #[serde(default)]
    pub playlists: Option<Page<Option<SimplifiedPlaylist>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub followers: Option<Followers>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub name: String,
    pub artists: String,
    pub length: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub name: String,
    pub genres: String,
    pub popularity: String,
}

#[derive(Tabled)]
pub struct HistoryTableRow {
    pub played_at: String,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub tracks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_items_narrow_to_artists() {
        let json = r#"{
            "items": [
                {"type": "artist", "id": "a1", "name": "Robyn", "uri": "spotify:artist:a1", "genres": ["pop"]},
                {"type": "track", "id": "t1", "name": "Dancing On My Own", "duration_ms": 281000}
            ],
            "total": 2, "limit": 5, "offset": 0, "href": "x", "next": null, "previous": null
        }"#;

        let page: TopItems = serde_json::from_str(json).unwrap();
        let artists: TopArtists = page.narrow(|item| match item {
            TopItem::Artist(a) => Some(a),
            TopItem::Track(_) => None,
        });

        assert_eq!(artists.items.len(), 1);
        assert_eq!(artists.items[0].name, "Robyn");
        assert_eq!(artists.total, 2);
        assert_eq!(artists.limit, 5);
    }

    #[test]
    fn test_currently_playing_with_context() {
        let json = r#"{
            "timestamp": 1700000000000,
            "context": {"type": "playlist", "uri": "spotify:playlist:p"},
            "progress_ms": 1000,
            "item": {"id": "t1", "name": "Song", "duration_ms": 200000,
                     "artists": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}]},
            "currently_playing_type": "track",
            "is_playing": true
        }"#;

        let playing: CurrentlyPlaying = serde_json::from_str(json).unwrap();
        assert!(playing.is_playing);
        assert_eq!(playing.context.unwrap().kind, "playlist");
        assert_eq!(playing.item.unwrap().artist_names(), "A, B");
    }

    #[test]
    fn test_search_results_with_null_playlist_entries() {
        let json = r#"{
            "playlists": {"href": "h", "total": 2, "items": [null,
                {"id": "p1", "name": "Mix", "owner": {"id": "u"}, "images": null}]}
        }"#;

        let results: SearchResults = serde_json::from_str(json).unwrap();
        assert!(results.tracks.is_none());
        let playlists = results.playlists.unwrap();
        assert_eq!(playlists.items.iter().flatten().count(), 1);
    }

    #[test]
    fn test_token_record_serializes_snake_case() {
        let record = TokenRecord {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: 10,
            last_updated: 5,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["expires_at"], 10);
        assert_eq!(value["last_updated"], 5);
    }

    #[test]
    fn test_time_range_wire_names() {
        assert_eq!(TimeRange::ShortTerm.to_string(), "short_term");
        assert_eq!(TimeRange::default(), TimeRange::MediumTerm);
        assert_eq!(TimeRangeOptions::default().limit, 20);
    }
}
