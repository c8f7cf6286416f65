use tabled::Table;

use crate::{
    info,
    types::{ArtistTableRow, PlaylistTableRow, SearchType, TrackTableRow},
    utils, warning,
};

use super::{Context, context::fetch};

pub async fn search(ctx: &Context, query: &str, types: &[SearchType], limit: u32) {
    if query.trim().is_empty() {
        warning!("Nothing to search for.");
        return;
    }

    let client = ctx.client().await;
    let Some(results) = fetch("Searching...", client.search(query, types, limit)).await else {
        warning!("No results for \"{}\".", query);
        return;
    };

    if let Some(tracks) = results.tracks.filter(|p| !p.items.is_empty()) {
        info!("Tracks ({} total)", tracks.total);
        let rows: Vec<TrackTableRow> = tracks
            .items
            .iter()
            .enumerate()
            .map(|(i, t)| TrackTableRow {
                rank: i + 1,
                name: utils::truncate(&t.name, 40),
                artists: utils::truncate(&t.artist_names(), 40),
                length: utils::format_duration(t.duration_ms),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    if let Some(artists) = results.artists.filter(|p| !p.items.is_empty()) {
        info!("Artists ({} total)", artists.total);
        let rows: Vec<ArtistTableRow> = artists
            .items
            .iter()
            .enumerate()
            .map(|(i, a)| ArtistTableRow {
                rank: i + 1,
                name: a.name.clone(),
                genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
                popularity: a.popularity.map(|p| p.to_string()).unwrap_or_default(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    if let Some(albums) = results.albums.filter(|p| !p.items.is_empty()) {
        info!("Albums ({} total)", albums.total);
        for album in &albums.items {
            let artists = album
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "  {} - {} ({})",
                album.name,
                artists,
                album.release_date.as_deref().unwrap_or("?")
            );
        }
    }

    if let Some(playlists) = results.playlists {
        let rows: Vec<PlaylistTableRow> = playlists
            .items
            .into_iter()
            .flatten()
            .map(|p| PlaylistTableRow {
                id: p.id,
                name: utils::truncate(&p.name, 40),
                owner: p.owner.display_name.unwrap_or(p.owner.id),
                tracks: p.tracks.total,
            })
            .collect();
        if !rows.is_empty() {
            info!("Playlists ({} total)", playlists.total);
            println!("{}", Table::new(rows));
        }
    }
}
