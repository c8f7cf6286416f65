use tabled::Table;

use crate::{
    info,
    types::{PlaylistTableRow, TrackTableRow},
    utils, warning,
};

use super::{Context, context::fetch};

pub async fn playlists(ctx: &Context, limit: u32) {
    let client = ctx.client().await;
    let Some(page) = fetch("Fetching playlists...", client.user_playlists(limit)).await else {
        warning!("No playlists found.");
        return;
    };

    info!("Showing {} of {} playlists", page.items.len(), page.total);
    let rows: Vec<PlaylistTableRow> = page
        .items
        .into_iter()
        .map(|p| PlaylistTableRow {
            id: p.id,
            name: utils::truncate(&p.name, 40),
            owner: p.owner.display_name.unwrap_or(p.owner.id),
            tracks: p.tracks.total,
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub async fn playlist(ctx: &Context, playlist_id: &str) {
    let client = ctx.client().await;
    let Some(playlist) = fetch("Fetching playlist...", client.playlist(playlist_id)).await else {
        warning!("Playlist {} returned no content.", playlist_id);
        return;
    };

    info!(
        "{} by {} ({} tracks)",
        playlist.name,
        playlist
            .owner
            .display_name
            .as_deref()
            .unwrap_or(&playlist.owner.id),
        playlist.tracks.total
    );
    if let Some(description) = playlist.description.as_deref().filter(|d| !d.is_empty()) {
        info!("{}", description);
    }

    let rows: Vec<TrackTableRow> = playlist
        .tracks
        .items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            rank: playlist.tracks.offset as usize + i + 1,
            name: utils::truncate(&t.name, 40),
            artists: utils::truncate(&t.artist_names(), 40),
            length: utils::format_duration(t.duration_ms),
        })
        .collect();

    println!("{}", Table::new(rows));
}
