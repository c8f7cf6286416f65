use tabled::Table;

use crate::{
    info,
    types::{ArtistTableRow, TimeRange, TimeRangeOptions, TopItemKind, TrackTableRow},
    utils, warning,
};

use super::{Context, context::fetch};

pub async fn top(ctx: &Context, kind: TopItemKind, range: TimeRange, limit: u32) {
    let client = ctx.client().await;
    let options = TimeRangeOptions {
        time_range: range,
        limit,
    };

    match kind {
        TopItemKind::Artists => {
            let Some(page) = fetch("Fetching top artists...", client.top_artists(options)).await
            else {
                warning!("No top artists for this period.");
                return;
            };

            info!("Top artists - {}", range.label());
            let rows: Vec<ArtistTableRow> = page
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
        TopItemKind::Tracks => {
            let Some(page) = fetch("Fetching top tracks...", client.top_tracks(options)).await
            else {
                warning!("No top tracks for this period.");
                return;
            };

            info!("Top tracks - {}", range.label());
            let rows: Vec<TrackTableRow> = page
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
    }
}
