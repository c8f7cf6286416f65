use tabled::Table;

use crate::{
    error::Result,
    info,
    spotify::SpotifyClient,
    types::{CurrentlyPlaying, HistoryTableRow},
    utils, warning,
};

use super::{
    Context,
    context::{fail, fetch},
};

pub async fn now_playing(ctx: &Context, watch: bool) {
    let client = ctx.client().await;

    if !watch {
        let playing = fetch("Fetching current playback...", client.currently_playing()).await;
        show_now_playing(playing);
        return;
    }

    let mut interval = tokio::time::interval(ctx.config.poll_interval);
    loop {
        interval.tick().await;
        match watch_tick(&client).await {
            Ok(playing) => show_now_playing(playing),
            Err(e) => warning!("Could not fetch playback, retrying. Err: {}", e),
        }
    }
}

/// One poll of the watch loop.
///
/// Only a terminal error ends the program; anything else is handed back so the
/// loop can report it and try again on the next tick.
async fn watch_tick(client: &SpotifyClient) -> Result<Option<CurrentlyPlaying>> {
    match client.currently_playing().await {
        Err(e) if e.is_terminal() => fail(e),
        other => other,
    }
}

fn show_now_playing(playing: Option<CurrentlyPlaying>) {
    match playing {
        Some(CurrentlyPlaying {
            item: Some(track),
            is_playing,
            progress_ms,
            ..
        }) => {
            let state = if is_playing { "Playing" } else { "Paused" };
            info!(
                "{}: {} - {} [{} / {}]",
                state,
                track.artist_names(),
                track.name,
                utils::format_duration(progress_ms.unwrap_or(0)),
                utils::format_duration(track.duration_ms)
            );
        }
        _ => warning!("Nothing is playing right now."),
    }
}

pub async fn recent(ctx: &Context, limit: u32) {
    let client = ctx.client().await;
    let Some(history) = fetch(
        "Fetching recently played tracks...",
        client.recently_played(limit),
    )
    .await
    else {
        warning!("No listening history yet.");
        return;
    };

    let rows: Vec<HistoryTableRow> = history
        .items
        .iter()
        .map(|h| HistoryTableRow {
            played_at: h.played_at.format("%Y-%m-%d %H:%M").to_string(),
            name: utils::truncate(&h.track.name, 40),
            artists: utils::truncate(&h.track.artist_names(), 40),
        })
        .collect();

    println!("{}", Table::new(rows));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        config::Config,
        error::Error,
        management::{MemoryTokenStore, TokenManager},
        types::SessionIdentity,
    };

    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> SpotifyClient {
        let config = Config::new("id", "secret")
            .with_api_url(server.url())
            .with_token_url(format!("{}/api/token", server.url()));
        let manager = Arc::new(TokenManager::new(&config, Arc::new(MemoryTokenStore::new())).unwrap());
        SpotifyClient::new(
            SessionIdentity {
                user_id: "watcher".to_string(),
                access_token: "a1".to_string(),
                refresh_token: "r1".to_string(),
            },
            &config,
            manager,
        )
    }

    #[tokio::test]
    async fn test_watch_tick_survives_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let client = client_for(&server);

        let outage = server
            .mock("GET", "/me/player/currently-playing")
            .with_status(503)
            .create_async()
            .await;

        let err = watch_tick(&client).await.unwrap_err();
        assert!(matches!(err, Error::Api(ref api) if api.status == 503));
        assert!(!err.is_terminal());
        outage.remove_async().await;

        let _idle = server
            .mock("GET", "/me/player/currently-playing")
            .with_status(204)
            .create_async()
            .await;

        assert_eq!(watch_tick(&client).await.unwrap(), None);
    }
}
