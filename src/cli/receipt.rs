use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    types::{Artist, TimeRange, TimeRangeOptions, TopItemKind, Track},
    utils, warning,
};

use super::{Context, context::fetch};

const WIDTH: usize = 42;

/// Text rendition of the top-items receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub lines: Vec<ReceiptLine>,
    pub total: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub rank: usize,
    pub name: String,
    pub detail: String,
    pub amount: String,
}

impl Receipt {
    pub fn for_tracks(tracks: &[Track], range: TimeRange, now: DateTime<Utc>) -> Self {
        let total_ms: u64 = tracks.iter().map(|t| t.duration_ms).sum();
        Self {
            title: "SPOTIFY RECEIPT".to_string(),
            subtitle: format!("TOP TRACKS - {}", range.label().to_uppercase()),
            date: utils::format_receipt_date(now),
            lines: tracks
                .iter()
                .enumerate()
                .map(|(i, t)| ReceiptLine {
                    rank: i + 1,
                    name: t.name.clone(),
                    detail: t.artist_names(),
                    amount: utils::format_duration(t.duration_ms),
                })
                .collect(),
            total: Some(utils::format_duration(total_ms)),
        }
    }

    pub fn for_artists(artists: &[Artist], range: TimeRange, now: DateTime<Utc>) -> Self {
        Self {
            title: "SPOTIFY RECEIPT".to_string(),
            subtitle: format!("TOP ARTISTS - {}", range.label().to_uppercase()),
            date: utils::format_receipt_date(now),
            lines: artists
                .iter()
                .enumerate()
                .map(|(i, a)| ReceiptLine {
                    rank: i + 1,
                    name: a.name.clone(),
                    detail: a.genres.first().cloned().unwrap_or_default(),
                    amount: a.popularity.map(|p| p.to_string()).unwrap_or_default(),
                })
                .collect(),
            total: None,
        }
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(WIDTH);
        writeln!(f, "{:^width$}", self.title, width = WIDTH)?;
        writeln!(f, "{:^width$}", self.subtitle, width = WIDTH)?;
        writeln!(f, "{:^width$}", self.date, width = WIDTH)?;
        writeln!(f, "{}", rule)?;

        for line in &self.lines {
            let label = format!("{:>2}. {}", line.rank, line.name);
            let room = WIDTH.saturating_sub(line.amount.chars().count() + 1);
            writeln!(
                f,
                "{:<room$} {}",
                utils::truncate(&label, room),
                line.amount,
                room = room
            )?;
            if !line.detail.is_empty() {
                writeln!(f, "    {}", utils::truncate(&line.detail, WIDTH - 4))?;
            }
        }

        writeln!(f, "{}", rule)?;
        if let Some(total) = &self.total {
            writeln!(f, "{:<room$} {}", "TOTAL", total, room = WIDTH - total.len() - 1)?;
        }
        write!(f, "{:^width$}", "THANK YOU FOR LISTENING!", width = WIDTH)
    }
}

pub async fn receipt(ctx: &Context, kind: TopItemKind, range: TimeRange, limit: u32) {
    let client = ctx.client().await;
    let options = TimeRangeOptions {
        time_range: range,
        limit,
    };

    let receipt = match kind {
        TopItemKind::Tracks => fetch("Fetching top tracks...", client.top_tracks(options))
            .await
            .map(|page| Receipt::for_tracks(&page.items, range, Utc::now())),
        TopItemKind::Artists => fetch("Fetching top artists...", client.top_artists(options))
            .await
            .map(|page| Receipt::for_artists(&page.items, range, Utc::now())),
    };

    match receipt {
        Some(r) if !r.lines.is_empty() => println!("{}", r),
        _ => warning!("Not enough listening data for a receipt."),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn track(name: &str, ms: u64) -> Track {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "duration_ms": ms,
            "artists": [{"name": "Artist"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_track_receipt_totals_duration() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        let receipt = Receipt::for_tracks(
            &[track("One", 61_000), track("Two", 120_000)],
            TimeRange::ShortTerm,
            now,
        );

        assert_eq!(receipt.date, "07/03/2024");
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.lines[0].amount, "1:01");
        assert_eq!(receipt.total.as_deref(), Some("3:01"));
        assert!(receipt.subtitle.contains("LAST 4 WEEKS"));
    }

    #[test]
    fn test_rendered_receipt_lines_fit_width() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let long_name = "A track title that is far too long to fit on one receipt line";
        let receipt = Receipt::for_tracks(&[track(long_name, 200_000)], TimeRange::LongTerm, now);

        let rendered = receipt.to_string();
        assert!(rendered.contains("TOTAL"));
        assert!(rendered.lines().all(|l| l.chars().count() <= WIDTH));
    }

    #[test]
    fn test_artist_receipt_has_no_total() {
        let artist: Artist = serde_json::from_value(serde_json::json!({
            "name": "Robyn", "genres": ["swedish pop"], "popularity": 70
        }))
        .unwrap();

        let receipt = Receipt::for_artists(&[artist], TimeRange::MediumTerm, Utc::now());
        assert_eq!(receipt.total, None);
        assert_eq!(receipt.lines[0].detail, "swedish pop");
        assert_eq!(receipt.lines[0].amount, "70");
    }
}
