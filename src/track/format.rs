use crate::error::{BotError, single_line};
use crate::track::metadata::{ChartTrend, TrackMetadata};
use chrono::DateTime;
use teloxide::utils::html::escape;

/// Placeholder for any attribute the provider did not return
pub const UNKNOWN: &str = "unknown";

/// Similar tracks shown in the extended view
const SIMILAR_SHOWN: usize = 3;

const YES: &str = "✅";
const NO: &str = "❌";

/// Render seconds as `M:SS`; minutes are never rolled into hours.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// One-line error reply shared by both detail levels
pub fn format_error(error: &BotError) -> String {
    escape(&single_line(&format!("❌ {}", error)))
}

/// Basic view: title, artists and duration
pub fn format_basic(result: &Result<TrackMetadata, BotError>) -> String {
    let info = match result {
        Ok(info) => info,
        Err(e) => return format_error(e),
    };

    format!(
        "🎵 <b>{}</b>\n👤 <b>Artist</b>: {}\n⏱ <b>Duration</b>: {}\n",
        title(info),
        artists(info),
        duration(info),
    )
}

/// Short caption used when the full text does not fit under a photo
pub fn format_caption(info: &TrackMetadata) -> String {
    format!(
        "🎵 <b>{}</b>\n👤 <b>Artist</b>: {}",
        title(info),
        artists(info)
    )
}

/// Extended view with every section the provider returned
///
/// Sections without data are left out entirely.
pub fn format_extended(result: &Result<TrackMetadata, BotError>) -> String {
    let info = match result {
        Ok(info) => info,
        Err(e) => return format_error(e),
    };

    let mut text = format!("🎵 <b>{}</b>\n\n", title(info));

    text.push_str("📋 <b>Main info</b>\n");
    text.push_str(&format!("   👤 <b>Artist</b>: {}\n", artists(info)));
    text.push_str(&format!(
        "   💿 <b>Album</b>: {}\n",
        or_unknown(info.album.as_deref())
    ));
    text.push_str(&format!(
        "   📅 <b>Year</b>: {}\n",
        info.year.map(|y| y.to_string()).unwrap_or_else(|| UNKNOWN.to_string())
    ));
    text.push_str(&format!("   ⏱ <b>Duration</b>: {}\n", duration(info)));
    text.push_str(&format!(
        "   🎭 <b>Genre</b>: {}\n\n",
        or_unknown(info.genre.as_deref())
    ));

    if !info.artist_details.is_empty() {
        text.push_str("👥 <b>Artists</b>\n");
        for artist in &info.artist_details {
            text.push_str(&format!("   • <b>{}</b>\n", or_unknown(Some(artist.name.as_str()))));
            if !artist.genres.is_empty() {
                text.push_str(&format!("     Genres: {}\n", escape(&artist.genres.join(", "))));
            }
            if let Some(count) = artist.tracks_count {
                text.push_str(&format!("     Tracks: {}\n", count));
            }
            if let Some(count) = artist.albums_count {
                text.push_str(&format!("     Albums: {}\n", count));
            }
        }
        text.push('\n');
    }

    if let Some(album) = &info.album_details {
        text.push_str("💿 <b>Album details</b>\n");
        text.push_str(&format!("   Tracks: {}\n", album.tracks_count));
        text.push_str(&format!(
            "   Release date: {}\n",
            album
                .release_date
                .as_deref()
                .map(release_date)
                .unwrap_or_else(|| UNKNOWN.to_string())
        ));
        text.push_str(&format!(
            "   Label: {}\n\n",
            or_unknown(album.label.as_deref())
        ));
    }

    let availability = &info.availability;
    text.push_str("🔧 <b>Technical info</b>\n");
    text.push_str(&format!("   Available: {}\n", flag(availability.available)));
    text.push_str(&format!(
        "   Available for premium: {}\n",
        flag(availability.available_for_premium_users)
    ));
    text.push_str(&format!("   Lyrics: {}\n", flag(availability.lyrics_available)));
    text.push_str(&format!(
        "   File size: {}\n",
        info.file_size_bytes
            .map(|bytes| format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0))
            .unwrap_or_else(|| UNKNOWN.to_string())
    ));
    text.push_str(&format!("   Explicit: {}\n", flag(info.explicit)));
    if let Some(version) = &info.version {
        text.push_str(&format!("   Version: {}\n", escape(version)));
    }
    if let Some(warning) = &info.content_warning {
        text.push_str(&format!("   Content warning: {}\n", escape(warning)));
    }
    if let Some(label) = &info.label {
        text.push_str(&format!("   Label: {}\n", escape(label)));
    }
    text.push_str(&format!(
        "   Track in album: {}\n\n",
        info.track_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    ));

    if !info.similar_tracks.is_empty() {
        text.push_str("🎶 <b>Similar tracks</b>\n");
        for (i, similar) in info.similar_tracks.iter().take(SIMILAR_SHOWN).enumerate() {
            text.push_str(&format!(
                "   {}. {} - {}\n",
                i + 1,
                or_unknown(Some(similar.title.as_str())),
                or_unknown(Some(similar.artists.as_str()))
            ));
        }
        text.push('\n');
    }

    if !info.chart_positions.is_empty() {
        text.push_str("🏆 <b>Chart positions</b>\n");
        for entry in &info.chart_positions {
            text.push_str(&format!(
                "   {}Position: {}",
                trend_marker(entry.trend),
                entry.position
            ));
            if let Some(listeners) = entry.listener_count.filter(|n| *n > 0) {
                text.push_str(&format!(" (👂 {})", listeners));
            }
            text.push('\n');
        }
    }

    // Attribute values are double-quoted; `escape` leaves single quotes alone
    if let Some(cover_url) = &info.cover_url {
        text.push_str(&format!(
            "\n🖼 <a href=\"{}\">Album cover</a>",
            escape(cover_url)
        ));
    }

    text.push_str(&format!(
        "\n🎧 <a href=\"https://music.yandex.ru/track/{}\">Listen on Yandex Music</a>",
        escape(&info.track_id)
    ));

    text
}

fn title(info: &TrackMetadata) -> String {
    or_unknown(info.title.as_deref())
}

fn artists(info: &TrackMetadata) -> String {
    let names: Vec<&str> = info
        .artists
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        UNKNOWN.to_string()
    } else {
        escape(&names.join(", "))
    }
}

fn duration(info: &TrackMetadata) -> String {
    info.duration_seconds
        .map(format_duration)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn or_unknown(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => escape(value),
        _ => UNKNOWN.to_string(),
    }
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => YES,
        Some(false) => NO,
        None => UNKNOWN,
    }
}

fn trend_marker(trend: ChartTrend) -> &'static str {
    match trend {
        ChartTrend::Up => "🔺 ",
        ChartTrend::Down => "🔻 ",
        ChartTrend::New => "🆕 ",
        ChartTrend::Other => "",
    }
}

/// `2020-05-01T00:00:00+03:00` becomes `2020-05-01`; anything else is shown as is.
fn release_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| escape(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::metadata::{
        AlbumDetail, ArtistDetail, Availability, ChartPosition, SimilarTrack,
    };

    fn song() -> TrackMetadata {
        TrackMetadata {
            track_id: "42".to_string(),
            title: Some("Song".to_string()),
            artists: vec!["A".to_string(), "B".to_string()],
            duration_seconds: Some(185),
            ..TrackMetadata::default()
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(60), "1:00");
        assert_eq!(format_duration(125), "2:05");
        assert_eq!(format_duration(3600), "60:00");
    }

    #[test]
    fn test_format_basic() {
        assert_eq!(
            format_basic(&Ok(song())),
            "🎵 <b>Song</b>\n👤 <b>Artist</b>: A, B\n⏱ <b>Duration</b>: 3:05\n"
        );
    }

    #[test]
    fn test_format_basic_missing_fields() {
        let text = format_basic(&Ok(TrackMetadata::default()));
        assert_eq!(
            text,
            "🎵 <b>unknown</b>\n👤 <b>Artist</b>: unknown\n⏱ <b>Duration</b>: unknown\n"
        );
    }

    #[test]
    fn test_format_basic_blank_artist_names() {
        let info = TrackMetadata {
            artists: vec!["".to_string(), "  ".to_string()],
            ..song()
        };
        assert!(format_basic(&Ok(info)).contains("👤 <b>Artist</b>: unknown\n"));

        let info = TrackMetadata {
            artists: vec!["A".to_string(), " ".to_string(), "B".to_string()],
            ..song()
        };
        assert!(format_basic(&Ok(info)).contains("👤 <b>Artist</b>: A, B\n"));
    }

    #[test]
    fn test_format_extended_quotes_link_attributes() {
        let info = TrackMetadata {
            cover_url: Some("https://avatars.yandex.net/x'y/400x400".to_string()),
            ..song()
        };
        let text = format_extended(&Ok(info));
        assert!(text.contains("<a href=\"https://avatars.yandex.net/x'y/400x400\">"));
        assert!(!text.contains("href='"));
    }

    #[test]
    fn test_format_basic_escapes_html() {
        let info = TrackMetadata {
            title: Some("<Rock & Roll>".to_string()),
            ..song()
        };
        assert!(format_basic(&Ok(info)).starts_with("🎵 <b>&lt;Rock &amp; Roll&gt;</b>\n"));
    }

    #[test]
    fn test_format_error_single_line() {
        let err: Result<TrackMetadata, BotError> =
            Err(BotError::Provider("timeout\nretry later".to_string()));

        for text in [format_basic(&err), format_extended(&err)] {
            assert_eq!(
                text,
                "❌ Failed to fetch track info: timeout retry later"
            );
        }
    }

    #[test]
    fn test_format_extended_minimal() {
        let text = format_extended(&Ok(TrackMetadata::default()));

        assert!(text.starts_with("🎵 <b>unknown</b>\n\n📋 <b>Main info</b>\n"));
        assert!(text.contains("   💿 <b>Album</b>: unknown\n"));
        assert!(text.contains("   Available: unknown\n"));
        assert!(!text.contains("Artists</b>"));
        assert!(!text.contains("Album details"));
        assert!(!text.contains("Similar tracks"));
        assert!(!text.contains("Chart positions"));
        assert!(!text.contains("Album cover"));
        assert!(text.ends_with("'>Listen on Yandex Music</a>"));
    }

    #[test]
    fn test_format_extended_full() {
        let info = TrackMetadata {
            album: Some("Album".to_string()),
            year: Some(2020),
            genre: Some("pop".to_string()),
            cover_url: Some("https://avatars.yandex.net/x/400x400".to_string()),
            availability: Availability {
                available: Some(true),
                available_for_premium_users: Some(true),
                lyrics_available: Some(false),
            },
            file_size_bytes: Some(3 * 1024 * 1024),
            explicit: Some(false),
            version: Some("Remix".to_string()),
            track_number: Some(3),
            artist_details: vec![
                ArtistDetail {
                    name: "A".to_string(),
                    genres: vec!["pop".to_string(), "dance".to_string()],
                    tracks_count: Some(100),
                    albums_count: Some(7),
                },
                ArtistDetail::name_only("B"),
            ],
            album_details: Some(AlbumDetail {
                tracks_count: 12,
                release_date: Some("2020-05-01T00:00:00+03:00".to_string()),
                label: None,
            }),
            ..song()
        };

        let text = format_extended(&Ok(info));

        assert!(text.contains("   📅 <b>Year</b>: 2020\n"));
        assert!(text.contains("   ⏱ <b>Duration</b>: 3:05\n"));
        assert!(text.contains(
            "   • <b>A</b>\n     Genres: pop, dance\n     Tracks: 100\n     Albums: 7\n   • <b>B</b>\n\n"
        ));
        assert!(text.contains(
            "💿 <b>Album details</b>\n   Tracks: 12\n   Release date: 2020-05-01\n   Label: unknown\n"
        ));
        assert!(text.contains("   Available: ✅\n   Available for premium: ✅\n   Lyrics: ❌\n"));
        assert!(text.contains("   File size: 3.00 MB\n"));
        assert!(text.contains("   Explicit: ❌\n   Version: Remix\n"));
        assert!(text.contains("   Track in album: 3\n"));
        assert!(text.contains(
            "\n🖼 <a href=\"https://avatars.yandex.net/x/400x400\">Album cover</a>"
        ));
        assert!(text.ends_with(
            "\n🎧 <a href=\"https://music.yandex.ru/track/42\">Listen on Yandex Music</a>"
        ));
    }

    #[test]
    fn test_format_extended_sections_in_order() {
        let info = TrackMetadata {
            artist_details: vec![ArtistDetail::name_only("A")],
            album_details: Some(AlbumDetail::default()),
            similar_tracks: vec![SimilarTrack {
                title: "S".to_string(),
                artists: "X".to_string(),
            }],
            chart_positions: vec![ChartPosition {
                position: 1,
                trend: ChartTrend::New,
                listener_count: None,
            }],
            cover_url: Some("https://cover".to_string()),
            ..song()
        };

        let text = format_extended(&Ok(info));
        let order = [
            "Main info",
            "<b>Artists</b>",
            "Album details",
            "Technical info",
            "Similar tracks",
            "Chart positions",
            "Album cover",
            "Listen on Yandex Music",
        ];
        let positions: Vec<usize> = order.iter().map(|s| text.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_format_extended_shows_three_similar_tracks() {
        let info = TrackMetadata {
            similar_tracks: (1..=5)
                .map(|i| SimilarTrack {
                    title: format!("Similar {}", i),
                    artists: "X".to_string(),
                })
                .collect(),
            ..song()
        };

        let text = format_extended(&Ok(info));

        assert!(text.contains("   1. Similar 1 - X\n   2. Similar 2 - X\n   3. Similar 3 - X\n"));
        assert!(!text.contains("Similar 4"));
        assert!(!text.contains("Similar 5"));
    }

    #[test]
    fn test_format_extended_chart_markers() {
        let entry = |trend, listener_count| ChartPosition {
            position: 10,
            trend,
            listener_count,
        };
        let info = TrackMetadata {
            chart_positions: vec![
                entry(ChartTrend::Up, Some(500)),
                entry(ChartTrend::Down, None),
                entry(ChartTrend::New, Some(0)),
                entry(ChartTrend::Other, None),
            ],
            ..song()
        };

        let text = format_extended(&Ok(info));

        assert!(text.contains(
            "🏆 <b>Chart positions</b>\n   🔺 Position: 10 (👂 500)\n   🔻 Position: 10\n   🆕 Position: 10\n   Position: 10\n"
        ));
    }

    #[test]
    fn test_release_date_passthrough() {
        assert_eq!(release_date("2020-05-01T00:00:00+03:00"), "2020-05-01");
        assert_eq!(release_date("spring 2020"), "spring 2020");
    }

    #[test]
    fn test_flag_glyphs() {
        assert_eq!(flag(Some(true)), YES);
        assert_eq!(flag(Some(false)), NO);
        assert_eq!(flag(None), UNKNOWN);
    }
}
