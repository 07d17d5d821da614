use crate::yandex::models::{Album, Artist, ChartInfo, Track};
use crate::yandex::parser::TrackReference;

/// Size requested when building cover image URLs
const COVER_SIZE: &str = "400x400";

/// Similar tracks kept from the provider response
pub const MAX_SIMILAR_TRACKS: usize = 5;

/// Everything the bot knows about a track
///
/// Every field may be missing because the upstream API omits attributes
/// freely; the formatters substitute placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub track_id: String,
    pub album_id: Option<String>,
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub duration_seconds: Option<u64>,
    pub album: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub cover_url: Option<String>,
    pub availability: Availability,
    pub file_size_bytes: Option<u64>,
    pub explicit: Option<bool>,
    pub version: Option<String>,
    pub content_warning: Option<String>,
    pub label: Option<String>,
    pub track_number: Option<u32>,
    pub artist_details: Vec<ArtistDetail>,
    pub album_details: Option<AlbumDetail>,
    pub similar_tracks: Vec<SimilarTrack>,
    pub chart_positions: Vec<ChartPosition>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Availability {
    pub available: Option<bool>,
    pub available_for_premium_users: Option<bool>,
    pub lyrics_available: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistDetail {
    pub name: String,
    pub genres: Vec<String>,
    pub tracks_count: Option<u32>,
    pub albums_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumDetail {
    pub tracks_count: u32,
    pub release_date: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarTrack {
    pub title: String,
    pub artists: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTrend {
    Up,
    Down,
    New,
    Other,
}

impl ChartTrend {
    pub fn parse(progress: &str) -> Self {
        match progress {
            "up" => ChartTrend::Up,
            "down" => ChartTrend::Down,
            "new" => ChartTrend::New,
            _ => ChartTrend::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPosition {
    pub position: u32,
    pub trend: ChartTrend,
    pub listener_count: Option<u64>,
}

impl ChartPosition {
    /// Entries the provider lists without a position are not shown
    pub fn from_chart(info: &ChartInfo) -> Option<Self> {
        Some(ChartPosition {
            position: info.position?,
            trend: info
                .progress
                .as_deref()
                .map(ChartTrend::parse)
                .unwrap_or(ChartTrend::Other),
            listener_count: info.listeners,
        })
    }
}

impl TrackMetadata {
    /// Map the basic track payload; extended sections stay empty.
    pub fn from_track(track_ref: &TrackReference, track: &Track) -> Self {
        let album = track.albums.first();

        TrackMetadata {
            track_id: track_ref.as_str().to_string(),
            album_id: album.and_then(|a| a.id.clone()),
            title: track.title.clone(),
            artists: artist_names(&track.artists),
            duration_seconds: track.duration_ms.map(|ms| ms / 1000),
            album: album.and_then(|a| a.title.clone()),
            year: album.and_then(|a| a.year),
            genre: album.and_then(|a| a.genre.clone()),
            cover_url: track
                .cover_uri
                .as_deref()
                .or_else(|| album.and_then(|a| a.cover_uri.as_deref()))
                .map(cover_url),
            availability: Availability {
                available: track.available,
                available_for_premium_users: track.available_for_premium_users,
                lyrics_available: track.lyrics_available,
            },
            // The API reports 0 when the size is not known
            file_size_bytes: track.file_size.filter(|size| *size > 0),
            explicit: track
                .content_warning
                .as_deref()
                .map(|warning| warning == "explicit"),
            version: track.version.clone().filter(|v| !v.is_empty()),
            content_warning: track.content_warning.clone(),
            label: track.major.as_ref().and_then(|m| m.name.clone()),
            track_number: album.and_then(|a| a.track_position).and_then(|p| p.index),
            ..TrackMetadata::default()
        }
    }
}

impl ArtistDetail {
    /// Detail for an artist whose lookup failed or was skipped
    pub fn name_only(name: &str) -> Self {
        ArtistDetail {
            name: name.to_string(),
            ..ArtistDetail::default()
        }
    }

    pub fn from_artist(name: &str, artist: &Artist) -> Self {
        let counts = artist.counts.as_ref();
        ArtistDetail {
            name: artist.name.clone().unwrap_or_else(|| name.to_string()),
            genres: artist.genres.clone(),
            tracks_count: counts.and_then(|c| c.tracks),
            albums_count: counts.and_then(|c| c.direct_albums),
        }
    }
}

impl From<&Album> for AlbumDetail {
    fn from(album: &Album) -> Self {
        let labels = album.label_names();
        AlbumDetail {
            tracks_count: album.total_tracks(),
            release_date: album.release_date.clone(),
            label: (!labels.is_empty()).then(|| labels.join(", ")),
        }
    }
}

impl From<&Track> for SimilarTrack {
    fn from(track: &Track) -> Self {
        SimilarTrack {
            title: track.title.clone().unwrap_or_default(),
            artists: artist_names(&track.artists).join(", "),
        }
    }
}

fn artist_names(artists: &[Artist]) -> Vec<String> {
    artists
        .iter()
        .filter_map(|a| a.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turn an `avatars.yandex.net/.../%%` template into a fetchable URL
pub fn cover_url(cover_uri: &str) -> String {
    format!("https://{}", cover_uri.replace("%%", COVER_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yandex::models::{Major, TrackPosition};

    fn sample_track() -> Track {
        Track {
            id: Some("42".to_string()),
            title: Some("Song".to_string()),
            artists: vec![
                Artist {
                    id: Some("1".to_string()),
                    name: Some("A".to_string()),
                    ..Artist::default()
                },
                Artist {
                    id: Some("2".to_string()),
                    name: Some("B".to_string()),
                    ..Artist::default()
                },
            ],
            albums: vec![Album {
                id: Some("100".to_string()),
                title: Some("Album".to_string()),
                year: Some(2020),
                genre: Some("pop".to_string()),
                cover_uri: Some("avatars.yandex.net/album/%%".to_string()),
                track_position: Some(TrackPosition {
                    volume: Some(1),
                    index: Some(3),
                }),
                ..Album::default()
            }],
            duration_ms: Some(185_999),
            file_size: Some(0),
            content_warning: Some("explicit".to_string()),
            major: Some(Major {
                name: Some("UNIVERSAL_MUSIC".to_string()),
            }),
            ..Track::default()
        }
    }

    #[test]
    fn test_from_track_maps_basic_fields() {
        let track_ref = TrackReference::parse("42").unwrap();
        let metadata = TrackMetadata::from_track(&track_ref, &sample_track());

        assert_eq!(metadata.track_id, "42");
        assert_eq!(metadata.album_id.as_deref(), Some("100"));
        assert_eq!(metadata.title.as_deref(), Some("Song"));
        assert_eq!(metadata.artists, vec!["A", "B"]);
        assert_eq!(metadata.duration_seconds, Some(185));
        assert_eq!(metadata.album.as_deref(), Some("Album"));
        assert_eq!(metadata.year, Some(2020));
        assert_eq!(metadata.track_number, Some(3));
        assert_eq!(metadata.explicit, Some(true));
        assert_eq!(metadata.label.as_deref(), Some("UNIVERSAL_MUSIC"));
        assert_eq!(metadata.file_size_bytes, None);
        assert!(metadata.similar_tracks.is_empty());
        assert!(metadata.album_details.is_none());
    }

    #[test]
    fn test_cover_falls_back_to_album() {
        let track_ref = TrackReference::parse("42").unwrap();
        let metadata = TrackMetadata::from_track(&track_ref, &sample_track());
        assert_eq!(
            metadata.cover_url.as_deref(),
            Some("https://avatars.yandex.net/album/400x400")
        );
    }

    #[test]
    fn test_from_empty_track() {
        let track_ref = TrackReference::parse("1").unwrap();
        let metadata = TrackMetadata::from_track(&track_ref, &Track::default());

        assert_eq!(metadata.track_id, "1");
        assert!(metadata.title.is_none());
        assert!(metadata.artists.is_empty());
        assert!(metadata.cover_url.is_none());
        assert!(metadata.explicit.is_none());
    }

    #[test]
    fn test_blank_artist_names_are_skipped() {
        let track = Track {
            artists: vec![
                Artist {
                    name: Some(" ".to_string()),
                    ..Artist::default()
                },
                Artist {
                    name: Some("A".to_string()),
                    ..Artist::default()
                },
                Artist::default(),
            ],
            ..Track::default()
        };
        let reference = TrackReference::parse("42").unwrap();

        let metadata = TrackMetadata::from_track(&reference, &track);

        assert_eq!(metadata.artists, vec!["A"]);
        assert_eq!(SimilarTrack::from(&track).artists, "A");
    }

    #[test]
    fn test_chart_trend_parse() {
        assert_eq!(ChartTrend::parse("up"), ChartTrend::Up);
        assert_eq!(ChartTrend::parse("down"), ChartTrend::Down);
        assert_eq!(ChartTrend::parse("new"), ChartTrend::New);
        assert_eq!(ChartTrend::parse("same"), ChartTrend::Other);
    }

    #[test]
    fn test_album_detail_joins_labels() {
        let album: Album = serde_json::from_str(
            r#"{"trackCount": 10, "releaseDate": "2020-01-01", "labels": ["X", {"id": 1, "name": "Y"}]}"#,
        )
        .unwrap();
        let detail = AlbumDetail::from(&album);
        assert_eq!(detail.tracks_count, 10);
        assert_eq!(detail.label.as_deref(), Some("X, Y"));
        assert_eq!(detail.release_date.as_deref(), Some("2020-01-01"));
    }
}
