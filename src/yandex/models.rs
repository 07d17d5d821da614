use serde::{Deserialize, Deserializer};

/// Envelope returned by every Yandex Music API endpoint
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub name: Option<String>,
    pub message: Option<String>,
}

impl ApiError {
    pub fn describe(&self) -> String {
        match (&self.name, &self.message) {
            (Some(name), Some(message)) => format!("{}: {}", name, message),
            (Some(name), None) => name.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => "Unknown error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(default, deserialize_with = "id_string")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub albums: Vec<Album>,
    pub duration_ms: Option<u64>,
    pub cover_uri: Option<String>,
    pub available: Option<bool>,
    pub available_for_premium_users: Option<bool>,
    pub lyrics_available: Option<bool>,
    pub file_size: Option<u64>,
    pub content_warning: Option<String>,
    pub major: Option<Major>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    #[serde(default, deserialize_with = "id_string")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub counts: Option<ArtistCounts>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArtistCounts {
    pub tracks: Option<u32>,
    pub direct_albums: Option<u32>,
}

/// `GET /artists/{id}/brief-info` payload; only the artist itself is used
#[derive(Debug, Deserialize)]
pub struct ArtistBriefInfo {
    pub artist: Artist,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    #[serde(default, deserialize_with = "id_string")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub cover_uri: Option<String>,
    pub release_date: Option<String>,
    pub track_count: Option<u32>,
    pub track_position: Option<TrackPosition>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Only present on `/albums/{id}/with-tracks`
    #[serde(default)]
    pub volumes: Vec<Vec<serde::de::IgnoredAny>>,
}

impl Album {
    /// Number of tracks, preferring the declared count over the loaded volumes.
    pub fn total_tracks(&self) -> u32 {
        self.track_count
            .unwrap_or_else(|| self.volumes.iter().map(|v| v.len() as u32).sum())
    }

    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name().to_string()).collect()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct TrackPosition {
    pub volume: Option<u32>,
    pub index: Option<u32>,
}

/// Labels come either as plain strings or as `{id, name}` objects
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum Label {
    Name(String),
    Object { name: String },
}

impl Label {
    pub fn name(&self) -> &str {
        match self {
            Label::Name(name) | Label::Object { name } => name,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Major {
    pub name: Option<String>,
}

/// `GET /tracks/{id}/similar` payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarTracks {
    #[serde(default)]
    pub similar_tracks: Vec<Track>,
}

/// `GET /landing3/chart/{option}` payload
#[derive(Debug, Deserialize)]
pub struct ChartLanding {
    pub chart: ChartPlaylist,
}

#[derive(Debug, Deserialize)]
pub struct ChartPlaylist {
    #[serde(default)]
    pub tracks: Vec<ChartItem>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartItem {
    pub track: Option<Track>,
    pub chart: Option<ChartInfo>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartInfo {
    pub position: Option<u32>,
    pub progress: Option<String>,
    pub listeners: Option<u64>,
}

/// Ids are strings for tracks and numbers for artists and albums, sometimes both.
fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}
