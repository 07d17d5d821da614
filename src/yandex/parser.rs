use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Numeric id of a track in the Yandex Music catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackReference(String);

impl TrackReference {
    /// Build a reference from a raw id, rejecting anything that is not all digits.
    pub fn parse(id: &str) -> Option<Self> {
        if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
            Some(TrackReference(id.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical page of the track on the web player.
    pub fn web_url(&self) -> String {
        format!("https://music.yandex.ru/track/{}", self.0)
    }
}

impl fmt::Display for TrackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Checked in this order, first capture wins
static TRACK_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"track/(\d+)").unwrap(),
        Regex::new(r"album/\d+/track/(\d+)").unwrap(),
        Regex::new(r"playlists/\d+/\d+\?trackId=(\d+)").unwrap(),
    ]
});

/// Check whether a message looks like a Yandex Music link
///
/// Both keywords must be present, case-insensitively. This is a cheap
/// pre-filter; `extract_track_id` does the actual parsing.
pub fn mentions_service(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("yandex") && lower.contains("music")
}

/// Extract a Yandex Music track ID from a URL or free text
///
/// Supports multiple formats:
/// - https://music.yandex.ru/track/TRACK_ID
/// - https://music.yandex.ru/album/ALBUM_ID/track/TRACK_ID
/// - https://music.yandex.ru/users/USER/playlists/KIND/OWNER?trackId=TRACK_ID
///
/// # Arguments
/// * `text` - Text that may contain a Yandex Music link
///
/// # Returns
/// The track reference if found, None otherwise
///
/// # Examples
/// ```
/// use trackinfobot::yandex::parser::extract_track_id;
///
/// let url = "https://music.yandex.ru/album/123/track/456?utm_source=web";
/// assert_eq!(extract_track_id(url).unwrap().as_str(), "456");
/// ```
pub fn extract_track_id(text: &str) -> Option<TrackReference> {
    TRACK_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .and_then(|captures| TrackReference::parse(&captures[1]))
}
