use crate::error::BotError;
use crate::yandex::models::{
    Album, ApiResponse, Artist, ArtistBriefInfo, ChartItem, ChartLanding, SimilarTracks, Track,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Raw lookups against the Yandex Music catalog
///
/// Each call either returns the decoded payload or a `BotError::Provider`
/// describing what went wrong. Implemented by `YandexClient`; mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MusicApi: Send + Sync {
    async fn track(&self, track_id: &str) -> Result<Track, BotError>;

    async fn album_with_tracks(&self, album_id: &str) -> Result<Album, BotError>;

    async fn artist(&self, artist_id: &str) -> Result<Artist, BotError>;

    async fn similar_tracks(&self, track_id: &str) -> Result<Vec<Track>, BotError>;

    async fn chart(&self, chart_option: &str) -> Result<Vec<ChartItem>, BotError>;
}

/// HTTP client for the Yandex Music API
#[derive(Clone)]
pub struct YandexClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl YandexClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, BotError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trackinfobot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BotError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(YandexClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// GET an endpoint and unwrap the `{result, error}` envelope
    ///
    /// # Errors
    /// - `Provider` if the request fails, the body cannot be decoded, the API
    ///   reports an error, or the result is missing
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BotError> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(url = %url, "Calling Yandex Music API");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(path = path, error = ?e, "Failed to call Yandex Music API");
                if e.is_timeout() {
                    BotError::Provider(format!("{} timed out", path))
                } else {
                    BotError::Provider(format!("Request to {} failed: {}", path, e))
                }
            })?;

        let status = response.status();

        let api_response = response.json::<ApiResponse<T>>().await.map_err(|e| {
            tracing::error!(path = path, status = %status, error = ?e, "Failed to parse Yandex Music API response");
            BotError::Provider(format!("Unexpected response from {} ({}): {}", path, status, e))
        })?;

        if let Some(error) = api_response.error {
            let error_msg = error.describe();
            tracing::warn!(
                path = path,
                status = %status,
                error = %error_msg,
                "Yandex Music API returned error"
            );
            return Err(BotError::Provider(error_msg));
        }

        api_response.result.ok_or_else(|| {
            tracing::warn!(path = path, status = %status, "Yandex Music API returned no result");
            BotError::Provider(format!("Empty response from {}", path))
        })
    }
}

#[async_trait]
impl MusicApi for YandexClient {
    async fn track(&self, track_id: &str) -> Result<Track, BotError> {
        let tracks: Vec<Track> = self.get(&format!("/tracks/{}", track_id)).await?;

        tracks
            .into_iter()
            .next()
            .ok_or_else(|| BotError::Provider(format!("Track {} not found", track_id)))
    }

    async fn album_with_tracks(&self, album_id: &str) -> Result<Album, BotError> {
        self.get(&format!("/albums/{}/with-tracks", album_id)).await
    }

    async fn artist(&self, artist_id: &str) -> Result<Artist, BotError> {
        let brief: ArtistBriefInfo = self
            .get(&format!("/artists/{}/brief-info", artist_id))
            .await?;
        Ok(brief.artist)
    }

    async fn similar_tracks(&self, track_id: &str) -> Result<Vec<Track>, BotError> {
        let similar: SimilarTracks = self.get(&format!("/tracks/{}/similar", track_id)).await?;
        Ok(similar.similar_tracks)
    }

    async fn chart(&self, chart_option: &str) -> Result<Vec<ChartItem>, BotError> {
        let landing: ChartLanding = self
            .get(&format!("/landing3/chart/{}", chart_option))
            .await?;
        Ok(landing.chart.tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client =
            YandexClient::new("https://api.music.yandex.net/", "token", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url, "https://api.music.yandex.net");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_provider_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let client =
            YandexClient::new("http://127.0.0.1:9", "token", Duration::from_secs(2)).unwrap();

        let result = client.track("42").await;

        assert!(matches!(result, Err(BotError::Provider(_))));
    }
}

// Live API calls are covered by the ignored test in tests/integration_test.rs
