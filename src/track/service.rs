use crate::error::BotError;
use crate::track::metadata::{
    AlbumDetail, ArtistDetail, ChartPosition, MAX_SIMILAR_TRACKS, SimilarTrack, TrackMetadata,
};
use crate::yandex::client::MusicApi;
use crate::yandex::models::Track;
use crate::yandex::parser::TrackReference;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Chart positions scanned when looking for a track
const CHART_DEPTH: usize = 50;

/// Resolves track references into `TrackMetadata`
///
/// The main track lookup is mandatory; every extended sub-lookup is
/// best-effort and degrades to an absent section on failure.
#[derive(Clone)]
pub struct TrackService {
    api: Arc<dyn MusicApi>,
    timeout: Duration,
    chart_option: String,
}

impl TrackService {
    pub fn new(api: Arc<dyn MusicApi>, timeout: Duration, chart_option: &str) -> Self {
        TrackService {
            api,
            timeout,
            chart_option: chart_option.to_string(),
        }
    }

    /// Fetch title, artists, duration and cover of a track
    ///
    /// # Errors
    /// - `Provider` if the track lookup fails or times out
    pub async fn fetch_basic(&self, track_ref: &TrackReference) -> Result<TrackMetadata, BotError> {
        let track = self.fetch_track(track_ref).await?;
        Ok(TrackMetadata::from_track(track_ref, &track))
    }

    /// Fetch the track plus album, artist, similar-track and chart details
    ///
    /// Sub-lookups run concurrently. The album lookup uses the first album the
    /// track belongs to.
    ///
    /// # Errors
    /// - `Provider` if the main track lookup fails or times out
    pub async fn fetch_extended(
        &self,
        track_ref: &TrackReference,
    ) -> Result<TrackMetadata, BotError> {
        let track = self.fetch_track(track_ref).await?;
        let mut metadata = TrackMetadata::from_track(track_ref, &track);

        let (album_details, artist_details, similar_tracks, chart_positions) = tokio::join!(
            self.album_details(metadata.album_id.as_deref()),
            self.artist_details(&track),
            self.similar_tracks(track_ref),
            self.chart_positions(track_ref),
        );

        metadata.album_details = album_details;
        metadata.artist_details = artist_details;
        metadata.similar_tracks = similar_tracks;
        metadata.chart_positions = chart_positions;

        tracing::debug!(
            track_id = %track_ref,
            has_album_details = metadata.album_details.is_some(),
            artists = metadata.artist_details.len(),
            similar = metadata.similar_tracks.len(),
            chart_positions = metadata.chart_positions.len(),
            "Collected extended track info"
        );

        Ok(metadata)
    }

    async fn fetch_track(&self, track_ref: &TrackReference) -> Result<Track, BotError> {
        tracing::info!(track_id = %track_ref, "Fetching track from Yandex Music");

        self.call("track lookup", self.api.track(track_ref.as_str()))
            .await
            .inspect_err(|e| {
                tracing::error!(track_id = %track_ref, error = %e, "Track lookup failed");
            })
    }

    async fn album_details(&self, album_id: Option<&str>) -> Option<AlbumDetail> {
        let album_id = album_id?;

        match self
            .call("album lookup", self.api.album_with_tracks(album_id))
            .await
        {
            Ok(album) => Some(AlbumDetail::from(&album)),
            Err(e) => {
                tracing::warn!(album_id = album_id, error = %e, "Album lookup failed, skipping");
                None
            }
        }
    }

    async fn artist_details(&self, track: &Track) -> Vec<ArtistDetail> {
        let lookups = track.artists.iter().map(|artist| async move {
            let name = artist.name.as_deref().unwrap_or_default();
            let Some(artist_id) = artist.id.as_deref() else {
                return ArtistDetail::name_only(name);
            };

            match self.call("artist lookup", self.api.artist(artist_id)).await {
                Ok(detail) => ArtistDetail::from_artist(name, &detail),
                Err(e) => {
                    tracing::warn!(artist_id = artist_id, error = %e, "Artist lookup failed, using name only");
                    ArtistDetail::name_only(name)
                }
            }
        });

        join_all(lookups).await
    }

    async fn similar_tracks(&self, track_ref: &TrackReference) -> Vec<SimilarTrack> {
        match self
            .call("similar tracks", self.api.similar_tracks(track_ref.as_str()))
            .await
        {
            Ok(tracks) => tracks
                .iter()
                .take(MAX_SIMILAR_TRACKS)
                .map(SimilarTrack::from)
                .collect(),
            Err(e) => {
                tracing::warn!(track_id = %track_ref, error = %e, "Similar tracks lookup failed, skipping");
                Vec::new()
            }
        }
    }

    async fn chart_positions(&self, track_ref: &TrackReference) -> Vec<ChartPosition> {
        match self
            .call("chart lookup", self.api.chart(&self.chart_option))
            .await
        {
            Ok(items) => items
                .iter()
                .take(CHART_DEPTH)
                .filter(|item| {
                    item.track
                        .as_ref()
                        .and_then(|t| t.id.as_deref())
                        .is_some_and(|id| id == track_ref.as_str())
                })
                .filter_map(|item| item.chart.as_ref().and_then(ChartPosition::from_chart))
                .collect(),
            Err(e) => {
                tracing::warn!(chart = %self.chart_option, error = %e, "Chart lookup failed, skipping");
                Vec::new()
            }
        }
    }

    /// Bound a provider call by the configured timeout
    async fn call<T>(
        &self,
        what: &str,
        request: impl Future<Output = Result<T, BotError>>,
    ) -> Result<T, BotError> {
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                BotError::Provider(format!(
                    "{} timed out after {}s",
                    what,
                    self.timeout.as_secs_f32()
                ))
            })?
    }
}
