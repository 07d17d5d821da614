//! Conversation logic, independent of the Telegram transport.
//!
//! A chat is `Idle` until it sends a Yandex Music link, then waits for a
//! detail-level choice, then returns to `Idle` whatever happens next.

use crate::error::BotError;
use crate::telegram::session::SessionStore;
use crate::track::format::format_caption;
use crate::track::metadata::TrackMetadata;
use crate::yandex::parser::{TrackReference, extract_track_id, mentions_service};
use teloxide::types::ChatId;

/// Longest text sent as a photo caption; Telegram allows 1024
pub const CAPTION_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLevel {
    Basic,
    Extended,
}

impl DetailLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Basic => "basic",
            DetailLevel::Extended => "extended",
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            DetailLevel::Basic => "📋 Basic info",
            DetailLevel::Extended => "📊 Extended info",
        }
    }

    pub fn progress_text(&self) -> &'static str {
        match self {
            DetailLevel::Basic => "📋 Fetching basic info...",
            DetailLevel::Extended => "📊 Fetching extended info...",
        }
    }

    /// Callback payload of the button for this level
    pub fn payload(&self, track: &TrackReference) -> String {
        format!("{}_{}", self.as_str(), track)
    }
}

/// What a text message turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutcome {
    /// No Yandex Music keywords; the user gets a hint
    NotALink,
    /// Link recognised, the chat now waits for a detail choice
    AwaitingChoice(TrackReference),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailChoice {
    pub level: DetailLevel,
    pub track: TrackReference,
}

/// Handle a text message in the `Idle` state
///
/// # Errors
/// - `Extraction` if the text mentions Yandex Music but holds no track id
pub fn on_text(sessions: &SessionStore, chat_id: ChatId, text: &str) -> Result<TextOutcome, BotError> {
    if !mentions_service(text) {
        return Ok(TextOutcome::NotALink);
    }

    let track = extract_track_id(text).ok_or(BotError::Extraction)?;

    sessions.remember(chat_id, track.clone());
    tracing::info!(chat_id = %chat_id, track_id = %track, "Track link received, awaiting detail choice");

    Ok(TextOutcome::AwaitingChoice(track))
}

/// Handle a button press in the `AwaitingDetailChoice` state
///
/// The track id embedded in the payload wins; the chat's pending link is the
/// fallback. The pending link is cleared either way.
///
/// # Errors
/// - `InvalidChoice` if the payload names an unknown detail level
/// - `MissingTrackId` if neither the payload nor the session holds a track
pub fn on_choice(
    sessions: &SessionStore,
    chat_id: ChatId,
    payload: &str,
) -> Result<DetailChoice, BotError> {
    let pending = sessions.take(chat_id);

    let (level, inline_id) = payload.split_once('_').unwrap_or((payload, ""));

    let level = match level {
        "basic" => DetailLevel::Basic,
        "extended" => DetailLevel::Extended,
        other => return Err(BotError::InvalidChoice(other.to_string())),
    };

    let track = TrackReference::parse(inline_id)
        .or(pending)
        .ok_or(BotError::MissingTrackId)?;

    tracing::info!(chat_id = %chat_id, track_id = %track, level = level.as_str(), "Detail level chosen");

    Ok(DetailChoice { level, track })
}

/// How a formatted reply reaches the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPlan {
    Text(String),
    Photo {
        cover_url: String,
        caption: String,
    },
    /// Text too long for a caption: photo with a short caption, then the text
    PhotoWithFollowUp {
        cover_url: String,
        caption: String,
        text: String,
    },
}

impl ReplyPlan {
    /// The full formatted text, whatever the delivery shape
    pub fn text(&self) -> &str {
        match self {
            ReplyPlan::Text(text) => text,
            ReplyPlan::Photo { caption, .. } => caption,
            ReplyPlan::PhotoWithFollowUp { text, .. } => text,
        }
    }
}

/// Decide whether the reply goes out as text or attached to the cover
pub fn plan_reply(result: &Result<TrackMetadata, BotError>, text: String) -> ReplyPlan {
    let info = match result {
        Ok(info) => info,
        Err(_) => return ReplyPlan::Text(text),
    };

    let Some(cover_url) = info.cover_url.clone() else {
        return ReplyPlan::Text(text);
    };

    if text.chars().count() <= CAPTION_LIMIT {
        ReplyPlan::Photo {
            cover_url,
            caption: text,
        }
    } else {
        ReplyPlan::PhotoWithFollowUp {
            cover_url,
            caption: format_caption(info),
            text,
        }
    }
}
