use thiserror::Error;

/// Bot errors with user-facing message mappings
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Could not find a track id in the link")]
    Extraction,

    #[error("Unknown detail level: {0}")]
    InvalidChoice(String),

    #[error("Track id not found")]
    MissingTrackId,

    #[error("Failed to fetch track info: {0}")]
    Provider(String),

    #[error("Telegram delivery failed: {0}")]
    Delivery(#[from] teloxide::RequestError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BotError {
    /// Text shown to the user for this error.
    ///
    /// This is the single place where error kinds turn into chat replies, so
    /// every handler answers something no matter what failed.
    pub fn user_message(&self) -> String {
        match self {
            BotError::Extraction => {
                tracing::warn!("No track id in link");
                "❌ Could not extract a track id from the link.".to_string()
            }
            BotError::InvalidChoice(choice) => {
                tracing::warn!(choice = %choice, "Unknown detail level selected");
                "❌ Unknown option, please send the link again.".to_string()
            }
            BotError::MissingTrackId => {
                tracing::warn!("Detail choice without a track id");
                "❌ Error: track id not found.".to_string()
            }
            BotError::Provider(msg) => {
                tracing::error!("Yandex Music API error: {}", msg);
                single_line(&format!("❌ {}", self))
            }
            BotError::Delivery(err) => {
                tracing::error!("Telegram delivery error: {:?}", err);
                GENERIC_ERROR.to_string()
            }
            BotError::Internal(err) => {
                tracing::error!("Internal error: {:?}", err);
                GENERIC_ERROR.to_string()
            }
        }
    }
}

pub const GENERIC_ERROR: &str = "⚠️ An error occurred. Please try again later.";

/// Collapse line breaks so an error always renders as one line.
pub fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_embeds_cause() {
        let err = BotError::Provider("not-found: track 42".to_string());
        assert_eq!(
            err.user_message(),
            "❌ Failed to fetch track info: not-found: track 42"
        );
    }

    #[test]
    fn test_provider_message_is_single_line() {
        let err = BotError::Provider("line one\nline two\r\n".to_string());
        let message = err.user_message();
        assert!(!message.contains('\n'));
        assert!(message.contains("line one line two"));
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = BotError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.user_message(), GENERIC_ERROR);
    }

    #[test]
    fn test_extraction_message() {
        assert!(BotError::Extraction.user_message().contains("track id"));
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\n\n b \r\nc"), "a b c");
        assert_eq!(single_line("plain"), "plain");
    }
}
