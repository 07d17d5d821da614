use crate::error::BotError;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, LinkPreviewOptions, MessageId, ParseMode};

/// Outbound Telegram calls made while answering a detail choice
///
/// Implemented by `Bot`; mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Outbox: Send + Sync {
    /// Plain text message, no formatting
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), BotError>;

    async fn send_html(&self, chat_id: ChatId, text: &str) -> Result<(), BotError>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        cover_url: &str,
        caption: &str,
    ) -> Result<(), BotError>;

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), BotError>;

    async fn edit_html(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), BotError>;

    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), BotError>;
}

#[async_trait]
impl Outbox for Bot {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), BotError> {
        self.send_message(chat_id, text).await?;
        Ok(())
    }

    async fn send_html(&self, chat_id: ChatId, text: &str) -> Result<(), BotError> {
        self.send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview())
            .await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        cover_url: &str,
        caption: &str,
    ) -> Result<(), BotError> {
        let url = url::Url::parse(cover_url).map_err(|e| {
            BotError::Internal(anyhow::anyhow!("Invalid cover URL {}: {}", cover_url, e))
        })?;

        Requester::send_photo(self, chat_id, InputFile::url(url))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), BotError> {
        self.edit_message_text(chat_id, message_id, text).await?;
        Ok(())
    }

    async fn edit_html(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), BotError> {
        self.edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html)
            .link_preview_options(no_preview())
            .await?;
        Ok(())
    }

    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), BotError> {
        self.delete_message(chat_id, message_id).await?;
        Ok(())
    }
}

fn no_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}
