use crate::error::{BotError, GENERIC_ERROR};
use crate::telegram::flow::{self, DetailLevel, ReplyPlan, TextOutcome};
use crate::telegram::outbox::Outbox;
use crate::telegram::session::SessionStore;
use crate::track::format::{format_basic, format_extended};
use crate::track::service::TrackService;
use crate::yandex::parser::TrackReference;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message, MessageId,
};
use teloxide::utils::command::BotCommands;

pub type HandlerResult = Result<(), BotError>;

/// Shared dependencies of every handler
pub struct BotState {
    pub tracks: TrackService,
    pub sessions: SessionStore,
}

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "show the welcome message.")]
    Start,
    #[command(description = "list the commands.")]
    Help,
}

pub const WELCOME_TEXT: &str = "👋 Hi! I show information about Yandex Music tracks.\n\n\
    Just send me a link to a track, for example:\n\
    • https://music.yandex.ru/track/12345678\n\
    • https://music.yandex.ru/album/1234567/track/12345678\n\n\
    Once I get the link I will ask how much detail you want.";

pub const LINK_HINT: &str =
    "📎 Send me a link to a track on Yandex Music.\nUse /start for help.";

pub const CHOOSE_LEVEL_TEXT: &str = "Choose how much detail you want:";

/// Dispatcher tree: commands, then any other message, then button presses
pub fn schema() -> UpdateHandler<BotError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

/// Buttons offering both detail levels for a track
pub fn detail_keyboard(track: &TrackReference) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        [DetailLevel::Basic, DetailLevel::Extended]
            .into_iter()
            .map(|level| InlineKeyboardButton::callback(level.button_label(), level.payload(track)))
            .collect::<Vec<_>>(),
    ])
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> HandlerResult {
    tracing::info!(chat_id = %msg.chat.id, command = ?cmd, "Handling command");

    let text = match cmd {
        Command::Start => WELCOME_TEXT.to_string(),
        Command::Help => Command::descriptions().to_string(),
    };

    if let Err(e) = bot.send_message(msg.chat.id, text).await {
        report_error(&bot, msg.chat.id, BotError::from(e)).await;
    }

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> HandlerResult {
    let Some(text) = msg.text() else {
        tracing::debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };

    // Unknown commands are not answered
    if text.starts_with('/') {
        return Ok(());
    }

    if let Err(e) = process_text(&bot, &msg, &state, text).await {
        report_error(&bot, msg.chat.id, e).await;
    }

    Ok(())
}

async fn process_text(bot: &Bot, msg: &Message, state: &BotState, text: &str) -> HandlerResult {
    match flow::on_text(&state.sessions, msg.chat.id, text)? {
        TextOutcome::NotALink => {
            bot.send_message(msg.chat.id, LINK_HINT).await?;
        }
        TextOutcome::AwaitingChoice(track) => {
            bot.send_message(msg.chat.id, CHOOSE_LEVEL_TEXT)
                .reply_markup(detail_keyboard(&track))
                .await?;
        }
    }

    Ok(())
}

async fn handle_callback(bot: Bot, query: CallbackQuery, state: Arc<BotState>) -> HandlerResult {
    // Stop the button spinner first; failure here is cosmetic
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        tracing::warn!(error = ?e, "Failed to answer callback query");
    }

    let Some(message) = query.message.as_ref() else {
        tracing::warn!(callback_id = %query.id, "Callback query without a message");
        return Ok(());
    };

    let payload = query.data.as_deref().unwrap_or_default();
    answer_choice(&bot, &state, message.chat().id, message.id(), payload).await;

    Ok(())
}

/// Resolve a button press and answer in place of the placeholder message
///
/// Any failure ends as an error text in the placeholder, or as a new message
/// when the placeholder cannot be edited.
async fn answer_choice(
    outbox: &dyn Outbox,
    state: &BotState,
    chat_id: ChatId,
    placeholder_id: MessageId,
    payload: &str,
) {
    if let Err(e) = process_choice(outbox, state, chat_id, placeholder_id, payload).await {
        let text = e.user_message();
        if let Err(edit_err) = outbox.edit_text(chat_id, placeholder_id, &text).await {
            tracing::warn!(chat_id = %chat_id, error = %edit_err, "Failed to show error in placeholder");
            report_text(outbox, chat_id, &text).await;
        }
    }
}

async fn process_choice(
    outbox: &dyn Outbox,
    state: &BotState,
    chat_id: ChatId,
    placeholder_id: MessageId,
    payload: &str,
) -> HandlerResult {
    let choice = flow::on_choice(&state.sessions, chat_id, payload)?;

    outbox
        .edit_text(chat_id, placeholder_id, choice.level.progress_text())
        .await?;

    let (result, text) = match choice.level {
        DetailLevel::Basic => {
            let result = state.tracks.fetch_basic(&choice.track).await;
            let text = format_basic(&result);
            (result, text)
        }
        DetailLevel::Extended => {
            let result = state.tracks.fetch_extended(&choice.track).await;
            let text = format_extended(&result);
            (result, text)
        }
    };

    deliver(outbox, chat_id, placeholder_id, flow::plan_reply(&result, text)).await
}

/// Send a planned reply, falling back to plain text in the placeholder
///
/// # Errors
/// - `Delivery` if even the text fallback cannot be sent
async fn deliver(
    outbox: &dyn Outbox,
    chat_id: ChatId,
    placeholder_id: MessageId,
    plan: ReplyPlan,
) -> HandlerResult {
    let photo_result = match &plan {
        ReplyPlan::Text(_) => None,
        ReplyPlan::Photo { cover_url, caption } => {
            Some(outbox.send_photo(chat_id, cover_url, caption).await)
        }
        ReplyPlan::PhotoWithFollowUp {
            cover_url,
            caption,
            text,
        } => Some(send_photo_with_follow_up(outbox, chat_id, cover_url, caption, text).await),
    };

    match photo_result {
        Some(Ok(())) => {
            if let Err(e) = outbox.delete(chat_id, placeholder_id).await {
                tracing::warn!(chat_id = %chat_id, error = %e, "Failed to delete placeholder message");
            }
            Ok(())
        }
        Some(Err(e)) => {
            tracing::warn!(chat_id = %chat_id, error = %e, "Photo delivery failed, falling back to text");
            outbox.edit_html(chat_id, placeholder_id, plan.text()).await
        }
        None => outbox.edit_html(chat_id, placeholder_id, plan.text()).await,
    }
}

async fn send_photo_with_follow_up(
    outbox: &dyn Outbox,
    chat_id: ChatId,
    cover_url: &str,
    caption: &str,
    text: &str,
) -> HandlerResult {
    outbox.send_photo(chat_id, cover_url, caption).await?;
    outbox.send_html(chat_id, text).await
}

/// Top-level boundary: every error ends as a visible reply
async fn report_error(outbox: &dyn Outbox, chat_id: ChatId, error: BotError) {
    report_text(outbox, chat_id, &error.user_message()).await;
}

async fn report_text(outbox: &dyn Outbox, chat_id: ChatId, text: &str) {
    if let Err(e) = outbox.send_text(chat_id, text).await {
        tracing::error!(chat_id = %chat_id, error = %e, "Failed to report error to user");
        // Last attempt with the plain generic text
        if text != GENERIC_ERROR {
            if let Err(e) = outbox.send_text(chat_id, GENERIC_ERROR).await {
                tracing::error!(chat_id = %chat_id, error = %e, "Failed to send generic error to user");
            }
        }
    }
}
