pub mod flow;
pub mod handlers;
pub mod outbox;
pub mod session;

use crate::telegram::handlers::{BotState, Command, schema};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

/// Run the long-polling dispatcher until Ctrl-C
///
/// Updates of one chat are handled in order; different chats run concurrently.
pub async fn run_bot(token: &str, state: Arc<BotState>) -> anyhow::Result<()> {
    let bot = Bot::new(token);

    let me = bot.get_me().await?;
    tracing::info!(
        username = me.username.as_deref().unwrap_or("unknown"),
        "Telegram bot authorized"
    );

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(error = ?e, "Failed to register bot commands");
    }

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .default_handler(|upd: Arc<Update>| async move {
            tracing::debug!(update_id = ?upd.id, "Unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error from the update listener or a handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Dispatcher stopped");

    Ok(())
}
