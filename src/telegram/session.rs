use crate::yandex::parser::TrackReference;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use teloxide::types::ChatId;

/// Track links waiting for a detail-level choice, keyed by chat
///
/// Owned by the dispatcher and handed to handlers as a dependency. A chat has
/// at most one pending link; a newer link replaces the older one.
#[derive(Clone, Default)]
pub struct SessionStore {
    pending: Arc<RwLock<HashMap<ChatId, TrackReference>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the link a chat just sent
    pub fn remember(&self, chat_id: ChatId, track: TrackReference) {
        let mut pending = self.pending.write().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.insert(chat_id, track) {
            tracing::debug!(chat_id = %chat_id, previous = %previous, "Replaced pending track");
        }
    }

    /// Remove and return the pending link of a chat
    pub fn take(&self, chat_id: ChatId) -> Option<TrackReference> {
        self.pending
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&chat_id)
    }

    pub fn peek(&self, chat_id: ChatId) -> Option<TrackReference> {
        self.pending
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&chat_id)
            .cloned()
    }

    /// Number of chats currently waiting for a choice
    pub fn len(&self) -> usize {
        self.pending.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
