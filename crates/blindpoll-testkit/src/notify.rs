//! Notifier that captures messages for assertions.

use async_trait::async_trait;
use blindpoll_core::NotificationEffects;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every message. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in delivery order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Most recent message.
    pub fn last(&self) -> Option<String> {
        self.messages.lock().last().cloned()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

#[async_trait]
impl NotificationEffects for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
