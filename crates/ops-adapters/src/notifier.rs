//! Avisos de progreso publicados como mensajes del chat.
use std::sync::Arc;

use ops_core::{Notice, Notifier, NotifyError};

use crate::clients::{ChatPlatform, ClientError};

pub struct ChatNotifier {
    chat: Arc<dyn ChatPlatform>,
}

impl ChatNotifier {
    pub fn new(chat: Arc<dyn ChatPlatform>) -> Self {
        Self { chat }
    }
}

impl Notifier for ChatNotifier {
    fn notify(&self, channel: &str, notice: &Notice) -> Result<(), NotifyError> {
        self.chat
            .post_message(channel, &notice.to_string())
            .map_err(|e| match e {
                ClientError::Api(reason) => NotifyError::Rejected { channel: channel.to_string(),
                                                                    reason },
                other => NotifyError::Transport(other.to_string()),
            })
    }
}
