//! Chat transcript entries for the protocol assistant

use serde::{Deserialize, Serialize};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The dashboard user
    User,
    /// The protocol assistant
    Assistant,
}

/// One entry of an experiment's chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: ChatRole,
    content: String,
}

impl ChatMessage {
    /// A message typed by the user.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// A reply from the protocol assistant.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Get the author role.
    #[must_use]
    pub const fn role(&self) -> ChatRole {
        self.role
    }

    /// Get the message text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
