use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of an in-memory chat panel session. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub role: ChatRole,
    /// Unix milliseconds.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        ChatMessage {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            content: content.into(),
            role,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage::new(ChatRole::Assistant, content)
    }
}
