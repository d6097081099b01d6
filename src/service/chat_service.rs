use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::model::chat::ChatMessage;
use crate::repository::credential_repo::{mask_credential, CredentialRepository};
use crate::service::chat_relay::{ChatError, ChatRelay};
use crate::util::error::ServiceError;

pub const WELCOME_MESSAGE: &str = "Hello! I'm RoniTech AI Assistant. I can help you with information about our digital solutions, services, and answer any questions about RoniTech. How can I assist you today?";
pub const APOLOGY_MESSAGE: &str = "Sorry, I encountered an error. Please try again or check your API key.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub configured: bool,
    pub masked_key: Option<String>,
}

#[async_trait]
pub trait ChatService: Send + Sync {
    async fn credential_status(&self) -> Result<CredentialStatus, ServiceError>;
    async fn set_credential(&self, credential: &str) -> Result<CredentialStatus, ServiceError>;
    async fn reset_credential(&self) -> Result<CredentialStatus, ServiceError>;
    /// Messages of the open panel. Opening a configured, empty panel posts the welcome message.
    async fn open_panel(&self) -> Result<Vec<ChatMessage>, ServiceError>;
    /// Send one user turn and return the assistant reply.
    async fn send_message(&self, text: &str) -> Result<ChatMessage, ServiceError>;
    async fn close_panel(&self);
}

#[derive(Debug, Default)]
struct ChatPanel {
    /// Bumped on close; replies for an older session are dropped.
    session: u64,
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl ChatPanel {
    fn reset(&mut self) {
        self.session += 1;
        self.messages.clear();
        self.pending = false;
    }
}

/// Clears the in-flight flag when a send finishes or its future is dropped,
/// as long as the panel was not reset in the meantime.
struct PendingGuard<'a> {
    panel: &'a Mutex<ChatPanel>,
    session: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut panel = lock_panel(self.panel);
        if panel.session == self.session {
            panel.pending = false;
        }
    }
}

fn lock_panel(panel: &Mutex<ChatPanel>) -> MutexGuard<'_, ChatPanel> {
    panel.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ChatServiceImpl {
    relay: ChatRelay,
    credentials: CredentialRepository,
    panel: Mutex<ChatPanel>,
}

impl ChatServiceImpl {
    pub fn new(relay: ChatRelay, credentials: CredentialRepository) -> Self {
        ChatServiceImpl { relay, credentials, panel: Mutex::new(ChatPanel::default()) }
    }

    /// Configure the relay from a previously stored credential, if any.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<bool, ServiceError> {
        match self.credentials.load().await.map_err(ServiceError::from)? {
            Some(credential) => {
                let configured = self.relay.configure(&credential).await.is_ok();
                info!(configured, "Restored stored chat credential");
                Ok(configured)
            }
            None => {
                info!("No stored chat credential");
                Ok(false)
            }
        }
    }

    async fn status(&self) -> Result<CredentialStatus, ServiceError> {
        let stored = self.credentials.load().await.map_err(ServiceError::from)?;
        Ok(CredentialStatus {
            configured: self.relay.is_configured().await,
            masked_key: stored.as_deref().map(mask_credential),
        })
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn credential_status(&self) -> Result<CredentialStatus, ServiceError> {
        self.status().await
    }

    #[instrument(skip(self, credential))]
    async fn set_credential(&self, credential: &str) -> Result<CredentialStatus, ServiceError> {
        let credential = credential.trim();
        let provider = self.relay.prepare(credential).map_err(|e| {
            warn!("Chat credential rejected: {}", e);
            ServiceError::from(e)
        })?;
        self.credentials.save(credential).await.map_err(|e| {
            error!("Failed to store chat credential: {}", e);
            ServiceError::from(e)
        })?;
        self.relay.install(provider).await;

        {
            let mut panel = lock_panel(&self.panel);
            if panel.messages.is_empty() {
                panel.messages.push(ChatMessage::assistant(WELCOME_MESSAGE));
            }
        }
        info!("Chat credential configured");
        self.status().await
    }

    #[instrument(skip(self))]
    async fn reset_credential(&self) -> Result<CredentialStatus, ServiceError> {
        self.credentials.reset().await.map_err(ServiceError::from)?;
        self.relay.unconfigure().await;
        lock_panel(&self.panel).reset();
        info!("Chat credential cleared");
        self.status().await
    }

    async fn open_panel(&self) -> Result<Vec<ChatMessage>, ServiceError> {
        let configured = self.relay.is_configured().await;
        let mut panel = lock_panel(&self.panel);
        if configured && panel.messages.is_empty() {
            panel.messages.push(ChatMessage::assistant(WELCOME_MESSAGE));
        }
        Ok(panel.messages.clone())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, text: &str) -> Result<ChatMessage, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::InvalidInput("Message cannot be empty".to_string()));
        }
        if !self.relay.is_configured().await {
            return Err(ChatError::NotConfigured.into());
        }

        let session = {
            let mut panel = lock_panel(&self.panel);
            if panel.pending {
                warn!("Chat message sent while another is in flight");
                return Err(ChatError::Busy.into());
            }
            panel.pending = true;
            panel.messages.push(ChatMessage::user(text));
            panel.session
        };
        let _pending = PendingGuard { panel: &self.panel, session };

        let result = self.relay.send(text).await;

        let mut panel = lock_panel(&self.panel);
        if panel.session != session {
            info!("Chat panel closed while waiting, reply discarded");
            return Err(ChatError::Superseded.into());
        }
        panel.pending = false;
        match result {
            Ok(reply) => {
                let message = ChatMessage::assistant(reply);
                panel.messages.push(message.clone());
                Ok(message)
            }
            Err(e) => {
                error!("Chat completion failed: {}", e);
                panel.messages.push(ChatMessage::assistant(APOLOGY_MESSAGE));
                Err(e.into())
            }
        }
    }

    async fn close_panel(&self) {
        lock_panel(&self.panel).reset();
        info!("Chat panel closed");
    }
}
