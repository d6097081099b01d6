use std::sync::Arc;

use tracing::{info, instrument};

use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::repository::storage::KeyValueStorage;

/// Holds the chat relay credential as one opaque string. The value is never logged.
pub struct CredentialRepository {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl CredentialRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: &str) -> Self {
        CredentialRepository { storage, key: key.to_string() }
    }

    pub async fn load(&self) -> RepositoryResult<Option<String>> {
        Ok(self.storage.get(&self.key).await?.filter(|v| !v.trim().is_empty()))
    }

    #[instrument(skip(self, credential))]
    pub async fn save(&self, credential: &str) -> RepositoryResult<()> {
        if credential.trim().is_empty() {
            return Err(RepositoryError::validation("Credential cannot be empty"));
        }
        self.storage.set(&self.key, credential).await?;
        info!("Chat credential saved");
        Ok(())
    }

    /// Remove the stored credential. Returns whether one was present.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> RepositoryResult<bool> {
        let removed = self.storage.remove(&self.key).await?;
        info!(removed, "Chat credential reset");
        Ok(removed)
    }
}

/// Mask a credential for display, keeping only its last four characters.
pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    let visible = if chars.len() > 8 { 4 } else { 0 };
    let hidden = chars.len() - visible;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "•".repeat(hidden), tail)
}
