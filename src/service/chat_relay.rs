//! Pass-through to an external text completion API.
//!
//! Only the current user turn is forwarded, prefixed by a fixed preamble about the
//! agency. Earlier turns never leave the process. Nothing here retries.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::config::GeminiConfig;

pub const ASSISTANT_PREAMBLE: &str = "You are RoniTech AI Assistant, a helpful AI for RoniTech - a digital solutions provider based in Navi Mumbai, India.

RoniTech specializes in:
- DTP Localization
- Graphic Designing
- Website Development
- Translations & Transcription
- Video Editing
- Content Writing
- Digital Marketing

Company details:
- Email: techservices@ronitech.in
- Phone: +91 73047 03650
- Address: 14, Suraj Residency, Plot #15, Sector #10E, Kalamboli, Navi Mumbai-410 218
- 626+ projects completed, 68+ happy clients

Please respond helpfully about RoniTech services, digital solutions, or general business questions. Keep responses concise and professional.";

pub fn build_prompt(user_text: &str) -> String {
    format!("{}\n\nUser message: {}", ASSISTANT_PREAMBLE, user_text)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("Chat relay is not configured, provide an API key first")]
    NotConfigured,

    #[error("API key cannot be empty")]
    EmptyCredential,

    #[error("Failed to set up the completion client: {0}")]
    Setup(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote service error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Credential rejected by the remote service: {0}")]
    Auth(String),

    #[error("Chat panel was closed before the reply arrived")]
    Superseded,

    #[error("A chat request is already in flight")]
    Busy,
}

/// One prompt in, one completion out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError>;
}

/// Builds a provider bound to a user-supplied credential.
pub trait ProviderFactory: Send + Sync {
    fn build(&self, credential: &str) -> Result<Arc<dyn CompletionProvider>, ChatError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Google Generative Language `generateContent` client.
pub struct GeminiProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig, api_key: &str) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ChatError::Setup(e.to_string()))?;
        Ok(GeminiProvider {
            client,
            url: config.generate_url(),
            api_key: api_key.to_string(),
        })
    }
}

fn remote_error(status: reqwest::StatusCode, body: &str) -> ChatError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect());

    let key_rejected = body.contains("API_KEY_INVALID") || body.contains("API key not valid");
    if status == reqwest::StatusCode::UNAUTHORIZED
        || status == reqwest::StatusCode::FORBIDDEN
        || (status == reqwest::StatusCode::BAD_REQUEST && key_rejected)
    {
        ChatError::Auth(message)
    } else {
        ChatError::Remote { status: status.as_u16(), message }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let body = GenerateRequest { contents: [Content { parts: [Part { text: prompt }] }] };
        let resp = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Completion request failed: {}", e);
                ChatError::Transport(e.without_url().to_string())
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| ChatError::Transport(e.to_string()))?;
        if !status.is_success() {
            warn!(%status, "Completion API returned an error");
            return Err(remote_error(status, &text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| ChatError::Remote {
            status: status.as_u16(),
            message: format!("Unreadable completion response: {}", e),
        })?;

        let reply: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if reply.is_empty() {
            let reason = parsed
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(ChatError::Remote { status: status.as_u16(), message: reason });
        }
        debug!(reply_len = reply.len(), "Completion received");
        Ok(reply)
    }
}

pub struct GeminiProviderFactory {
    config: GeminiConfig,
}

impl GeminiProviderFactory {
    pub fn new(config: GeminiConfig) -> Self {
        GeminiProviderFactory { config }
    }
}

impl ProviderFactory for GeminiProviderFactory {
    fn build(&self, credential: &str) -> Result<Arc<dyn CompletionProvider>, ChatError> {
        Ok(Arc::new(GeminiProvider::new(&self.config, credential)?))
    }
}

pub struct ChatRelay {
    factory: Arc<dyn ProviderFactory>,
    provider: RwLock<Option<Arc<dyn CompletionProvider>>>,
}

impl ChatRelay {
    pub fn new(factory: Arc<dyn ProviderFactory>) -> Self {
        ChatRelay { factory, provider: RwLock::new(None) }
    }

    /// Build a provider for `credential` without installing it. The remote service
    /// decides whether the key is valid, on the first call.
    pub fn prepare(&self, credential: &str) -> Result<Arc<dyn CompletionProvider>, ChatError> {
        let credential = credential.trim();
        if credential.is_empty() {
            warn!("Refusing to configure chat relay with an empty credential");
            return Err(ChatError::EmptyCredential);
        }
        self.factory.build(credential).map_err(|e| {
            error!("Failed to configure chat relay: {}", e);
            e
        })
    }

    pub async fn install(&self, provider: Arc<dyn CompletionProvider>) {
        *self.provider.write().await = Some(provider);
        info!("Chat relay configured");
    }

    #[instrument(skip(self, credential))]
    pub async fn configure(&self, credential: &str) -> Result<(), ChatError> {
        let provider = self.prepare(credential)?;
        self.install(provider).await;
        Ok(())
    }

    pub async fn unconfigure(&self) {
        *self.provider.write().await = None;
    }

    pub async fn is_configured(&self) -> bool {
        self.provider.read().await.is_some()
    }

    #[instrument(skip(self, user_text), fields(len = user_text.len()))]
    pub async fn send(&self, user_text: &str) -> Result<String, ChatError> {
        let provider = self.provider.read().await.clone().ok_or(ChatError::NotConfigured)?;
        provider.complete(&build_prompt(user_text)).await
    }
}
