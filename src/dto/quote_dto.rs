use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::quote::{Quote, QuotePriority, QuoteStatus, Stats};
use crate::service::analytics::QuoteFilter;
use crate::service::intake::QuoteSubmission;
use crate::util::error::HandlerError;

// --- Validated DTOs for request validation ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitQuoteRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000))]
    pub message: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub service: String,
}

impl From<SubmitQuoteRequest> for QuoteSubmission {
    fn from(req: SubmitQuoteRequest) -> Self {
        QuoteSubmission {
            name: req.name,
            email: req.email,
            subject: req.subject,
            message: req.message,
            service: req.service,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteResponse {
    pub quote: Quote,
    /// How long the form should show its confirmation before resetting.
    pub confirmation_display_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuotePriorityRequest {
    pub priority: QuotePriority,
}

/// `?status=<new|reviewed|responded|closed|all>&search=<text>`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

impl QuoteListQuery {
    pub fn to_filter(&self) -> Result<QuoteFilter, HandlerError> {
        let status = match self.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(
                QuoteStatus::ALL
                    .into_iter()
                    .find(|s| s.as_str() == raw)
                    .ok_or_else(|| HandlerError::bad_request(format!("Unknown status filter: {}", raw)))?,
            ),
        };
        Ok(QuoteFilter { status, search: self.search.clone().unwrap_or_default() })
    }
}

/// Destructive operations need `?confirm=true`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteQuoteResponse {
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportDatabaseResponse {
    pub imported: usize,
    pub stats: Stats,
}
