//! Contact form model: field validation, quote construction and the timed
//! confirmation that follows a successful submission.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::model::quote::{Quote, QuotePriority, QuoteStatus};
use crate::service::quote_service::QuoteService;
use crate::util::error::ServiceError;
use crate::util::id::generate_quote_id_at;

/// What a visitor types into the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub service: String,
}

impl QuoteSubmission {
    /// Every field but `service` must be non-blank.
    pub fn validate(&self) -> Result<(), ServiceError> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::InvalidInput(format!("Required fields are empty: {}", missing.join(", "))))
        }
    }

    /// Build a new quote stamped at `now`: status new, priority medium.
    pub fn into_quote(self, now: DateTime<Utc>) -> Quote {
        let created_at = now.timestamp_millis();
        Quote {
            id: generate_quote_id_at(created_at),
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            service: self.service,
            date: now.date_naive(),
            status: QuoteStatus::New,
            priority: QuotePriority::Medium,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Confirmed { until: Instant },
}

pub struct IntakeForm {
    pub fields: QuoteSubmission,
    phase: FormPhase,
    error: Option<String>,
    confirmation: Duration,
}

impl IntakeForm {
    pub fn new(confirmation: Duration) -> Self {
        IntakeForm {
            fields: QuoteSubmission::default(),
            phase: FormPhase::Editing,
            error: None,
            confirmation,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.phase, FormPhase::Confirmed { .. })
    }

    /// Submit the current fields. Fields are kept on failure and cleared once the
    /// confirmation has been shown for its full duration.
    pub async fn submit(&mut self, service: &dyn QuoteService, now: Instant) -> Result<Quote, ServiceError> {
        if self.is_confirmed() {
            return Err(ServiceError::Conflict("Submission already confirmed".to_string()));
        }
        match service.submit_quote(self.fields.clone()).await {
            Ok(quote) => {
                info!(id = %quote.id, "Contact form submitted");
                self.error = None;
                self.phase = FormPhase::Confirmed { until: now + self.confirmation };
                Ok(quote)
            }
            Err(e) => {
                error!("Contact form submission failed: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Advance the confirmation timer. Returns true when the form was reset.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            FormPhase::Confirmed { until } if now >= until => {
                self.fields = QuoteSubmission::default();
                self.phase = FormPhase::Editing;
                true
            }
            _ => false,
        }
    }
}
