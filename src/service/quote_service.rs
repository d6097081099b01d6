use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::{error, info, instrument, warn};

use crate::model::quote::{Quote, QuotePatch, QuotePriority, QuoteStatus, Stats};
use crate::repository::quote_repo::QuoteRepository;
use crate::service::analytics::{QuoteAnalytics, QuoteFilter};
use crate::service::intake::QuoteSubmission;
use crate::util::csv::quotes_to_csv;
use crate::util::error::ServiceError;

pub fn database_export_name(date: NaiveDate) -> String {
    format!("ronitech_database_{}.json", date)
}

pub fn quotes_csv_name(date: NaiveDate) -> String {
    format!("ronitech_quotes_{}.csv", date)
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    // Intake
    async fn submit_quote(&self, submission: QuoteSubmission) -> Result<Quote, ServiceError>;

    // Admin console
    async fn list_quotes(&self, filter: &QuoteFilter) -> Result<Vec<Quote>, ServiceError>;
    async fn get_quote(&self, id: &str) -> Result<Quote, ServiceError>;
    async fn update_quote(&self, id: &str, patch: QuotePatch) -> Result<Quote, ServiceError>;
    async fn update_status(&self, id: &str, status: QuoteStatus) -> Result<Quote, ServiceError>;
    async fn update_priority(&self, id: &str, priority: QuotePriority) -> Result<Quote, ServiceError>;
    /// Returns whether a quote was removed.
    async fn delete_quote(&self, id: &str) -> Result<bool, ServiceError>;
    async fn stats(&self) -> Result<Stats, ServiceError>;
    async fn analytics(&self) -> Result<QuoteAnalytics, ServiceError>;

    // Database management
    async fn export_csv(&self, filter: &QuoteFilter) -> Result<String, ServiceError>;
    async fn export_database(&self) -> Result<String, ServiceError>;
    async fn import_database(&self, text: &str) -> Result<usize, ServiceError>;
    async fn clear_database(&self) -> Result<(), ServiceError>;
}

pub struct QuoteServiceImpl {
    pub quote_repo: Arc<dyn QuoteRepository>,
    confirmation: Duration,
}

impl QuoteServiceImpl {
    pub fn new(quote_repo: Arc<dyn QuoteRepository>) -> Self {
        QuoteServiceImpl { quote_repo, confirmation: Duration::from_secs(3) }
    }

    pub fn with_confirmation(mut self, confirmation: Duration) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Display time of the intake confirmation.
    pub fn confirmation(&self) -> Duration {
        self.confirmation
    }
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, submission), fields(email = %submission.email))]
    async fn submit_quote(&self, submission: QuoteSubmission) -> Result<Quote, ServiceError> {
        info!("Submitting new quote");
        submission.validate().map_err(|e| {
            warn!("Rejected quote submission: {}", e);
            e
        })?;
        let res = self.quote_repo.create(submission.into_quote(Utc::now())).await;
        match &res {
            Ok(q) => info!(id = %q.id, "Quote submitted successfully"),
            Err(e) => error!("Failed to submit quote: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(filter = ?filter))]
    async fn list_quotes(&self, filter: &QuoteFilter) -> Result<Vec<Quote>, ServiceError> {
        let res = self.quote_repo.list().await;
        match res {
            Ok(quotes) => {
                let quotes = filter.apply(quotes);
                info!("Fetched {} quotes", quotes.len());
                Ok(quotes)
            }
            Err(e) => {
                error!("Failed to list quotes: {e}");
                Err(ServiceError::from(e))
            }
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_quote(&self, id: &str) -> Result<Quote, ServiceError> {
        let res = self.quote_repo.get_by_id(id).await;
        if let Err(e) = &res {
            error!("Failed to fetch quote: {e}");
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(id = %id, patch = ?patch))]
    async fn update_quote(&self, id: &str, patch: QuotePatch) -> Result<Quote, ServiceError> {
        info!("Updating quote");
        if patch.is_empty() {
            return Err(ServiceError::InvalidInput("Update has no fields".to_string()));
        }
        match self.quote_repo.update(id, patch).await {
            Ok(Some(quote)) => {
                info!("Quote updated successfully");
                Ok(quote)
            }
            Ok(None) => {
                warn!("Quote to update not found");
                Err(ServiceError::NotFound(format!("Quote not found for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to update quote: {e}");
                Err(ServiceError::from(e))
            }
        }
    }

    async fn update_status(&self, id: &str, status: QuoteStatus) -> Result<Quote, ServiceError> {
        self.update_quote(id, QuotePatch::status(status)).await
    }

    async fn update_priority(&self, id: &str, priority: QuotePriority) -> Result<Quote, ServiceError> {
        self.update_quote(id, QuotePatch::priority(priority)).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_quote(&self, id: &str) -> Result<bool, ServiceError> {
        info!("Deleting quote");
        let res = self.quote_repo.delete(id).await;
        match &res {
            Ok(true) => info!("Quote deleted successfully"),
            Ok(false) => info!("Quote already absent"),
            Err(e) => error!("Failed to delete quote: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    async fn stats(&self) -> Result<Stats, ServiceError> {
        self.quote_repo.stats().await.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn analytics(&self) -> Result<QuoteAnalytics, ServiceError> {
        let quotes = self.quote_repo.list().await.map_err(ServiceError::from)?;
        Ok(QuoteAnalytics::from_quotes(&quotes))
    }

    #[instrument(skip(self), fields(filter = ?filter))]
    async fn export_csv(&self, filter: &QuoteFilter) -> Result<String, ServiceError> {
        let quotes = self.list_quotes(filter).await?;
        info!("Exporting {} quotes as CSV", quotes.len());
        Ok(quotes_to_csv(&quotes))
    }

    async fn export_database(&self) -> Result<String, ServiceError> {
        let res = self.quote_repo.export_all().await;
        if let Err(e) = &res {
            error!("Failed to export database: {e}");
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self, text))]
    async fn import_database(&self, text: &str) -> Result<usize, ServiceError> {
        let res = self.quote_repo.import_all(text).await;
        match &res {
            Ok(count) => info!("Database imported with {} quotes", count),
            Err(e) => error!("Failed to import database: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn clear_database(&self) -> Result<(), ServiceError> {
        let res = self.quote_repo.clear().await;
        match &res {
            Ok(_) => warn!("Database cleared"),
            Err(e) => error!("Failed to clear database: {e}"),
        }
        res.map_err(ServiceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_names() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(database_export_name(date), "ronitech_database_2025-01-15.json");
        assert_eq!(quotes_csv_name(date), "ronitech_quotes_2025-01-15.csv");
    }
}
