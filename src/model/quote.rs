use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::util::currency::format_inr;

/// Estimated value of one closed project, in rupees.
pub const AVERAGE_PROJECT_VALUE_INR: u64 = 25_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    New,
    Reviewed,
    Responded,
    Closed,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 4] = [
        QuoteStatus::New,
        QuoteStatus::Reviewed,
        QuoteStatus::Responded,
        QuoteStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::New => "new",
            QuoteStatus::Reviewed => "reviewed",
            QuoteStatus::Responded => "responded",
            QuoteStatus::Closed => "closed",
        }
    }

    /// Reviewed and responded quotes count as active projects.
    pub fn is_active(&self) -> bool {
        matches!(self, QuoteStatus::Reviewed | QuoteStatus::Responded)
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotePriority {
    Low,
    Medium,
    High,
}

impl QuotePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotePriority::Low => "low",
            QuotePriority::Medium => "medium",
            QuotePriority::High => "high",
        }
    }
}

impl std::fmt::Display for QuotePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub service: String,
    pub date: NaiveDate,
    pub status: QuoteStatus,
    pub priority: QuotePriority,
    /// Unix milliseconds. Never changed after creation.
    pub created_at: i64,
}

impl Quote {
    /// Merge a partial update into this quote. `id` and `created_at` are not patchable.
    pub fn apply(&mut self, patch: QuotePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(subject) = patch.subject {
            self.subject = subject;
        }
        if let Some(message) = patch.message {
            self.message = message;
        }
        if let Some(service) = patch.service {
            self.service = service;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

/// Partial update for a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuotePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub service: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<QuoteStatus>,
    pub priority: Option<QuotePriority>,
}

impl QuotePatch {
    pub fn status(status: QuoteStatus) -> Self {
        QuotePatch { status: Some(status), ..Default::default() }
    }

    pub fn priority(priority: QuotePriority) -> Self {
        QuotePatch { priority: Some(priority), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == QuotePatch::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_quotes: usize,
    pub new_quotes: usize,
    pub active_projects: usize,
    pub total_revenue: String,
}

impl Stats {
    /// Recompute stats from the full collection in one pass.
    pub fn from_quotes(quotes: &[Quote]) -> Self {
        let mut new_quotes = 0;
        let mut active_projects = 0;
        let mut closed: u64 = 0;
        for quote in quotes {
            match quote.status {
                QuoteStatus::New => new_quotes += 1,
                QuoteStatus::Closed => closed += 1,
                s if s.is_active() => active_projects += 1,
                _ => {}
            }
        }
        Stats {
            total_quotes: quotes.len(),
            new_quotes,
            active_projects,
            total_revenue: format_inr(closed * AVERAGE_PROJECT_VALUE_INR),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats::from_quotes(&[])
    }
}

/// The persisted aggregate: quotes in insertion order plus their derived stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub quotes: Vec<Quote>,
    pub stats: Stats,
    pub last_updated: DateTime<Utc>,
}

impl StoreSnapshot {
    pub fn empty() -> Self {
        StoreSnapshot::from_quotes(Vec::new())
    }

    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        let stats = Stats::from_quotes(&quotes);
        StoreSnapshot { quotes, stats, last_updated: Utc::now() }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.quotes.iter().any(|q| q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(id: &str, status: QuoteStatus) -> Quote {
        Quote {
            id: id.to_string(),
            name: "Asha".to_string(),
            email: "a@x.com".to_string(),
            subject: "Website".to_string(),
            message: "Need a site".to_string(),
            service: "Website Development".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            status,
            priority: QuotePriority::Medium,
            created_at: 1_736_899_200_000,
        }
    }

    #[test]
    fn test_stats_for_empty_collection() {
        let stats = Stats::from_quotes(&[]);
        assert_eq!(stats.total_quotes, 0);
        assert_eq!(stats.new_quotes, 0);
        assert_eq!(stats.active_projects, 0);
        assert_eq!(stats.total_revenue, "₹0");
    }

    #[test]
    fn test_stats_counts_each_status() {
        let quotes = vec![
            quote("1", QuoteStatus::New),
            quote("2", QuoteStatus::Reviewed),
            quote("3", QuoteStatus::Responded),
            quote("4", QuoteStatus::Closed),
            quote("5", QuoteStatus::Closed),
        ];
        let stats = Stats::from_quotes(&quotes);
        assert_eq!(stats.total_quotes, 5);
        assert_eq!(stats.new_quotes, 1);
        assert_eq!(stats.active_projects, 2);
        assert_eq!(stats.total_revenue, "₹50,000");
    }

    #[test]
    fn test_patch_leaves_identity_alone() {
        let mut q = quote("quote_1", QuoteStatus::New);
        q.apply(QuotePatch {
            status: Some(QuoteStatus::Closed),
            priority: Some(QuotePriority::High),
            ..Default::default()
        });
        assert_eq!(q.id, "quote_1");
        assert_eq!(q.created_at, 1_736_899_200_000);
        assert_eq!(q.status, QuoteStatus::Closed);
        assert_eq!(q.priority, QuotePriority::High);
        assert_eq!(q.name, "Asha");
    }

    #[test]
    fn test_quote_json_shape() {
        let json = serde_json::to_value(quote("quote_1", QuoteStatus::Reviewed)).unwrap();
        assert_eq!(json["status"], "reviewed");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["date"], "2025-01-15");
        assert_eq!(json["createdAt"], 1_736_899_200_000i64);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut json = serde_json::to_value(quote("quote_1", QuoteStatus::New)).unwrap();
        json["status"] = serde_json::json!("archived");
        assert!(serde_json::from_value::<Quote>(json).is_err());
    }

    #[test]
    fn test_patch_rejects_created_at() {
        let res = serde_json::from_str::<QuotePatch>(r#"{"createdAt": 5}"#);
        assert!(res.is_err());
    }
}
