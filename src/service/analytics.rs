//! Admin console views computed on demand from the quote list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::quote::{Quote, QuoteStatus, Stats};

pub const DEFAULT_CLIENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteFilter {
    /// `None` means all statuses.
    pub status: Option<QuoteStatus>,
    #[serde(default)]
    pub search: String,
}

impl QuoteFilter {
    pub fn matches(&self, quote: &Quote) -> bool {
        if let Some(status) = self.status {
            if quote.status != status {
                return false;
            }
        }
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&quote.name, &quote.email, &quote.subject, &quote.service]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply(&self, quotes: Vec<Quote>) -> Vec<Quote> {
        quotes.into_iter().filter(|q| self.matches(q)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: QuoteStatus,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCount {
    pub service: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub email: String,
    pub quote_count: usize,
    pub latest_name: String,
    pub latest_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAnalytics {
    pub stats: Stats,
    pub status_distribution: Vec<StatusShare>,
    pub services: Vec<ServiceCount>,
    pub clients: Vec<ClientSummary>,
    pub total_clients: usize,
}

impl QuoteAnalytics {
    pub fn from_quotes(quotes: &[Quote]) -> Self {
        QuoteAnalytics {
            stats: Stats::from_quotes(quotes),
            status_distribution: status_distribution(quotes),
            services: service_counts(quotes),
            clients: client_summaries(quotes, DEFAULT_CLIENT_LIMIT),
            total_clients: distinct_emails(quotes).len(),
        }
    }
}

/// Count and share of every status, in workflow order.
pub fn status_distribution(quotes: &[Quote]) -> Vec<StatusShare> {
    QuoteStatus::ALL
        .iter()
        .map(|&status| {
            let count = quotes.iter().filter(|q| q.status == status).count();
            let percentage = if quotes.is_empty() {
                0.0
            } else {
                count as f64 / quotes.len() as f64 * 100.0
            };
            StatusShare { status, count, percentage }
        })
        .collect()
}

/// Quotes per non-empty service label, in order of first appearance.
pub fn service_counts(quotes: &[Quote]) -> Vec<ServiceCount> {
    let mut counts: Vec<ServiceCount> = Vec::new();
    for quote in quotes.iter().filter(|q| !q.service.is_empty()) {
        match counts.iter_mut().find(|c| c.service == quote.service) {
            Some(entry) => entry.count += 1,
            None => counts.push(ServiceCount { service: quote.service.clone(), count: 1 }),
        }
    }
    counts
}

fn distinct_emails(quotes: &[Quote]) -> Vec<&str> {
    let mut emails: Vec<&str> = Vec::new();
    for quote in quotes {
        if !emails.contains(&quote.email.as_str()) {
            emails.push(&quote.email);
        }
    }
    emails
}

/// Group quotes by email, first appearance first, keeping at most `limit` clients.
pub fn client_summaries(quotes: &[Quote], limit: usize) -> Vec<ClientSummary> {
    distinct_emails(quotes)
        .into_iter()
        .take(limit)
        .filter_map(|email| {
            let mine: Vec<&Quote> = quotes.iter().filter(|q| q.email == email).collect();
            // On equal timestamps the earlier entry wins.
            let latest = mine
                .iter()
                .copied()
                .reduce(|best, q| if q.created_at > best.created_at { q } else { best })?;
            Some(ClientSummary {
                email: email.to_string(),
                quote_count: mine.len(),
                latest_name: latest.name.clone(),
                latest_date: latest.date,
            })
        })
        .collect()
}
