use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::model::quote::{Quote, QuotePatch, Stats, StoreSnapshot};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::repository::storage::KeyValueStorage;

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote>;
    async fn get_by_id(&self, id: &str) -> RepositoryResult<Quote>;
    /// All quotes in insertion order.
    async fn list(&self) -> RepositoryResult<Vec<Quote>>;
    /// Merge `patch` into the quote with `id`. `Ok(None)` when no such quote exists.
    async fn update(&self, id: &str, patch: QuotePatch) -> RepositoryResult<Option<Quote>>;
    /// Returns whether a quote was removed. Deleting an absent id is a no-op.
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;
    async fn stats(&self) -> RepositoryResult<Stats>;
    async fn count(&self) -> RepositoryResult<usize>;
    async fn clear(&self) -> RepositoryResult<()>;
    /// The whole snapshot as indented JSON.
    async fn export_all(&self) -> RepositoryResult<String>;
    /// Replace the whole snapshot with the quotes in `text`. Returns the imported count.
    async fn import_all(&self, text: &str) -> RepositoryResult<usize>;
}

/// Quote store kept as one JSON snapshot under a single storage key.
///
/// The cached snapshot is only replaced after the storage write succeeded, so a failed
/// write never becomes visible to later reads.
pub struct JsonQuoteRepository {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    snapshot: Mutex<StoreSnapshot>,
}

impl JsonQuoteRepository {
    /// Load the snapshot stored under `key`, or start empty if there is none.
    #[instrument(skip(storage), fields(key = %key))]
    pub async fn open(storage: Arc<dyn KeyValueStorage>, key: &str) -> RepositoryResult<Self> {
        let snapshot = match storage.get(key).await? {
            Some(text) => {
                let snapshot = load_snapshot(&text).map_err(|e| {
                    error!("Stored quote snapshot is unreadable: {}", e);
                    RepositoryError::serialization(format!("Stored snapshot under '{}' is unreadable: {}", key, e))
                })?;
                info!("Loaded {} quotes from storage", snapshot.quotes.len());
                snapshot
            }
            None => {
                info!("No stored quotes, starting with an empty collection");
                StoreSnapshot::empty()
            }
        };
        Ok(JsonQuoteRepository {
            storage,
            key: key.to_string(),
            snapshot: Mutex::new(snapshot),
        })
    }

    /// Persist `quotes` as the new snapshot and swap it in once the write succeeded.
    async fn commit(&self, current: &mut StoreSnapshot, quotes: Vec<Quote>) -> RepositoryResult<()> {
        let next = StoreSnapshot::from_quotes(quotes);
        let text = serde_json::to_string_pretty(&next).map_err(|e| {
            error!("Failed to serialize quote snapshot: {}", e);
            RepositoryError::serialization(format!("Failed to serialize snapshot: {}", e))
        })?;
        self.storage.set(&self.key, &text).await.map_err(|e| {
            error!("Failed to persist quote snapshot: {}", e);
            e
        })?;
        debug!(total = next.stats.total_quotes, "Snapshot persisted");
        *current = next;
        Ok(())
    }
}

/// Parse the `quotes` array of a snapshot payload. Other top-level fields are ignored.
pub fn parse_quotes(text: &str) -> RepositoryResult<Vec<Quote>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| RepositoryError::format(format!("Payload is not valid JSON: {}", e)))?;
    let raw = match value.get("quotes") {
        Some(serde_json::Value::Array(items)) => items.clone(),
        Some(_) => return Err(RepositoryError::format("'quotes' must be an array")),
        None => return Err(RepositoryError::format("Payload has no 'quotes' array")),
    };

    let mut quotes = Vec::with_capacity(raw.len());
    let mut seen = HashSet::new();
    for (index, item) in raw.into_iter().enumerate() {
        let quote: Quote = serde_json::from_value(item)
            .map_err(|e| RepositoryError::format(format!("Quote #{} is invalid: {}", index, e)))?;
        if !seen.insert(quote.id.clone()) {
            return Err(RepositoryError::format(format!("Duplicate quote id: {}", quote.id)));
        }
        quotes.push(quote);
    }
    Ok(quotes)
}

fn load_snapshot(text: &str) -> RepositoryResult<StoreSnapshot> {
    let quotes = parse_quotes(text)?;
    let value: serde_json::Value = serde_json::from_str(text)?;
    let last_updated = value
        .get("lastUpdated")
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let stats = Stats::from_quotes(&quotes);
    let cached = value.get("stats").cloned().and_then(|v| serde_json::from_value::<Stats>(v).ok());
    if cached.as_ref() != Some(&stats) {
        warn!(?cached, recomputed = ?stats, "Stored stats were stale, recomputed from quotes");
    }
    Ok(StoreSnapshot { quotes, stats, last_updated })
}

#[async_trait]
impl QuoteRepository for JsonQuoteRepository {
    #[instrument(skip(self, quote), fields(id = %quote.id))]
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        info!("Creating new quote");
        let mut snapshot = self.snapshot.lock().await;
        if snapshot.contains(&quote.id) {
            error!("Quote id already present: {}", quote.id);
            return Err(RepositoryError::already_exists(format!("Quote id already present: {}", quote.id)));
        }
        let mut quotes = snapshot.quotes.clone();
        quotes.push(quote.clone());
        self.commit(&mut snapshot, quotes).await?;
        info!("Quote created successfully");
        Ok(quote)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: &str) -> RepositoryResult<Quote> {
        let snapshot = self.snapshot.lock().await;
        snapshot
            .quotes
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Quote not found for ID: {}", id)))
    }

    async fn list(&self) -> RepositoryResult<Vec<Quote>> {
        let snapshot = self.snapshot.lock().await;
        debug!("Listing {} quotes", snapshot.quotes.len());
        Ok(snapshot.quotes.clone())
    }

    #[instrument(skip(self), fields(id = %id, patch = ?patch))]
    async fn update(&self, id: &str, patch: QuotePatch) -> RepositoryResult<Option<Quote>> {
        info!("Updating quote");
        let mut snapshot = self.snapshot.lock().await;
        let Some(index) = snapshot.quotes.iter().position(|q| q.id == id) else {
            info!("No quote found to update, nothing written");
            return Ok(None);
        };
        let mut quotes = snapshot.quotes.clone();
        quotes[index].apply(patch);
        let updated = quotes[index].clone();
        self.commit(&mut snapshot, quotes).await?;
        info!("Quote updated successfully");
        Ok(Some(updated))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        info!("Deleting quote");
        let mut snapshot = self.snapshot.lock().await;
        if !snapshot.contains(id) {
            info!("No quote found to delete, nothing written");
            return Ok(false);
        }
        let quotes = snapshot.quotes.iter().filter(|q| q.id != id).cloned().collect();
        self.commit(&mut snapshot, quotes).await?;
        info!("Quote deleted successfully");
        Ok(true)
    }

    async fn stats(&self) -> RepositoryResult<Stats> {
        Ok(self.snapshot.lock().await.stats.clone())
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.snapshot.lock().await.quotes.len())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> RepositoryResult<()> {
        warn!("Clearing all quotes");
        let mut snapshot = self.snapshot.lock().await;
        self.commit(&mut snapshot, Vec::new()).await
    }

    #[instrument(skip(self))]
    async fn export_all(&self) -> RepositoryResult<String> {
        let snapshot = self.snapshot.lock().await;
        info!("Exporting {} quotes", snapshot.quotes.len());
        serde_json::to_string_pretty(&*snapshot).map_err(RepositoryError::from)
    }

    #[instrument(skip(self, text), fields(bytes = text.len()))]
    async fn import_all(&self, text: &str) -> RepositoryResult<usize> {
        info!("Importing quote snapshot");
        let quotes = parse_quotes(text).map_err(|e| {
            error!("Rejected import: {}", e);
            e
        })?;
        let count = quotes.len();
        let mut snapshot = self.snapshot.lock().await;
        self.commit(&mut snapshot, quotes).await?;
        info!("Imported {} quotes", count);
        Ok(count)
    }
}
