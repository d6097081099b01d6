use std::path::Path;

use tracing::{error, info, instrument};

use crate::model::gallery::GalleryItem;
use crate::util::error::ServiceError;

pub const ALL_CATEGORIES: &str = "all";

/// Read-only portfolio catalogue, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct GalleryService {
    items: Vec<GalleryItem>,
}

impl GalleryService {
    pub fn new(items: Vec<GalleryItem>) -> Self {
        GalleryService { items }
    }

    /// Load the catalogue from a JSON array file. No file means an empty gallery.
    #[instrument]
    pub async fn load(path: Option<&Path>) -> Result<Self, ServiceError> {
        let Some(path) = path else {
            info!("No gallery catalogue configured");
            return Ok(GalleryService::default());
        };
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            error!("Failed to read gallery catalogue: {}", e);
            ServiceError::InternalError(format!("Failed to read gallery catalogue {}: {}", path.display(), e))
        })?;
        let items: Vec<GalleryItem> = serde_json::from_str(&text).map_err(|e| {
            error!("Gallery catalogue is not valid: {}", e);
            ServiceError::InvalidInput(format!("Gallery catalogue {} is not valid: {}", path.display(), e))
        })?;
        info!("Loaded {} gallery items", items.len());
        Ok(GalleryService::new(items))
    }

    /// Items in catalogue order. `None` or `"all"` returns everything.
    pub fn items(&self, category: Option<&str>) -> Vec<GalleryItem> {
        match category {
            None | Some(ALL_CATEGORIES) => self.items.clone(),
            Some(category) => self.items.iter().filter(|i| i.category == category).cloned().collect(),
        }
    }

    /// `"all"` followed by each distinct category in first-appearance order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for item in &self.items {
            if !categories.contains(&item.category) {
                categories.push(item.category.clone());
            }
        }
        categories
    }
}
