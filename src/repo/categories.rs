//! Category Repository
//!
//! Categories change rarely, so they carry the longest TTL in the registry.

use std::sync::Arc;

use crate::datastore::Datastore;
use crate::domain::{Category, CategoryUpdate};
use crate::error::Result;
use crate::registry::CacheRegistry;

#[derive(Clone)]
pub struct CategoryRepository {
    datastore: Arc<dyn Datastore>,
    caches: CacheRegistry,
}

impl CategoryRepository {
    pub fn new(datastore: Arc<dyn Datastore>, caches: CacheRegistry) -> Self {
        Self { datastore, caches }
    }

    // == Reads ==
    /// Single category by id.
    pub async fn category(&self, id: &str) -> Result<Option<Category>> {
        if let Some(category) = self.caches.category(id).await {
            return Ok(Some(category));
        }
        let fetched = self.datastore.fetch_category(id).await?;
        if let Some(category) = &fetched {
            self.caches.cache_category(category).await;
        }
        Ok(fetched)
    }

    /// The full category list, cached under a single fixed key.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        if let Some(all) = self.caches.categories().await {
            return Ok(all);
        }
        let all = self.datastore.fetch_categories().await?;
        self.caches.cache_categories(&all).await;
        Ok(all)
    }

    // == Writes ==
    /// Renames or reslugs a category, then drops the category, the list, and
    /// every product page filed under it.
    pub async fn update_category(&self, id: &str, changes: &CategoryUpdate) -> Result<Category> {
        let updated = self.datastore.update_category(id, changes).await?;
        self.caches.invalidate_category(&updated.id).await;
        Ok(updated)
    }
}
