//! Product Repository
//!
//! Read-through access to the product catalog, plus the mutation surface the
//! admin console uses.

use std::sync::Arc;

use crate::datastore::Datastore;
use crate::domain::{
    CategoryPageQuery, Product, ProductDraft, ProductUpdate, SearchQuery, SellerPageQuery,
};
use crate::error::Result;
use crate::registry::CacheRegistry;

#[derive(Clone)]
pub struct ProductRepository {
    datastore: Arc<dyn Datastore>,
    caches: CacheRegistry,
}

impl ProductRepository {
    pub fn new(datastore: Arc<dyn Datastore>, caches: CacheRegistry) -> Self {
        Self { datastore, caches }
    }

    // == Reads ==
    /// Single product by id. A cache hit returns without touching the
    /// datastore; a miss issues exactly one query and populates the cache.
    /// Missing rows are not cached.
    pub async fn product(&self, id: &str) -> Result<Option<Product>> {
        if let Some(product) = self.caches.product(id).await {
            return Ok(Some(product));
        }
        let fetched = self.datastore.fetch_product(id).await?;
        if let Some(product) = &fetched {
            self.caches.cache_product(product).await;
        }
        Ok(fetched)
    }

    /// One page of a category, keyed on the full (category, limit, offset)
    /// tuple. An empty page is a valid snapshot and is cached like any other.
    pub async fn products_by_category(&self, query: &CategoryPageQuery) -> Result<Vec<Product>> {
        if let Some(page) = self.caches.category_page(query).await {
            return Ok(page);
        }
        let page = self.datastore.fetch_products_by_category(query).await?;
        self.caches.cache_category_page(query, &page).await;
        Ok(page)
    }

    /// One page of a seller's listings.
    pub async fn products_by_seller(&self, query: &SellerPageQuery) -> Result<Vec<Product>> {
        if let Some(page) = self.caches.seller_page(query).await {
            return Ok(page);
        }
        let page = self.datastore.fetch_products_by_seller(query).await?;
        self.caches.cache_seller_page(query, &page).await;
        Ok(page)
    }

    /// Product search, keyed on (term, limit).
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>> {
        if let Some(results) = self.caches.search_results(query).await {
            return Ok(results);
        }
        let results = self.datastore.search_products(query).await?;
        self.caches.cache_search(query, &results).await;
        Ok(results)
    }

    // == Writes ==
    /// Creates a listing, then drops every list and search entry its category
    /// or seller could serve stale.
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        let created = self.datastore.create_product(draft).await?;
        self.caches.invalidate_product(&created).await;
        Ok(created)
    }

    /// Updates a listing; invalidation runs only after the confirmed write.
    pub async fn update_product(&self, id: &str, changes: &ProductUpdate) -> Result<Product> {
        let updated = self.datastore.update_product(id, changes).await?;
        self.caches.invalidate_product(&updated).await;
        Ok(updated)
    }

    /// Deletes a listing. Only the id survives, so invalidation is coarse.
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.datastore.delete_product(id).await?;
        self.caches.invalidate_product_by_id(id).await;
        Ok(())
    }
}
