//! Datastore Module
//!
//! The seam between the cache layer and the hosted Postgres backend. The
//! repositories only ever see this trait; the cache treats the other side as
//! a function returning a future of rows or an error.

mod memory;
mod pg_rest;

pub use memory::MemoryDatastore;
pub use pg_rest::PgRestDatastore;

use async_trait::async_trait;

use crate::domain::{
    AuthToken, Category, CategoryPageQuery, CategoryUpdate, Order, OrderDraft, OrderStatus,
    Product, ProductDraft, ProductUpdate, SearchQuery, SellerPageQuery, User, UserUpdate,
};
use crate::error::Result;

// == Datastore Trait ==
/// Row access against the external database.
///
/// Point reads return `Ok(None)` for missing rows; mutations on a missing row
/// fail with [`crate::error::DatastoreError::NotFound`]. Nothing here retries:
/// retry policy belongs to callers.
#[async_trait]
pub trait Datastore: Send + Sync {
    // -- users --
    async fn fetch_user(&self, id: &str) -> Result<Option<User>>;
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_user(&self, id: &str, changes: &UserUpdate) -> Result<User>;
    async fn fetch_session(&self, token: &str) -> Result<Option<AuthToken>>;

    // -- products --
    async fn fetch_product(&self, id: &str) -> Result<Option<Product>>;
    async fn fetch_products_by_category(&self, query: &CategoryPageQuery) -> Result<Vec<Product>>;
    async fn fetch_products_by_seller(&self, query: &SellerPageQuery) -> Result<Vec<Product>>;
    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Product>>;
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product>;
    async fn update_product(&self, id: &str, changes: &ProductUpdate) -> Result<Product>;
    async fn delete_product(&self, id: &str) -> Result<()>;

    // -- categories --
    async fn fetch_category(&self, id: &str) -> Result<Option<Category>>;
    async fn fetch_categories(&self) -> Result<Vec<Category>>;
    async fn update_category(&self, id: &str, changes: &CategoryUpdate) -> Result<Category>;

    // -- orders --
    async fn fetch_order(&self, id: &str) -> Result<Option<Order>>;
    async fn fetch_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>>;
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order>;
    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order>;
}
