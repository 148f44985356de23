//! Cache Registry
//!
//! One typed cache per domain behind a shared handle. Constructed once at
//! process start and cloned into every repository, so there is exactly one
//! cache state per process and no hidden globals.
//!
//! Every method here is best-effort: key templates and TTLs are fixed per
//! entity kind, and no cache operation can fail the surrounding request.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::cache::{CacheOptions, CacheStats, KeyedCache};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::domain::{AuthToken, Category, CategoryPageQuery, Order, Product, SearchQuery, SellerPageQuery, User};
use crate::keys;

// == TTL Policy ==
// Rarely-changing entities get long windows; anything tied to auth gets a
// short one so staleness cannot outlive a credential change for long.
const USER_TTL: Duration = Duration::from_secs(5 * 60);
const PRODUCT_TTL: Duration = Duration::from_secs(15 * 60);
const PRODUCT_LIST_TTL: Duration = Duration::from_secs(10 * 60);
const CATEGORY_TTL: Duration = Duration::from_secs(30 * 60);
const ORDER_TTL: Duration = Duration::from_secs(2 * 60);
const SEARCH_TTL: Duration = Duration::from_secs(5 * 60);
const AUTH_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);
const USER_EXISTS_TTL: Duration = Duration::from_secs(30);

pub(crate) type SharedCache<T> = Arc<RwLock<KeyedCache<T>>>;

// == Cache Registry ==
/// The process-wide set of domain caches.
#[derive(Debug, Clone)]
pub struct CacheRegistry {
    pub(crate) users: SharedCache<User>,
    pub(crate) products: SharedCache<Product>,
    pub(crate) product_lists: SharedCache<Vec<Product>>,
    pub(crate) categories: SharedCache<Category>,
    pub(crate) category_list: SharedCache<Vec<Category>>,
    pub(crate) orders: SharedCache<Order>,
    pub(crate) order_lists: SharedCache<Vec<Order>>,
    pub(crate) search: SharedCache<Vec<Product>>,
    pub(crate) auth_tokens: SharedCache<AuthToken>,
    pub(crate) user_exists: SharedCache<bool>,
}

fn shared_cache<T: Clone + Serialize>(
    config: &Config,
    default_ttl: Duration,
    clock: &Arc<dyn Clock>,
) -> SharedCache<T> {
    let options = CacheOptions {
        max_entries: config.max_entries,
        default_ttl,
        allow_stale: config.allow_stale,
        refresh_on_get: true,
        max_value_bytes: config.max_value_bytes,
    };
    Arc::new(RwLock::new(KeyedCache::with_clock(options, clock.clone())))
}

impl CacheRegistry {
    // == Constructors ==
    /// Creates the registry reading the system clock.
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates the registry with an injected clock (tests drive expiry with a
    /// manual clock).
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: shared_cache(config, USER_TTL, &clock),
            products: shared_cache(config, PRODUCT_TTL, &clock),
            product_lists: shared_cache(config, PRODUCT_LIST_TTL, &clock),
            categories: shared_cache(config, CATEGORY_TTL, &clock),
            category_list: shared_cache(config, CATEGORY_TTL, &clock),
            orders: shared_cache(config, ORDER_TTL, &clock),
            order_lists: shared_cache(config, ORDER_TTL, &clock),
            search: shared_cache(config, SEARCH_TTL, &clock),
            auth_tokens: shared_cache(config, AUTH_TOKEN_TTL, &clock),
            user_exists: shared_cache(config, USER_EXISTS_TTL, &clock),
        }
    }

    // == Users ==
    /// Caches a user under both the id key and the email key.
    pub async fn cache_user(&self, user: &User) {
        let mut cache = self.users.write().await;
        cache.set(keys::user(&user.id), user.clone(), None);
        cache.set(keys::user_email(&user.email), user.clone(), None);
    }

    pub async fn user(&self, id: &str) -> Option<User> {
        // Write lock: reads update recency and counters
        self.users.write().await.get(&keys::user(id))
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        self.users.write().await.get(&keys::user_email(email))
    }

    /// Caches an existence probe result. The only negative cache in the
    /// layer; its short TTL bounds how long a false "taken"/"free" answer
    /// can survive.
    pub async fn cache_user_exists(&self, email: &str, exists: bool) {
        self.user_exists
            .write()
            .await
            .set(keys::user_exists(email), exists, None);
    }

    pub async fn user_exists(&self, email: &str) -> Option<bool> {
        self.user_exists.write().await.get(&keys::user_exists(email))
    }

    // == Products ==
    pub async fn cache_product(&self, product: &Product) {
        self.products
            .write()
            .await
            .set(keys::product(&product.id), product.clone(), None);
    }

    pub async fn product(&self, id: &str) -> Option<Product> {
        self.products.write().await.get(&keys::product(id))
    }

    pub async fn cache_category_page(&self, query: &CategoryPageQuery, page: &[Product]) {
        self.product_lists
            .write()
            .await
            .set(keys::category_page(query), page.to_vec(), None);
    }

    pub async fn category_page(&self, query: &CategoryPageQuery) -> Option<Vec<Product>> {
        self.product_lists.write().await.get(&keys::category_page(query))
    }

    pub async fn cache_seller_page(&self, query: &SellerPageQuery, page: &[Product]) {
        self.product_lists
            .write()
            .await
            .set(keys::seller_page(query), page.to_vec(), None);
    }

    pub async fn seller_page(&self, query: &SellerPageQuery) -> Option<Vec<Product>> {
        self.product_lists.write().await.get(&keys::seller_page(query))
    }

    pub async fn cache_search(&self, query: &SearchQuery, results: &[Product]) {
        self.search
            .write()
            .await
            .set(keys::search(query), results.to_vec(), None);
    }

    pub async fn search_results(&self, query: &SearchQuery) -> Option<Vec<Product>> {
        self.search.write().await.get(&keys::search(query))
    }

    // == Categories ==
    pub async fn cache_category(&self, category: &Category) {
        self.categories
            .write()
            .await
            .set(keys::category(&category.id), category.clone(), None);
    }

    pub async fn category(&self, id: &str) -> Option<Category> {
        self.categories.write().await.get(&keys::category(id))
    }

    pub async fn cache_categories(&self, all: &[Category]) {
        self.category_list
            .write()
            .await
            .set(keys::categories(), all.to_vec(), None);
    }

    pub async fn categories(&self) -> Option<Vec<Category>> {
        self.category_list.write().await.get(&keys::categories())
    }

    // == Orders ==
    pub async fn cache_order(&self, order: &Order) {
        self.orders
            .write()
            .await
            .set(keys::order(&order.id), order.clone(), None);
    }

    pub async fn order(&self, id: &str) -> Option<Order> {
        self.orders.write().await.get(&keys::order(id))
    }

    pub async fn cache_user_orders(&self, user_id: &str, orders: &[Order]) {
        self.order_lists
            .write()
            .await
            .set(keys::user_orders(user_id), orders.to_vec(), None);
    }

    pub async fn user_orders(&self, user_id: &str) -> Option<Vec<Order>> {
        self.order_lists.write().await.get(&keys::user_orders(user_id))
    }

    // == Auth Tokens ==
    pub async fn cache_auth_token(&self, session: &AuthToken) {
        self.auth_tokens
            .write()
            .await
            .set(keys::auth_token(&session.token), session.clone(), None);
    }

    pub async fn auth_token(&self, token: &str) -> Option<AuthToken> {
        self.auth_tokens.write().await.get(&keys::auth_token(token))
    }

    // == Maintenance ==
    /// Removes expired entries from every cache; returns the total removed.
    pub async fn prune_expired(&self) -> usize {
        self.users.write().await.prune_expired()
            + self.products.write().await.prune_expired()
            + self.product_lists.write().await.prune_expired()
            + self.categories.write().await.prune_expired()
            + self.category_list.write().await.prune_expired()
            + self.orders.write().await.prune_expired()
            + self.order_lists.write().await.prune_expired()
            + self.search.write().await.prune_expired()
            + self.auth_tokens.write().await.prune_expired()
            + self.user_exists.write().await.prune_expired()
    }

    /// Empties every cache. Counters persist, matching `KeyedCache::clear`.
    pub async fn clear_all(&self) {
        self.users.write().await.clear();
        self.products.write().await.clear();
        self.product_lists.write().await.clear();
        self.categories.write().await.clear();
        self.category_list.write().await.clear();
        self.orders.write().await.clear();
        self.order_lists.write().await.clear();
        self.search.write().await.clear();
        self.auth_tokens.write().await.clear();
        self.user_exists.write().await.clear();
    }

    /// Zeroes hit/miss/eviction counters on every cache.
    pub async fn reset_stats(&self) {
        self.users.write().await.reset_stats();
        self.products.write().await.reset_stats();
        self.product_lists.write().await.reset_stats();
        self.categories.write().await.reset_stats();
        self.category_list.write().await.reset_stats();
        self.orders.write().await.reset_stats();
        self.order_lists.write().await.reset_stats();
        self.search.write().await.reset_stats();
        self.auth_tokens.write().await.reset_stats();
        self.user_exists.write().await.reset_stats();
    }

    // == Stats ==
    /// Per-domain counters for the admin system-status surface.
    pub async fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            users: self.users.read().await.stats(),
            products: self.products.read().await.stats(),
            product_lists: self.product_lists.read().await.stats(),
            categories: self.categories.read().await.stats(),
            category_list: self.category_list.read().await.stats(),
            orders: self.orders.read().await.stats(),
            order_lists: self.order_lists.read().await.stats(),
            search: self.search.read().await.stats(),
            auth_tokens: self.auth_tokens.read().await.stats(),
            user_exists: self.user_exists.read().await.stats(),
        }
    }
}

// == Stats Report ==
/// Snapshot of every domain cache's counters.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsReport {
    pub users: CacheStats,
    pub products: CacheStats,
    pub product_lists: CacheStats,
    pub categories: CacheStats,
    pub category_list: CacheStats,
    pub orders: CacheStats,
    pub order_lists: CacheStats,
    pub search: CacheStats,
    pub auth_tokens: CacheStats,
    pub user_exists: CacheStats,
}
