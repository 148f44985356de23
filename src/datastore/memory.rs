//! In-Memory Datastore
//!
//! A `Datastore` backed by hash maps, used by the test suite and for local
//! development without a database. Records how many times each operation is
//! called so read-through behavior can be asserted precisely.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    AuthToken, Category, CategoryPageQuery, CategoryUpdate, Order, OrderDraft, OrderStatus,
    Product, ProductDraft, ProductUpdate, SearchQuery, SellerPageQuery, User, UserUpdate,
};
use crate::error::{DatastoreError, Result};

use super::Datastore;

// == Tables ==
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, User>,
    products: HashMap<String, Product>,
    categories: HashMap<String, Category>,
    orders: HashMap<String, Order>,
    sessions: HashMap<String, AuthToken>,
}

// == Memory Datastore ==
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    tables: Mutex<Tables>,
    calls: Mutex<HashMap<&'static str, usize>>,
    fail_next: Mutex<Option<String>>,
    next_id: AtomicU64,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    // == Seeding ==
    pub fn insert_user(&self, user: User) {
        self.lock_tables().users.insert(user.id.clone(), user);
    }

    pub fn insert_product(&self, product: Product) {
        self.lock_tables().products.insert(product.id.clone(), product);
    }

    pub fn insert_category(&self, category: Category) {
        self.lock_tables().categories.insert(category.id.clone(), category);
    }

    pub fn insert_order(&self, order: Order) {
        self.lock_tables().orders.insert(order.id.clone(), order);
    }

    pub fn insert_session(&self, session: AuthToken) {
        self.lock_tables().sessions.insert(session.token.clone(), session);
    }

    // == Call Accounting ==
    /// How many times the named operation has run.
    pub fn calls(&self, operation: &str) -> usize {
        self.lock_calls().get(operation).copied().unwrap_or(0)
    }

    /// Total operations run across all methods.
    pub fn total_calls(&self) -> usize {
        self.lock_calls().values().sum()
    }

    // == Failure Injection ==
    /// Makes the next operation fail with `DatastoreError::Unavailable`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self
            .fail_next
            .lock()
            .expect("datastore failure flag poisoned") = Some(message.into());
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("datastore tables poisoned")
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, usize>> {
        self.calls.lock().expect("datastore call log poisoned")
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        *self.lock_calls().entry(operation).or_insert(0) += 1;
        if let Some(message) = self
            .fail_next
            .lock()
            .expect("datastore failure flag poisoned")
            .take()
        {
            return Err(DatastoreError::Unavailable(message));
        }
        Ok(())
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", prefix, n)
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn fetch_user(&self, id: &str) -> Result<Option<User>> {
        self.record("fetch_user")?;
        Ok(self.lock_tables().users.get(id).cloned())
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.record("fetch_user_by_email")?;
        Ok(self
            .lock_tables()
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn update_user(&self, id: &str, changes: &UserUpdate) -> Result<User> {
        self.record("update_user")?;
        let mut tables = self.lock_tables();
        let user = tables
            .users
            .get_mut(id)
            .ok_or_else(|| DatastoreError::NotFound(format!("users?id=eq.{}", id)))?;
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(avatar_url) = &changes.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        Ok(user.clone())
    }

    async fn fetch_session(&self, token: &str) -> Result<Option<AuthToken>> {
        self.record("fetch_session")?;
        Ok(self.lock_tables().sessions.get(token).cloned())
    }

    async fn fetch_product(&self, id: &str) -> Result<Option<Product>> {
        self.record("fetch_product")?;
        Ok(self.lock_tables().products.get(id).cloned())
    }

    async fn fetch_products_by_category(&self, query: &CategoryPageQuery) -> Result<Vec<Product>> {
        self.record("fetch_products_by_category")?;
        let mut page: Vec<Product> = self
            .lock_tables()
            .products
            .values()
            .filter(|product| product.category_id == query.category_id)
            .cloned()
            .collect();
        page.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(page
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn fetch_products_by_seller(&self, query: &SellerPageQuery) -> Result<Vec<Product>> {
        self.record("fetch_products_by_seller")?;
        let mut page: Vec<Product> = self
            .lock_tables()
            .products
            .values()
            .filter(|product| product.seller_id == query.seller_id)
            .cloned()
            .collect();
        page.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(page
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Product>> {
        self.record("search_products")?;
        let term = query.term.to_lowercase();
        let mut found: Vec<Product> = self
            .lock_tables()
            .products
            .values()
            .filter(|product| {
                product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found.truncate(query.limit as usize);
        Ok(found)
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        self.record("create_product")?;
        let product = Product {
            id: self.fresh_id("product"),
            name: draft.name.clone(),
            description: draft.description.clone(),
            price_cents: draft.price_cents,
            category_id: draft.category_id.clone(),
            seller_id: draft.seller_id.clone(),
            stock: draft.stock,
            created_at: None,
        };
        self.lock_tables()
            .products
            .insert(product.id.clone(), product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: &str, changes: &ProductUpdate) -> Result<Product> {
        self.record("update_product")?;
        let mut tables = self.lock_tables();
        let product = tables
            .products
            .get_mut(id)
            .ok_or_else(|| DatastoreError::NotFound(format!("products?id=eq.{}", id)))?;
        if let Some(name) = &changes.name {
            product.name = name.clone();
        }
        if let Some(description) = &changes.description {
            product.description = description.clone();
        }
        if let Some(price_cents) = changes.price_cents {
            product.price_cents = price_cents;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(category_id) = &changes.category_id {
            product.category_id = category_id.clone();
        }
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        self.record("delete_product")?;
        self.lock_tables().products.remove(id);
        Ok(())
    }

    async fn fetch_category(&self, id: &str) -> Result<Option<Category>> {
        self.record("fetch_category")?;
        Ok(self.lock_tables().categories.get(id).cloned())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        self.record("fetch_categories")?;
        let mut all: Vec<Category> = self.lock_tables().categories.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update_category(&self, id: &str, changes: &CategoryUpdate) -> Result<Category> {
        self.record("update_category")?;
        let mut tables = self.lock_tables();
        let category = tables
            .categories
            .get_mut(id)
            .ok_or_else(|| DatastoreError::NotFound(format!("categories?id=eq.{}", id)))?;
        if let Some(name) = &changes.name {
            category.name = name.clone();
        }
        if let Some(slug) = &changes.slug {
            category.slug = slug.clone();
        }
        Ok(category.clone())
    }

    async fn fetch_order(&self, id: &str) -> Result<Option<Order>> {
        self.record("fetch_order")?;
        Ok(self.lock_tables().orders.get(id).cloned())
    }

    async fn fetch_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        self.record("fetch_orders_for_user")?;
        let mut orders: Vec<Order> = self
            .lock_tables()
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(orders)
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<Order> {
        self.record("create_order")?;
        let total_cents = draft
            .items
            .iter()
            .map(|item| item.unit_price_cents * item.quantity as i64)
            .sum();
        let order = Order {
            id: self.fresh_id("order"),
            user_id: draft.user_id.clone(),
            items: draft.items.clone(),
            total_cents,
            status: OrderStatus::Pending,
        };
        self.lock_tables()
            .orders
            .insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order> {
        self.record("update_order_status")?;
        let mut tables = self.lock_tables();
        let order = tables
            .orders
            .get_mut(id)
            .ok_or_else(|| DatastoreError::NotFound(format!("orders?id=eq.{}", id)))?;
        order.status = status;
        Ok(order.clone())
    }
}
