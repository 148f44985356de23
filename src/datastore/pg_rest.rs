//! Postgres REST Client
//!
//! Thin `Datastore` implementation over the hosted database's HTTP interface
//! (PostgREST-style filters: `col=eq.value`, `or=(...)`, `order`, `limit`,
//! `offset`). Each method builds one query string; nothing is cached here.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use urlencoding::encode;

use crate::config::Config;
use crate::domain::{
    AuthToken, Category, CategoryPageQuery, CategoryUpdate, Order, OrderDraft, OrderStatus,
    Product, ProductDraft, ProductUpdate, SearchQuery, SellerPageQuery, User, UserUpdate,
};
use crate::error::{DatastoreError, Result};

use super::Datastore;

// == Client ==
/// HTTP client for the hosted Postgres API.
#[derive(Debug, Clone)]
pub struct PgRestDatastore {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl PgRestDatastore {
    // == Constructors ==
    /// Creates a client for the given base URL with an optional API key.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.database_url.clone(), config.database_api_key.clone())
    }

    // == Request Plumbing ==
    fn request(&self, method: Method, path_and_query: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path_and_query);
        let mut builder = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key));
        }
        builder
    }

    async fn rows<T: DeserializeOwned>(
        builder: RequestBuilder,
        context: &str,
    ) -> Result<Vec<T>> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DatastoreError::Status {
                status: status.as_u16(),
                context: context.to_string(),
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| DatastoreError::Decode {
            context: context.to_string(),
            source,
        })
    }

    /// GET returning all matching rows.
    async fn get_rows<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<Vec<T>> {
        Self::rows(self.request(Method::GET, path_and_query), path_and_query).await
    }

    /// GET returning the first matching row, if any.
    async fn first_row<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<Option<T>> {
        Ok(self.get_rows(path_and_query).await?.into_iter().next())
    }

    /// Write (POST/PATCH) asking the API to echo the affected rows back.
    async fn write_rows<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path_and_query: &str,
        body: &B,
    ) -> Result<Vec<T>> {
        let builder = self
            .request(method, path_and_query)
            .header("Prefer", "return=representation")
            .json(body);
        Self::rows(builder, path_and_query).await
    }

    /// Write that must affect exactly one existing row.
    async fn write_single<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path_and_query: &str,
        body: &B,
    ) -> Result<T> {
        self.write_rows(method, path_and_query, body)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DatastoreError::NotFound(path_and_query.to_string()))
    }
}

#[async_trait]
impl Datastore for PgRestDatastore {
    async fn fetch_user(&self, id: &str) -> Result<Option<User>> {
        self.first_row(&format!("users?id=eq.{}&limit=1", encode(id)))
            .await
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.first_row(&format!("users?email=eq.{}&limit=1", encode(email)))
            .await
    }

    async fn update_user(&self, id: &str, changes: &UserUpdate) -> Result<User> {
        self.write_single(
            Method::PATCH,
            &format!("users?id=eq.{}", encode(id)),
            changes,
        )
        .await
    }

    async fn fetch_session(&self, token: &str) -> Result<Option<AuthToken>> {
        self.first_row(&format!("sessions?token=eq.{}&limit=1", encode(token)))
            .await
    }

    async fn fetch_product(&self, id: &str) -> Result<Option<Product>> {
        self.first_row(&format!("products?id=eq.{}&limit=1", encode(id)))
            .await
    }

    async fn fetch_products_by_category(&self, query: &CategoryPageQuery) -> Result<Vec<Product>> {
        self.get_rows(&format!(
            "products?category_id=eq.{}&order=created_at.desc&limit={}&offset={}",
            encode(&query.category_id),
            query.limit,
            query.offset
        ))
        .await
    }

    async fn fetch_products_by_seller(&self, query: &SellerPageQuery) -> Result<Vec<Product>> {
        self.get_rows(&format!(
            "products?seller_id=eq.{}&order=created_at.desc&limit={}&offset={}",
            encode(&query.seller_id),
            query.limit,
            query.offset
        ))
        .await
    }

    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Product>> {
        let term = encode(&query.term);
        self.get_rows(&format!(
            "products?or=(name.ilike.*{term}*,description.ilike.*{term}*)&limit={}",
            query.limit
        ))
        .await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        self.write_single(Method::POST, "products", draft).await
    }

    async fn update_product(&self, id: &str, changes: &ProductUpdate) -> Result<Product> {
        self.write_single(
            Method::PATCH,
            &format!("products?id=eq.{}", encode(id)),
            changes,
        )
        .await
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        let path = format!("products?id=eq.{}", encode(id));
        let response = self.request(Method::DELETE, &path).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DatastoreError::Status {
                status: status.as_u16(),
                context: path,
            });
        }
        Ok(())
    }

    async fn fetch_category(&self, id: &str) -> Result<Option<Category>> {
        self.first_row(&format!("categories?id=eq.{}&limit=1", encode(id)))
            .await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        self.get_rows("categories?order=name.asc").await
    }

    async fn update_category(&self, id: &str, changes: &CategoryUpdate) -> Result<Category> {
        self.write_single(
            Method::PATCH,
            &format!("categories?id=eq.{}", encode(id)),
            changes,
        )
        .await
    }

    async fn fetch_order(&self, id: &str) -> Result<Option<Order>> {
        self.first_row(&format!("orders?id=eq.{}&limit=1", encode(id)))
            .await
    }

    async fn fetch_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        self.get_rows(&format!(
            "orders?user_id=eq.{}&order=created_at.desc",
            encode(user_id)
        ))
        .await
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<Order> {
        self.write_single(Method::POST, "orders", draft).await
    }

    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order> {
        self.write_single(
            Method::PATCH,
            &format!("orders?id=eq.{}", encode(id)),
            &json!({ "status": status }),
        )
        .await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = PgRestDatastore::new("http://db.internal/", None);
        assert_eq!(client.base_url, "http://db.internal");
    }

    #[test]
    fn test_from_config_picks_up_endpoint() {
        let config = Config {
            database_url: "http://db.internal:3000".to_string(),
            database_api_key: Some("secret".to_string()),
            ..Config::default()
        };
        let client = PgRestDatastore::from_config(&config);
        assert_eq!(client.base_url, "http://db.internal:3000");
        assert_eq!(client.api_key.as_deref(), Some("secret"));
    }
}
