//! Key Builders
//!
//! One place for every cache key template, so repositories and invalidation
//! hooks can never drift apart on naming.

use crate::cache::CacheKey;
use crate::domain::{CategoryPageQuery, SearchQuery, SellerPageQuery};

/// `user:{id}`
pub fn user(id: &str) -> CacheKey {
    CacheKey::new("user").segment(id)
}

/// `user:email:{email}`
pub fn user_email(email: &str) -> CacheKey {
    CacheKey::new("user").segment("email").segment(email)
}

/// `user-exists:{email}`
pub fn user_exists(email: &str) -> CacheKey {
    CacheKey::new("user-exists").segment(email)
}

/// `product:{id}`
pub fn product(id: &str) -> CacheKey {
    CacheKey::new("product").segment(id)
}

/// `products:category:{categoryId}:{limit}:{offset}`
pub fn category_page(query: &CategoryPageQuery) -> CacheKey {
    CacheKey::new("products")
        .segment("category")
        .segment(&query.category_id)
        .segment(query.limit)
        .segment(query.offset)
}

/// Prefix covering every cached page of one category.
pub fn category_pages(category_id: &str) -> CacheKey {
    CacheKey::new("products").segment("category").segment(category_id)
}

/// `products:seller:{sellerId}:{limit}:{offset}`
pub fn seller_page(query: &SellerPageQuery) -> CacheKey {
    CacheKey::new("products")
        .segment("seller")
        .segment(&query.seller_id)
        .segment(query.limit)
        .segment(query.offset)
}

/// Prefix covering every cached page of one seller's listings.
pub fn seller_pages(seller_id: &str) -> CacheKey {
    CacheKey::new("products").segment("seller").segment(seller_id)
}

/// `search:{term}:{limit}`
pub fn search(query: &SearchQuery) -> CacheKey {
    CacheKey::new("search").segment(&query.term).segment(query.limit)
}

/// `category:{id}`
pub fn category(id: &str) -> CacheKey {
    CacheKey::new("category").segment(id)
}

/// `categories:all`
pub fn categories() -> CacheKey {
    CacheKey::new("categories").segment("all")
}

/// `token:{token}`
pub fn auth_token(token: &str) -> CacheKey {
    CacheKey::new("token").segment(token)
}

/// `order:{id}`
pub fn order(id: &str) -> CacheKey {
    CacheKey::new("order").segment(id)
}

/// `orders:user:{userId}`
pub fn user_orders(user_id: &str) -> CacheKey {
    CacheKey::new("orders").segment("user").segment(user_id)
}
