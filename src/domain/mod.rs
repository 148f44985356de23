//! Domain Model
//!
//! Marketplace entities as fetched from the hosted database, plus the drafts
//! and query tuples the repositories work with. The cache treats every entity
//! as an immutable snapshot valid for its TTL window.

pub mod entities;
pub mod queries;

pub use entities::{
    AuthToken, Category, CategoryUpdate, Order, OrderDraft, OrderItem, OrderStatus, Product,
    ProductDraft, ProductUpdate, User, UserRole, UserUpdate,
};
pub use queries::{CategoryPageQuery, SearchQuery, SellerPageQuery};
