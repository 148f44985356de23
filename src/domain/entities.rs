//! Marketplace entities and mutation drafts
//!
//! Row shapes mirror the hosted database tables; drafts are the partial
//! bodies sent with writes.

use serde::{Deserialize, Serialize};

// == User ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Seller,
    Buyer,
}

// == Product ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub category_id: String,
    pub seller_id: String,
    pub stock: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

// == Category ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

// == Order ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total_cents: i64,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

// == Auth Token ==
/// A session row tying an opaque token to its user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    pub user_id: String,
}

// == Mutation Drafts ==
/// Partial user update; unset fields are left untouched by the datastore.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Partial product update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// A complete new listing; the datastore assigns the id.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub category_id: String,
    pub seller_id: String,
    pub stock: u32,
}

/// Partial category update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// A new order; the datastore assigns the id and computes the total.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    pub user_id: String,
    pub items: Vec<OrderItem>,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_deserializes_with_defaults() {
        let json = r#"{
            "id": "p1",
            "name": "Wireless Mouse",
            "price_cents": 2999,
            "category_id": "c1",
            "seller_id": "s1",
            "stock": 12
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, "p1");
        assert_eq!(product.description, "");
        assert!(product.created_at.is_none());
    }

    #[test]
    fn test_order_status_uses_lowercase_wire_form() {
        let json = serde_json::to_string(&OrderStatus::Shipped).unwrap();
        assert_eq!(json, r#""shipped""#);

        let parsed: OrderStatus = serde_json::from_str(r#""cancelled""#).unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }

    #[test]
    fn test_user_update_skips_unset_fields() {
        let update = UserUpdate {
            name: Some("Bob".to_string()),
            ..UserUpdate::default()
        };
        let json = serde_json::to_string(&update).unwrap();

        assert_eq!(json, r#"{"name":"Bob"}"#);
    }

    #[test]
    fn test_user_role_round_trip() {
        let json = serde_json::to_string(&UserRole::Seller).unwrap();
        assert_eq!(json, r#""seller""#);
        let parsed: UserRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, UserRole::Seller);
    }
}
