//! Write-Side Invalidation
//!
//! Fan-out hooks run after a confirmed successful write, before the mutation
//! call returns. Entity keys are deleted directly; list and search entries
//! that could contain the entity are dropped by structured prefix, accepting
//! some over-invalidation.

use tracing::debug;

use crate::domain::Product;
use crate::keys;
use crate::registry::CacheRegistry;

impl CacheRegistry {
    // == Products ==
    /// Invalidates everything a product mutation could have touched, scoped
    /// to the product's category and seller.
    pub async fn invalidate_product(&self, product: &Product) {
        self.products.write().await.delete(&keys::product(&product.id));
        {
            let mut lists = self.product_lists.write().await;
            lists.invalidate_prefix(&keys::category_pages(&product.category_id));
            lists.invalidate_prefix(&keys::seller_pages(&product.seller_id));
        }
        // Any search could have matched the product
        self.search.write().await.clear();
        debug!(product = %product.id, "product cache invalidated");
    }

    /// Coarse product invalidation for when only the id survives (deletes).
    /// Drops every list page and search result.
    pub async fn invalidate_product_by_id(&self, id: &str) {
        self.products.write().await.delete(&keys::product(id));
        self.product_lists.write().await.clear();
        self.search.write().await.clear();
        debug!(product = %id, "product cache invalidated (coarse)");
    }

    // == Users ==
    /// Invalidates a user's snapshots, the existence probe for their email,
    /// and every cached auth token belonging to them. Stale auth data must
    /// not survive a profile or credential change.
    pub async fn invalidate_user(&self, id: &str, email: &str) {
        {
            let mut users = self.users.write().await;
            users.delete(&keys::user(id));
            users.delete(&keys::user_email(email));
        }
        self.user_exists.write().await.delete(&keys::user_exists(email));
        let purged = self
            .auth_tokens
            .write()
            .await
            .purge_where(|_, session| session.user_id == id);
        debug!(user = %id, purged_tokens = purged, "user cache invalidated");
    }

    // == Categories ==
    /// Invalidates a category, the category list, that category's product
    /// pages, and all search results.
    pub async fn invalidate_category(&self, id: &str) {
        self.categories.write().await.delete(&keys::category(id));
        self.category_list.write().await.delete(&keys::categories());
        self.product_lists
            .write()
            .await
            .invalidate_prefix(&keys::category_pages(id));
        self.search.write().await.clear();
        debug!(category = %id, "category cache invalidated");
    }

    // == Orders ==
    /// Invalidates an order and the owning user's order list.
    pub async fn invalidate_order(&self, id: &str, user_id: &str) {
        self.orders.write().await.delete(&keys::order(id));
        self.order_lists.write().await.delete(&keys::user_orders(user_id));
        debug!(order = %id, user = %user_id, "order cache invalidated");
    }
}
