//! User Repository
//!
//! Read-through access to user records, the existence probe used by
//! registration, and the session lookup the auth service consumes.

use std::sync::Arc;

use crate::datastore::Datastore;
use crate::domain::{AuthToken, User, UserUpdate};
use crate::error::Result;
use crate::registry::CacheRegistry;

#[derive(Clone)]
pub struct UserRepository {
    datastore: Arc<dyn Datastore>,
    caches: CacheRegistry,
}

impl UserRepository {
    pub fn new(datastore: Arc<dyn Datastore>, caches: CacheRegistry) -> Self {
        Self { datastore, caches }
    }

    // == Reads ==
    /// Single user by id. Populating on miss also fills the email key.
    pub async fn user(&self, id: &str) -> Result<Option<User>> {
        if let Some(user) = self.caches.user(id).await {
            return Ok(Some(user));
        }
        let fetched = self.datastore.fetch_user(id).await?;
        if let Some(user) = &fetched {
            self.caches.cache_user(user).await;
        }
        Ok(fetched)
    }

    /// Single user by email.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        if let Some(user) = self.caches.user_by_email(email).await {
            return Ok(Some(user));
        }
        let fetched = self.datastore.fetch_user_by_email(email).await?;
        if let Some(user) = &fetched {
            self.caches.cache_user(user).await;
        }
        Ok(fetched)
    }

    /// Whether an account exists for the email.
    ///
    /// The one deliberate negative cache in the layer: "no such account" is
    /// cached too, with a short TTL, so registration forms don't hammer the
    /// datastore on every keystroke.
    pub async fn user_exists(&self, email: &str) -> Result<bool> {
        if let Some(exists) = self.caches.user_exists(email).await {
            return Ok(exists);
        }
        let exists = self.datastore.fetch_user_by_email(email).await?.is_some();
        self.caches.cache_user_exists(email, exists).await;
        Ok(exists)
    }

    /// Session lookup by opaque token.
    pub async fn session(&self, token: &str) -> Result<Option<AuthToken>> {
        if let Some(session) = self.caches.auth_token(token).await {
            return Ok(Some(session));
        }
        let fetched = self.datastore.fetch_session(token).await?;
        if let Some(session) = &fetched {
            self.caches.cache_auth_token(session).await;
        }
        Ok(fetched)
    }

    // == Writes ==
    /// Updates a profile, then drops the user's snapshots, existence probe,
    /// and cached sessions. Invalidation runs only after the confirmed write.
    pub async fn update_profile(&self, id: &str, changes: &UserUpdate) -> Result<User> {
        let updated = self.datastore.update_user(id, changes).await?;
        self.caches.invalidate_user(&updated.id, &updated.email).await;
        Ok(updated)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::datastore::MemoryDatastore;
    use crate::domain::UserRole;

    fn sample_user(id: &str, email: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: UserRole::Buyer,
            avatar_url: None,
        }
    }

    fn setup() -> (Arc<MemoryDatastore>, UserRepository, CacheRegistry) {
        let datastore = Arc::new(MemoryDatastore::new());
        let clock = Arc::new(ManualClock::new(0));
        let caches = CacheRegistry::with_clock(&Config::default(), clock);
        let repo = UserRepository::new(datastore.clone(), caches.clone());
        (datastore, repo, caches)
    }

    #[tokio::test]
    async fn test_cached_user_read_skips_datastore() {
        let (datastore, repo, caches) = setup();
        caches
            .cache_user(&sample_user("u1", "alice@example.com", "Alice"))
            .await;

        let user = repo.user("u1").await.unwrap().unwrap();

        assert_eq!(user.name, "Alice");
        assert_eq!(datastore.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_populates_both_id_and_email_keys() {
        let (datastore, repo, _) = setup();
        datastore.insert_user(sample_user("u1", "alice@example.com", "Alice"));

        repo.user("u1").await.unwrap();

        // The email lookup is now a hit as well
        let by_email = repo.user_by_email("alice@example.com").await.unwrap();
        assert!(by_email.is_some());
        assert_eq!(datastore.calls("fetch_user"), 1);
        assert_eq!(datastore.calls("fetch_user_by_email"), 0);
    }

    #[tokio::test]
    async fn test_user_exists_caches_negative_results() {
        let (datastore, repo, _) = setup();

        assert!(!repo.user_exists("nobody@example.com").await.unwrap());
        assert!(!repo.user_exists("nobody@example.com").await.unwrap());

        // Second probe was answered from the negative cache
        assert_eq!(datastore.calls("fetch_user_by_email"), 1);
    }

    #[tokio::test]
    async fn test_profile_update_invalidates_cached_user() {
        let (datastore, repo, _) = setup();
        datastore.insert_user(sample_user("u1", "alice@example.com", "Alice"));

        // Warm the cache
        assert_eq!(repo.user("u1").await.unwrap().unwrap().name, "Alice");

        let changes = UserUpdate {
            name: Some("Bob".to_string()),
            ..UserUpdate::default()
        };
        repo.update_profile("u1", &changes).await.unwrap();

        // The next read must observe the new name, not the stale snapshot
        assert_eq!(repo.user("u1").await.unwrap().unwrap().name, "Bob");
        assert_eq!(datastore.calls("fetch_user"), 2);
    }

    #[tokio::test]
    async fn test_profile_update_drops_cached_sessions() {
        let (datastore, repo, caches) = setup();
        datastore.insert_user(sample_user("u1", "alice@example.com", "Alice"));
        datastore.insert_session(AuthToken {
            token: "tok-1".to_string(),
            user_id: "u1".to_string(),
        });

        // Warm the session cache
        assert!(repo.session("tok-1").await.unwrap().is_some());
        assert!(caches.auth_token("tok-1").await.is_some());

        repo.update_profile("u1", &UserUpdate::default()).await.unwrap();

        // The cached session is gone; the next lookup refetches
        assert!(caches.auth_token("tok-1").await.is_none());
        assert!(repo.session("tok-1").await.unwrap().is_some());
        assert_eq!(datastore.calls("fetch_session"), 2);
    }

    #[tokio::test]
    async fn test_session_hit_skips_datastore() {
        let (datastore, repo, _) = setup();
        datastore.insert_session(AuthToken {
            token: "tok-1".to_string(),
            user_id: "u1".to_string(),
        });

        repo.session("tok-1").await.unwrap();
        repo.session("tok-1").await.unwrap();

        assert_eq!(datastore.calls("fetch_session"), 1);
    }
}
