//! In-memory storage backing the user and auth repositories
//!
//! Profiles, credential hashes and sessions live in one store so that a user
//! created through the auth repository is immediately visible through the
//! user repository, mirroring how the production tables share a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::auth::Session;
use crate::domain::user::{Email, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct StoreInner {
    /// Keyed by user id
    users: HashMap<String, StoredUser>,
    /// Lowercased email -> user id
    email_index: HashMap<String, String>,
    /// Keyed by session token
    sessions: HashMap<String, Session>,
}

/// Shared in-memory backend; cheap to clone, all clones see the same data
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new profile with its credential hash
    ///
    /// The write lock spans both uniqueness checks and the insert, which is
    /// what makes email uniqueness authoritative here.
    pub async fn insert_user(&self, user: User, password_hash: String) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        let id = user.id().as_str().to_string();
        let email_key = user.email().normalized();

        if inner.users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        if inner.email_index.contains_key(&email_key) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email()
            )));
        }

        inner.email_index.insert(email_key, id.clone());
        inner.users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );

        Ok(user)
    }

    pub(crate) async fn get_user(&self, id: &UserId) -> Option<User> {
        let inner = self.inner.read().await;
        inner.users.get(id.as_str()).map(|s| s.user.clone())
    }

    pub(crate) async fn get_user_with_hash(&self, email: &Email) -> Option<(User, String)> {
        let inner = self.inner.read().await;
        let id = inner.email_index.get(&email.normalized())?;
        inner
            .users
            .get(id)
            .map(|s| (s.user.clone(), s.password_hash.clone()))
    }

    pub(crate) async fn update_user(&self, user: &User) -> Result<User, DomainError> {
        let mut inner = self.inner.write().await;

        let id = user.id().as_str().to_string();
        let Some(stored) = inner.users.get_mut(&id) else {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        };

        // id and email are fixed at creation, so the email index is stable
        stored.user = user.clone();
        Ok(user.clone())
    }

    pub(crate) async fn remove_user(&self, id: &UserId) {
        let mut inner = self.inner.write().await;

        if let Some(stored) = inner.users.remove(id.as_str()) {
            inner.email_index.remove(&stored.user.email().normalized());
            inner.sessions.retain(|_, s| s.user_id() != id);
        }
    }

    pub(crate) async fn insert_session(&self, session: Session) {
        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.id().to_string(), session);
    }

    pub(crate) async fn get_session(&self, session_id: &str) -> Option<Session> {
        let inner = self.inner.read().await;
        inner.sessions.get(session_id).cloned()
    }

    /// Remove a session, returning it if it was present
    ///
    /// This is the check-and-delete primitive rotation relies on: of any set
    /// of concurrent callers for one token, exactly one observes `Some`.
    pub(crate) async fn take_session(&self, session_id: &str) -> Option<Session> {
        let mut inner = self.inner.write().await;
        inner.sessions.remove(session_id)
    }
}

/// In-memory implementation of [`UserRepository`]
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.store.get_user(id).await)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        Ok(self.store.get_user_with_hash(email).await.map(|(u, _)| u))
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        self.store.update_user(user).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        self.store.remove_user(id).await;
        Ok(())
    }
}
