//! In-memory implementation of the auth repository

use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use tracing::debug;

use crate::domain::auth::{AuthRepository, Session, DEFAULT_SESSION_TTL_DAYS};
use crate::domain::user::{Email, User, UserId};
use crate::domain::DomainError;
use crate::infrastructure::user::{InMemoryStore, PasswordHasher};

/// In-memory [`AuthRepository`] over the shared store
///
/// Password hashes never leave this type; the domain layer only ever sees the
/// reconstructed [`User`] aggregate.
#[derive(Debug, Clone)]
pub struct InMemoryAuthRepository {
    store: InMemoryStore,
    hasher: Arc<dyn PasswordHasher>,
    session_ttl: Duration,
}

impl InMemoryAuthRepository {
    pub fn new(store: InMemoryStore, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            session_ttl: Duration::days(DEFAULT_SESSION_TTL_DAYS),
        }
    }

    /// Override the session lifetime (defaults to 7 days)
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn create_user(
        &self,
        email: &Email,
        password: &str,
        name: &str,
    ) -> Result<User, DomainError> {
        let password_hash = self.hasher.hash(password)?;
        let user = User::new(UserId::generate(), email.clone(), name, None);

        self.store.insert_user(user, password_hash).await
    }

    async fn verify_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some((user, hash)) = self.store.get_user_with_hash(email).await else {
            return Ok(None);
        };

        if !self.hasher.verify(password, &hash) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    async fn create_session(&self, user_id: &UserId) -> Result<String, DomainError> {
        let session = Session::issue(user_id.clone(), self.session_ttl);
        let token = session.id().to_string();

        self.store.insert_session(session).await;
        Ok(token)
    }

    async fn validate_session(&self, session_id: &str) -> Result<Option<User>, DomainError> {
        let Some(session) = self.store.get_session(session_id).await else {
            return Ok(None);
        };

        if session.is_expired() {
            debug!(session_id, "Removing expired session on lookup");
            self.store.take_session(session_id).await;
            return Ok(None);
        }

        match self.store.get_user(session.user_id()).await {
            Some(user) => Ok(Some(user)),
            None => {
                // orphaned session, its user is gone
                self.store.take_session(session_id).await;
                Ok(None)
            }
        }
    }

    async fn revoke_session(&self, session_id: &str) -> Result<(), DomainError> {
        self.store.take_session(session_id).await;
        Ok(())
    }

    async fn refresh_session(&self, session_id: &str) -> Result<String, DomainError> {
        // take_session is the atomic check-and-delete: a concurrent refresh
        // of the same token observes None here and fails
        let Some(session) = self.store.take_session(session_id).await else {
            return Err(DomainError::unauthorized("Session not found"));
        };

        if session.is_expired() {
            return Err(DomainError::unauthorized("Session expired"));
        }

        let replacement = Session::issue(session.user_id().clone(), self.session_ttl);
        let token = replacement.id().to_string();

        self.store.insert_session(replacement).await;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::Argon2Hasher;

    fn repo() -> InMemoryAuthRepository {
        InMemoryAuthRepository::new(InMemoryStore::new(), Arc::new(Argon2Hasher::new()))
    }

    fn email() -> Email {
        Email::new("ada@example.com").unwrap()
    }

    #[tokio::test]
    async fn test_create_user_and_verify_password() {
        let repo = repo();

        let user = repo.create_user(&email(), "secret-pw-1", "Ada").await.unwrap();
        assert_eq!(user.email(), &email());
        assert!(!user.email_verified());

        let verified = repo.verify_password(&email(), "secret-pw-1").await.unwrap();
        assert_eq!(verified.unwrap().id(), user.id());

        let rejected = repo.verify_password(&email(), "wrong").await.unwrap();
        assert!(rejected.is_none());
    }

    #[tokio::test]
    async fn test_unknown_email_and_bad_password_look_alike() {
        let repo = repo();
        repo.create_user(&email(), "secret-pw-1", "Ada").await.unwrap();

        let unknown = repo
            .verify_password(&Email::new("ghost@example.com").unwrap(), "secret-pw-1")
            .await
            .unwrap();
        let mismatch = repo.verify_password(&email(), "wrong").await.unwrap();

        assert!(unknown.is_none());
        assert!(mismatch.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_create_conflicts() {
        let repo = repo();
        repo.create_user(&email(), "secret-pw-1", "Ada").await.unwrap();

        let result = repo.create_user(&email(), "other-pw-22", "Imposter").await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let repo = repo();
        let user = repo.create_user(&email(), "secret-pw-1", "Ada").await.unwrap();

        let token = repo.create_session(user.id()).await.unwrap();

        let resolved = repo.validate_session(&token).await.unwrap();
        assert_eq!(resolved.unwrap().id(), user.id());

        repo.revoke_session(&token).await.unwrap();
        assert!(repo.validate_session(&token).await.unwrap().is_none());

        // revoke is idempotent
        repo.revoke_session(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_session_is_lazily_deleted() {
        let repo = InMemoryAuthRepository::new(InMemoryStore::new(), Arc::new(Argon2Hasher::new()))
            .with_session_ttl(Duration::seconds(-1));
        let user = repo.create_user(&email(), "secret-pw-1", "Ada").await.unwrap();

        let token = repo.create_session(user.id()).await.unwrap();

        assert!(repo.validate_session(&token).await.unwrap().is_none());
        // the lookup deleted it, so refresh now reports not-found
        let err = repo.refresh_session(&token).await.unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized: Session not found");
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let repo = repo();
        let user = repo.create_user(&email(), "secret-pw-1", "Ada").await.unwrap();
        let old = repo.create_session(user.id()).await.unwrap();

        let new = repo.refresh_session(&old).await.unwrap();
        assert_ne!(old, new);

        assert!(repo.validate_session(&old).await.unwrap().is_none());
        assert_eq!(
            repo.validate_session(&new).await.unwrap().unwrap().id(),
            user.id()
        );
    }

    #[tokio::test]
    async fn test_refresh_of_rotated_token_fails() {
        let repo = repo();
        let user = repo.create_user(&email(), "secret-pw-1", "Ada").await.unwrap();
        let old = repo.create_session(user.id()).await.unwrap();

        repo.refresh_session(&old).await.unwrap();

        let result = repo.refresh_session(&old).await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_refresh_has_one_winner() {
        let repo = repo();
        let user = repo.create_user(&email(), "secret-pw-1", "Ada").await.unwrap();
        let token = repo.create_session(user.id()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            let token = token.clone();
            handles.push(tokio::spawn(
                async move { repo.refresh_session(&token).await },
            ));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_orphaned_session_resolves_to_none() {
        let store = InMemoryStore::new();
        let repo = InMemoryAuthRepository::new(store.clone(), Arc::new(Argon2Hasher::new()));
        let user = repo.create_user(&email(), "secret-pw-1", "Ada").await.unwrap();
        let token = repo.create_session(user.id()).await.unwrap();

        store.remove_user(user.id()).await;

        assert!(repo.validate_session(&token).await.unwrap().is_none());
    }
}
