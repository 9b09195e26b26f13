//! Cross-aggregate invariant checks over the user repository

use std::sync::Arc;

use super::entity::{Email, User, UserId};
use super::repository::UserRepository;
use crate::domain::DomainError;

/// Domain service for uniqueness and existence invariants
#[derive(Debug)]
pub struct UserDomainService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserDomainService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// True iff no user is registered under the address
    ///
    /// The repository remains authoritative: a concurrent registration can
    /// still win between this check and a subsequent create, so callers must
    /// treat a storage-level conflict as the final word.
    pub async fn is_email_available(&self, email: &Email) -> Result<bool, DomainError> {
        Ok(self.repository.find_by_email(email).await?.is_none())
    }

    /// Fetch a user by id, failing with `NotFound` if absent
    pub async fn validate_user_exists(&self, id: &UserId) -> Result<User, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }
}
