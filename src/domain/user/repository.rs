//! User repository port

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Email, User, UserId};
use crate::domain::DomainError;

/// Storage abstraction for [`User`] aggregates
///
/// Implementations pass aggregates by value; callers never hold a reference
/// into a repository's internal state.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Find a user by their ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email; the lookup is case-insensitive
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError>;

    /// Persist changes to an existing user
    ///
    /// Update-only: saving an id that does not exist fails with `NotFound`,
    /// it is not an upsert. Profile rows are created through the auth
    /// repository at registration.
    async fn save(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user; deleting an absent id is not an error
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;
}
