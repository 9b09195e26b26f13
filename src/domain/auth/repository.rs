//! Auth repository port - credentials and sessions

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::user::{Email, User, UserId};
use crate::domain::DomainError;

/// Storage abstraction for credentials and sessions
///
/// Credential records (user id + password hash) exist only behind this port;
/// the domain layer never sees a raw or hashed password after creation.
/// Session tokens are opaque strings and stay raw at this boundary.
#[async_trait]
pub trait AuthRepository: Send + Sync + Debug {
    /// Persist a hashed credential and a profile row under a freshly
    /// generated user id
    ///
    /// The storage-level uniqueness of the email is authoritative: fails with
    /// `Conflict` if the address is already registered, even when a caller's
    /// availability pre-check raced and passed.
    async fn create_user(
        &self,
        email: &Email,
        password: &str,
        name: &str,
    ) -> Result<User, DomainError>;

    /// Look up by email and compare the password against the stored hash
    ///
    /// Returns `Ok(None)` both for an unknown address and for a mismatch, so
    /// the two are indistinguishable to callers.
    async fn verify_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<User>, DomainError>;

    /// Create a session for the user and return its opaque token
    async fn create_session(&self, user_id: &UserId) -> Result<String, DomainError>;

    /// Resolve a session token to its owning user
    ///
    /// An expired session is deleted on observation and resolves to
    /// `Ok(None)`, as does an unknown token or a session whose user row is
    /// gone.
    async fn validate_session(&self, session_id: &str) -> Result<Option<User>, DomainError>;

    /// Delete a session; revoking an absent token is not an error
    async fn revoke_session(&self, session_id: &str) -> Result<(), DomainError>;

    /// Atomically replace a session with a new one for the same user
    ///
    /// Exactly one of any set of concurrent refreshes of the same token
    /// wins; the others fail with `Unauthorized`, as do refreshes of unknown
    /// or expired tokens. The old token never validates again after success.
    async fn refresh_session(&self, session_id: &str) -> Result<String, DomainError>;
}
