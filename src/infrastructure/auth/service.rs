//! Authentication use case - login, register, logout, refresh, validate

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::auth::AuthRepository;
use crate::domain::user::{
    validate_name, validate_password, Email, User, UserDomainService, UserRepository,
};
use crate::domain::DomainError;

/// Command to authenticate with email and password
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Command to register a new account
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Command to rotate a session token
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenCommand {
    pub session_id: String,
}

/// Command to revoke a session
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutCommand {
    pub session_id: String,
}

/// Successful login/registration result
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub session_id: String,
}

/// Successful rotation result
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub session_id: String,
}

/// Orchestrates credential verification and the session lifecycle
#[derive(Debug)]
pub struct AuthService<A: AuthRepository, U: UserRepository> {
    auth_repository: Arc<A>,
    user_domain_service: UserDomainService<U>,
}

impl<A: AuthRepository, U: UserRepository> AuthService<A, U> {
    pub fn new(auth_repository: Arc<A>, user_repository: Arc<U>) -> Self {
        Self {
            auth_repository,
            user_domain_service: UserDomainService::new(user_repository),
        }
    }

    /// Authenticate and open a new session
    ///
    /// Credential mismatch and unknown email are indistinguishable to the
    /// caller. Concurrent logins for one account each get an independent
    /// session.
    pub async fn login(&self, command: LoginCommand) -> Result<AuthResponse, DomainError> {
        let email = Email::new(&command.email)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        info!(email = %email, "Login attempt");

        let user = self
            .auth_repository
            .verify_password(&email, &command.password)
            .await?
            .ok_or_else(|| DomainError::unauthorized("Invalid credentials"))?;

        let session_id = self.auth_repository.create_session(user.id()).await?;

        info!(user_id = %user.id(), "Login successful");

        Ok(AuthResponse { user, session_id })
    }

    /// Create an account and open its first session
    ///
    /// The availability pre-check gives a friendly `Conflict` early; the
    /// storage-level unique constraint remains the authoritative check when
    /// two registrations race.
    pub async fn register(&self, command: RegisterCommand) -> Result<AuthResponse, DomainError> {
        let email = Email::new(&command.email)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&command.password).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_name(&command.name).map_err(|e| DomainError::validation(e.to_string()))?;

        info!(email = %email, "Registration attempt");

        if !self.user_domain_service.is_email_available(&email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let user = self
            .auth_repository
            .create_user(&email, &command.password, &command.name)
            .await?;

        let session_id = self.auth_repository.create_session(user.id()).await?;

        info!(user_id = %user.id(), "Registration successful");

        Ok(AuthResponse { user, session_id })
    }

    /// Revoke a session; revoking an already-absent session succeeds
    pub async fn logout(&self, command: LogoutCommand) -> Result<(), DomainError> {
        self.auth_repository
            .revoke_session(&command.session_id)
            .await?;

        info!("Logout successful");
        Ok(())
    }

    /// Rotate a session token
    ///
    /// The old token never validates again after this returns successfully.
    pub async fn refresh_token(
        &self,
        command: RefreshTokenCommand,
    ) -> Result<RefreshResponse, DomainError> {
        let session_id = self
            .auth_repository
            .refresh_session(&command.session_id)
            .await?;

        info!("Session rotated");
        Ok(RefreshResponse { session_id })
    }

    /// Resolve a session token to its user, failing closed
    ///
    /// Any failure - unknown token, expired session, or an infrastructure
    /// error - yields `None`. The underlying cause is logged, never surfaced
    /// to the caller.
    pub async fn validate_session(&self, session_id: &str) -> Option<User> {
        match self.auth_repository.validate_session(session_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Session validation failed");
                None
            }
        }
    }
}
