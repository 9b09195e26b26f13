//! PostgreSQL auth repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::debug;

use crate::domain::auth::{AuthRepository, Session, DEFAULT_SESSION_TTL_DAYS};
use crate::domain::user::{Email, User, UserId};
use crate::domain::DomainError;
use crate::infrastructure::user::postgres::row_to_user;
use crate::infrastructure::user::PasswordHasher;

/// PostgreSQL implementation of [`AuthRepository`]
///
/// Email uniqueness is enforced by the unique index on `lower(email)`;
/// session rotation uses `DELETE ... RETURNING` as its check-and-delete
/// primitive, so it stays correct across multiple service instances.
#[derive(Debug, Clone)]
pub struct PostgresAuthRepository {
    pool: PgPool,
    hasher: Arc<dyn PasswordHasher>,
    session_ttl: Duration,
}

impl PostgresAuthRepository {
    pub fn new(pool: PgPool, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            pool,
            hasher,
            session_ttl: Duration::days(DEFAULT_SESSION_TTL_DAYS),
        }
    }

    /// Override the session lifetime (defaults to 7 days)
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    async fn insert_session(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.id())
        .bind(session.user_id().as_str())
        .bind(session.created_at())
        .bind(session.expires_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create session: {}", e)))?;

        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete session: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl AuthRepository for PostgresAuthRepository {
    async fn create_user(
        &self,
        email: &Email,
        password: &str,
        name: &str,
    ) -> Result<User, DomainError> {
        let password_hash = self.hasher.hash(password)?;
        let user = User::new(UserId::generate(), email.clone(), name, None);

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, email_verified, image,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email().as_str())
        .bind(user.name())
        .bind(&password_hash)
        .bind(user.email_verified())
        .bind(user.image())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            // the unique index on lower(email) is the authoritative
            // uniqueness check; a violation here means the address lost a race
            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Email '{}' is already registered", email))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn verify_password(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, email_verified, image,
                   created_at, updated_at
            FROM users
            WHERE lower(email) = $1
            "#,
        )
        .bind(email.normalized())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to verify password: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let password_hash: String = row.get("password_hash");
        if !self.hasher.verify(password, &password_hash) {
            return Ok(None);
        }

        Ok(Some(row_to_user(&row)?))
    }

    async fn create_session(&self, user_id: &UserId) -> Result<String, DomainError> {
        let session = Session::issue(user_id.clone(), self.session_ttl);
        self.insert_session(&session).await?;

        Ok(session.id().to_string())
    }

    async fn validate_session(&self, session_id: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to validate session: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = row.get("expires_at");
        if expires_at < Utc::now() {
            debug!(session_id, "Removing expired session on lookup");
            self.delete_session(session_id).await?;
            return Ok(None);
        }

        let user_id: String = row.get("user_id");
        let user_row = sqlx::query(
            r#"
            SELECT id, email, name, email_verified, image, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(&user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load session user: {}", e)))?;

        match user_row {
            Some(user_row) => Ok(Some(row_to_user(&user_row)?)),
            None => {
                // orphaned session, its user is gone
                self.delete_session(session_id).await?;
                Ok(None)
            }
        }
    }

    async fn revoke_session(&self, session_id: &str) -> Result<(), DomainError> {
        self.delete_session(session_id).await
    }

    async fn refresh_session(&self, session_id: &str) -> Result<String, DomainError> {
        // atomic check-and-delete: of any set of concurrent refreshes for one
        // token, exactly one gets the row back
        let row = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id = $1
            RETURNING user_id, expires_at
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to refresh session: {}", e)))?;

        let Some(row) = row else {
            return Err(DomainError::unauthorized("Session not found"));
        };

        let expires_at: DateTime<Utc> = row.get("expires_at");
        if expires_at < Utc::now() {
            return Err(DomainError::unauthorized("Session expired"));
        }

        let user_id: String = row.get("user_id");
        let user_id = UserId::new(user_id)
            .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

        self.create_session(&user_id).await
    }
}
