//! PostgreSQL schema bootstrap for the auth tables

use sqlx::PgPool;

use crate::domain::DomainError;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id             TEXT PRIMARY KEY,
    email          TEXT NOT NULL,
    name           TEXT NOT NULL,
    password_hash  TEXT NOT NULL,
    email_verified BOOLEAN NOT NULL DEFAULT FALSE,
    image          TEXT,
    created_at     TIMESTAMPTZ NOT NULL,
    updated_at     TIMESTAMPTZ NOT NULL
)
"#;

// case-insensitive uniqueness; this index is the authoritative enforcement
// point for registration
const CREATE_EMAIL_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_idx ON users (lower(email))";

const CREATE_SESSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id         TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL
)
"#;

/// Create the `users` and `sessions` tables if they do not exist
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DomainError> {
    for statement in [CREATE_USERS, CREATE_EMAIL_INDEX, CREATE_SESSIONS] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to apply schema: {}", e)))?;
    }

    Ok(())
}
