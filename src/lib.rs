//! Authentication and session management core
//!
//! Credential verification, opaque session tokens with a fixed lifetime,
//! atomic session rotation, and user profile management, behind repository
//! ports with in-memory and PostgreSQL backends.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;

use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use infrastructure::auth::{AuthService, InMemoryAuthRepository, PostgresAuthRepository};
use infrastructure::schema::ensure_schema;
use infrastructure::user::{
    Argon2Hasher, InMemoryStore, InMemoryUserRepository, PostgresUserRepository, UserService,
};

/// Services wired against the in-memory backend
pub struct InMemoryServices {
    pub auth_service: Arc<AuthService<InMemoryAuthRepository, InMemoryUserRepository>>,
    pub user_service: Arc<UserService<InMemoryUserRepository>>,
}

/// Services wired against PostgreSQL
pub struct PostgresServices {
    pub auth_service: Arc<AuthService<PostgresAuthRepository, PostgresUserRepository>>,
    pub user_service: Arc<UserService<PostgresUserRepository>>,
}

/// Wire the auth and user services over a shared in-memory store
pub fn in_memory_services(config: &AppConfig) -> InMemoryServices {
    let store = InMemoryStore::new();
    let hasher = Arc::new(Argon2Hasher::new());

    let auth_repository = Arc::new(
        InMemoryAuthRepository::new(store.clone(), hasher)
            .with_session_ttl(Duration::days(config.auth.session_ttl_days)),
    );
    let user_repository = Arc::new(InMemoryUserRepository::new(store));

    InMemoryServices {
        auth_service: Arc::new(AuthService::new(auth_repository, user_repository.clone())),
        user_service: Arc::new(UserService::new(user_repository)),
    }
}

/// Wire the auth and user services over PostgreSQL, creating the schema if
/// it does not exist yet
pub async fn postgres_services(
    pool: PgPool,
    config: &AppConfig,
) -> Result<PostgresServices, DomainError> {
    ensure_schema(&pool).await?;

    let hasher = Arc::new(Argon2Hasher::new());

    let auth_repository = Arc::new(
        PostgresAuthRepository::new(pool.clone(), hasher)
            .with_session_ttl(Duration::days(config.auth.session_ttl_days)),
    );
    let user_repository = Arc::new(PostgresUserRepository::new(pool));

    Ok(PostgresServices {
        auth_service: Arc::new(AuthService::new(auth_repository, user_repository.clone())),
        user_service: Arc::new(UserService::new(user_repository)),
    })
}
