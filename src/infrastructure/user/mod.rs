//! User-facing infrastructure: storage backends, password hashing, use cases

mod memory;
mod password;
pub(crate) mod postgres;
mod service;

pub use memory::{InMemoryStore, InMemoryUserRepository};
pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres::PostgresUserRepository;
pub use service::UserService;
