//! Auth infrastructure: repository backends and the auth use case

mod memory;
mod postgres;
mod service;

pub use memory::InMemoryAuthRepository;
pub use postgres::PostgresAuthRepository;
pub use service::{
    AuthResponse, AuthService, LoginCommand, LogoutCommand, RefreshResponse, RefreshTokenCommand,
    RegisterCommand,
};
