//! Domain layer - aggregates, value objects, ports and invariants

pub mod auth;
pub mod error;
pub mod user;

pub use error::DomainError;
