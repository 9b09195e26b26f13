//! Sessions and the auth repository port

pub mod repository;
pub mod session;

pub use repository::AuthRepository;
pub use session::{Session, DEFAULT_SESSION_TTL_DAYS};
