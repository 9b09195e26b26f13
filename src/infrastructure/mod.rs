pub mod auth;
pub mod logging;
pub mod schema;
pub mod user;
