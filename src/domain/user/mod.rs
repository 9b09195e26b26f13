//! User aggregate, identity value objects and the user repository port

pub mod entity;
pub mod repository;
pub mod service;
pub mod validation;

pub use entity::{Email, User, UserId, UserRecord};
pub use repository::UserRepository;
pub use service::UserDomainService;
pub use validation::{
    validate_email, validate_name, validate_password, validate_user_id, UserValidationError,
};
