//! User profile use case - lookup and profile mutation

use std::sync::Arc;
use tracing::info;

use crate::domain::user::{
    validate_name, User, UserDomainService, UserId, UserRepository,
};
use crate::domain::DomainError;

/// Read and update user profiles
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    domain_service: UserDomainService<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            domain_service: UserDomainService::new(repository.clone()),
            repository,
        }
    }

    /// Look up a user by ID; an unknown ID is `Ok(None)`, not an error
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, DomainError> {
        let id = UserId::new(id).map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository.find_by_id(&id).await
    }

    /// Replace a user's display name and avatar image
    ///
    /// Passing `None` for `image` clears it. Email and timestamps of creation
    /// are untouched; `updated_at` is restamped.
    pub async fn update_user_profile(
        &self,
        id: &str,
        name: &str,
        image: Option<String>,
    ) -> Result<User, DomainError> {
        let id = UserId::new(id).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_name(name).map_err(|e| DomainError::validation(e.to_string()))?;

        let user = self.domain_service.validate_user_exists(&id).await?;
        let updated = self.repository.save(&user.update_profile(name, image)).await?;

        info!(user_id = %id, "User profile updated");
        Ok(updated)
    }
}
