//! User aggregate and identity value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_email, validate_user_id, UserValidationError};

/// User identifier - opaque, non-empty string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email address - validated `local@domain.tld` shape, case-insensitive equality
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Create a new Email after validation
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        validate_email(&value)?;
        Ok(Self(value))
    }

    /// Get the address as entered
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form, used as the uniqueness key in storage
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Email {}

impl std::hash::Hash for Email {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields required to rebuild a [`User`] from storage
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email_verified: bool,
    pub image: Option<String>,
}

/// Registered account aggregate
///
/// `id`, `email` and `created_at` never change after creation. Mutation
/// produces a new value with an advanced `updated_at`; the aggregate is never
/// modified in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    id: UserId,
    /// Registration email address
    email: Email,
    /// Display name
    name: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
    /// Whether the email address has been verified
    email_verified: bool,
    /// Optional avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl User {
    /// Create a new user, stamping both timestamps with the current time
    pub fn new(id: UserId, email: Email, name: impl Into<String>, image: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            id,
            email,
            name: name.into(),
            created_at: now,
            updated_at: now,
            email_verified: false,
            image,
        }
    }

    /// Rebuild a user from storage with its persisted timestamps
    pub fn from_persistence(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            created_at: record.created_at,
            updated_at: record.updated_at,
            email_verified: record.email_verified,
            image: record.image,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    // Transformations

    /// Produce a copy with a new name and image, advancing `updated_at`
    pub fn update_profile(&self, name: impl Into<String>, image: Option<String>) -> Self {
        Self {
            name: name.into(),
            image,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Produce a copy with the email marked verified, advancing `updated_at`
    pub fn verify_email(&self) -> Self {
        Self {
            email_verified: true,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new(
            UserId::new("user-1").unwrap(),
            Email::new("ada@example.com").unwrap(),
            "Ada",
            None,
        )
    }

    #[test]
    fn test_user_id_valid() {
        let id = UserId::new("user-1").unwrap();
        assert_eq!(id.as_str(), "user-1");
    }

    #[test]
    fn test_user_id_invalid() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("  ").is_err());
    }

    #[test]
    fn test_user_id_generate_is_unique() {
        assert_ne!(UserId::generate(), UserId::generate());
    }

    #[test]
    fn test_email_equality_is_case_insensitive() {
        let a = Email::new("Ada@Example.com").unwrap();
        let b = Email::new("ada@example.COM").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.normalized(), "ada@example.com");
        assert_eq!(a.as_str(), "Ada@Example.com");
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("not-an-email").is_err());
        assert!(Email::new("a@b").is_err());
    }

    #[test]
    fn test_user_creation_defaults() {
        let user = create_test_user();

        assert_eq!(user.name(), "Ada");
        assert!(!user.email_verified());
        assert!(user.image().is_none());
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_update_profile_produces_new_value() {
        let user = create_test_user();

        std::thread::sleep(std::time::Duration::from_millis(5));
        let updated = user.update_profile("Ada L.", Some("https://img.example/a.png".into()));

        assert_eq!(updated.id(), user.id());
        assert_eq!(updated.email(), user.email());
        assert_eq!(updated.created_at(), user.created_at());
        assert_eq!(updated.name(), "Ada L.");
        assert_eq!(updated.image(), Some("https://img.example/a.png"));
        assert!(updated.updated_at() > user.updated_at());

        // original untouched
        assert_eq!(user.name(), "Ada");
    }

    #[test]
    fn test_verify_email() {
        let user = create_test_user();

        std::thread::sleep(std::time::Duration::from_millis(5));
        let verified = user.verify_email();

        assert!(verified.email_verified());
        assert!(!user.email_verified());
        assert!(verified.updated_at() > user.updated_at());
    }

    #[test]
    fn test_from_persistence_keeps_timestamps() {
        let created = Utc::now() - chrono::Duration::days(30);
        let updated = Utc::now() - chrono::Duration::days(2);

        let user = User::from_persistence(UserRecord {
            id: UserId::new("user-1").unwrap(),
            email: Email::new("ada@example.com").unwrap(),
            name: "Ada".to_string(),
            created_at: created,
            updated_at: updated,
            email_verified: true,
            image: None,
        });

        assert_eq!(user.created_at(), created);
        assert_eq!(user.updated_at(), updated);
        assert!(user.email_verified());
    }

    #[test]
    fn test_serialization_round_trip() {
        let user = create_test_user();

        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();

        assert_eq!(back, user);
    }
}
