use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// HTTP-equivalent status code for boundary adapters
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Internal { .. } | Self::Storage { .. } => 500,
        }
    }

    /// True when the error represents an expected client-side failure rather
    /// than an infrastructure fault
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Internal { .. } | Self::Storage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_error() {
        let error = DomainError::unauthorized("Invalid credentials");
        assert_eq!(error.to_string(), "Unauthorized: Invalid credentials");
        assert_eq!(error.status_code(), 401);
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Email already registered");
        assert_eq!(error.to_string(), "Conflict: Email already registered");
        assert_eq!(error.status_code(), 409);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DomainError::validation("x").status_code(), 400);
        assert_eq!(DomainError::not_found("x").status_code(), 404);
        assert_eq!(DomainError::internal("x").status_code(), 500);
        assert_eq!(DomainError::storage("x").status_code(), 500);
    }

    #[test]
    fn test_operational_classification() {
        assert!(DomainError::conflict("x").is_operational());
        assert!(!DomainError::storage("x").is_operational());
    }
}
