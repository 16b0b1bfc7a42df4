use thiserror::Error;

use crate::domain::repo::GatewayError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Map a failed commit that carried a row with `email`.
    /// The email index is the only unique constraint on the table.
    pub fn from_commit(err: GatewayError, email: &str) -> Self {
        match err {
            GatewayError::UniqueViolation { .. } => Self::email_already_exists(email),
            GatewayError::RowMissing { id } => Self::database(format!("user {id} no longer exists")),
            GatewayError::Store(e) => Self::database(format!("{e:#}")),
        }
    }
}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        Self::database(err.to_string())
    }
}
