use serde::Serialize;
use thiserror::Error;

use crate::core::models::account::AccountId;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum LoanError {
    /// Username is already taken
    #[error("Username {0} already exists")]
    DuplicateUsername(String),

    /// Unknown username or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Out-of-range or non-enumerated input
    #[error("Invalid input for field `{0}`: {1:?}")]
    ValidationError(String, FieldError),

    /// Recommendation requested before any profile was saved
    #[error("No profile saved for account {0}")]
    MissingProfile(AccountId),

    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    /// Missing, malformed or ended session token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl LoanError {
    pub fn invalid(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        LoanError::ValidationError(field.to_string(), FieldError::new(field, title, description))
    }
}

impl From<rusqlite::Error> for LoanError {
    fn from(err: rusqlite::Error) -> Self {
        LoanError::StorageError(err.to_string())
    }
}

impl From<csv::Error> for LoanError {
    fn from(err: csv::Error) -> Self {
        LoanError::CatalogError(err.to_string())
    }
}
