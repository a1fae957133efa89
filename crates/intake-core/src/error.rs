use thiserror::Error;

use crate::auth::AuthError;
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
