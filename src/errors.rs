use intake_config::ConfigError;
use intake_core::{AuthError, CoreError};
use thiserror::Error;

/// Failures from the layers below the shell.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Auth(String),
}

/// User-facing shell error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for IntakeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated => IntakeError::NotSignedIn,
            CoreError::Storage(message) | CoreError::Serde(message) => {
                IntakeError::StorageError(message)
            }
            CoreError::Io(err) => IntakeError::StorageError(err.to_string()),
            CoreError::InvalidOperation(message) => IntakeError::InvalidInput(message),
            CoreError::Validation(errors) => IntakeError::InvalidInput(errors.to_string()),
            CoreError::Auth(err) => IntakeError::from(err),
        }
    }
}

impl From<AuthError> for IntakeError {
    fn from(err: AuthError) -> Self {
        IntakeError::Auth(err.to_string())
    }
}

impl From<ConfigError> for IntakeError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io { .. } => IntakeError::StorageError(err.to_string()),
            ConfigError::Parse { .. } | ConfigError::Encode(_) => {
                IntakeError::ConfigError(err.to_string())
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(IntakeError::from(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(IntakeError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_user_facing_kinds() {
        let err = IntakeError::from(CoreError::NotAuthenticated);
        assert!(matches!(err, IntakeError::NotSignedIn));

        let err = IntakeError::from(CoreError::Storage("disk full".into()));
        assert_eq!(err.to_string(), "Persistence error: disk full");

        let err = IntakeError::from(ConfigError::Encode("bad json".into()));
        assert_eq!(
            err.to_string(),
            "Configuration error: cannot encode config: bad json"
        );
    }
}
