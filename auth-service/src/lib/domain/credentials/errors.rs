use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for authentication and token operations.
///
/// Token codec failures never surface directly: the decision flow translates
/// them into `AccessRejected`/`RefreshRejected` at its boundary.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Registration conflicts, named after the conflicting field
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Email already exists: {0}")]
    EmailTaken(String),

    /// Referenced identity absent; distinct from an authentication failure
    /// and never masked by the validate-path catch-all.
    #[error("User not found by {field}: {value}")]
    UserNotFound { field: &'static str, value: String },

    /// Deliberately generic: does not reveal which credential check failed.
    #[error("Incorrect username or password")]
    LoginFailed,

    #[error("Access token rejected")]
    AccessRejected,

    #[error("Refresh token rejected")]
    RefreshRejected,

    /// Catch-all for validate-path failures other than `UserNotFound`.
    #[error("Failed to validate token")]
    TokenValidationFailed,

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
