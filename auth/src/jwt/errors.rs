use thiserror::Error;

/// Error type for token codec operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    TokenMalformed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Missing or invalid claim: {0}")]
    MissingClaim(&'static str),
}
