//! Authentication primitives library
//!
//! Provides the building blocks the token service is assembled from:
//! - Password hashing (Argon2id)
//! - Signed bearer token issuance and validation (HS256 JWT)
//! - Typed token claims with explicit presence checks
//!
//! The token codec is the only code that touches the signing secret. Claims
//! carry epoch-millisecond instants and are trusted only after both the
//! signature and the expiry check pass.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Role, TokenClaims, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = TokenClaims::for_identity("alice", 42, Role::User, 900_000);
//! let token = codec.issue(&claims).unwrap();
//! let decoded = codec.validate(&token).unwrap();
//! assert_eq!(decoded.subject().unwrap(), "alice");
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::JwtError;
pub use jwt::Role;
pub use jwt::TokenClaims;
pub use jwt::TokenCodec;
pub use password::PasswordError;
pub use password::PasswordHasher;
