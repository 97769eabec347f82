use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::errors::JwtError;

/// Role carried inside a token and attached to a credential record.
///
/// Serialized as `USER`/`ADMIN` both on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Canonical string form (`USER` or `ADMIN`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for role strings outside the known vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Token claims payload.
///
/// All fields are optional at the serde layer so that a decoded token can be
/// inspected before being trusted; the accessors below are the trust
/// boundary and fail on claims that are absent or out of vocabulary.
/// `iat`/`exp` are epoch-millisecond instants.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Subject (username)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Credential record identifier
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Role name (`USER`/`ADMIN`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at (epoch milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (epoch milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Build claims for an authenticated identity.
    ///
    /// Sets `iat` to the current instant and `exp` to `iat + ttl_ms`.
    ///
    /// # Arguments
    /// * `subject` - Username the token asserts
    /// * `user_id` - Credential record identifier
    /// * `role` - Role held at issuance time
    /// * `ttl_ms` - Token lifetime in milliseconds
    pub fn for_identity(subject: &str, user_id: i64, role: Role, ttl_ms: i64) -> Self {
        let now = Utc::now().timestamp_millis();

        Self {
            sub: Some(subject.to_string()),
            user_id: Some(user_id),
            role: Some(role.as_str().to_string()),
            iat: Some(now),
            exp: Some(now + ttl_ms),
        }
    }

    /// Subject (username) claim.
    ///
    /// # Errors
    /// * `MissingClaim` - `sub` is absent
    pub fn subject(&self) -> Result<&str, JwtError> {
        self.sub.as_deref().ok_or(JwtError::MissingClaim("sub"))
    }

    /// User identifier claim.
    ///
    /// # Errors
    /// * `MissingClaim` - `userId` is absent
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.user_id.ok_or(JwtError::MissingClaim("userId"))
    }

    /// Role claim, parsed into the known vocabulary.
    ///
    /// # Errors
    /// * `MissingClaim` - `role` is absent or not a recognized role name
    pub fn role(&self) -> Result<Role, JwtError> {
        self.role
            .as_deref()
            .and_then(|r| r.parse().ok())
            .ok_or(JwtError::MissingClaim("role"))
    }

    /// Whether the token is expired at `now_ms`.
    ///
    /// The comparison is strict: a token whose `exp` equals `now_ms` is
    /// already expired. Claims without `exp` never report expired here;
    /// the codec rejects them as malformed before this check matters.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.exp.map_or(false, |exp| exp <= now_ms)
    }
}
