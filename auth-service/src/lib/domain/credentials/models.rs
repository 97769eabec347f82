use std::fmt;
use std::str::FromStr;

use auth::Role;
use chrono::DateTime;
use chrono::Utc;

use crate::credentials::errors::EmailError;
use crate::credentials::errors::UsernameError;

/// Credential record aggregate.
///
/// Source of truth for a user's identity, role, and account status. Created
/// on registration, mutated only by role promotion; never hard-deleted by
/// this service.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub enabled: bool,
    pub account_non_locked: bool,
    pub account_non_expired: bool,
    pub credentials_non_expired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential record unique identifier.
///
/// Store-assigned; the service never invents one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(UsernameError::InvalidCharacters);
        }

        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to register new credentials with validated fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(username: Username, email: EmailAddress, password: String) -> Self {
        Self {
            username,
            email,
            password,
        }
    }
}

/// A credential record before the store has assigned its identifier.
///
/// Role and status flags are fixed at construction; registration always
/// passes `Role::User`, the admin seed path passes `Role::Admin`.
#[derive(Debug, Clone)]
pub struct NewAuthUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub enabled: bool,
    pub account_non_locked: bool,
    pub account_non_expired: bool,
    pub credentials_non_expired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewAuthUser {
    /// Build a record with server-assigned timestamps and all account
    /// status flags enabled.
    pub fn new(username: Username, email: EmailAddress, password_hash: String, role: Role) -> Self {
        let now = Utc::now();

        Self {
            username,
            email,
            password_hash,
            role,
            enabled: true,
            account_non_locked: true,
            account_non_expired: true,
            credentials_non_expired: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the store-assigned identifier, completing the record.
    pub fn into_user(self, id: UserId) -> AuthUser {
        AuthUser {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            enabled: self.enabled,
            account_non_locked: self.account_non_locked,
            account_non_expired: self.account_non_expired,
            credentials_non_expired: self.credentials_non_expired,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Trusted per-request projection of a validated identity.
///
/// Constructed from a validated token plus a store re-lookup (or a fresh
/// credential check); discarded when the request completes.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub enabled: bool,
    pub account_non_locked: bool,
    pub account_non_expired: bool,
    pub credentials_non_expired: bool,
}

impl From<&AuthUser> for AuthenticatedIdentity {
    fn from(user: &AuthUser) -> Self {
        Self {
            user_id: user.id,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
            enabled: user.enabled,
            account_non_locked: user.account_non_locked,
            account_non_expired: user.account_non_expired,
            credentials_non_expired: user.credentials_non_expired,
        }
    }
}

/// Per-request principal derived by the authorization gate.
///
/// Requests without a usable bearer credential are `Anonymous`; handlers
/// match on the variant instead of downcasting, so both cases are handled
/// exhaustively.
#[derive(Debug, Clone)]
pub enum Principal {
    Anonymous,
    Authenticated(AuthenticatedIdentity),
}

impl Principal {
    pub fn identity(&self) -> Option<&AuthenticatedIdentity> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(identity) => Some(identity),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.identity().map_or(false, |identity| identity.role == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

/// Tokens and identity summary returned by login and refresh.
#[derive(Debug, Clone)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert!(Username::new("alice".to_string()).is_ok());
        assert!(Username::new("al".to_string()).is_err());
        assert!(Username::new("a".repeat(33)).is_err());
        assert!(Username::new("alice!".to_string()).is_err());
        assert!(Username::new("alice_-1".to_string()).is_ok());
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_new_auth_user_defaults() {
        let user = NewAuthUser::new(
            Username::new("alice".to_string()).unwrap(),
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            Role::User,
        )
        .into_user(UserId(1));

        assert_eq!(user.role, Role::User);
        assert!(user.enabled);
        assert!(user.account_non_locked);
        assert!(user.account_non_expired);
        assert!(user.credentials_non_expired);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_principal_role_checks() {
        let user = NewAuthUser::new(
            Username::new("alice".to_string()).unwrap(),
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            Role::Admin,
        )
        .into_user(UserId(1));

        let authenticated = Principal::Authenticated(AuthenticatedIdentity::from(&user));
        assert!(authenticated.is_admin());
        assert!(authenticated.has_role(Role::Admin));
        assert!(!authenticated.has_role(Role::User));

        let anonymous = Principal::Anonymous;
        assert!(!anonymous.is_admin());
        assert!(anonymous.identity().is_none());
    }
}
