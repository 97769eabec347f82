use async_trait::async_trait;

use crate::credentials::errors::AuthError;
use crate::credentials::models::AuthUser;
use crate::credentials::models::AuthenticatedIdentity;
use crate::credentials::models::NewAuthUser;
use crate::credentials::models::RegisterCommand;
use crate::credentials::models::TokenBundle;
use crate::credentials::models::UserId;

/// Port for the authentication decision flow.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register new credentials.
    ///
    /// The only path that creates a `Role::User` record; admin records come
    /// from the external seed path.
    ///
    /// # Errors
    /// * `UsernameTaken` - Username already registered (checked first)
    /// * `EmailTaken` - Email already registered (checked after username)
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthUser, AuthError>;

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// # Errors
    /// * `UserNotFound` - No record with this username (checked before the
    ///   password, mirroring upstream behavior)
    /// * `LoginFailed` - Password mismatch
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, username: &str, password: &str) -> Result<TokenBundle, AuthError>;

    /// Mint a new access token from a valid refresh token.
    ///
    /// The refresh token itself is returned unchanged (no rotation); the new
    /// access token carries the subject's current store role.
    ///
    /// # Errors
    /// * `RefreshRejected` - Refresh token failed signature/expiry checks
    /// * `UserNotFound` - Subject account no longer exists
    /// * `DatabaseError` - Store operation failed
    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AuthError>;

    /// Validate an access token and resolve its subject's current identity.
    ///
    /// # Errors
    /// * `AccessRejected` - Token failed signature/expiry checks
    /// * `UserNotFound` - Subject account no longer exists
    /// * `TokenValidationFailed` - Any other resolution failure
    async fn validate_access(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError>;

    /// Promote a user to admin. Idempotent: promoting an admin is a no-op
    /// that returns the current record without a store write.
    ///
    /// # Errors
    /// * `UserNotFound` - No record with this id
    /// * `DatabaseError` - Store operation failed
    async fn promote(&self, id: UserId) -> Result<AuthUser, AuthError>;
}

/// Persistence operations for credential records.
///
/// Each call may fail with `DatabaseError`; the service never retries, a
/// store failure is fatal for the request. Uniqueness is ultimately
/// guaranteed by the store's constraints, which `create` surfaces as the
/// two conflict errors.
#[async_trait]
pub trait AuthUserRepository: Send + Sync + 'static {
    /// Persist a new record; the store assigns the identifier.
    ///
    /// # Errors
    /// * `UsernameTaken` / `EmailTaken` - Uniqueness constraint violated
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, new_user: NewAuthUser) -> Result<AuthUser, AuthError>;

    /// Update an existing record.
    ///
    /// # Errors
    /// * `UserNotFound` - Record does not exist
    /// * `DatabaseError` - Store operation failed
    async fn update(&self, user: AuthUser) -> Result<AuthUser, AuthError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<AuthUser>, AuthError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError>;
}
