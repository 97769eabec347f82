use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::Role;
use auth::TokenClaims;
use auth::TokenCodec;
use chrono::Utc;

use crate::credentials::errors::AuthError;
use crate::credentials::models::AuthUser;
use crate::credentials::models::AuthenticatedIdentity;
use crate::credentials::models::NewAuthUser;
use crate::credentials::models::RegisterCommand;
use crate::credentials::models::TokenBundle;
use crate::credentials::models::UserId;
use crate::credentials::ports::AuthServicePort;
use crate::credentials::ports::AuthUserRepository;

/// Authentication decision flow.
///
/// Orchestrates credential verification and token issuance against an
/// injected repository. Holds no per-request state; store calls within one
/// request are strictly sequential and never retried.
pub struct AuthService<R>
where
    R: AuthUserRepository,
{
    repository: Arc<R>,
    password_hasher: PasswordHasher,
    token_codec: Arc<TokenCodec>,
    access_ttl_ms: i64,
    refresh_ttl_ms: i64,
}

impl<R> AuthService<R>
where
    R: AuthUserRepository,
{
    /// Create the decision flow with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `token_codec` - Token codec holding the signing secret
    /// * `access_ttl_ms` - Access token lifetime in milliseconds
    /// * `refresh_ttl_ms` - Refresh token lifetime in milliseconds
    pub fn new(
        repository: Arc<R>,
        token_codec: Arc<TokenCodec>,
        access_ttl_ms: i64,
        refresh_ttl_ms: i64,
    ) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            token_codec,
            access_ttl_ms,
            refresh_ttl_ms,
        }
    }

    /// Issue an access token (and a refresh token unless one is carried
    /// over) for the user's current identity and role.
    fn issue_bundle(
        &self,
        user: &AuthUser,
        carried_refresh_token: Option<String>,
    ) -> Result<TokenBundle, AuthError> {
        let access_claims = TokenClaims::for_identity(
            user.username.as_str(),
            user.id.0,
            user.role,
            self.access_ttl_ms,
        );
        let access_token = self
            .token_codec
            .issue(&access_claims)
            .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))?;

        let refresh_token = match carried_refresh_token {
            Some(token) => token,
            None => {
                let refresh_claims = TokenClaims::for_identity(
                    user.username.as_str(),
                    user.id.0,
                    user.role,
                    self.refresh_ttl_ms,
                );
                self.token_codec
                    .issue(&refresh_claims)
                    .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))?
            }
        };

        Ok(TokenBundle {
            access_token,
            refresh_token,
            token_type: "Bearer",
            user_id: user.id,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
        })
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: AuthUserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthUser, AuthError> {
        // username conflict takes precedence; the email check is not issued
        // until the username passes
        if self
            .repository
            .exists_by_username(command.username.as_str())
            .await?
        {
            return Err(AuthError::UsernameTaken(command.username.to_string()));
        }
        if self.repository.exists_by_email(command.email.as_str()).await? {
            return Err(AuthError::EmailTaken(command.email.as_str().to_string()));
        }

        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        let user = self
            .repository
            .create(NewAuthUser::new(
                command.username,
                command.email,
                password_hash,
                Role::User,
            ))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Credentials registered");
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenBundle, AuthError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound {
                field: "username",
                value: username.to_string(),
            })?;

        let password_matches = self
            .password_hasher
            .verify(password, &user.password_hash)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        if !password_matches {
            return Err(AuthError::LoginFailed);
        }

        tracing::info!(user_id = %user.id, "Login succeeded");
        self.issue_bundle(&user, None)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AuthError> {
        let claims = self
            .token_codec
            .validate(refresh_token)
            .map_err(|_| AuthError::RefreshRejected)?;
        let subject = claims.subject().map_err(|_| AuthError::RefreshRejected)?;

        let user = self
            .repository
            .find_by_username(subject)
            .await?
            .ok_or_else(|| AuthError::UserNotFound {
                field: "username",
                value: subject.to_string(),
            })?;

        // new access token reflects the current store role; the refresh
        // token is carried over unchanged (no rotation)
        self.issue_bundle(&user, Some(refresh_token.to_string()))
    }

    async fn validate_access(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let claims = self
            .token_codec
            .validate(token)
            .map_err(|_| AuthError::AccessRejected)?;

        // resolution step: a missing subject or store failure folds into the
        // generic validation error, but an absent account stays distinct
        let subject = claims
            .subject()
            .map_err(|_| AuthError::TokenValidationFailed)?;
        match self.repository.find_by_username(subject).await {
            Ok(Some(user)) => Ok(AuthenticatedIdentity::from(&user)),
            Ok(None) => Err(AuthError::UserNotFound {
                field: "username",
                value: subject.to_string(),
            }),
            Err(e) => {
                tracing::error!(error = %e, "Store lookup failed during token validation");
                Err(AuthError::TokenValidationFailed)
            }
        }
    }

    async fn promote(&self, id: UserId) -> Result<AuthUser, AuthError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound {
                field: "id",
                value: id.to_string(),
            })?;

        if user.role == Role::Admin {
            return Ok(user);
        }

        user.role = Role::Admin;
        user.updated_at = Utc::now();
        let user = self.repository.update(user).await?;

        tracing::info!(user_id = %user.id, "User promoted to admin");
        Ok(user)
    }
}
