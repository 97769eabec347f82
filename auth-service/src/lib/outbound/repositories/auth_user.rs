use async_trait::async_trait;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::credentials::errors::AuthError;
use crate::credentials::models::AuthUser;
use crate::credentials::models::EmailAddress;
use crate::credentials::models::NewAuthUser;
use crate::credentials::models::UserId;
use crate::credentials::models::Username;
use crate::credentials::ports::AuthUserRepository;

const SELECT_COLUMNS: &str = "id, username, email, password_hash, role, enabled, \
     account_non_locked, account_non_expired, credentials_non_expired, created_at, updated_at";

pub struct PostgresAuthUserRepository {
    pool: PgPool,
}

impl PostgresAuthUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_column(&self, column: &str, value: &str) -> Result<Option<AuthUser>, AuthError> {
        let query = format!(
            "SELECT {} FROM auth_users WHERE {} = $1",
            SELECT_COLUMNS, column
        );

        let row = sqlx::query_as::<_, AuthUserRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(AuthUserRow::try_into_user).transpose()
    }
}

/// Raw row shape; conversion into the domain aggregate revalidates the
/// value types and the stored role name.
#[derive(sqlx::FromRow)]
struct AuthUserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    enabled: bool,
    account_non_locked: bool,
    account_non_expired: bool,
    credentials_non_expired: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AuthUserRow {
    fn try_into_user(self) -> Result<AuthUser, AuthError> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(AuthUser {
            id: UserId(self.id),
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            role,
            enabled: self.enabled,
            account_non_locked: self.account_non_locked,
            account_non_expired: self.account_non_expired,
            credentials_non_expired: self.credentials_non_expired,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn map_unique_violation(e: sqlx::Error, username: &Username, email: &EmailAddress) -> AuthError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("auth_users_username_key") {
                return AuthError::UsernameTaken(username.as_str().to_string());
            }
            if db_err.constraint() == Some("auth_users_email_key") {
                return AuthError::EmailTaken(email.as_str().to_string());
            }
        }
    }
    AuthError::DatabaseError(e.to_string())
}

#[async_trait]
impl AuthUserRepository for PostgresAuthUserRepository {
    async fn create(&self, new_user: NewAuthUser) -> Result<AuthUser, AuthError> {
        let query = format!(
            "INSERT INTO auth_users (username, email, password_hash, role, enabled, \
             account_non_locked, account_non_expired, credentials_non_expired, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {}",
            SELECT_COLUMNS
        );

        let row = sqlx::query_as::<_, AuthUserRow>(&query)
            .bind(new_user.username.as_str())
            .bind(new_user.email.as_str())
            .bind(&new_user.password_hash)
            .bind(new_user.role.as_str())
            .bind(new_user.enabled)
            .bind(new_user.account_non_locked)
            .bind(new_user.account_non_expired)
            .bind(new_user.credentials_non_expired)
            .bind(new_user.created_at)
            .bind(new_user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &new_user.username, &new_user.email))?;

        row.try_into_user()
    }

    async fn update(&self, user: AuthUser) -> Result<AuthUser, AuthError> {
        let result = sqlx::query(
            "UPDATE auth_users \
             SET username = $2, email = $3, password_hash = $4, role = $5, enabled = $6, \
                 account_non_locked = $7, account_non_expired = $8, credentials_non_expired = $9, \
                 updated_at = $10 \
             WHERE id = $1",
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.enabled)
        .bind(user.account_non_locked)
        .bind(user.account_non_expired)
        .bind(user.credentials_non_expired)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user.username, &user.email))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound {
                field: "id",
                value: user.id.to_string(),
            });
        }

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<AuthUser>, AuthError> {
        let query = format!("SELECT {} FROM auth_users WHERE id = $1", SELECT_COLUMNS);

        let row = sqlx::query_as::<_, AuthUserRow>(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(AuthUserRow::try_into_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        self.find_by_column("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        self.find_by_column("email", email).await
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM auth_users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM auth_users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))
    }
}
