use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::Role;
use auth::TokenCodec;
use auth_service::credentials::errors::AuthError;
use auth_service::credentials::models::AuthUser;
use auth_service::credentials::models::EmailAddress;
use auth_service::credentials::models::NewAuthUser;
use auth_service::credentials::models::UserId;
use auth_service::credentials::models::Username;
use auth_service::credentials::ports::AuthServicePort;
use auth_service::credentials::ports::AuthUserRepository;
use auth_service::credentials::service::AuthService;
use auth_service::inbound::http::router::create_router;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ACCESS_TTL_MS: i64 = 900_000;
pub const REFRESH_TTL_MS: i64 = 604_800_000;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin_password";

/// Test application that spawns a real server on a random port.
///
/// Backed by the in-memory repository below, so the suite needs no running
/// database; the seeded admin account plays the role of the boot-time seed.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let repository = Arc::new(InMemoryAuthUserRepository::new());

        let admin_hash = PasswordHasher::new()
            .hash(ADMIN_PASSWORD)
            .expect("Failed to hash admin password");
        repository
            .create(NewAuthUser::new(
                Username::new(ADMIN_USERNAME.to_string()).unwrap(),
                EmailAddress::new("admin@example.com".to_string()).unwrap(),
                admin_hash,
                Role::Admin,
            ))
            .await
            .expect("Failed to seed admin user");

        let token_codec = Arc::new(TokenCodec::new(TEST_SECRET));
        let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
            repository,
            token_codec,
            ACCESS_TTL_MS,
            REFRESH_TTL_MS,
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(auth_service);
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server crashed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }
}

/// In-memory credential store with the same uniqueness guarantees the
/// Postgres adapter gets from its constraints.
pub struct InMemoryAuthUserRepository {
    users: Mutex<HashMap<i64, AuthUser>>,
    next_id: AtomicI64,
}

impl InMemoryAuthUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl AuthUserRepository for InMemoryAuthUserRepository {
    async fn create(&self, new_user: NewAuthUser) -> Result<AuthUser, AuthError> {
        let mut users = self.users.lock().unwrap();

        if users
            .values()
            .any(|u| u.username.as_str() == new_user.username.as_str())
        {
            return Err(AuthError::UsernameTaken(
                new_user.username.as_str().to_string(),
            ));
        }
        if users
            .values()
            .any(|u| u.email.as_str() == new_user.email.as_str())
        {
            return Err(AuthError::EmailTaken(new_user.email.as_str().to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = new_user.into_user(UserId(id));
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: AuthUser) -> Result<AuthUser, AuthError> {
        let mut users = self.users.lock().unwrap();

        if !users.contains_key(&user.id.0) {
            return Err(AuthError::UserNotFound {
                field: "id",
                value: user.id.to_string(),
            });
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<AuthUser>, AuthError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.username.as_str() == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.email.as_str() == email))
    }
}
