use std::sync::Arc;

use auth::PasswordHasher;
use auth::Role;
use auth::TokenCodec;
use auth_service::config::Config;
use auth_service::credentials::models::EmailAddress;
use auth_service::credentials::models::NewAuthUser;
use auth_service::credentials::models::Username;
use auth_service::credentials::ports::AuthServicePort;
use auth_service::credentials::ports::AuthUserRepository;
use auth_service::credentials::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::PostgresAuthUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_expiration_ms = config.jwt.access_expiration_ms,
        refresh_expiration_ms = config.jwt.refresh_expiration_ms,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let repository = Arc::new(PostgresAuthUserRepository::new(pg_pool));
    seed_admin(repository.as_ref(), &config).await?;

    let token_codec = Arc::new(TokenCodec::new(config.jwt.secret.as_bytes()));
    let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
        Arc::clone(&repository),
        token_codec,
        config.jwt.access_expiration_ms,
        config.jwt.refresh_expiration_ms,
    ));

    let address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(listener, create_router(auth_service)).await?;

    Ok(())
}

/// Seed the externally-provisioned admin account.
///
/// Registration can only create USER records; the single ADMIN needed to
/// bootstrap promotions comes from configuration. Skipped when credentials
/// are not configured or the account already exists.
async fn seed_admin<R>(repository: &R, config: &Config) -> Result<(), anyhow::Error>
where
    R: AuthUserRepository,
{
    let Some(admin) = &config.admin else {
        tracing::info!("Admin seed skipped: no admin credentials configured");
        return Ok(());
    };

    if repository.exists_by_username(&admin.username).await?
        || repository.exists_by_email(&admin.email).await?
    {
        return Ok(());
    }

    let username = Username::new(admin.username.clone())?;
    let email = EmailAddress::new(admin.email.clone())?;
    let password_hash = PasswordHasher::new().hash(&admin.password)?;

    let user = repository
        .create(NewAuthUser::new(username, email, password_hash, Role::Admin))
        .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "Admin user created");

    Ok(())
}
