pub mod refresh_token;
pub mod user;

use std::time::Duration;

use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use refresh_token::PostgresRefreshTokenRepository;
pub use user::PostgresUserRepository;

use crate::config::DatabaseConfig;

/// Open a PostgreSQL pool sized and bounded by `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.timeout_seconds))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    Ok(pool)
}

/// Apply the embedded schema migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");
    Ok(())
}
