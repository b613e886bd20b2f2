use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::UserCredentials;
use crate::domain::session::models::UserId;
use crate::domain::session::ports::UserRepository;

/// Read-only view of the `users` table.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CredentialsRow {
    id: Uuid,
    email: String,
    hashed_password: String,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, SessionError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT id, email, hashed_password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserCredentials {
            id: UserId(r.id),
            email: r.email,
            hashed_password: r.hashed_password,
        }))
    }
}
