use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::repo_types::User;

/// Failure reported by a [`UserDirectory`] when creating a user.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Another user already holds this email.
    #[error("duplicate email")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Store of user records the credential service depends on.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users whose email matches exactly.
    async fn find(&self, email: &str) -> anyhow::Result<Vec<User>>;

    /// Create a user. Implementations must refuse a second user with the
    /// same email with [`DirectoryError::Duplicate`].
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, DirectoryError>;
}

/// Directory backed by the `users` table.
#[derive(Clone)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find(&self, email: &str) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash
            FROM users
            WHERE email = $1
            ORDER BY id
            "#,
        )
        .bind(email)
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, DirectoryError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DirectoryError::Duplicate)
            }
            Err(e) => Err(DirectoryError::Other(e.into())),
        }
    }
}
