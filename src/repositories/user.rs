use async_trait::async_trait;
use deadpool_postgres::Pool;

use crate::{error::Result, models::user::User};

/// Outcome of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The user was stored.
    Created,
    /// A user with the same name already exists; nothing was written.
    Conflict,
}

/// Lookup and creation of principals.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Finds a user by their normalized name.
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>>;

    /// Inserts `user` unless the name is taken, atomically.
    async fn insert_if_absent(&self, user: &User) -> Result<InsertOutcome>;
}

/// `CredentialStore` backed by the `users` table.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: Pool,
}

impl PgCredentialStore {
    /// Creates a new `PgCredentialStore`.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT user_name, password_hash, created_at
                FROM users
                WHERE user_name = $1
                "#,
                &[&user_name],
            )
            .await?;
        Ok(row.as_ref().map(User::from))
    }

    async fn insert_if_absent(&self, user: &User) -> Result<InsertOutcome> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                INSERT INTO users (user_name, password_hash, created_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_name) DO NOTHING
                RETURNING user_name
                "#,
                &[&user.user_name, &user.password_hash, &user.created_at],
            )
            .await?;

        Ok(match row {
            Some(_) => InsertOutcome::Created,
            None => InsertOutcome::Conflict,
        })
    }
}
