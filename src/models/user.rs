use chrono::{DateTime, Utc};
use tokio_postgres::Row;

/// A principal that can sign in.
#[derive(Clone, Debug)]
pub struct User {
    /// The user's name, always lowercase.
    pub user_name: String,
    /// The user's Argon2 password hash in PHC format.
    pub password_hash: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

impl From<&Row> for User {
    fn from(row: &Row) -> Self {
        Self {
            user_name: row.get("user_name"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }
    }
}

/// Normalizes a user name so uniqueness is case-insensitive.
pub fn normalize_user_name(user_name: &str) -> String {
    user_name.trim().to_lowercase()
}
