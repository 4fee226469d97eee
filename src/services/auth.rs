use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::crypto::password;
use crate::crypto::token::TokenCodec;
use crate::error::{AppError, Result};
use crate::models::session::IssuedToken;
use crate::models::user::{User, normalize_user_name};
use crate::repositories::user::{CredentialStore, InsertOutcome};

/// How long a freshly issued token stays valid.
pub const TOKEN_TTL: Duration = Duration::minutes(15);

/// A token may only be refreshed once it has this much life left, or less.
pub const REFRESH_GRACE: Duration = Duration::seconds(30);

/// Whether a token expiring at `expires_at` may be exchanged at `now`.
pub fn refresh_allowed(expires_at: i64, now: DateTime<Utc>) -> bool {
    expires_at - now.timestamp() <= REFRESH_GRACE.num_seconds()
}

/// Sign-in, sign-up and refresh on top of stateless tokens.
#[derive(Clone)]
pub struct SessionManager {
    credentials: Arc<dyn CredentialStore>,
    tokens: TokenCodec,
}

impl SessionManager {
    /// Creates a new `SessionManager`.
    pub fn new(credentials: Arc<dyn CredentialStore>, tokens: TokenCodec) -> Self {
        Self { credentials, tokens }
    }

    /// Authenticates a user and issues a token.
    ///
    /// # Arguments
    ///
    /// * `user_name` - The user's name, in any case.
    /// * `password` - The user's password.
    ///
    /// # Returns
    ///
    /// A `Result` containing the issued token, or `AppError::Unauthenticated`
    /// for an unknown user or a wrong password.
    pub async fn sign_in(&self, user_name: &str, password: String) -> Result<IssuedToken> {
        let user_name = normalize_user_name(user_name);
        tracing::debug!("🔐 Authenticating user: {}", user_name);

        let user = self
            .credentials
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        let hash = user.password_hash;
        let matches = tokio::task::spawn_blocking(move || {
            password::verify_password(&password, &hash)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))??;

        if !matches {
            return Err(AppError::Unauthenticated);
        }

        let issued = self.tokens.issue(&user.user_name, TOKEN_TTL)?;
        tracing::info!("✅ User signed in: {}", user.user_name);
        Ok(issued)
    }

    /// Creates a user and issues a token.
    ///
    /// The name is lowercased first, so `Chef` and `chef` collide. The insert
    /// is a single conditional write, which makes concurrent sign-ups for the
    /// same name resolve to exactly one winner.
    pub async fn sign_up(&self, user_name: &str, password: String) -> Result<IssuedToken> {
        let user_name = normalize_user_name(user_name);
        tracing::debug!("📝 Creating user: {}", user_name);

        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        let user = User {
            user_name,
            password_hash,
            created_at: self.tokens.now(),
        };

        match self.credentials.insert_if_absent(&user).await? {
            InsertOutcome::Created => {}
            InsertOutcome::Conflict => {
                tracing::debug!("User name already taken: {}", user.user_name);
                return Err(AppError::AlreadyExists);
            }
        }

        let issued = self.tokens.issue(&user.user_name, TOKEN_TTL)?;
        tracing::info!("✅ User created: {}", user.user_name);
        Ok(issued)
    }

    /// Exchanges a token that is about to expire, or already has, for a new one.
    ///
    /// Fails with `AppError::Unauthenticated` when the token is forged or
    /// unreadable and with `AppError::TooEarly` while more than
    /// [`REFRESH_GRACE`] of its lifetime remains.
    pub async fn refresh(&self, token: &str) -> Result<IssuedToken> {
        let claims = self.tokens.decode(token).map_err(|e| {
            tracing::warn!("❌ Refresh with unusable token: {}", e);
            AppError::Unauthenticated
        })?;

        if !refresh_allowed(claims.exp, self.tokens.now()) {
            return Err(AppError::TooEarly);
        }

        let issued = self.tokens.issue(&claims.user_name, TOKEN_TTL)?;
        tracing::info!("🔄 Token refreshed for: {}", claims.user_name);
        Ok(issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn refresh_window_boundaries() {
        let exp = 10_000;

        assert!(!refresh_allowed(exp, at(exp - 900)));
        assert!(!refresh_allowed(exp, at(exp - 31)));
        assert!(refresh_allowed(exp, at(exp - 30)));
        assert!(refresh_allowed(exp, at(exp - 1)));
        assert!(refresh_allowed(exp, at(exp)));
        assert!(refresh_allowed(exp, at(exp + 3600)));
    }
}
