use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The normalized user name of the principal.
    pub user_name: String,
    /// Expiry as Unix seconds.
    pub exp: i64,
}

/// A freshly signed token, as returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The opaque bearer token.
    pub token: String,
    /// When the token stops being accepted (RFC 3339 on the wire).
    pub expires: DateTime<Utc>,
}
