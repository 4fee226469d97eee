//! Signed session tokens.
//!
//! Tokens are compact HS256 JWTs (`header.claims.signature`) carrying the
//! user name and an `exp` timestamp. Nothing is stored server-side: a token
//! is good for as long as its signature matches the process secret and `exp`
//! lies in the future. Expiry is judged against the injected [`Clock`], not
//! by `jsonwebtoken`.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode_header, errors::ErrorKind,
};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::models::session::{IssuedToken, TokenClaims};

/// The only signing algorithm this codec emits or accepts.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Errors raised while issuing or decoding a token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not three well-formed segments.
    #[error("Malformed token: {0}")]
    Malformed(&'static str),

    /// The signature does not match the claimed contents.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The signature is fine but `exp` has passed.
    #[error("Token expired")]
    Expired,

    /// The signing secret is unusable.
    #[error("Signing key unavailable: {0}")]
    Configuration(String),

    /// The claims could not be serialized.
    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync {
    /// The current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

/// Issues and checks HMAC-signed session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    keys: Arc<Keys>,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec bound to `secret`.
    ///
    /// Fails with `TokenError::Configuration` when the secret is empty.
    pub fn new(secret: Zeroizing<Vec<u8>>, clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Configuration("signing secret is empty".to_string()));
        }

        let mut validation = Validation::new(ALGORITHM);
        // exp is checked against our own clock in `verify`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(&secret),
                decoding: DecodingKey::from_secret(&secret),
                validation,
            }),
            clock,
        })
    }

    /// The codec's notion of the current time.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Signs a token for `subject` that expires `ttl` from now.
    ///
    /// The returned expiry is truncated to whole seconds so that it equals the
    /// `exp` claim embedded in the token.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let exp = (self.clock.now() + ttl).timestamp();
        let claims = TokenClaims {
            user_name: subject.to_string(),
            exp,
        };

        let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        let expires = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| TokenError::Encoding("expiry out of range".to_string()))?;

        Ok(IssuedToken { token, expires })
    }

    /// Checks structure and signature, ignoring expiry.
    ///
    /// Used where the caller applies its own expiry policy (token refresh).
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        // The header is parsed first so that a later base64 failure can only
        // come from the signature segment.
        if token.split('.').count() != 3 {
            return Err(TokenError::Malformed("expected three segments"));
        }
        decode_header(token).map_err(|_| TokenError::Malformed("unreadable header"))?;

        jsonwebtoken::decode::<TokenClaims>(token, &self.keys.decoding, &self.keys.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::Base64(_) => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => TokenError::Malformed("unsupported algorithm"),
                ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                    TokenError::Malformed("claims are not valid JSON")
                }
                _ => TokenError::Malformed("invalid token"),
            })
    }

    /// Checks structure, signature and expiry.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = self.decode(token)?;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
