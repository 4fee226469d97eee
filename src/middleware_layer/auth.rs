use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, state::AppState};

/// Extracts the session token from the `Authorization` header.
///
/// Both a bare token and `Bearer <token>` are accepted.
///
/// # Arguments
///
/// * `headers` - The request headers.
///
/// # Returns
///
/// An `Option` containing the token if a non-empty one was sent.
pub fn extract_session_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();

    (!token.is_empty()).then_some(token)
}

/// A middleware that requires a valid, unexpired session token.
///
/// The request is passed through untouched on success; handlers behind it
/// receive no identity.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The downstream `Response`, or a 401 before the body is ever read.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_session_token(request.headers()) else {
        tracing::warn!("❌ No session token in Authorization header");
        return AppError::Unauthorized.into_response();
    };

    match state.tokens.verify(token) {
        Ok(claims) => {
            tracing::debug!("✅ Token accepted for: {}", claims.user_name);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!("❌ Token rejected: {}", e);
            AppError::Unauthorized.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bare_and_bearer_tokens() {
        assert_eq!(extract_session_token(&headers_with("abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_session_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_blank_header() {
        assert_eq!(extract_session_token(&HeaderMap::new()), None);
        assert_eq!(extract_session_token(&headers_with("")), None);
        assert_eq!(extract_session_token(&headers_with("Bearer ")), None);
    }
}
