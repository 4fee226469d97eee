use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::extract_session_token,
    models::session::IssuedToken,
    state::AppState,
    validation::auth::*,
};

/// The request payload for sign-in and sign-up.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub user_name: String,
    pub password: String,
}

/// Handles sign-in.
#[axum::debug_handler]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<IssuedToken>> {
    let Json(payload) = payload?;
    tracing::info!("🔐 Sign-in attempt: {}", payload.user_name);

    let issued = state
        .sessions
        .sign_in(&payload.user_name, payload.password)
        .await?;

    Ok(Json(issued))
}

/// Handles sign-up.
#[axum::debug_handler]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<IssuedToken>> {
    let Json(payload) = payload?;
    tracing::info!("📝 Sign-up attempt: {}", payload.user_name);

    validate_user_name(&payload.user_name)?;
    validate_password(&payload.password)?;

    let issued = state
        .sessions
        .sign_up(&payload.user_name, payload.password)
        .await?;

    Ok(Json(issued))
}

/// Handles token refresh. The current token is read from `Authorization`.
#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<IssuedToken>> {
    let token = extract_session_token(&headers).ok_or_else(|| {
        tracing::warn!("❌ Refresh without a token");
        AppError::Unauthenticated
    })?;

    let issued = state.sessions.refresh(token).await?;
    Ok(Json(issued))
}
