// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tower_sessions::Session;

use super::run_blocking;
use crate::{
    auth::session::start_session,
    error::ApiError,
    models::Credentials,
    state::AppState,
    storage::StoreError,
};

/// Message for every failed login, so callers cannot tell which part was
/// wrong.
pub const INCORRECT_CREDENTIALS: &str = "incorrect email or password";

/// Open a session for a registered user.
///
/// On success the `note-session` cookie identifies the user on later
/// requests.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "Sessions",
    request_body = Credentials,
    responses(
        (status = 200, description = "Session created, cookie set"),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Incorrect email or password"),
        (status = 500, description = "Session store failure")
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(credentials) = payload?;

    let store = state.store.clone();
    let user = run_blocking(move || {
        match store.users().find_by_email(&credentials.email) {
            Ok(user) if user.verify_password(&credentials.password) => Some(user),
            Ok(_) | Err(StoreError::NotFound) => None,
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed during login");
                None
            }
        }
    })
    .await?
    .ok_or_else(|| ApiError::unauthorized(INCORRECT_CREDENTIALS))?;

    start_session(&session, user.id).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to store session");
        ApiError::internal("internal server error")
    })?;

    tracing::info!(user_id = user.id, "Session created");
    Ok(StatusCode::OK)
}
