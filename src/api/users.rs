// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use super::run_blocking;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{Credentials, UserResponse},
    state::AppState,
};

/// Register a new user.
///
/// The password is stored as an Argon2id hash and never returned.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = Credentials,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Malformed request body"),
        (status = 422, description = "Invalid email or password, or email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(credentials) = payload?;

    let store = state.store.clone();
    let user = run_blocking(move || store.users().create(&credentials)).await??;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user.sanitize())))
}

/// Get the currently logged-in user.
#[utoipa::path(
    get,
    path = "/private/whoami",
    tag = "Users",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn whoami(Auth(user): Auth) -> Json<UserResponse> {
    Json(user.user.sanitize())
}
