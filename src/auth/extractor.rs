// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require a logged-in session:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::{authenticate, session::session_user_id, AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Reads the user id from the cookie session and resolves it against the
/// credential store. Requests without a valid session are rejected with
/// 401 before the handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_notes(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<Note>>, ApiError> {
///     // user.id() is the caller's user id
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // An earlier stage may already have resolved the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AuthError::Internal(msg.to_string()))?;

        let lookup = session_user_id(&session).await;
        let user = authenticate(lookup, state.store.users())?;

        tracing::debug!(user_id = user.id(), "Request authenticated");
        Ok(Auth(user))
    }
}
