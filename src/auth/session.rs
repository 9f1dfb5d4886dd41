// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cookie session plumbing on top of `tower-sessions`.
//!
//! Sessions live in an in-process [`MemoryStore`]; the cookie only carries
//! the session id. A restart logs everyone out.

use tower_sessions::{cookie::SameSite, MemoryStore, Session, SessionManagerLayer};

use super::SessionUnavailable;
use crate::models::UserId;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "note-session";

/// Session key holding the authenticated user's id.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Build the session layer mounted on the router.
pub fn session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_path("/")
}

/// Read the user id stored in a session, if any.
pub async fn session_user_id(session: &Session) -> Result<Option<UserId>, SessionUnavailable> {
    session
        .get::<UserId>(SESSION_USER_ID_KEY)
        .await
        .map_err(|e| SessionUnavailable(e.to_string()))
}

/// Bind a session to `user_id`.
///
/// The session id is rotated first so an id handed out before login cannot
/// be reused afterwards.
pub async fn start_session(session: &Session, user_id: UserId) -> Result<(), SessionUnavailable> {
    session
        .cycle_id()
        .await
        .map_err(|e| SessionUnavailable(e.to_string()))?;
    session
        .insert(SESSION_USER_ID_KEY, user_id)
        .await
        .map_err(|e| SessionUnavailable(e.to_string()))
}
