// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Note management API endpoints.
//!
//! All operations require a session and go through [`NoteAccess`], so a
//! user only ever sees their own notes. Notes belonging to someone else
//! are reported as missing.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::{ApiError, INCORRECT_REQUEST},
    models::{NewNote, Note, NoteId, NoteUpdate},
    state::AppState,
    storage::{Deletion, NoteAccess},
};

fn parse_note_id(raw: &str) -> Result<NoteId, ApiError> {
    raw.parse().map_err(|_| ApiError::bad_request(INCORRECT_REQUEST))
}

/// Create a note owned by the caller.
#[utoipa::path(
    post,
    path = "/notes",
    tag = "Notes",
    security(("session_cookie" = [])),
    request_body = NewNote,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Header or body out of bounds")
    )
)]
pub async fn create_note(
    Auth(user): Auth,
    State(state): State<AppState>,
    payload: Result<Json<NewNote>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let Json(request) = payload?;

    let note = NoteAccess::new(state.store.notes(), &user).create(request)?;

    tracing::info!(note_id = note.id, user_id = user.id(), "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

/// List the caller's notes.
#[utoipa::path(
    get,
    path = "/notes",
    tag = "Notes",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "The caller's notes, oldest first", body = [Note]),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn list_notes(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = NoteAccess::new(state.store.notes(), &user).list()?;
    Ok(Json(notes))
}

/// Fetch one of the caller's notes.
#[utoipa::path(
    get,
    path = "/notes/{id}",
    tag = "Notes",
    security(("session_cookie" = [])),
    params(
        ("id" = u64, Path, description = "Note identifier")
    ),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 400, description = "Malformed note id"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such note for this user")
    )
)]
pub async fn get_note(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_note_id(&id)?;
    let note = NoteAccess::new(state.store.notes(), &user).get(id)?;
    Ok(Json(note))
}

/// Partially update one of the caller's notes.
///
/// Missing or empty fields keep their current value.
#[utoipa::path(
    patch,
    path = "/notes/{id}",
    tag = "Notes",
    security(("session_cookie" = [])),
    params(
        ("id" = u64, Path, description = "Note identifier")
    ),
    request_body = NoteUpdate,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 400, description = "Malformed note id or request body"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such note for this user"),
        (status = 422, description = "Header or body too long")
    )
)]
pub async fn update_note(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NoteUpdate>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_note_id(&id)?;
    let Json(update) = payload?;

    let note = NoteAccess::new(state.store.notes(), &user).update(id, &update)?;

    tracing::info!(note_id = id, user_id = user.id(), "Note updated");
    Ok(Json(note))
}

/// Delete one of the caller's notes.
///
/// Succeeds whether or not the note exists; a note owned by someone else is
/// left untouched.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    tag = "Notes",
    security(("session_cookie" = [])),
    params(
        ("id" = u64, Path, description = "Note identifier")
    ),
    responses(
        (status = 200, description = "Note deleted (or nothing to delete)"),
        (status = 400, description = "Malformed note id"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Storage error")
    )
)]
pub async fn delete_note(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_note_id(&id)?;

    match NoteAccess::new(state.store.notes(), &user).delete(id)? {
        Deletion::Deleted => {
            tracing::info!(note_id = id, user_id = user.id(), "Note deleted");
        }
        Deletion::Masked => {
            tracing::debug!(note_id = id, user_id = user.id(), "Delete of missing or foreign note ignored");
        }
    }
    Ok(StatusCode::OK)
}
