// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request, response and stored record types shared by the storage backends
//! and the HTTP handlers. Everything that crosses the API boundary derives
//! `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Users**: stored credentials and their sanitized outward form
//! - **Notes**: owned notes plus create / partial-update payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::password;

/// Store-assigned user identifier.
pub type UserId = u64;

/// Store-assigned note identifier. Monotonically increasing, never reused.
pub type NoteId = u64;

// =============================================================================
// User Models
// =============================================================================

/// A registered user as held by the credential store.
///
/// Carries the Argon2 password hash, so it is never serialized into an API
/// response directly. Use [`User::sanitize`] before exposing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// PHC-format Argon2id hash.
    pub encrypted_password: String,
}

impl User {
    /// Check a plaintext password against the stored hash.
    pub fn verify_password(&self, candidate: &str) -> bool {
        password::verify_password(candidate, &self.encrypted_password)
    }

    /// Drop the password hash, keeping only what may leave the service.
    pub fn sanitize(self) -> UserResponse {
        UserResponse {
            id: self.id,
            email: self.email,
        }
    }
}

/// Outward representation of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    /// Unique user identifier.
    pub id: UserId,
    /// Email address the user registered with.
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        user.sanitize()
    }
}

/// Email and password, used both to register and to open a session.
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Note Models
// =============================================================================

/// A note owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Note {
    /// Unique note identifier.
    pub id: NoteId,
    /// The user who created the note. Never changes.
    pub author_id: UserId,
    /// Short title, 1 to 100 characters.
    pub header: String,
    /// Note content, 1 to 1000 characters.
    pub body: String,
    /// When the note was created.
    pub created_at: DateTime<Utc>,
    /// When the note was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Build a freshly created note. The author always comes from the
    /// authenticated caller, never from the request payload.
    pub(crate) fn new(id: NoteId, author_id: UserId, new: NewNote, now: DateTime<Utc>) -> Self {
        Self {
            id,
            author_id,
            header: new.header,
            body: new.body,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update. Absent or empty fields keep their value.
    pub(crate) fn apply_update(&mut self, update: &NoteUpdate, now: DateTime<Utc>) {
        if let Some(header) = update.header() {
            self.header = header.to_string();
        }
        if let Some(body) = update.body() {
            self.body = body.to_string();
        }
        self.updated_at = now;
    }
}

/// Request to create a note.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NewNote {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub body: String,
}

impl NewNote {
    pub fn new(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
        }
    }
}

/// Partial update of a note.
///
/// A field that is missing or empty means "keep the current value".
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl NoteUpdate {
    /// Replacement header, if this update changes it.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref().filter(|header| !header.is_empty())
    }

    /// Replacement body, if this update changes it.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}
