// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for note operations.
//!
//! Every note access made on behalf of a user goes through [`NoteAccess`].
//! A note owned by someone else is reported exactly like a missing one, so
//! callers cannot probe which ids exist.

use crate::auth::AuthenticatedUser;
use crate::models::{NewNote, Note, NoteId, NoteUpdate, UserId};

use super::{NoteRepository, StoreError, StoreResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_id(&self) -> UserId;
}

impl OwnedResource for Note {
    fn owner_id(&self) -> UserId {
        self.author_id
    }
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Verify that the user owns this resource.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if the user doesn't own the resource.
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StoreResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StoreResult<()> {
        if self.owner_id() == user.id() {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

/// Extension trait for verifying ownership on a lookup result.
pub trait OwnershipCheck<T> {
    /// Verify ownership and return the resource if authorized.
    fn verify_owner(self, user: &AuthenticatedUser) -> StoreResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for StoreResult<T> {
    fn verify_owner(self, user: &AuthenticatedUser) -> StoreResult<T> {
        let resource = self?;
        resource.verify_ownership(user)?;
        Ok(resource)
    }
}

/// Outcome of a gated delete.
///
/// Both variants are reported to the client as success; the distinction is
/// only kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// The caller owned the note and it is gone.
    Deleted,
    /// The note was missing or foreign; nothing changed.
    Masked,
}

/// Note repository scoped to one authenticated user.
pub struct NoteAccess<'a> {
    notes: &'a dyn NoteRepository,
    user: &'a AuthenticatedUser,
}

impl<'a> NoteAccess<'a> {
    pub fn new(notes: &'a dyn NoteRepository, user: &'a AuthenticatedUser) -> Self {
        Self { notes, user }
    }

    /// Create a note authored by the caller.
    pub fn create(&self, note: NewNote) -> StoreResult<Note> {
        self.notes.create(note, &self.user.user)
    }

    /// All of the caller's notes.
    pub fn list(&self) -> StoreResult<Vec<Note>> {
        self.notes.find_by_author(&self.user.user)
    }

    pub fn get(&self, id: NoteId) -> StoreResult<Note> {
        self.notes.find_by_id(id).verify_owner(self.user)
    }

    pub fn update(&self, id: NoteId, update: &NoteUpdate) -> StoreResult<Note> {
        self.get(id)?;
        self.notes.update(id, update)
    }

    /// Delete one of the caller's notes. Missing and foreign notes are a
    /// silent no-op.
    pub fn delete(&self, id: NoteId) -> StoreResult<Deletion> {
        match self.get(id) {
            Ok(_) => {
                self.notes.delete(id)?;
                Ok(Deletion::Deleted)
            }
            Err(StoreError::NotFound) => Ok(Deletion::Masked),
            Err(e) => Err(e),
        }
    }
}
