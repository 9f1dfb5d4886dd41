// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory storage backend.
//!
//! Holds everything in ordered maps behind a single `RwLock`. Nothing
//! survives a restart; use it for tests and local experiments.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::{
    NoteRepository, Store, StoreBackend, StoreError, StoreResult, UserRepository, Validate,
};
use crate::auth::password;
use crate::models::{Credentials, NewNote, Note, NoteId, NoteUpdate, User, UserId};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    notes: BTreeMap<NoteId, Note>,
    last_user_id: UserId,
    last_note_id: NoteId,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Storage("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Storage("in-memory store lock poisoned".to_string()))
    }
}

impl UserRepository for InMemoryStore {
    fn create(&self, credentials: &Credentials) -> StoreResult<User> {
        credentials.validate()?;
        // Hash outside the lock; Argon2 is deliberately slow.
        let encrypted_password = password::hash_password(&credentials.password)?;

        let mut tables = self.write()?;
        if tables
            .users
            .values()
            .any(|user| user.email == credentials.email)
        {
            return Err(StoreError::DuplicateEmail);
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            email: credentials.email.clone(),
            encrypted_password,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> StoreResult<User> {
        self.read()?
            .users
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn find(&self, id: UserId) -> StoreResult<User> {
        self.read()?
            .users
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

impl NoteRepository for InMemoryStore {
    fn create(&self, note: NewNote, author: &User) -> StoreResult<Note> {
        note.validate()?;

        let mut tables = self.write()?;
        tables.last_note_id += 1;
        let note = Note::new(tables.last_note_id, author.id, note, Utc::now());
        tables.notes.insert(note.id, note.clone());
        Ok(note)
    }

    fn update(&self, id: NoteId, update: &NoteUpdate) -> StoreResult<Note> {
        update.validate()?;

        let mut tables = self.write()?;
        let note = tables.notes.get_mut(&id).ok_or(StoreError::NotFound)?;
        note.apply_update(update, Utc::now());
        Ok(note.clone())
    }

    fn delete(&self, id: NoteId) -> StoreResult<()> {
        self.write()?.notes.remove(&id);
        Ok(())
    }

    fn find_by_id(&self, id: NoteId) -> StoreResult<Note> {
        self.read()?
            .notes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn find_by_author(&self, author: &User) -> StoreResult<Vec<Note>> {
        Ok(self
            .read()?
            .notes
            .values()
            .filter(|note| note.author_id == author.id)
            .cloned()
            .collect())
    }
}

impl Store for InMemoryStore {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn notes(&self) -> &dyn NoteRepository {
        self
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }

    fn health_check(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::storage::contract::store_contract_tests!((InMemoryStore::new(), ()));

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let user = UserRepository::create(&store, &Credentials::new("a@x.com", "password"))
            .unwrap();

        let first = NoteRepository::create(&store, NewNote::new("h", "b"), &user).unwrap();
        NoteRepository::delete(&store, first.id).unwrap();
        let second = NoteRepository::create(&store, NewNote::new("h", "b"), &user).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }
}
