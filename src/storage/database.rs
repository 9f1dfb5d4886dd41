// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistent storage backend backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized User (JSON bytes)
//! - `user_emails`: email → user_id (uniqueness index)
//! - `notes`: note_id → serialized Note (JSON bytes)
//! - `author_notes`: (author_id, note_id) → () for per-author range scans
//! - `sequences`: sequence name → last issued id
//!
//! Every mutating call runs in a single write transaction. redb allows one
//! writer at a time, which serializes conflicting writes for us.

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};

use super::{
    NoteRepository, Store, StoreBackend, StoreError, StoreResult, UserRepository, Validate,
};
use crate::auth::password;
use crate::models::{Credentials, NewNote, Note, NoteId, NoteUpdate, User, UserId};

// =============================================================================
// Table Definitions
// =============================================================================

const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

const USER_EMAILS: TableDefinition<&str, u64> = TableDefinition::new("user_emails");

const NOTES: TableDefinition<u64, &[u8]> = TableDefinition::new("notes");

/// Composite key `(author_id, note_id)`; ordered by author, then note id.
const AUTHOR_NOTES: TableDefinition<(u64, u64), ()> = TableDefinition::new("author_notes");

const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const USER_SEQUENCE: &str = "users";
const NOTE_SEQUENCE: &str = "notes";

// =============================================================================
// Error Mapping
// =============================================================================

macro_rules! storage_error_from {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for StoreError {
                fn from(e: $source) -> Self {
                    StoreError::Storage(e.to_string())
                }
            }
        )+
    };
}

storage_error_from!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
    serde_json::Error,
);

// =============================================================================
// RedbStore
// =============================================================================

pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Storage(format!("cannot create data dir: {e}")))?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
            let _ = write_txn.open_table(NOTES)?;
            let _ = write_txn.open_table(AUTHOR_NOTES)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    fn read_user(&self, id: UserId) -> StoreResult<User> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let value = table.get(id)?.ok_or(StoreError::NotFound)?;
        let user: User = serde_json::from_slice(value.value())?;
        Ok(user)
    }
}

/// Advance a named sequence inside the caller's transaction.
fn next_id(write_txn: &WriteTransaction, sequence: &str) -> StoreResult<u64> {
    let mut table = write_txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

impl UserRepository for RedbStore {
    fn create(&self, credentials: &Credentials) -> StoreResult<User> {
        credentials.validate()?;
        let encrypted_password = password::hash_password(&credentials.password)?;

        let write_txn = self.db.begin_write()?;
        let user = {
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            if emails.get(credentials.email.as_str())?.is_some() {
                return Err(StoreError::DuplicateEmail);
            }

            let user = User {
                id: next_id(&write_txn, USER_SEQUENCE)?,
                email: credentials.email.clone(),
                encrypted_password,
            };
            let json = serde_json::to_vec(&user)?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.id, json.as_slice())?;
            emails.insert(user.email.as_str(), user.id)?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> StoreResult<User> {
        let id = {
            let read_txn = self.db.begin_read()?;
            let emails = read_txn.open_table(USER_EMAILS)?;
            let id = emails.get(email)?.map(|value| value.value());
            id.ok_or(StoreError::NotFound)?
        };
        self.read_user(id)
    }

    fn find(&self, id: UserId) -> StoreResult<User> {
        self.read_user(id)
    }
}

impl NoteRepository for RedbStore {
    fn create(&self, note: NewNote, author: &User) -> StoreResult<Note> {
        note.validate()?;

        let write_txn = self.db.begin_write()?;
        let note = {
            let note = Note::new(
                next_id(&write_txn, NOTE_SEQUENCE)?,
                author.id,
                note,
                Utc::now(),
            );
            let json = serde_json::to_vec(&note)?;

            let mut notes = write_txn.open_table(NOTES)?;
            notes.insert(note.id, json.as_slice())?;
            let mut index = write_txn.open_table(AUTHOR_NOTES)?;
            index.insert((note.author_id, note.id), ())?;
            note
        };
        write_txn.commit()?;
        Ok(note)
    }

    fn update(&self, id: NoteId, update: &NoteUpdate) -> StoreResult<Note> {
        update.validate()?;

        let write_txn = self.db.begin_write()?;
        let note = {
            let mut notes = write_txn.open_table(NOTES)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                let existing = notes.get(id)?.ok_or(StoreError::NotFound)?;
                existing.value().to_vec()
            };
            let mut note: Note = serde_json::from_slice(&existing_bytes)?;
            note.apply_update(update, Utc::now());

            let json = serde_json::to_vec(&note)?;
            notes.insert(id, json.as_slice())?;
            note
        };
        write_txn.commit()?;
        Ok(note)
    }

    fn delete(&self, id: NoteId) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut notes = write_txn.open_table(NOTES)?;
            let removed = notes.remove(id)?.map(|value| value.value().to_vec());

            if let Some(bytes) = removed {
                let note: Note = serde_json::from_slice(&bytes)?;
                let mut index = write_txn.open_table(AUTHOR_NOTES)?;
                index.remove((note.author_id, note.id))?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    fn find_by_id(&self, id: NoteId) -> StoreResult<Note> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(NOTES)?;
        let value = table.get(id)?.ok_or(StoreError::NotFound)?;
        let note: Note = serde_json::from_slice(value.value())?;
        Ok(note)
    }

    fn find_by_author(&self, author: &User) -> StoreResult<Vec<Note>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(AUTHOR_NOTES)?;
        let notes = read_txn.open_table(NOTES)?;

        let mut result: Vec<Note> = Vec::new();
        for entry in index.range((author.id, 0)..=(author.id, u64::MAX))? {
            let (key, _) = entry?;
            let (_, note_id) = key.value();
            match notes.get(note_id)? {
                Some(value) => result.push(serde_json::from_slice(value.value())?),
                None => tracing::warn!(note_id, author_id = author.id, "Dangling author index entry"),
            }
        }
        Ok(result)
    }
}

impl Store for RedbStore {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn notes(&self) -> &dyn NoteRepository {
        self
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Redb
    }

    fn health_check(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(SEQUENCES)?;
        Ok(())
    }
}
