// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! One storage contract, two interchangeable backends.
//!
//! ## Backends
//!
//! | Backend | Type | Use |
//! |---------|------|-----|
//! | `redb` | [`RedbStore`] | Persistent, ACID, single file under `DATA_DIR` |
//! | `memory` | [`InMemoryStore`] | Tests and throwaway local runs |
//!
//! Both backends must behave identically: callers branch on the
//! [`StoreError`] variant, never on its text. The shared conformance suite
//! in `contract` runs against each of them.
//!
//! ## Ownership
//!
//! Repositories do not know who is asking. Ownership is resolved one layer
//! up by [`NoteAccess`], which masks foreign notes as missing.

pub mod database;
pub mod memory;
pub mod ownership;
pub mod validation;

#[cfg(test)]
pub(crate) mod contract;

use std::str::FromStr;
use std::sync::Arc;

use crate::config::StorageConfig;
use crate::models::{Credentials, NewNote, Note, NoteId, NoteUpdate, User, UserId};

pub use database::RedbStore;
pub use memory::InMemoryStore;
pub use ownership::{Deletion, NoteAccess, OwnedResource, OwnershipCheck, OwnershipEnforcer};
pub use validation::{Validate, ValidationErrors};

/// Error type shared by every backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A payload failed field validation. User-correctable.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The record does not exist (or is masked as not existing).
    #[error("record not found")]
    NotFound,

    /// Registration with an email that is already taken.
    #[error("email already registered")]
    DuplicateEmail,

    /// Backend failure. The detail is for logs only.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Credential store contract.
pub trait UserRepository: Send + Sync {
    /// Validate, hash the password and persist a new user.
    fn create(&self, credentials: &Credentials) -> StoreResult<User>;

    /// Look a user up by the exact email they registered with.
    fn find_by_email(&self, email: &str) -> StoreResult<User>;

    /// Look a user up by id.
    fn find(&self, id: UserId) -> StoreResult<User>;
}

/// Note store contract.
pub trait NoteRepository: Send + Sync {
    /// Validate and persist a note authored by `author`.
    fn create(&self, note: NewNote, author: &User) -> StoreResult<Note>;

    /// Apply a partial update and refresh `updated_at`.
    fn update(&self, id: NoteId, update: &NoteUpdate) -> StoreResult<Note>;

    /// Remove a note. Removing an absent id is not an error.
    fn delete(&self, id: NoteId) -> StoreResult<()>;

    fn find_by_id(&self, id: NoteId) -> StoreResult<Note>;

    /// All notes written by `author`, oldest id first. Empty when none.
    fn find_by_author(&self, author: &User) -> StoreResult<Vec<Note>>;
}

/// A complete storage backend.
pub trait Store: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn notes(&self) -> &dyn NoteRepository;

    fn backend(&self) -> StoreBackend;

    /// Cheap round trip used by the readiness probe.
    fn health_check(&self) -> StoreResult<()>;
}

/// Which backend to open at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redb,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Redb => "redb",
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" => Ok(StoreBackend::Memory),
            "redb" | "persistent" => Ok(StoreBackend::Redb),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Open the backend selected by configuration.
pub fn open(config: &StorageConfig) -> StoreResult<Arc<dyn Store>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory note storage");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StoreBackend::Redb => {
            let path = config.database_path();
            tracing::info!(path = %path.display(), "Opening redb note storage");
            Ok(Arc::new(RedbStore::open(&path)?))
        }
    }
}
