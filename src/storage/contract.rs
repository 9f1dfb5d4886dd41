// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conformance suite every storage backend must pass.
//!
//! Backends pull the whole suite in with
//! `store_contract_tests!(<expr returning (store, guard)>)`; the guard keeps
//! temporary resources (such as a redb directory) alive for the test.

use std::collections::HashSet;

use super::{Deletion, NoteAccess, Store, StoreError};
use crate::auth::AuthenticatedUser;
use crate::models::{Credentials, NewNote, NoteUpdate, User};

fn register(store: &dyn Store, email: &str) -> User {
    store
        .users()
        .create(&Credentials::new(email, "password"))
        .expect("user registration succeeds")
}

pub fn create_note_sets_author_and_timestamps(store: &dyn Store) {
    let user = register(store, "a@x.com");

    let note = store
        .notes()
        .create(NewNote::new("h", "b"), &user)
        .unwrap();

    assert_eq!(note.id, 1);
    assert_eq!(note.author_id, user.id);
    assert_eq!(note.header, "h");
    assert_eq!(note.body, "b");
    assert_eq!(note.created_at, note.updated_at);
}

pub fn note_ids_are_unique(store: &dyn Store) {
    let user = register(store, "a@x.com");

    let mut ids = HashSet::new();
    for i in 0..10 {
        let note = store
            .notes()
            .create(NewNote::new(format!("header {i}"), "body"), &user)
            .unwrap();
        assert!(ids.insert(note.id), "note id {} was issued twice", note.id);
    }
}

pub fn invalid_notes_persist_nothing(store: &dyn Store) {
    let user = register(store, "a@x.com");

    let cases = [
        NewNote::new("", "body"),
        NewNote::new("header", ""),
        NewNote::new("h".repeat(101), "body"),
        NewNote::new("h".repeat(401), "body"),
        NewNote::new("header", "b".repeat(1001)),
    ];
    for case in cases {
        let result = store.notes().create(case, &user);
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    assert!(store.notes().find_by_author(&user).unwrap().is_empty());
}

pub fn create_then_find_round_trips(store: &dyn Store) {
    let user = register(store, "a@x.com");
    let note = store
        .notes()
        .create(NewNote::new("header", "body"), &user)
        .unwrap();

    let loaded = store.notes().find_by_id(note.id).unwrap();
    assert_eq!(loaded, note);
}

pub fn missing_note_is_not_found(store: &dyn Store) {
    assert!(matches!(store.notes().find_by_id(42), Err(StoreError::NotFound)));
    assert!(matches!(
        store.notes().update(42, &NoteUpdate::default()),
        Err(StoreError::NotFound)
    ));
}

pub fn find_by_author_is_scoped_and_ordered(store: &dyn Store) {
    let alice = register(store, "alice@x.com");
    let bob = register(store, "bob@x.com");

    assert!(store.notes().find_by_author(&alice).unwrap().is_empty());

    let first = store.notes().create(NewNote::new("a1", "b"), &alice).unwrap();
    let foreign = store.notes().create(NewNote::new("b1", "b"), &bob).unwrap();
    let second = store.notes().create(NewNote::new("a2", "b"), &alice).unwrap();

    let alice_notes = store.notes().find_by_author(&alice).unwrap();
    assert_eq!(alice_notes, vec![first, second]);

    let bob_notes = store.notes().find_by_author(&bob).unwrap();
    assert_eq!(bob_notes, vec![foreign]);
}

pub fn partial_update_keeps_empty_fields(store: &dyn Store) {
    let user = register(store, "a@x.com");
    let note = store
        .notes()
        .create(NewNote::new("header", "body"), &user)
        .unwrap();

    let updated = store
        .notes()
        .update(
            note.id,
            &NoteUpdate {
                header: Some(String::new()),
                body: Some("changes".to_string()),
            },
        )
        .unwrap();

    assert_eq!(updated.header, "header");
    assert_eq!(updated.body, "changes");
    assert_eq!(updated.author_id, user.id);
    assert_eq!(updated.created_at, note.created_at);
    assert!(updated.updated_at >= note.updated_at);
    assert_eq!(store.notes().find_by_id(note.id).unwrap(), updated);
}

pub fn oversized_update_is_rejected(store: &dyn Store) {
    let user = register(store, "a@x.com");
    let note = store
        .notes()
        .create(NewNote::new("header", "body"), &user)
        .unwrap();

    let result = store.notes().update(
        note.id,
        &NoteUpdate {
            header: Some("h".repeat(101)),
            body: None,
        },
    );
    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(store.notes().find_by_id(note.id).unwrap(), note);
}

pub fn delete_is_idempotent(store: &dyn Store) {
    let user = register(store, "a@x.com");
    let note = store.notes().create(NewNote::new("h", "b"), &user).unwrap();

    store.notes().delete(note.id).unwrap();
    store.notes().delete(note.id).unwrap();
    store.notes().delete(999).unwrap();

    assert!(matches!(store.notes().find_by_id(note.id), Err(StoreError::NotFound)));
    assert!(store.notes().find_by_author(&user).unwrap().is_empty());
}

pub fn duplicate_email_is_rejected(store: &dyn Store) {
    let first = register(store, "user@example.org");

    let result = store
        .users()
        .create(&Credentials::new("user@example.org", "another password"));
    assert!(matches!(result, Err(StoreError::DuplicateEmail)));

    assert_eq!(store.users().find_by_email("user@example.org").unwrap(), first);
}

pub fn emails_are_case_sensitive(store: &dyn Store) {
    register(store, "user@example.org");
    let upper = register(store, "User@example.org");

    assert_eq!(store.users().find_by_email("User@example.org").unwrap(), upper);
}

pub fn users_are_found_by_id_and_email(store: &dyn Store) {
    assert!(matches!(
        store.users().find_by_email("user@example.org"),
        Err(StoreError::NotFound)
    ));
    assert!(matches!(store.users().find(1), Err(StoreError::NotFound)));

    let user = register(store, "user@example.org");
    assert_eq!(store.users().find(user.id).unwrap(), user);
    assert_eq!(store.users().find_by_email("user@example.org").unwrap(), user);
}

pub fn passwords_are_hashed(store: &dyn Store) {
    let user = register(store, "user@example.org");

    assert_ne!(user.encrypted_password, "password");
    assert!(user.encrypted_password.starts_with("$argon2"));
    assert!(user.verify_password("password"));
    assert!(!user.verify_password("wrong password"));
}

pub fn invalid_credentials_are_rejected(store: &dyn Store) {
    let result = store.users().create(&Credentials::new("not-an-email", "password"));
    assert!(matches!(result, Err(StoreError::Validation(_))));

    let result = store.users().create(&Credentials::new("user@example.org", "123"));
    assert!(matches!(result, Err(StoreError::Validation(_))));

    assert!(matches!(
        store.users().find_by_email("user@example.org"),
        Err(StoreError::NotFound)
    ));
}

pub fn foreign_notes_are_masked(store: &dyn Store) {
    let alice = AuthenticatedUser::new(register(store, "alice@x.com"));
    let bob = AuthenticatedUser::new(register(store, "bob@x.com"));

    let note = NoteAccess::new(store.notes(), &alice)
        .create(NewNote::new("h", "b"))
        .unwrap();

    let as_bob = NoteAccess::new(store.notes(), &bob);
    assert!(matches!(as_bob.get(note.id), Err(StoreError::NotFound)));
    assert!(matches!(
        as_bob.update(note.id, &NoteUpdate::default()),
        Err(StoreError::NotFound)
    ));
    assert!(as_bob.list().unwrap().is_empty());

    // Foreign and missing notes look the same.
    assert!(matches!(as_bob.get(999), Err(StoreError::NotFound)));
}

/// The u1 / u2 walkthrough: a foreign delete is a silent no-op, the owner's
/// delete removes the note.
pub fn delete_scenario(store: &dyn Store) {
    let u1 = AuthenticatedUser::new(register(store, "a@x.com"));
    let u2 = AuthenticatedUser::new(register(store, "b@x.com"));

    let note = NoteAccess::new(store.notes(), &u1)
        .create(NewNote::new("h", "b"))
        .unwrap();
    assert_eq!(note.id, 1);
    assert_eq!(note.author_id, u1.id());

    let deletion = NoteAccess::new(store.notes(), &u2).delete(note.id).unwrap();
    assert_eq!(deletion, Deletion::Masked);
    assert_eq!(NoteAccess::new(store.notes(), &u1).list().unwrap().len(), 1);

    let missing = NoteAccess::new(store.notes(), &u2).delete(999).unwrap();
    assert_eq!(missing, Deletion::Masked);
    assert_eq!(NoteAccess::new(store.notes(), &u1).list().unwrap().len(), 1);

    let deletion = NoteAccess::new(store.notes(), &u1).delete(note.id).unwrap();
    assert_eq!(deletion, Deletion::Deleted);
    assert!(matches!(store.notes().find_by_id(1), Err(StoreError::NotFound)));
}

pub fn concurrent_creates_get_unique_ids(store: &dyn Store) {
    let user = register(store, "a@x.com");

    let ids: Vec<u64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let user = &user;
                scope.spawn(move || {
                    store
                        .notes()
                        .create(NewNote::new(format!("h{i}"), "b"), user)
                        .unwrap()
                        .id
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(store.notes().find_by_author(&user).unwrap().len(), 8);
}

pub fn health_check_passes(store: &dyn Store) {
    store.health_check().unwrap();
}

macro_rules! store_contract_tests {
    ($make_store:expr) => {
        mod contract {
            use super::*;

            macro_rules! contract_case {
                ($name:ident) => {
                    #[test]
                    fn $name() {
                        let (store, _guard) = $make_store;
                        $crate::storage::contract::$name(&store);
                    }
                };
            }

            contract_case!(create_note_sets_author_and_timestamps);
            contract_case!(note_ids_are_unique);
            contract_case!(invalid_notes_persist_nothing);
            contract_case!(create_then_find_round_trips);
            contract_case!(missing_note_is_not_found);
            contract_case!(find_by_author_is_scoped_and_ordered);
            contract_case!(partial_update_keeps_empty_fields);
            contract_case!(oversized_update_is_rejected);
            contract_case!(delete_is_idempotent);
            contract_case!(duplicate_email_is_rejected);
            contract_case!(emails_are_case_sensitive);
            contract_case!(users_are_found_by_id_and_email);
            contract_case!(passwords_are_hashed);
            contract_case!(invalid_credentials_are_rejected);
            contract_case!(foreign_notes_are_masked);
            contract_case!(delete_scenario);
            contract_case!(concurrent_creates_get_unique_ids);
            contract_case!(health_check_passes);
        }
    };
}

pub(crate) use store_contract_tests;
