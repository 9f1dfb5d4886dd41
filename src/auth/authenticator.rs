// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session to user resolution, independent of the HTTP layer.

use super::{AuthError, AuthenticatedUser};
use crate::models::UserId;
use crate::storage::{StoreError, UserRepository};

/// The session store could not be read.
#[derive(Debug, thiserror::Error)]
#[error("session store unavailable: {0}")]
pub struct SessionUnavailable(pub String);

/// Resolve the outcome of a session lookup into an authenticated user.
///
/// A session that names a user who can no longer be loaded is treated as
/// no session at all, whatever the reason the load failed.
pub fn authenticate(
    session_lookup: Result<Option<UserId>, SessionUnavailable>,
    users: &dyn UserRepository,
) -> Result<AuthenticatedUser, AuthError> {
    let user_id = match session_lookup {
        Ok(Some(user_id)) => user_id,
        Ok(None) => return Err(AuthError::NotAuthenticated),
        Err(e) => return Err(AuthError::Internal(e.to_string())),
    };

    match users.find(user_id) {
        Ok(user) => Ok(AuthenticatedUser::new(user)),
        Err(StoreError::NotFound) => {
            tracing::debug!(user_id, "Session refers to an unknown user");
            Err(AuthError::NotAuthenticated)
        }
        Err(e) => {
            tracing::warn!(user_id, error = %e, "User lookup failed during authentication");
            Err(AuthError::NotAuthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Credentials;
    use crate::storage::{InMemoryStore, StoreResult};
    use crate::models::User;

    struct OfflineUsers;

    impl UserRepository for OfflineUsers {
        fn create(&self, _: &Credentials) -> StoreResult<User> {
            Err(StoreError::Storage("offline".to_string()))
        }
        fn find_by_email(&self, _: &str) -> StoreResult<User> {
            Err(StoreError::Storage("offline".to_string()))
        }
        fn find(&self, _: UserId) -> StoreResult<User> {
            Err(StoreError::Storage("offline".to_string()))
        }
    }

    #[test]
    fn known_user_is_authenticated() {
        let store = InMemoryStore::new();
        let user = UserRepository::create(&store, &Credentials::new("a@x.com", "password"))
            .unwrap();

        let authenticated = authenticate(Ok(Some(user.id)), &store).unwrap();
        assert_eq!(authenticated.user, user);
        assert_eq!(authenticated.id(), user.id);
    }

    #[test]
    fn missing_session_is_not_authenticated() {
        let store = InMemoryStore::new();
        assert_eq!(authenticate(Ok(None), &store), Err(AuthError::NotAuthenticated));
    }

    #[test]
    fn unknown_user_is_not_authenticated() {
        let store = InMemoryStore::new();
        assert_eq!(authenticate(Ok(Some(42)), &store), Err(AuthError::NotAuthenticated));
    }

    #[test]
    fn storage_failure_is_not_authenticated() {
        assert_eq!(
            authenticate(Ok(Some(1)), &OfflineUsers),
            Err(AuthError::NotAuthenticated)
        );
    }

    #[test]
    fn unavailable_session_store_is_internal() {
        let store = InMemoryStore::new();
        let result = authenticate(Err(SessionUnavailable("down".to_string())), &store);
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
