// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authenticated caller of a request.

use crate::models::{User, UserId};

/// A user resolved from a valid session.
///
/// Handlers receive this through the [`Auth`](super::Auth) extractor. It is
/// the only way to reach the note store on someone's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn id(&self) -> UserId {
        self.user.id
    }
}
