// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Cookie-session authentication for the notes API.
//!
//! ## Auth Flow
//!
//! 1. Client registers with `POST /users` (email + password)
//! 2. Client logs in with `POST /sessions`; the password is checked against
//!    the stored Argon2id hash and the user id is written into a fresh
//!    `note-session` cookie session
//! 3. Protected handlers take the [`Auth`] extractor, which:
//!    - reads `user_id` from the session
//!    - loads the user from the credential store
//!    - rejects the request with 401 when either step comes up empty
//!
//! ## Security
//!
//! - The session id is rotated on every login
//! - Cookies are `HttpOnly` and `SameSite=Lax`; `Secure` is configurable
//! - Failed logins never reveal whether the email exists

pub mod authenticator;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod password;
pub mod session;

pub use authenticator::{authenticate, SessionUnavailable};
pub use error::AuthError;
pub use extractor::Auth;
pub use identity::AuthenticatedUser;
