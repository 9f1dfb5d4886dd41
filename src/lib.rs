// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Notes - Session-Authenticated Notes Service
//!
//! Users register with an email and password, open a cookie session and
//! manage notes that only they can see.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Cookie sessions, password hashing and the `Auth` extractor
//! - `lifecycle` - Startup readiness tracking
//! - `storage` - Credential and note stores (redb or in-memory)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod state;
pub mod storage;
pub mod telemetry;
