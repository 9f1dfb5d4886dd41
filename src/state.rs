// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::lifecycle::LifecycleHandle;
use crate::storage::{InMemoryStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub lifecycle: LifecycleHandle,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, lifecycle: LifecycleHandle) -> Self {
        Self { store, lifecycle }
    }
}

/// In-memory storage, already ready. Used by tests.
impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), LifecycleHandle::ready())
    }
}
