// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Startup lifecycle and readiness.
//!
//! The server starts in [`LifecycleState::Starting`] and flips to
//! [`LifecycleState::Ready`] once the configured delay has elapsed. The
//! readiness probe reads the current state through a [`LifecycleHandle`].

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Ready,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Starting => "starting",
            LifecycleState::Ready => "ready",
        }
    }
}

/// Owns the lifecycle state and decides when it changes.
pub struct Supervisor {
    tx: watch::Sender<LifecycleState>,
}

impl Supervisor {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Starting);
        Self { tx }
    }

    /// Read-only view for handlers.
    pub fn handle(&self) -> LifecycleHandle {
        LifecycleHandle {
            rx: self.tx.subscribe(),
        }
    }

    pub fn mark_ready(&self) {
        self.tx.send_replace(LifecycleState::Ready);
    }

    /// Flip to ready after `delay`, unless shutdown starts first.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(supervisor.run(delay, shutdown.clone()));
    /// ```
    pub async fn run(self, delay: Duration, shutdown: CancellationToken) {
        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                self.mark_ready();
                info!(delay_secs = delay.as_secs(), "Service is ready");
            }
            _ = shutdown.cancelled() => {
                info!("Shutdown before service became ready");
            }
        }
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable reader of the lifecycle state.
#[derive(Clone)]
pub struct LifecycleHandle {
    rx: watch::Receiver<LifecycleState>,
}

impl LifecycleHandle {
    /// A handle permanently in the `Ready` state.
    pub fn ready() -> Self {
        let (_, rx) = watch::channel(LifecycleState::Ready);
        Self { rx }
    }

    pub fn state(&self) -> LifecycleState {
        *self.rx.borrow()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == LifecycleState::Ready
    }
}
