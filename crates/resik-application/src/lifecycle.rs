//! App lifecycle event source.
//!
//! The host shell (mobile runtime, desktop window layer) owns the actual OS
//! hooks. It emits events through this bridge; the session layer subscribes
//! via [`SessionManager::attach_lifecycle`](crate::SessionManager::attach_lifecycle).

use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycleEvent {
    /// The application returned to the foreground.
    ForegroundResumed,
    /// The application moved to the background.
    BackgroundEntered,
}

/// Broadcast hub connecting the host shell to lifecycle subscribers.
#[derive(Debug, Clone)]
pub struct AppLifecycleBridge {
    tx: broadcast::Sender<AppLifecycleEvent>,
}

impl AppLifecycleBridge {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Emits an event to all subscribers; returns how many received it.
    pub fn emit(&self, event: AppLifecycleEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppLifecycleEvent> {
        self.tx.subscribe()
    }
}

impl Default for AppLifecycleBridge {
    fn default() -> Self {
        Self::new()
    }
}
