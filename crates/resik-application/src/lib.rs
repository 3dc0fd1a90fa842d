//! Application layer for Resik.
//!
//! Coordinates the domain contracts from `resik-core` with storage
//! implementations injected from the infrastructure layer: session
//! lifecycle, inactivity tracking, and app-lifecycle integration.

pub mod lifecycle;
pub mod session;

pub use lifecycle::{AppLifecycleBridge, AppLifecycleEvent};
pub use session::{
    InactivityWatchdog, InitialRoute, LogoutReason, SessionEvent, SessionManager,
};
