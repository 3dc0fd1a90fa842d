//! Session store contract.

use async_trait::async_trait;

use crate::error::Result;

/// Well-known key the session record is persisted under.
pub const SESSION_KEY: &str = "userSession";

/// Durable key-value persistence for the session record.
///
/// The kernel consumes storage as a capability; implementations live in the
/// infrastructure layer. Absence is `Ok(None)`, never an error, and any
/// device-level failure surfaces as [`crate::ResikError::Storage`] so callers
/// can fail closed instead of silently reporting an empty session.
///
/// Only the session manager writes the session key; this ownership boundary
/// keeps the in-memory cache and the store from diverging.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads the raw bytes stored under `key`.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
