//! Configuration types for the session kernel.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::session::SESSION_KEY;

/// Root configuration, usually loaded from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ResikConfig {
    pub session: SessionConfig,
    pub watchdog: WatchdogConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct SessionConfig {
    /// Storage key the session record is persisted under.
    pub storage_key: String,
    /// When set, login stamps an absolute expiry this many seconds ahead on
    /// records that carry none. `None` leaves records idle-bounded only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_expiry_secs: Option<i64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: SESSION_KEY.to_string(),
            absolute_expiry_secs: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Idle window before the inactivity timeout fires. Deployments have
    /// used anything from 30 seconds to 30 minutes.
    pub timeout_secs: u64,
    /// Poll cadence for the idle check.
    pub poll_interval_ms: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30 * 60,
            poll_interval_ms: 1000,
        }
    }
}

impl WatchdogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
