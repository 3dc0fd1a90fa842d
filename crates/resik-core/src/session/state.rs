//! Authentication state derived from the session store.

use serde::{Deserialize, Serialize};

use super::model::SessionRecord;

/// The client-side authentication state machine.
///
/// Transitions: a successful login moves to `Authenticated`; logout,
/// inactivity timeout, or expiry detected on read move back to
/// `Unauthenticated`. The initial state on cold start is decided by reading
/// the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

impl AuthState {
    /// Derives the state from the presence of a (valid) session record.
    pub fn from_record(record: Option<&SessionRecord>) -> Self {
        match record {
            Some(_) => AuthState::Authenticated,
            None => AuthState::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}
