//! Session record domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::User;

/// The persisted unit representing "who is logged in and with what token".
///
/// A record exists in the session store if and only if the client currently
/// treats the user as authenticated, and exactly one record is active at a
/// time. The record is created on login, never partially updated, and
/// destroyed on logout, inactivity timeout, or detected expiry.
///
/// Field names serialize in camelCase to stay compatible with the persisted
/// layout the remote API and earlier client revisions use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Opaque bearer credential, sent on every subsequent API call.
    pub token: String,
    /// Profile and entitlement data returned by the login endpoint.
    pub user: User,
    /// Creation time, stamped at login.
    pub issued_at: DateTime<Utc>,
    /// Optional absolute expiry. `None` means the record only ages out
    /// through the inactivity timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Creates a fresh record for `user`, stamped now, with no absolute
    /// expiry.
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
            issued_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Sets an absolute expiry on the record.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Pure expiry check against an explicit clock reading; no I/O.
    ///
    /// Returns `true` iff `expires_at` is set and in the past.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => at < now,
            None => false,
        }
    }

    /// Expiry check against the current wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
