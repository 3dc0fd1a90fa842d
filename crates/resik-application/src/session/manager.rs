//! Session lifecycle management.

use std::sync::{Arc, Weak};

use chrono::{Duration as ChronoDuration, Utc};
use resik_core::config::{SessionConfig, WatchdogConfig};
use resik_core::error::Result;
use resik_core::session::{AuthState, SessionRecord, SessionStore};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::lifecycle::{AppLifecycleBridge, AppLifecycleEvent};

use super::route::InitialRoute;
use super::watchdog::InactivityWatchdog;

/// Lifecycle events delivered to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    /// The session ended; the UI should navigate to the unauthenticated
    /// entry point.
    LoggedOut { reason: LogoutReason },
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// Explicit user action.
    UserAction,
    /// The inactivity window elapsed.
    InactivityTimeout,
    /// Absolute expiry detected on read or on foreground resume.
    Expired,
    /// The remote API rejected the token.
    Unauthorized,
}

enum CacheSlot {
    /// Cold start: the store has not been consulted yet.
    Unloaded,
    /// The store holds no (valid) record.
    Absent,
    Active(SessionRecord),
}

/// Single source of truth for "is there a valid session, and what does it
/// contain".
///
/// The manager mediates every read and write of the session key; no other
/// component touches it, so the in-memory cache and the store cannot
/// diverge. Construct one per process in the composition root and inject it
/// where needed; it is never a hidden static.
///
/// `SessionManager` is responsible for:
/// - Persisting the record on login and clearing it on logout
/// - Settling the initial state from storage on cold start
/// - Detecting absolute expiry on read and on foreground resume
/// - Driving the inactivity watchdog
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    session_config: SessionConfig,
    watchdog_config: WatchdogConfig,
    cache: RwLock<CacheSlot>,
    watchdog: InactivityWatchdog,
    events: broadcast::Sender<SessionEvent>,
    /// Handle to ourselves for the watchdog and lifecycle tasks; weak so
    /// background tasks never keep a dropped manager alive.
    weak_self: Weak<SessionManager>,
}

impl SessionManager {
    /// Creates a new `SessionManager` over the given store.
    pub fn new(
        store: Arc<dyn SessionStore>,
        session_config: SessionConfig,
        watchdog_config: WatchdogConfig,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        let watchdog = InactivityWatchdog::new(watchdog_config.poll_interval());

        Arc::new_cyclic(|weak_self| Self {
            store,
            session_config,
            watchdog_config,
            cache: RwLock::new(CacheSlot::Unloaded),
            watchdog,
            events,
            weak_self: weak_self.clone(),
        })
    }

    /// Subscribes to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Persists `record` and transitions to Authenticated.
    ///
    /// The store write happens under the cache write lock, so a concurrent
    /// [`current_session`](Self::current_session) call can never observe the
    /// login before the write has completed.
    ///
    /// # Errors
    ///
    /// A persistence failure propagates and leaves the client
    /// Unauthenticated; the caller must not treat the user as logged in.
    pub async fn login(&self, mut record: SessionRecord) -> Result<()> {
        if record.expires_at.is_none() {
            if let Some(secs) = self.session_config.absolute_expiry_secs {
                record.expires_at = Some(Utc::now() + ChronoDuration::seconds(secs));
            }
        }

        let bytes = serde_json::to_vec(&record)?;
        {
            let mut cache = self.cache.write().await;
            self.store
                .write(&self.session_config.storage_key, &bytes)
                .await?;
            *cache = CacheSlot::Active(record);
        }

        self.start_watchdog();
        let _ = self.events.send(SessionEvent::LoggedIn);
        info!("Session established");
        Ok(())
    }

    /// Returns the current session record, if any.
    ///
    /// On cold start this reads the store once and caches the outcome.
    /// Malformed or expired stored records are cleared and reported as
    /// absent.
    ///
    /// # Errors
    ///
    /// A storage read failure propagates; the session is then indeterminate
    /// and the caller must fail closed (treat as Unauthenticated, retry
    /// later).
    pub async fn current_session(&self) -> Result<Option<SessionRecord>> {
        {
            let cache = self.cache.read().await;
            match &*cache {
                CacheSlot::Absent => return Ok(None),
                CacheSlot::Active(record) if !record.is_expired() => {
                    return Ok(Some(record.clone()));
                }
                _ => {}
            }
        }

        self.settle_session().await
    }

    /// Cold-start entry point: settles the session state and resumes
    /// inactivity tracking when a valid session is present.
    pub async fn restore(&self) -> Result<AuthState> {
        let record = self.current_session().await?;
        let state = AuthState::from_record(record.as_ref());
        if state.is_authenticated() {
            self.start_watchdog();
            debug!("Restored persisted session");
        }
        Ok(state)
    }

    /// Pure absolute-expiry check; no I/O.
    pub fn is_expired(record: &SessionRecord) -> bool {
        record.is_expired()
    }

    /// Ends the session.
    ///
    /// Idempotent: logging out with no active session is a no-op, not an
    /// error, and the method is safe to call from within the timeout
    /// handler itself.
    pub async fn logout(&self) -> Result<()> {
        self.logout_with_reason(LogoutReason::UserAction).await
    }

    /// Logout path for an authorization failure reported by the remote API.
    /// Also stops the watchdog, like every other logout path.
    pub async fn handle_unauthorized(&self) -> Result<()> {
        self.logout_with_reason(LogoutReason::Unauthorized).await
    }

    /// Records user activity; call on every tracked gesture.
    pub fn record_activity(&self) {
        self.watchdog.reset();
    }

    /// Current authentication state.
    pub async fn auth_state(&self) -> Result<AuthState> {
        Ok(AuthState::from_record(
            self.current_session().await?.as_ref(),
        ))
    }

    /// Role of the logged-in user, if any.
    pub async fn current_role(&self) -> Result<Option<String>> {
        Ok(self.current_session().await?.map(|record| record.user.role))
    }

    /// Entry route for the UI, decided from the persisted session.
    pub async fn initial_route(&self) -> Result<InitialRoute> {
        Ok(InitialRoute::for_session(
            self.current_session().await?.as_ref(),
        ))
    }

    /// Subscribes the manager to app-lifecycle events. The returned task
    /// runs until the bridge is dropped.
    pub fn attach_lifecycle(&self, bridge: &AppLifecycleBridge) -> tokio::task::JoinHandle<()> {
        let mut events = bridge.subscribe();
        let weak = self.weak_self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AppLifecycleEvent::ForegroundResumed) => {
                        let Some(manager) = weak.upgrade() else { break };
                        manager.on_foreground_resumed().await;
                    }
                    Ok(AppLifecycleEvent::BackgroundEntered) => {
                        // The idle window keeps running; it is re-evaluated
                        // on the next poll or on resume.
                        debug!("App backgrounded");
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Lifecycle events lagged, skipped {}", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Foreground resume: revalidate absolute expiry, then restart the idle
    /// clock.
    async fn on_foreground_resumed(&self) {
        let expired = {
            let cache = self.cache.read().await;
            matches!(&*cache, CacheSlot::Active(record) if record.is_expired())
        };

        if expired {
            debug!("Session expired while backgrounded");
            if let Err(e) = self.logout_with_reason(LogoutReason::Expired).await {
                warn!("Failed to clear expired session on resume: {}", e);
            }
        } else {
            self.watchdog.reset();
        }
    }

    /// Settles the cache from the store under the write lock (cold start, or
    /// a cached record that hit its absolute expiry).
    async fn settle_session(&self) -> Result<Option<SessionRecord>> {
        let mut cache = self.cache.write().await;

        // Another caller may have settled the slot while we waited.
        match &*cache {
            CacheSlot::Absent => return Ok(None),
            CacheSlot::Active(record) if !record.is_expired() => {
                return Ok(Some(record.clone()));
            }
            _ => {}
        }

        let key = self.session_config.storage_key.clone();

        // A cached record can only be here because it expired: clear it and
        // report the transition.
        if matches!(&*cache, CacheSlot::Active(_)) {
            debug!("Session hit its absolute expiry, clearing");
            self.watchdog.stop();
            self.clear_entry(&key).await;
            *cache = CacheSlot::Absent;
            let _ = self.events.send(SessionEvent::LoggedOut {
                reason: LogoutReason::Expired,
            });
            return Ok(None);
        }

        let record = match self.store.read(&key).await? {
            None => {
                *cache = CacheSlot::Absent;
                return Ok(None);
            }
            Some(bytes) => match serde_json::from_slice::<SessionRecord>(&bytes) {
                Ok(record) => record,
                Err(e) => {
                    // A corrupt local cache must not lock the user out of
                    // logging in again; recover to Unauthenticated.
                    warn!("Stored session record is malformed, discarding: {}", e);
                    self.clear_entry(&key).await;
                    *cache = CacheSlot::Absent;
                    return Ok(None);
                }
            },
        };

        if record.is_expired() {
            debug!("Stored session is past its absolute expiry, clearing");
            self.clear_entry(&key).await;
            *cache = CacheSlot::Absent;
            return Ok(None);
        }

        *cache = CacheSlot::Active(record.clone());
        Ok(Some(record))
    }

    async fn logout_with_reason(&self, reason: LogoutReason) -> Result<()> {
        // Stop timing first so no timeout can fire mid-logout.
        self.watchdog.stop();

        let mut cache = self.cache.write().await;
        let was_active = matches!(&*cache, CacheSlot::Active(_));
        // Fail closed: the in-memory state drops to Unauthenticated even if
        // the removal below fails.
        *cache = CacheSlot::Absent;
        self.store.remove(&self.session_config.storage_key).await?;
        drop(cache);

        if was_active {
            info!(?reason, "Session ended");
            let _ = self.events.send(SessionEvent::LoggedOut { reason });
        }
        Ok(())
    }

    /// Best-effort removal on recovery paths; failures are logged, not
    /// surfaced, because the caller is already reporting Unauthenticated.
    async fn clear_entry(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            warn!("Failed to clear session entry '{}': {}", key, e);
        }
    }

    fn start_watchdog(&self) {
        let weak = self.weak_self.clone();
        self.watchdog.start(
            self.watchdog_config.timeout(),
            Box::new(move || {
                if let Some(manager) = weak.upgrade() {
                    tokio::spawn(async move {
                        if let Err(e) = manager
                            .logout_with_reason(LogoutReason::InactivityTimeout)
                            .await
                        {
                            warn!("Inactivity logout failed: {}", e);
                        }
                    });
                }
            }),
        );
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
