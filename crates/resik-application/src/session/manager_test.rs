use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use resik_core::config::{SessionConfig, WatchdogConfig};
use resik_core::error::{ResikError, Result};
use resik_core::session::{AuthState, SESSION_KEY, SessionRecord, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::lifecycle::{AppLifecycleBridge, AppLifecycleEvent};
use crate::session::{InitialRoute, LogoutReason, SessionEvent, SessionManager};

// Mock SessionStore with per-operation failure injection
#[derive(Default)]
struct MockSessionStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
}

impl MockSessionStore {
    fn new() -> Self {
        Self::default()
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    fn put(&self, key: &str, value: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ResikError::storage("injected read failure"));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ResikError::storage("injected write failure"));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(ResikError::storage("injected remove failure"));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

fn test_user(role: &str) -> resik_core::user::User {
    resik_core::user::User {
        id: "u-1".to_string(),
        name: "Test User".to_string(),
        role: role.to_string(),
        role_id: "r-1".to_string(),
        user_code: "USR001".to_string(),
        access_code: "AC-7".to_string(),
        photo: None,
        access_menu: vec![],
    }
}

fn test_record(role: &str) -> SessionRecord {
    SessionRecord::new("t1", test_user(role))
}

fn test_manager(store: Arc<MockSessionStore>) -> Arc<SessionManager> {
    SessionManager::new(store, SessionConfig::default(), WatchdogConfig::default())
}

#[tokio::test]
async fn test_login_then_current_session_round_trips() {
    let store = Arc::new(MockSessionStore::new());
    let manager = test_manager(store.clone());

    let record = test_record("admin");
    manager.login(record.clone()).await.unwrap();

    let current = manager.current_session().await.unwrap();
    assert_eq!(current, Some(record));
    assert!(store.contains(SESSION_KEY));
}

#[tokio::test]
async fn test_login_write_failure_stays_unauthenticated() {
    let store = Arc::new(MockSessionStore::new());
    store.fail_writes.store(true, Ordering::SeqCst);
    let manager = test_manager(store.clone());

    let err = manager.login(test_record("user")).await.unwrap_err();
    assert!(err.is_storage());

    store.fail_writes.store(false, Ordering::SeqCst);
    assert_eq!(
        manager.auth_state().await.unwrap(),
        AuthState::Unauthenticated
    );
    assert!(!store.contains(SESSION_KEY));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let store = Arc::new(MockSessionStore::new());
    let manager = test_manager(store.clone());
    let mut events = manager.subscribe();

    manager.login(test_record("user")).await.unwrap();
    manager.logout().await.unwrap();
    manager.logout().await.unwrap();

    assert_eq!(
        manager.auth_state().await.unwrap(),
        AuthState::Unauthenticated
    );
    assert!(!store.contains(SESSION_KEY));

    // Exactly one logout event for the two calls.
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            reason: LogoutReason::UserAction
        }
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_logout_without_session_is_a_noop() {
    let store = Arc::new(MockSessionStore::new());
    let manager = test_manager(store);

    manager.logout().await.unwrap();
    assert_eq!(
        manager.auth_state().await.unwrap(),
        AuthState::Unauthenticated
    );
}

#[tokio::test]
async fn test_cold_start_restores_persisted_session() {
    let store = Arc::new(MockSessionStore::new());
    let record = test_record("user");
    store.put(SESSION_KEY, &serde_json::to_vec(&record).unwrap());

    let manager = test_manager(store);
    assert_eq!(manager.restore().await.unwrap(), AuthState::Authenticated);
    assert_eq!(manager.current_session().await.unwrap(), Some(record));
}

#[tokio::test]
async fn test_cold_start_clears_expired_record() {
    let store = Arc::new(MockSessionStore::new());
    let record = test_record("user").with_expiry(Utc::now() - ChronoDuration::hours(1));
    store.put(SESSION_KEY, &serde_json::to_vec(&record).unwrap());

    let manager = test_manager(store.clone());
    assert_eq!(manager.restore().await.unwrap(), AuthState::Unauthenticated);
    assert!(!store.contains(SESSION_KEY));
}

#[tokio::test]
async fn test_malformed_record_recovers_to_unauthenticated() {
    let store = Arc::new(MockSessionStore::new());
    store.put(SESSION_KEY, b"{not valid json");

    let manager = test_manager(store.clone());
    assert_eq!(manager.current_session().await.unwrap(), None);
    // The corrupt entry is cleared so the next login starts clean.
    assert!(!store.contains(SESSION_KEY));
}

#[tokio::test]
async fn test_read_failure_propagates() {
    let store = Arc::new(MockSessionStore::new());
    store.fail_reads.store(true, Ordering::SeqCst);

    let manager = test_manager(store);
    let err = manager.current_session().await.unwrap_err();
    assert!(err.is_storage());
}

#[tokio::test]
async fn test_role_and_initial_route() {
    let store = Arc::new(MockSessionStore::new());
    let manager = test_manager(store);

    assert_eq!(manager.initial_route().await.unwrap(), InitialRoute::Login);

    manager.login(test_record("admin")).await.unwrap();
    assert_eq!(
        manager.current_role().await.unwrap(),
        Some("admin".to_string())
    );
    assert_eq!(
        manager.initial_route().await.unwrap(),
        InitialRoute::AdminDashboard
    );

    manager.logout().await.unwrap();
    manager.login(test_record("user")).await.unwrap();
    assert_eq!(
        manager.initial_route().await.unwrap(),
        InitialRoute::UserDashboard
    );
}

#[tokio::test]
async fn test_absolute_expiry_stamped_on_login() {
    let store = Arc::new(MockSessionStore::new());
    let manager = SessionManager::new(
        store,
        SessionConfig {
            absolute_expiry_secs: Some(3600),
            ..SessionConfig::default()
        },
        WatchdogConfig::default(),
    );

    manager.login(test_record("user")).await.unwrap();
    let record = manager.current_session().await.unwrap().unwrap();
    assert!(record.expires_at.is_some());
    assert!(!SessionManager::is_expired(&record));
}

#[tokio::test(start_paused = true)]
async fn test_inactivity_timeout_logs_out() {
    let store = Arc::new(MockSessionStore::new());
    let manager = SessionManager::new(
        store.clone(),
        SessionConfig::default(),
        WatchdogConfig {
            timeout_secs: 1,
            poll_interval_ms: 100,
        },
    );
    let mut events = manager.subscribe();

    manager.login(test_record("user")).await.unwrap();
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);

    sleep(Duration::from_millis(1500)).await;

    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            reason: LogoutReason::InactivityTimeout
        }
    );
    assert_eq!(
        manager.auth_state().await.unwrap(),
        AuthState::Unauthenticated
    );
    assert!(!store.contains(SESSION_KEY));
}

#[tokio::test(start_paused = true)]
async fn test_activity_defers_inactivity_timeout() {
    let store = Arc::new(MockSessionStore::new());
    let manager = SessionManager::new(
        store,
        SessionConfig::default(),
        WatchdogConfig {
            timeout_secs: 1,
            poll_interval_ms: 100,
        },
    );
    let mut events = manager.subscribe();

    manager.login(test_record("user")).await.unwrap();
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);

    for _ in 0..5 {
        sleep(Duration::from_millis(600)).await;
        manager.record_activity();
    }
    assert!(events.try_recv().is_err());
    assert_eq!(
        manager.auth_state().await.unwrap(),
        AuthState::Authenticated
    );

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            reason: LogoutReason::InactivityTimeout
        }
    );
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let store = Arc::new(MockSessionStore::new());
    let manager = test_manager(store.clone());
    let mut events = manager.subscribe();

    manager.login(test_record("user")).await.unwrap();
    manager.handle_unauthorized().await.unwrap();

    assert!(!store.contains(SESSION_KEY));
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            reason: LogoutReason::Unauthorized
        }
    );
}

#[tokio::test]
async fn test_foreground_resume_clears_expired_session() {
    let store = Arc::new(MockSessionStore::new());
    let manager = test_manager(store.clone());
    let mut events = manager.subscribe();

    // An already-expired record models a session that aged out while the
    // app was backgrounded.
    let record = test_record("user").with_expiry(Utc::now() - ChronoDuration::hours(1));
    manager.login(record).await.unwrap();
    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);

    let bridge = AppLifecycleBridge::new();
    let task = manager.attach_lifecycle(&bridge);
    bridge.emit(AppLifecycleEvent::ForegroundResumed);

    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            reason: LogoutReason::Expired
        }
    );
    assert!(!store.contains(SESSION_KEY));

    drop(bridge);
    task.await.unwrap();
}

#[tokio::test]
async fn test_expired_cached_session_reported_absent_on_read() {
    let store = Arc::new(MockSessionStore::new());
    let manager = test_manager(store.clone());

    let record = test_record("user").with_expiry(Utc::now() - ChronoDuration::minutes(5));
    manager.login(record).await.unwrap();

    assert_eq!(manager.current_session().await.unwrap(), None);
    assert!(!store.contains(SESSION_KEY));
}
