//! Inactivity watchdog.
//!
//! Detects a configurable idle window and invokes a caller-supplied callback
//! exactly once per idle episode. The check polls at a short interval rather
//! than arming a single deadline timer: mobile hosts suspend timers while
//! backgrounded, and comparing timestamps on every tick survives that.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Callback invoked when the idle window elapses.
pub type TimeoutHandler = Box<dyn FnOnce() + Send + 'static>;

/// Timer-driven idle detector.
///
/// One episode runs from [`start`](Self::start) until the callback fires or
/// [`stop`](Self::stop) is called. After firing, the watchdog stops itself:
/// the expected response to a timeout is logout, so tracking is meaningless
/// until the next login starts a new episode.
pub struct InactivityWatchdog {
    poll_interval: Duration,
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    last_active: Mutex<Instant>,
    /// Episode counter. `start`, `stop`, and a firing callback all move it
    /// forward; a poll task only acts while it still matches the value it
    /// was spawned with.
    generation: AtomicU64,
}

impl InactivityWatchdog {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            shared: Arc::new(Shared {
                last_active: Mutex::new(Instant::now()),
                generation: AtomicU64::new(0),
            }),
            task: Mutex::new(None),
        }
    }

    /// Begins a new idle episode, recording activity now. Any previous
    /// episode is cancelled first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, timeout: Duration, on_timeout: TimeoutHandler) {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.shared.last_active.lock().unwrap() = Instant::now();

        let shared = self.shared.clone();
        let poll_interval = self.poll_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it.
            ticker.tick().await;

            let mut on_timeout = Some(on_timeout);
            loop {
                ticker.tick().await;

                if shared.generation.load(Ordering::SeqCst) != generation {
                    // Superseded by stop() or a newer episode.
                    return;
                }

                let idle = shared.last_active.lock().unwrap().elapsed();
                if idle < timeout {
                    continue;
                }

                // Claim the firing; a racing stop()/start() wins the
                // exchange instead and nothing fires.
                if shared
                    .generation
                    .compare_exchange(
                        generation,
                        generation + 1,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    )
                    .is_ok()
                {
                    tracing::info!(idle_secs = idle.as_secs(), "Inactivity timeout elapsed");
                    if let Some(callback) = on_timeout.take() {
                        callback();
                    }
                }
                return;
            }
        });

        if let Some(previous) = self.task.lock().unwrap().replace(handle) {
            previous.abort();
        }
    }

    /// Records activity now. Must be called on every tracked user gesture
    /// and on app-foreground events.
    ///
    /// Last-writer-wins: the activity mark never moves backwards, so a
    /// delayed reset cannot shadow a later one. A reset that lands after the
    /// idle threshold was crossed but before the poll observes it cancels
    /// the timeout.
    pub fn reset(&self) {
        let now = Instant::now();
        let mut last_active = self.shared.last_active.lock().unwrap();
        if now > *last_active {
            *last_active = now;
        }
    }

    /// Cancels the current episode. No timeout callback fires after this
    /// returns.
    pub fn stop(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for InactivityWatchdog {
    fn drop(&mut self) {
        self.stop();
    }
}
