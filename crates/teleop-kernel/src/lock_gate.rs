//! [`LockGate`] – the emergency lock and its exclusion.
//!
//! `locked` only changes while the gate's async mutex is held, so a
//! stop-and-lock sequence (which talks to the backend while holding it) and
//! an unlock can never interleave, and [`LockGate::is_locked`] never
//! observes a half-finished transition.  The gate is independent of the
//! behavior slot, so stop-and-lock is never blocked by a running behavior.
//!
//! [`LockGate::begin_lock`] returns a [`LockTransition`] that sets
//! `locked = true` when dropped, whatever happened in between.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

#[derive(Debug, Default)]
pub struct LockGate {
    gate: Mutex<()>,
    locked: AtomicBool,
}

impl LockGate {
    /// An unlocked gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `locked`, waiting for any in-flight transition to finish.
    pub async fn is_locked(&self) -> bool {
        let _gate = self.gate.lock().await;
        self.locked.load(Ordering::Acquire)
    }

    /// Read `locked` without waiting.  May be stale by one transition.
    pub fn peek(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Clear `locked`.  Returns whether the gate was locked.
    pub async fn unlock(&self) -> bool {
        let _gate = self.gate.lock().await;
        let was_locked = self.locked.swap(false, Ordering::AcqRel);
        if was_locked {
            info!("robot unlocked");
        }
        was_locked
    }

    /// Enter the lock transition.  Hold the returned value while freezing
    /// the robot; dropping it sets `locked = true` and releases the gate.
    pub async fn begin_lock(&self) -> LockTransition<'_> {
        LockTransition {
            _gate: self.gate.lock().await,
            locked: &self.locked,
        }
    }
}

/// An in-progress stop-and-lock; see [`LockGate::begin_lock`].
pub struct LockTransition<'a> {
    _gate: MutexGuard<'a, ()>,
    locked: &'a AtomicBool,
}

impl Drop for LockTransition<'_> {
    fn drop(&mut self) {
        self.locked.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn starts_unlocked() {
        let gate = LockGate::new();
        assert!(!gate.is_locked().await);
        assert!(!gate.peek());
    }

    #[tokio::test]
    async fn transition_locks_on_drop() {
        let gate = LockGate::new();
        {
            let _transition = gate.begin_lock().await;
            assert!(!gate.peek());
        }
        assert!(gate.is_locked().await);
    }

    #[tokio::test]
    async fn unlock_reports_previous_state() {
        let gate = LockGate::new();
        assert!(!gate.unlock().await);
        drop(gate.begin_lock().await);
        assert!(gate.unlock().await);
        assert!(!gate.is_locked().await);
    }

    #[tokio::test(start_paused = true)]
    async fn readers_wait_for_an_in_flight_transition() {
        let gate = Arc::new(LockGate::new());
        let transition_gate = Arc::clone(&gate);
        let (entered_tx, entered_rx) = tokio::sync::oneshot::channel();
        let freezer = tokio::spawn(async move {
            let _transition = transition_gate.begin_lock().await;
            let _ = entered_tx.send(());
            tokio::time::sleep(Duration::from_millis(100)).await;
        });
        entered_rx.await.unwrap();

        // The reader blocks until the freeze finishes, then sees the lock.
        assert!(gate.is_locked().await);
        freezer.await.unwrap();
    }
}
