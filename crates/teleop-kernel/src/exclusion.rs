//! [`Exclusion`] – a non-blocking, named mutual-exclusion token.
//!
//! Used for the behavior slot (one exclusive behavior at a time) and for the
//! connection-attempt guard (one listen/accept cycle at a time).  Failing to
//! acquire is an expected outcome, not an error: callers drop the work.
//!
//! The guard is owned (`'static + Send`), so it can move into a spawned
//! task and is released when that task drops it, on every exit path.
//!
//! ```
//! use teleop_kernel::Exclusion;
//!
//! let slot = Exclusion::new("behavior-slot");
//! let guard = slot.try_acquire().expect("free");
//! assert!(slot.try_acquire().is_none());
//! drop(guard);
//! assert!(slot.try_acquire().is_some());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

/// A named token that at most one holder owns at a time.  Clones share the
/// same token.
#[derive(Debug, Clone)]
pub struct Exclusion {
    name: &'static str,
    held: Arc<AtomicBool>,
}

impl Exclusion {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            held: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Take the token if it is free.  Never waits.
    pub fn try_acquire(&self) -> Option<ExclusionGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| {
                trace!(exclusion = self.name, "acquired");
                ExclusionGuard {
                    name: self.name,
                    held: Arc::clone(&self.held),
                }
            })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Proof of holding an [`Exclusion`]; releases it on drop.
#[derive(Debug)]
pub struct ExclusionGuard {
    name: &'static str,
    held: Arc<AtomicBool>,
}

impl Drop for ExclusionGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
        trace!(exclusion = self.name, "released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let ex = Exclusion::new("test");
        let _guard = ex.try_acquire().unwrap();
        assert!(ex.is_held());
        assert!(ex.try_acquire().is_none());
    }

    #[test]
    fn clones_share_the_token() {
        let ex = Exclusion::new("test");
        let other = ex.clone();
        let guard = ex.try_acquire().unwrap();
        assert!(other.try_acquire().is_none());
        drop(guard);
        assert!(!other.is_held());
        assert!(other.try_acquire().is_some());
    }

    #[tokio::test]
    async fn guard_released_when_task_ends() {
        let ex = Exclusion::new("attempt");
        let guard = ex.try_acquire().unwrap();
        tokio::spawn(async move {
            let _guard = guard;
        })
        .await
        .unwrap();
        assert!(!ex.is_held());
    }

    #[tokio::test]
    async fn guard_released_when_task_panics() {
        let ex = Exclusion::new("attempt");
        let guard = ex.try_acquire().unwrap();
        let result = tokio::spawn(async move {
            let _guard = guard;
            panic!("behavior failed");
        })
        .await;
        assert!(result.is_err());
        assert!(!ex.is_held());
    }
}
