// nfchal/src/hal/lock.rs

use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread::ThreadId;
use std::time::{Duration, Instant};

/// Non-recursive mutex that remembers its owning thread and gives up
/// after a timeout instead of blocking forever.
#[derive(Debug, Default)]
pub(crate) struct OwnerLock {
    owner: Mutex<Option<ThreadId>>,
    cond: Condvar,
}

impl OwnerLock {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<ThreadId>> {
        self.owner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Take the lock for the calling thread. `false` on timeout.
    pub fn try_acquire(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let me = std::thread::current().id();
        let mut slot = self.slot();
        while slot.is_some() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            slot = self
                .cond
                .wait_timeout(slot, deadline - now)
                .unwrap_or_else(|e| e.into_inner())
                .0;
        }
        *slot = Some(me);
        true
    }

    /// Release if the calling thread owns the lock. `false` otherwise.
    pub fn release(&self) -> bool {
        let mut slot = self.slot();
        if *slot != Some(std::thread::current().id()) {
            return false;
        }
        *slot = None;
        self.cond.notify_one();
        true
    }

    pub fn is_held_by_current(&self) -> bool {
        *self.slot() == Some(std::thread::current().id())
    }

    pub fn is_locked(&self) -> bool {
        self.slot().is_some()
    }
}
