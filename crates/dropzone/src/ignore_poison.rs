//! Extension trait to ignore mutex poisoning.
//!
//! Drop-target state (session counters, dialog flags, preview tables) is plain data where a
//! panic in a notification handler doesn't invalidate what's stored. This trait replaces
//! `.lock().unwrap_or_else(|e| e.into_inner())` with a readable `.lock_ignore_poison()` call.

use std::sync::{Mutex, MutexGuard};

pub(crate) trait IgnorePoison<T> {
    /// Locks the mutex, ignoring poison.
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T>;
}

impl<T> IgnorePoison<T> for Mutex<T> {
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(|e| e.into_inner())
    }
}
