use std::collections::BTreeSet;
use std::num::NonZeroU64;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::context::ContextHandle;

/// Context bookkeeping shared by the bundled hosts.
///
/// Every handle refers to the same underlying device, so "current" is only
/// tracked, never switched on a real driver.
#[derive(Debug, Default)]
pub(crate) struct ContextTable {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next: u64,
    live: BTreeSet<ContextHandle>,
    current: Option<ContextHandle>,
    released: usize,
}

impl ContextTable {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issues a new handle and makes it current, as context creation does on
    /// most drivers. Returns `None` once `limit` live contexts exist.
    pub(crate) fn request(&self, limit: Option<usize>) -> Option<ContextHandle> {
        let mut inner = self.lock();
        if limit.is_some_and(|limit| inner.live.len() >= limit) {
            return None;
        }

        inner.next += 1;
        let handle = ContextHandle::new(NonZeroU64::new(inner.next)?);
        inner.live.insert(handle);
        inner.current = Some(handle);
        Some(handle)
    }

    pub(crate) fn release(&self, handle: ContextHandle) {
        let mut inner = self.lock();
        if !inner.live.remove(&handle) {
            log::warn!("release of unknown context {}", handle.raw());
            return;
        }
        inner.released += 1;
        if inner.current == Some(handle) {
            inner.current = None;
        }
    }

    pub(crate) fn activate(&self, handle: ContextHandle) {
        let mut inner = self.lock();
        if inner.live.contains(&handle) {
            inner.current = Some(handle);
        } else {
            log::warn!("activate of unknown context {}", handle.raw());
        }
    }

    pub(crate) fn current(&self) -> Option<ContextHandle> {
        self.lock().current
    }

    pub(crate) fn live(&self) -> usize {
        self.lock().live.len()
    }

    pub(crate) fn released(&self) -> usize {
        self.lock().released
    }
}
