use std::sync::Arc;

use crate::present::PresentError;

use super::{ContextHandle, GraphicsHost};

/// Something that can be made current on the calling thread.
pub trait GraphicsContext {
    fn make_current(&self);
}

/// Owns one context acquired from a [`GraphicsHost`].
///
/// The context is released back to the host exactly once, when this value
/// is dropped. Not synchronized: callers serialize access across threads.
pub struct SharedContext<H: GraphicsHost + ?Sized> {
    host: Arc<H>,
    handle: ContextHandle,
}

impl<H: GraphicsHost + ?Sized> SharedContext<H> {
    /// Requests a fresh context from `host`.
    ///
    /// A host that cannot supply one leaves the presenter unusable, so the
    /// error is meant to be propagated to the top, not retried.
    pub fn acquire(host: Arc<H>) -> Result<Self, PresentError> {
        let handle = host
            .request_context()
            .ok_or(PresentError::ContextUnavailable)?;
        log::debug!("acquired rendering context {}", handle.raw());
        Ok(Self { host, handle })
    }

    /// Requests a second context sharing this one's object namespace.
    ///
    /// Acquisition may switch the current context, so `self` is made current
    /// again before returning.
    pub fn create_shared(&self) -> Result<Self, PresentError> {
        let shared = Self::acquire(Arc::clone(&self.host))?;
        self.make_current();
        Ok(shared)
    }

    #[inline]
    pub fn handle(&self) -> ContextHandle {
        self.handle
    }
}

impl<H: GraphicsHost + ?Sized> GraphicsContext for SharedContext<H> {
    fn make_current(&self) {
        self.host.activate_context(self.handle);
    }
}

impl<H: GraphicsHost + ?Sized> Drop for SharedContext<H> {
    fn drop(&mut self) {
        log::debug!("releasing rendering context {}", self.handle.raw());
        self.host.release_context(self.handle);
    }
}

impl<H: GraphicsHost + ?Sized> std::fmt::Debug for SharedContext<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedContext")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::software::SoftwareHost;

    #[test]
    fn acquire_then_drop_releases_once() {
        let host = Arc::new(SoftwareHost::new());
        {
            let ctx = SharedContext::acquire(Arc::clone(&host)).unwrap();
            assert_eq!(host.live_contexts(), 1);
            ctx.make_current();
            assert_eq!(host.current(), Some(ctx.handle()));
        }
        assert_eq!(host.live_contexts(), 0);
        assert_eq!(host.release_count(), 1);
    }

    #[test]
    fn acquire_fails_when_host_refuses() {
        let host = Arc::new(SoftwareHost::with_context_limit(0));
        let err = SharedContext::acquire(host).unwrap_err();
        assert!(matches!(err, PresentError::ContextUnavailable));
    }

    #[test]
    fn create_shared_restores_original_current() {
        let host = Arc::new(SoftwareHost::new());
        let primary = SharedContext::acquire(Arc::clone(&host)).unwrap();
        primary.make_current();

        let secondary = primary.create_shared().unwrap();

        assert_ne!(secondary.handle(), primary.handle());
        assert_eq!(host.current(), Some(primary.handle()));
        assert_eq!(host.live_contexts(), 2);

        drop(secondary);
        assert_eq!(host.live_contexts(), 1);
    }
}
