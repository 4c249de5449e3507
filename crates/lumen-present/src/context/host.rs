use std::num::NonZeroU64;

use crate::gpu::GpuApi;

/// Opaque handle to a host-owned rendering context.
///
/// Only meaningful to the host that issued it; invalid after release.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextHandle(NonZeroU64);

impl ContextHandle {
    #[inline]
    pub const fn new(raw: NonZeroU64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0.get()
    }
}

/// Callbacks supplied by the environment that owns the GPU.
///
/// Every context returned by `request_context` shares one GPU object
/// namespace: objects created while one context is current are visible
/// from all of them.
pub trait GraphicsHost {
    /// Creates a new context. `None` means the host cannot supply one.
    fn request_context(&self) -> Option<ContextHandle>;

    /// Returns a context to the host. Called exactly once per handle.
    fn release_context(&self, context: ContextHandle);

    /// Makes `context` current on the calling thread.
    fn activate_context(&self, context: ContextHandle);
}

/// Resolves the GPU entry points once at startup.
pub trait ApiLoader {
    type Api: GpuApi;

    /// Binds the API. `None` means the entry points are unavailable.
    fn load_api(&self) -> Option<Self::Api>;
}
