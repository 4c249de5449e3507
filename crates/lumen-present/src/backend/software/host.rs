use crate::backend::contexts::ContextTable;
use crate::context::{ApiLoader, ContextHandle, GraphicsHost};

use super::SoftwareApi;

/// Host callbacks backed by [`SoftwareApi`].
///
/// Can be told to refuse contexts or API resolution so failure paths can be
/// exercised.
#[derive(Debug)]
pub struct SoftwareHost {
    contexts: ContextTable,
    context_limit: Option<usize>,
    api_available: bool,
}

impl SoftwareHost {
    pub fn new() -> Self {
        Self {
            contexts: ContextTable::default(),
            context_limit: None,
            api_available: true,
        }
    }

    /// A host that supplies at most `limit` live contexts.
    pub fn with_context_limit(limit: usize) -> Self {
        Self {
            context_limit: Some(limit),
            ..Self::new()
        }
    }

    /// A host whose API entry points cannot be resolved.
    pub fn without_api() -> Self {
        Self {
            api_available: false,
            ..Self::new()
        }
    }

    /// Number of contexts handed out and not yet released.
    pub fn live_contexts(&self) -> usize {
        self.contexts.live()
    }

    /// Number of successful releases so far.
    pub fn release_count(&self) -> usize {
        self.contexts.released()
    }

    /// The context most recently made current, if it is still live.
    pub fn current(&self) -> Option<ContextHandle> {
        self.contexts.current()
    }
}

impl Default for SoftwareHost {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsHost for SoftwareHost {
    fn request_context(&self) -> Option<ContextHandle> {
        self.contexts.request(self.context_limit)
    }

    fn release_context(&self, context: ContextHandle) {
        self.contexts.release(context);
    }

    fn activate_context(&self, context: ContextHandle) {
        self.contexts.activate(context);
    }
}

impl ApiLoader for SoftwareHost {
    type Api = SoftwareApi;

    fn load_api(&self) -> Option<SoftwareApi> {
        self.api_available.then(SoftwareApi::new)
    }
}
