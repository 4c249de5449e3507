//! The GPU surface the presenter needs, expressed as a trait.
//!
//! The model is a small slice of a GL-style object/state machine: typed
//! object ids, framebuffer bindings, a scissor switch and pixel-pack
//! buffers. Backends live in [`crate::backend`].

mod api;
mod state;

pub use api::{
    BufferId, FramebufferId, FramebufferTarget, FrameRenderer, GpuApi, PackFormat, TextureFormat,
    TextureId,
};
pub use state::PresentState;
