//! Rendering-context plumbing.
//!
//! The environment that owns the real GPU surface implements
//! [`GraphicsHost`]; this crate only ever talks to that interface. A
//! [`SharedContext`] wraps one acquired context and releases it on drop.

mod host;
mod shared;

pub use host::{ApiLoader, ContextHandle, GraphicsHost};
pub use shared::{GraphicsContext, SharedContext};
