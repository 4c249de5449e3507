//! CPU reference backend.
//!
//! Behaves like a driver whose pack reads finish instantly. Texture storage
//! is kept bottom row first, matching the framebuffer origin.

mod api;
mod host;

pub use api::SoftwareApi;
pub use host::SoftwareHost;
