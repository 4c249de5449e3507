//! Headless wgpu backend.
//!
//! This module is responsible for:
//! - acquiring an adapter/device/queue with no surface attached
//! - handing out context handles that all share that one device
//! - emulating texture/framebuffer/pack-buffer objects over wgpu resources

mod api;
mod host;
mod init;

pub use api::WgpuApi;
pub use host::WgpuHost;
pub use init::{ReadbackPolicy, WgpuInit};
