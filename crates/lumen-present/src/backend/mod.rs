//! Concrete hosts and GPU API implementations.
//!
//! - [`wgpu`]: headless wgpu device; the production path
//! - [`software`]: CPU reference implementation; used for tests and on
//!   machines without an adapter

mod contexts;
mod pattern;
pub mod software;
pub mod wgpu;

pub use pattern::TestPattern;
