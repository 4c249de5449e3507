//! Lumen presentation crate.
//!
//! Takes frames produced by an emulated GPU renderer, presents them into an
//! off-screen target and exposes the resulting pixels to a host that has no
//! visible window.

pub mod backend;
pub mod context;
pub mod coords;
pub mod gpu;
pub mod layout;
pub mod logging;
pub mod present;
pub mod surface;

pub use present::{PresentError, Presenter, Readback};
