//! Off-screen output surface: destination texture plus the framebuffer that
//! targets it.

mod output;

pub use output::OutputSurface;
