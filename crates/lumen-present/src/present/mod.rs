//! Per-frame presentation and CPU readback.
//!
//! Flow per frame:
//! - [`Presenter::present`] lazily resizes the output surface, asks the
//!   renderer for a frame and starts an asynchronous pixel-pack read
//! - [`Presenter::read_pixels`] later maps the transfer buffer and copies the
//!   frame out top row first

mod error;
mod pipeline;
mod readback;

pub use error::PresentError;
pub use pipeline::Presenter;
pub use readback::{copy_rows_flipped, Readback};
