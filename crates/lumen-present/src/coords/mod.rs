//! Size and rectangle types shared by the layout resolver and the surface.
//!
//! Canonical space for layout rectangles:
//! - physical pixels
//! - origin bottom-left, +X right, +Y up (the framebuffer convention)
//!
//! Pixel buffers handed to callers are top-to-bottom.

mod dimensions;
mod rect;

pub use dimensions::{OutputDimensions, BYTES_PER_PIXEL};
pub use rect::ScreenRect;
