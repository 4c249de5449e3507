//! Layout resolution.
//!
//! Turns layout configuration into the output size the presenter should
//! render at. Resolution never fails: degenerate inputs collapse to 1x1 and oversized
//! ones are capped at [`MAX_OUTPUT_DIMENSION`].

mod resolver;
mod settings;

pub use resolver::{base_dimensions, resolve, MAX_OUTPUT_DIMENSION};
pub use settings::{CustomLayout, LayoutSettings};
