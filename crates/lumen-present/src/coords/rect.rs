use serde::Deserialize;

/// Axis-aligned screen rectangle in physical pixels, bottom-left origin.
///
/// `right >= left` and `top >= bottom` for a well-formed rectangle; inverted
/// edges are tolerated and measure as zero.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScreenRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl ScreenRect {
    #[inline]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    #[inline]
    pub fn height(self) -> u32 {
        self.top.saturating_sub(self.bottom)
    }

    /// Smallest rectangle enclosing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.min(other.bottom),
        }
    }
}
