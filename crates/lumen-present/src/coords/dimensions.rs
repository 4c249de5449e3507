/// Bytes per pixel of every buffer this crate moves around (8 bits x 4 channels).
pub const BYTES_PER_PIXEL: usize = 4;

/// Output size in physical pixels.
///
/// Both axes are always at least 1; constructors clamp instead of rejecting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct OutputDimensions {
    width: u32,
    height: u32,
}

impl OutputDimensions {
    /// The degenerate 1x1 size used when no layout applies.
    pub const MIN: Self = Self { width: 1, height: 1 };

    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the size with width and height exchanged.
    #[inline]
    pub fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Multiplies both axes by `factor`, rounding to the nearest pixel.
    ///
    /// The result is clamped to 1x1 like every other constructor. Callers are
    /// expected to pass a finite, positive factor.
    pub fn scaled(self, factor: f32) -> Self {
        let scale = |v: u32| -> u32 {
            let scaled = (f64::from(v) * f64::from(factor)).round();
            if scaled >= f64::from(u32::MAX) {
                u32::MAX
            } else if scaled > 0.0 {
                scaled as u32
            } else {
                0
            }
        };
        Self::new(scale(self.width), scale(self.height))
    }

    /// Caps each axis at `max_axis` (itself treated as at least 1).
    #[inline]
    pub fn clamped(self, max_axis: u32) -> Self {
        let max_axis = max_axis.max(1);
        Self {
            width: self.width.min(max_axis),
            height: self.height.min(max_axis),
        }
    }

    /// Number of bytes in one tightly packed row.
    #[inline]
    pub fn row_bytes(self) -> usize {
        (self.width as usize).saturating_mul(BYTES_PER_PIXEL)
    }

    /// Number of bytes in a tightly packed frame. Saturates instead of
    /// wrapping on sizes no allocation could hold.
    #[inline]
    pub fn frame_bytes(self) -> usize {
        self.row_bytes().saturating_mul(self.height as usize)
    }
}

impl Default for OutputDimensions {
    fn default() -> Self {
        Self::MIN
    }
}
