use crate::coords::OutputDimensions;

/// Deterministic stand-in for the emulator's renderer.
///
/// Pixel `(x, y)` (top-left origin) is `[x, y, frame, 0xFF]` with each
/// component truncated to 8 bits, so every row carries its own marker in
/// the green channel and every frame is distinguishable by blue.
#[derive(Debug, Clone, Default)]
pub struct TestPattern {
    _private: (),
}

impl TestPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame as tightly packed RGBA bytes, top row first.
    pub fn rgba(&self, size: OutputDimensions, frame_index: u32) -> Vec<u8> {
        let pixels: Vec<[u8; 4]> = (0..size.height())
            .flat_map(|y| {
                (0..size.width()).map(move |x| [x as u8, y as u8, frame_index as u8, 0xFF])
            })
            .collect();
        bytemuck::cast_slice(&pixels).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_is_one_frame_long() {
        let size = OutputDimensions::new(7, 5);
        assert_eq!(TestPattern::new().rgba(size, 0).len(), size.frame_bytes());
    }

    #[test]
    fn rows_carry_markers() {
        let size = OutputDimensions::new(2, 3);
        let data = TestPattern::new().rgba(size, 9);
        assert_eq!(&data[0..4], &[0, 0, 9, 0xFF]);
        assert_eq!(&data[4..8], &[1, 0, 9, 0xFF]);
        assert_eq!(&data[16..20], &[0, 2, 9, 0xFF]);
    }
}
