use crate::coords::OutputDimensions;

/// Outcome of a readback attempt.
#[must_use]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Readback {
    /// A full frame was written to the destination.
    Copied,
    /// No frame was available; the destination was not touched.
    NotReady,
}

impl Readback {
    #[inline]
    pub fn is_copied(self) -> bool {
        self == Readback::Copied
    }
}

/// Copies bottom-first rows from `src` into `dst` top-first.
///
/// Source row `i` lands at destination row `height - 1 - i`; bytes are copied
/// verbatim. Returns `false` and writes nothing if either slice is shorter
/// than one frame of `size`.
pub fn copy_rows_flipped(src: &[u8], dst: &mut [u8], size: OutputDimensions) -> bool {
    let row = size.row_bytes();
    let height = size.height() as usize;
    let frame = size.frame_bytes();

    if src.len() < frame || dst.len() < frame {
        return false;
    }

    for (i, src_row) in src[..frame].chunks_exact(row).enumerate() {
        let start = (height - 1 - i) * row;
        dst[start..start + row].copy_from_slice(src_row);
    }
    true
}
