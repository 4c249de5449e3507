use std::num::NonZeroU32;

use crate::coords::OutputDimensions;

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            #[inline]
            pub const fn new(raw: NonZeroU32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0.get()
            }
        }
    };
}

object_id!(
    /// Texture object name.
    TextureId
);
object_id!(
    /// Framebuffer object name. The default target is `None` at bind sites.
    FramebufferId
);
object_id!(
    /// Buffer object name.
    BufferId
);

/// Framebuffer binding point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FramebufferTarget {
    Draw,
    Read,
}

/// Texture storage format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8 bits per channel, bytes in R, G, B, A order.
    Rgba8,
}

/// Byte layout produced by a pixel-pack read.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PackFormat {
    /// BGRA with 8-8-8-8 reversed packing: bytes B, G, R, A in memory.
    Bgra8888Rev,
}

/// GPU operations used by the presentation pipeline.
///
/// Calls are only valid while the owning context is current. Implementations
/// are not expected to synchronize; the presenter is single-threaded.
pub trait GpuApi {
    fn create_texture(&mut self) -> TextureId;

    /// Deletes a texture. Unknown ids are ignored.
    fn delete_texture(&mut self, texture: TextureId);

    /// Allocates immutable storage for a 2D texture. Contents are undefined.
    fn allocate_texture_2d(
        &mut self,
        texture: TextureId,
        levels: u32,
        format: TextureFormat,
        size: OutputDimensions,
    );

    /// Size of level 0, if storage has been allocated.
    fn texture_size(&self, texture: TextureId) -> Option<OutputDimensions>;

    fn create_framebuffer(&mut self) -> FramebufferId;

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Attaches `level` of `texture` as color attachment 0 of the framebuffer
    /// bound at `target`.
    fn attach_color_texture(&mut self, target: FramebufferTarget, texture: TextureId, level: u32);

    /// Texture attached as color attachment 0 of `framebuffer`.
    fn color_attachment(&self, framebuffer: FramebufferId) -> Option<TextureId>;

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferId>);

    fn framebuffer_binding(&self, target: FramebufferTarget) -> Option<FramebufferId>;

    fn set_scissor_test(&mut self, enabled: bool);

    fn scissor_test(&self) -> bool;

    fn create_buffer(&mut self) -> BufferId;

    fn delete_buffer(&mut self, buffer: BufferId);

    fn bind_pack_buffer(&mut self, buffer: Option<BufferId>);

    fn pack_buffer_binding(&self) -> Option<BufferId>;

    /// Replaces the storage of the bound pack buffer with `size` undefined
    /// bytes. Any pending read into the old storage is abandoned.
    fn pack_buffer_data(&mut self, size: usize);

    /// Starts an asynchronous copy of `size` pixels, anchored at the origin of
    /// the bound read framebuffer, into the bound pack buffer.
    ///
    /// Rows are packed tightly, bottom row first. Returns immediately.
    fn read_pixels(&mut self, size: OutputDimensions, format: PackFormat);

    /// Maps the bound pack buffer for reading and hands its bytes to `read`.
    ///
    /// Returns `false` without calling `read` when the buffer cannot be
    /// mapped (nothing bound, no storage, copy still in flight, device
    /// error). The buffer is unmapped again before this returns.
    fn map_pack_buffer(&mut self, read: &mut dyn FnMut(&[u8])) -> bool;
}

/// The external renderer: draws a requested frame into a framebuffer.
pub trait FrameRenderer<A: GpuApi> {
    /// Renders frame `frame_index` into `target`, which is bound as the draw
    /// framebuffer for the duration of the call.
    fn render_frame(&mut self, api: &mut A, target: FramebufferId, frame_index: u32);
}

