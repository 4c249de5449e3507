use crate::coords::OutputDimensions;
use crate::gpu::{FramebufferId, FramebufferTarget, GpuApi, TextureFormat, TextureId};

/// Owns the destination texture and the framebuffer bound to it.
///
/// Invariant: the texture, the framebuffer attachment and [`size`](Self::size)
/// always reflect the last [`reset`](Self::reset).
#[derive(Debug)]
pub struct OutputSurface {
    framebuffer: FramebufferId,
    texture: Option<TextureId>,
    size: OutputDimensions,
}

impl OutputSurface {
    /// Creates the framebuffer and allocates a first texture of `size`.
    pub fn new<A: GpuApi + ?Sized>(api: &mut A, size: OutputDimensions) -> Self {
        let mut surface = Self {
            framebuffer: api.create_framebuffer(),
            texture: None,
            size,
        };
        surface.reset(api, size);
        surface
    }

    /// Releases the current texture and allocates a new one of `size`.
    ///
    /// Always reallocates, even when the size is unchanged. Leaves the draw
    /// framebuffer binding at the default target.
    pub fn reset<A: GpuApi + ?Sized>(&mut self, api: &mut A, size: OutputDimensions) {
        if let Some(old) = self.texture.take() {
            api.delete_texture(old);
        }

        let texture = api.create_texture();
        api.allocate_texture_2d(texture, 1, TextureFormat::Rgba8, size);

        api.bind_framebuffer(FramebufferTarget::Draw, Some(self.framebuffer));
        api.attach_color_texture(FramebufferTarget::Draw, texture, 0);
        api.bind_framebuffer(FramebufferTarget::Draw, None);

        self.texture = Some(texture);
        self.size = size;

        log::debug!(
            "output surface reallocated at {}x{} (texture {})",
            size.width(),
            size.height(),
            texture.raw()
        );
    }

    /// Deletes the texture and the framebuffer.
    pub fn release<A: GpuApi + ?Sized>(&mut self, api: &mut A) {
        if let Some(texture) = self.texture.take() {
            api.delete_texture(texture);
        }
        api.delete_framebuffer(self.framebuffer);
    }

    #[inline]
    pub fn framebuffer(&self) -> FramebufferId {
        self.framebuffer
    }

    /// Current destination texture; `None` only after [`release`](Self::release).
    #[inline]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    #[inline]
    pub fn size(&self) -> OutputDimensions {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::software::SoftwareApi;

    #[test]
    fn reset_matches_requested_size() {
        let mut api = SoftwareApi::new();
        let mut surface = OutputSurface::new(&mut api, OutputDimensions::MIN);

        for (w, h) in [(1, 1), (4, 3), (400, 240), (240, 400)] {
            let size = OutputDimensions::new(w, h);
            surface.reset(&mut api, size);

            let texture = surface.texture().unwrap();
            assert_eq!(surface.size(), size);
            assert_eq!(api.texture_size(texture), Some(size));
            assert_eq!(api.color_attachment(surface.framebuffer()), Some(texture));
        }
    }

    #[test]
    fn reset_twice_same_size_reallocates() {
        let mut api = SoftwareApi::new();
        let size = OutputDimensions::new(8, 8);
        let mut surface = OutputSurface::new(&mut api, size);
        let first = surface.texture().unwrap();

        surface.reset(&mut api, size);
        let second = surface.texture().unwrap();

        assert_ne!(first, second);
        assert_eq!(api.texture_size(first), None);
        assert_eq!(api.texture_size(second), Some(size));
        assert_eq!(api.live_textures(), 1);
    }

    #[test]
    fn reset_leaves_draw_binding_at_default() {
        let mut api = SoftwareApi::new();
        let mut surface = OutputSurface::new(&mut api, OutputDimensions::MIN);
        surface.reset(&mut api, OutputDimensions::new(2, 2));
        assert_eq!(api.framebuffer_binding(FramebufferTarget::Draw), None);
    }

    #[test]
    fn release_frees_everything() {
        let mut api = SoftwareApi::new();
        let mut surface = OutputSurface::new(&mut api, OutputDimensions::new(3, 3));
        surface.release(&mut api);

        assert_eq!(surface.texture(), None);
        assert_eq!(api.live_textures(), 0);
        assert_eq!(api.live_framebuffers(), 0);
    }
}
