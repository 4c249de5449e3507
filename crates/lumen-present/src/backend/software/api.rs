use std::collections::HashMap;
use std::num::NonZeroU32;

use crate::backend::TestPattern;
use crate::coords::{OutputDimensions, BYTES_PER_PIXEL};
use crate::gpu::{
    BufferId, FramebufferId, FramebufferTarget, FrameRenderer, GpuApi, PackFormat, TextureFormat,
    TextureId,
};

#[derive(Debug, Default)]
struct SoftTexture {
    size: Option<OutputDimensions>,
    /// RGBA bytes, bottom row first.
    pixels: Vec<u8>,
}

/// [`GpuApi`] over plain memory.
#[derive(Debug, Default)]
pub struct SoftwareApi {
    issued: u32,
    textures: HashMap<TextureId, SoftTexture>,
    framebuffers: HashMap<FramebufferId, Option<TextureId>>,
    buffers: HashMap<BufferId, Vec<u8>>,
    draw_framebuffer: Option<FramebufferId>,
    read_framebuffer: Option<FramebufferId>,
    pack_buffer: Option<BufferId>,
    scissor_test: bool,
    fail_maps: bool,
}

impl SoftwareApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `map_pack_buffer` fail until cleared.
    pub fn set_map_failure(&mut self, fail: bool) {
        self.fail_maps = fail;
    }

    /// RGBA bytes of level 0, bottom row first.
    pub fn texture_pixels(&self, texture: TextureId) -> Option<&[u8]> {
        self.textures.get(&texture).map(|t| t.pixels.as_slice())
    }

    pub fn texture_pixels_mut(&mut self, texture: TextureId) -> Option<&mut [u8]> {
        self.textures
            .get_mut(&texture)
            .map(|t| t.pixels.as_mut_slice())
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_framebuffers(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    fn next_name(&mut self) -> NonZeroU32 {
        let name = NonZeroU32::MIN.saturating_add(self.issued);
        self.issued = self.issued.saturating_add(1);
        name
    }

    fn binding_mut(&mut self, target: FramebufferTarget) -> &mut Option<FramebufferId> {
        match target {
            FramebufferTarget::Draw => &mut self.draw_framebuffer,
            FramebufferTarget::Read => &mut self.read_framebuffer,
        }
    }
}

impl GpuApi for SoftwareApi {
    fn create_texture(&mut self) -> TextureId {
        let id = TextureId::new(self.next_name());
        self.textures.insert(id, SoftTexture::default());
        id
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_none() {
            return;
        }
        // Deleting detaches from the currently bound framebuffers only.
        for fb in [self.draw_framebuffer, self.read_framebuffer].into_iter().flatten() {
            if let Some(slot) = self.framebuffers.get_mut(&fb) {
                if *slot == Some(texture) {
                    *slot = None;
                }
            }
        }
    }

    fn allocate_texture_2d(
        &mut self,
        texture: TextureId,
        levels: u32,
        format: TextureFormat,
        size: OutputDimensions,
    ) {
        let TextureFormat::Rgba8 = format;
        if levels != 1 {
            log::debug!("software backend keeps only level 0 of {levels}");
        }
        match self.textures.get_mut(&texture) {
            Some(t) => {
                t.size = Some(size);
                t.pixels = vec![0; size.frame_bytes()];
            }
            None => log::warn!("allocate on unknown texture {}", texture.raw()),
        }
    }

    fn texture_size(&self, texture: TextureId) -> Option<OutputDimensions> {
        self.textures.get(&texture).and_then(|t| t.size)
    }

    fn create_framebuffer(&mut self) -> FramebufferId {
        let id = FramebufferId::new(self.next_name());
        self.framebuffers.insert(id, None);
        id
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.framebuffers.remove(&framebuffer);
        for target in [FramebufferTarget::Draw, FramebufferTarget::Read] {
            let binding = self.binding_mut(target);
            if *binding == Some(framebuffer) {
                *binding = None;
            }
        }
    }

    fn attach_color_texture(&mut self, target: FramebufferTarget, texture: TextureId, level: u32) {
        debug_assert_eq!(level, 0, "software backend has a single level");
        let Some(fb) = self.framebuffer_binding(target) else {
            log::warn!("attach with the default framebuffer bound");
            return;
        };
        if let Some(slot) = self.framebuffers.get_mut(&fb) {
            *slot = Some(texture);
        }
    }

    fn color_attachment(&self, framebuffer: FramebufferId) -> Option<TextureId> {
        self.framebuffers.get(&framebuffer).copied().flatten()
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferId>) {
        *self.binding_mut(target) = framebuffer;
    }

    fn framebuffer_binding(&self, target: FramebufferTarget) -> Option<FramebufferId> {
        match target {
            FramebufferTarget::Draw => self.draw_framebuffer,
            FramebufferTarget::Read => self.read_framebuffer,
        }
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        self.scissor_test = enabled;
    }

    fn scissor_test(&self) -> bool {
        self.scissor_test
    }

    fn create_buffer(&mut self) -> BufferId {
        let id = BufferId::new(self.next_name());
        self.buffers.insert(id, Vec::new());
        id
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        if self.pack_buffer == Some(buffer) {
            self.pack_buffer = None;
        }
    }

    fn bind_pack_buffer(&mut self, buffer: Option<BufferId>) {
        self.pack_buffer = buffer;
    }

    fn pack_buffer_binding(&self) -> Option<BufferId> {
        self.pack_buffer
    }

    fn pack_buffer_data(&mut self, size: usize) {
        match self.pack_buffer.and_then(|b| self.buffers.get_mut(&b)) {
            Some(storage) => *storage = vec![0; size],
            None => log::warn!("pack buffer data with no pack buffer bound"),
        }
    }

    fn read_pixels(&mut self, size: OutputDimensions, format: PackFormat) {
        let PackFormat::Bgra8888Rev = format;

        let source = self
            .read_framebuffer
            .and_then(|fb| self.color_attachment(fb))
            .and_then(|t| self.textures.get(&t))
            .and_then(|t| t.size.map(|s| (s, &t.pixels)));
        let Some((tex_size, pixels)) = source else {
            log::warn!("read pixels without a readable color attachment");
            return;
        };
        let Some(storage) = self.pack_buffer.and_then(|b| self.buffers.get_mut(&b)) else {
            log::warn!("read pixels with no pack buffer bound");
            return;
        };
        if storage.len() < size.frame_bytes() {
            log::warn!("pack buffer too small for a {}x{} read", size.width(), size.height());
            return;
        }

        let rows = size.height().min(tex_size.height()) as usize;
        let cols = size.width().min(tex_size.width()) as usize;
        for y in 0..rows {
            for x in 0..cols {
                let src = (y * tex_size.width() as usize + x) * BYTES_PER_PIXEL;
                let dst = (y * size.width() as usize + x) * BYTES_PER_PIXEL;
                let [r, g, b, a] = [pixels[src], pixels[src + 1], pixels[src + 2], pixels[src + 3]];
                storage[dst..dst + BYTES_PER_PIXEL].copy_from_slice(&[b, g, r, a]);
            }
        }
    }

    fn map_pack_buffer(&mut self, read: &mut dyn FnMut(&[u8])) -> bool {
        if self.fail_maps {
            return false;
        }
        match self.pack_buffer.and_then(|b| self.buffers.get(&b)) {
            Some(storage) if !storage.is_empty() => {
                read(storage.as_slice());
                true
            }
            _ => false,
        }
    }
}

impl FrameRenderer<SoftwareApi> for TestPattern {
    fn render_frame(&mut self, api: &mut SoftwareApi, target: FramebufferId, frame_index: u32) {
        let Some(texture) = api.color_attachment(target) else {
            return;
        };
        let Some(size) = api.texture_size(texture) else {
            return;
        };
        let image = self.rgba(size, frame_index);
        if let Some(pixels) = api.texture_pixels_mut(texture) {
            let row = size.row_bytes();
            for (dst, src) in pixels.chunks_exact_mut(row).zip(image.chunks_exact(row).rev()) {
                dst.copy_from_slice(src);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readable(api: &mut SoftwareApi, size: OutputDimensions) -> (FramebufferId, TextureId) {
        let fb = api.create_framebuffer();
        let tex = api.create_texture();
        api.allocate_texture_2d(tex, 1, TextureFormat::Rgba8, size);
        api.bind_framebuffer(FramebufferTarget::Draw, Some(fb));
        api.attach_color_texture(FramebufferTarget::Draw, tex, 0);
        api.bind_framebuffer(FramebufferTarget::Draw, None);
        (fb, tex)
    }

    // ── object lifetime ───────────────────────────────────────────────────

    #[test]
    fn names_are_unique_across_kinds() {
        let mut api = SoftwareApi::new();
        let t = api.create_texture().raw();
        let f = api.create_framebuffer().raw();
        let b = api.create_buffer().raw();
        assert!(t != f && f != b && t != b);
    }

    #[test]
    fn deleting_bound_framebuffer_resets_binding() {
        let mut api = SoftwareApi::new();
        let fb = api.create_framebuffer();
        api.bind_framebuffer(FramebufferTarget::Read, Some(fb));
        api.delete_framebuffer(fb);
        assert_eq!(api.framebuffer_binding(FramebufferTarget::Read), None);
    }

    #[test]
    fn deleting_pack_buffer_frees_it_and_unbinds() {
        let mut api = SoftwareApi::new();
        let buf = api.create_buffer();
        api.bind_pack_buffer(Some(buf));
        assert_eq!(api.live_buffers(), 1);

        api.delete_buffer(buf);
        assert_eq!(api.live_buffers(), 0);
        assert_eq!(api.pack_buffer_binding(), None);
    }

    // ── pack reads ────────────────────────────────────────────────────────

    #[test]
    fn read_pixels_swizzles_to_bgra() {
        let mut api = SoftwareApi::new();
        let size = OutputDimensions::new(1, 1);
        let (fb, tex) = readable(&mut api, size);
        api.texture_pixels_mut(tex).unwrap().copy_from_slice(&[1, 2, 3, 4]);

        let buf = api.create_buffer();
        api.bind_framebuffer(FramebufferTarget::Read, Some(fb));
        api.bind_pack_buffer(Some(buf));
        api.pack_buffer_data(4);
        api.read_pixels(size, PackFormat::Bgra8888Rev);

        let mut seen = Vec::new();
        assert!(api.map_pack_buffer(&mut |bytes: &[u8]| seen.extend_from_slice(bytes)));
        assert_eq!(seen, [3, 2, 1, 4]);
    }

    #[test]
    fn map_fails_without_storage() {
        let mut api = SoftwareApi::new();
        let buf = api.create_buffer();
        api.bind_pack_buffer(Some(buf));
        assert!(!api.map_pack_buffer(&mut |_: &[u8]| panic!("must not be called")));
    }

    #[test]
    fn injected_map_failure() {
        let mut api = SoftwareApi::new();
        let buf = api.create_buffer();
        api.bind_pack_buffer(Some(buf));
        api.pack_buffer_data(16);
        api.set_map_failure(true);
        assert!(!api.map_pack_buffer(&mut |_: &[u8]| panic!("must not be called")));
    }

    // ── test pattern ──────────────────────────────────────────────────────

    #[test]
    fn test_pattern_is_stored_bottom_first() {
        let mut api = SoftwareApi::new();
        let size = OutputDimensions::new(1, 2);
        let (fb, tex) = readable(&mut api, size);

        TestPattern::new().render_frame(&mut api, fb, 5);

        // Top image row (y = 0) is the last storage row.
        let pixels = api.texture_pixels(tex).unwrap();
        assert_eq!(&pixels[4..8], &[0, 0, 5, 0xFF]);
        assert_eq!(&pixels[0..4], &[0, 1, 5, 0xFF]);
    }
}
