use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, PoisonError};

use crate::backend::TestPattern;
use crate::coords::{OutputDimensions, BYTES_PER_PIXEL};
use crate::gpu::{
    BufferId, FramebufferId, FramebufferTarget, FrameRenderer, GpuApi, PackFormat, TextureFormat,
    TextureId,
};

use super::ReadbackPolicy;

/// Allocated texture storage.
struct GpuTexture {
    texture: wgpu::Texture,
    size: OutputDimensions,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum MapStatus {
    Pending,
    Mapped,
    Failed,
}

/// One in-flight or completed pack read.
struct Staging {
    buffer: wgpu::Buffer,
    size: OutputDimensions,
    padded_row: u32,
    status: Arc<Mutex<MapStatus>>,

    /// Tight bottom-first BGRA rows, filled on the first successful map.
    resolved: Option<Vec<u8>>,
}

/// A pack buffer object. wgpu buffers cannot be resized, so the staging
/// buffer is created at read time with the row padding the copy needs.
#[derive(Default)]
struct PackBuffer {
    capacity: usize,
    staging: Option<Staging>,
}

/// [`GpuApi`] over a wgpu device.
///
/// Framebuffer bindings and the scissor switch are tracked state: wgpu has
/// no global equivalents, so renderers consult them when encoding passes.
pub struct WgpuApi {
    device: wgpu::Device,
    queue: wgpu::Queue,
    readback: ReadbackPolicy,

    issued: u32,
    textures: HashMap<TextureId, Option<GpuTexture>>,
    framebuffers: HashMap<FramebufferId, Option<TextureId>>,
    buffers: HashMap<BufferId, PackBuffer>,

    draw_framebuffer: Option<FramebufferId>,
    read_framebuffer: Option<FramebufferId>,
    pack_buffer: Option<BufferId>,
    scissor_test: bool,
}

impl WgpuApi {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, readback: ReadbackPolicy) -> Self {
        Self {
            device,
            queue,
            readback,
            issued: 0,
            textures: HashMap::new(),
            framebuffers: HashMap::new(),
            buffers: HashMap::new(),
            draw_framebuffer: None,
            read_framebuffer: None,
            pack_buffer: None,
            scissor_test: false,
        }
    }

    /// The wgpu texture behind `texture`, once storage is allocated.
    pub fn texture(&self, texture: TextureId) -> Option<&wgpu::Texture> {
        self.textures
            .get(&texture)
            .and_then(Option::as_ref)
            .map(|t| &t.texture)
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

    fn poll_type(&self) -> wgpu::PollType {
        match self.readback {
            ReadbackPolicy::Poll => wgpu::PollType::Poll,
            ReadbackPolicy::Wait => wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            },
        }
    }
}

impl GpuApi for WgpuApi {
    fn create_texture(&mut self) -> TextureId {
        let id = TextureId::new(self.next_name());
        self.textures.insert(id, None);
        id
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if let Some(Some(gpu)) = self.textures.remove(&texture) {
            gpu.texture.destroy();
        }
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
        let Some(slot) = self.textures.get_mut(&texture) else {
            log::warn!("allocate on unknown texture {}", texture.raw());
            return;
        };

        let format = match format {
            TextureFormat::Rgba8 => wgpu::TextureFormat::Rgba8Unorm,
        };

        let gpu = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen output texture"),
            size: wgpu::Extent3d {
                width: size.width(),
                height: size.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.max(1),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if let Some(old) = slot.replace(GpuTexture { texture: gpu, size }) {
            old.texture.destroy();
        }
    }

    fn texture_size(&self, texture: TextureId) -> Option<OutputDimensions> {
        self.textures
            .get(&texture)
            .and_then(Option::as_ref)
            .map(|t| t.size)
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
        if level != 0 {
            log::warn!("only level 0 can be attached; got {level}");
            return;
        }
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
        self.buffers.insert(id, PackBuffer::default());
        id
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if let Some(PackBuffer {
            staging: Some(staging),
            ..
        }) = self.buffers.remove(&buffer)
        {
            staging.buffer.destroy();
        }
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
            Some(pack) => {
                // Orphan: dropping the staging buffer abandons any pending map.
                pack.staging = None;
                pack.capacity = size;
            }
            None => log::warn!("pack buffer data with no pack buffer bound"),
        }
    }

    fn read_pixels(&mut self, size: OutputDimensions, format: PackFormat) {
        let PackFormat::Bgra8888Rev = format;

        let source = self
            .read_framebuffer
            .and_then(|fb| self.color_attachment(fb));
        let Some(source) = source
            .and_then(|t| self.textures.get(&t))
            .and_then(Option::as_ref)
        else {
            log::warn!("read pixels without a readable color attachment");
            return;
        };
        let Some(pack) = self.pack_buffer.and_then(|b| self.buffers.get_mut(&b)) else {
            log::warn!("read pixels with no pack buffer bound");
            return;
        };
        if pack.capacity < size.frame_bytes() {
            log::warn!(
                "pack buffer holds {} bytes; a {}x{} read needs {}",
                pack.capacity,
                size.width(),
                size.height(),
                size.frame_bytes()
            );
            return;
        }

        let padded_row = padded_bytes_per_row(size);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen pack buffer"),
            size: u64::from(padded_row) * u64::from(size.height()),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen readback encoder"),
            });

        // Clipped to the source; the rest of the staging rows stay undefined.
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &source.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(size.height()),
                },
            },
            wgpu::Extent3d {
                width: size.width().min(source.size.width()),
                height: size.height().min(source.size.height()),
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let status = Arc::new(Mutex::new(MapStatus::Pending));
        let signal = Arc::clone(&status);
        buffer
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                let next = match result {
                    Ok(()) => MapStatus::Mapped,
                    Err(err) => {
                        log::debug!("pack buffer map failed: {err}");
                        MapStatus::Failed
                    }
                };
                *signal.lock().unwrap_or_else(PoisonError::into_inner) = next;
            });

        pack.staging = Some(Staging {
            buffer,
            size,
            padded_row,
            status,
            resolved: None,
        });
    }

    fn map_pack_buffer(&mut self, read: &mut dyn FnMut(&[u8])) -> bool {
        let poll_type = self.poll_type();
        let Some(staging) = self
            .pack_buffer
            .and_then(|b| self.buffers.get_mut(&b))
            .and_then(|p| p.staging.as_mut())
        else {
            return false;
        };

        if staging.resolved.is_none() {
            if let Err(err) = self.device.poll(poll_type) {
                log::debug!("device poll failed: {err}");
            }

            let status = *staging.status.lock().unwrap_or_else(PoisonError::into_inner);
            if status != MapStatus::Mapped {
                return false;
            }

            let mapped = staging.buffer.slice(..).get_mapped_range();
            let rows = repack_rows(&mapped, staging.size, staging.padded_row as usize);
            drop(mapped);
            staging.buffer.unmap();
            staging.resolved = Some(rows);
        }

        match &staging.resolved {
            Some(rows) => {
                read(rows.as_slice());
                true
            }
            None => false,
        }
    }
}

impl FrameRenderer<WgpuApi> for TestPattern {
    fn render_frame(&mut self, api: &mut WgpuApi, target: FramebufferId, frame_index: u32) {
        let Some(texture_id) = api.color_attachment(target) else {
            return;
        };
        let (Some(texture), Some(size)) = (api.texture(texture_id), api.texture_size(texture_id))
        else {
            return;
        };

        // wgpu textures are top row first, same as the pattern.
        api.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.rgba(size, frame_index),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width() * BYTES_PER_PIXEL as u32),
                rows_per_image: Some(size.height()),
            },
            wgpu::Extent3d {
                width: size.width(),
                height: size.height(),
                depth_or_array_layers: 1,
            },
        );
    }
}

/// Row pitch of a texture-to-buffer copy, rounded up to wgpu's alignment.
fn padded_bytes_per_row(size: OutputDimensions) -> u32 {
    let unpadded = size.width() * BYTES_PER_PIXEL as u32;
    unpadded.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}

/// Turns a padded, top-first RGBA copy into tight, bottom-first BGRA rows.
fn repack_rows(mapped: &[u8], size: OutputDimensions, padded_row: usize) -> Vec<u8> {
    let row = size.row_bytes();
    let mut out = Vec::with_capacity(size.frame_bytes());
    for src in mapped
        .chunks_exact(padded_row)
        .take(size.height() as usize)
        .rev()
    {
        for px in src[..row].chunks_exact(BYTES_PER_PIXEL) {
            out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_row_is_aligned() {
        assert_eq!(padded_bytes_per_row(OutputDimensions::new(1, 1)), 256);
        assert_eq!(padded_bytes_per_row(OutputDimensions::new(64, 1)), 256);
        assert_eq!(padded_bytes_per_row(OutputDimensions::new(65, 1)), 512);
        assert_eq!(padded_bytes_per_row(OutputDimensions::new(400, 240)), 1792);
    }

    #[test]
    fn repack_drops_padding_reverses_rows_and_swizzles() {
        let size = OutputDimensions::new(1, 2);
        let mut mapped = vec![0xEEu8; 8];
        mapped[0..4].copy_from_slice(&[1, 2, 3, 4]); // top row
        mapped[4..8].copy_from_slice(&[5, 6, 7, 8]); // bottom row

        let rows = repack_rows(&mapped, size, 4);
        assert_eq!(rows, [7, 6, 5, 8, 3, 2, 1, 4]);

        let mut padded = vec![0xEEu8; 16];
        padded[0..4].copy_from_slice(&[1, 2, 3, 4]);
        padded[8..12].copy_from_slice(&[5, 6, 7, 8]);
        assert_eq!(repack_rows(&padded, size, 8), rows);
    }
}
