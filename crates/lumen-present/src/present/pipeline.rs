use std::sync::Arc;

use crate::context::{ApiLoader, GraphicsContext, GraphicsHost, SharedContext};
use crate::coords::OutputDimensions;
use crate::gpu::{
    BufferId, FramebufferTarget, FrameRenderer, GpuApi, PackFormat, PresentState, TextureId,
};
use crate::layout::{self, LayoutSettings};
use crate::surface::OutputSurface;

use super::readback::{copy_rows_flipped, Readback};
use super::PresentError;

/// Headless presenter: renders frames off-screen and reads them back.
///
/// All methods assume the presenter's context is current on the calling
/// thread (see [`make_current`](Self::make_current)). Nothing here is
/// synchronized; callers serialize access themselves.
pub struct Presenter<H>
where
    H: GraphicsHost + ApiLoader,
{
    context: SharedContext<H>,
    api: H::Api,
    renderer: Box<dyn FrameRenderer<H::Api>>,
    surface: OutputSurface,
    pack_buffer: BufferId,

    /// Size the layout asks for; applied lazily on the next present.
    requested: OutputDimensions,

    /// Size of the frame held by the transfer buffer, if a read was issued
    /// since the last reallocation.
    readback_size: Option<OutputDimensions>,
}

impl<H> Presenter<H>
where
    H: GraphicsHost + ApiLoader,
{
    /// Acquires a context from `host`, binds the GPU API and allocates the
    /// output surface at the size `settings` resolves to.
    pub fn new<R>(host: Arc<H>, settings: &LayoutSettings, renderer: R) -> Result<Self, PresentError>
    where
        R: FrameRenderer<H::Api> + 'static,
    {
        let context = SharedContext::acquire(Arc::clone(&host))?;
        context.make_current();

        let requested = layout::resolve(settings);
        let mut api = host.load_api().ok_or(PresentError::ApiUnavailable)?;

        let pack_buffer = api.create_buffer();
        let surface = OutputSurface::new(&mut api, requested);

        log::info!(
            "headless presenter ready at {}x{}",
            requested.width(),
            requested.height()
        );

        Ok(Self {
            context,
            api,
            renderer: Box::new(renderer),
            surface,
            pack_buffer,
            requested,
            readback_size: None,
        })
    }

    /// Re-resolves the layout. The surface is resized on the next present.
    pub fn reload_config(&mut self, settings: &LayoutSettings) {
        let requested = layout::resolve(settings);
        if requested != self.requested {
            log::debug!(
                "layout changed {}x{} -> {}x{}",
                self.requested.width(),
                self.requested.height(),
                requested.width(),
                requested.height()
            );
        }
        self.requested = requested;
    }

    /// Reallocates the output surface at `size` right away.
    ///
    /// Framebuffer bindings and the scissor switch are preserved. Any frame
    /// waiting in the transfer buffer is discarded.
    pub fn reset(&mut self, size: OutputDimensions) {
        let surface = &mut self.surface;
        PresentState::preserved(&mut self.api, |api| surface.reset(api, size));
        self.readback_size = None;
    }

    /// Renders frame `frame_index` into the output surface and starts an
    /// asynchronous readback of it.
    ///
    /// Draw/read framebuffer bindings and the scissor switch are the same
    /// after this returns as before it was called.
    pub fn present(&mut self, frame_index: u32) {
        let saved = PresentState::capture(&self.api);

        if self.surface.size() != self.requested {
            self.surface.reset(&mut self.api, self.requested);
        }

        self.api.set_scissor_test(false);

        let framebuffer = self.surface.framebuffer();
        self.api
            .bind_framebuffer(FramebufferTarget::Draw, Some(framebuffer));
        self.renderer
            .render_frame(&mut self.api, framebuffer, frame_index);
        self.api.bind_framebuffer(FramebufferTarget::Draw, None);

        let size = self.surface.size();
        self.api
            .bind_framebuffer(FramebufferTarget::Read, Some(framebuffer));
        self.api.bind_pack_buffer(Some(self.pack_buffer));
        self.api.pack_buffer_data(size.frame_bytes());
        self.api.read_pixels(size, PackFormat::Bgra8888Rev);
        self.api.bind_pack_buffer(None);
        self.readback_size = Some(size);

        saved.restore(&mut self.api);

        log::trace!(
            "presented frame {frame_index} at {}x{}",
            size.width(),
            size.height()
        );
    }

    /// Copies the most recently presented frame into `dest`, top row first,
    /// as BGRA bytes.
    ///
    /// Best effort: if the transfer buffer cannot be mapped yet (or nothing
    /// was presented) `dest` is left untouched and `NotReady` is returned.
    /// `dest` must hold at least `width * height * 4` bytes.
    pub fn read_pixels(&mut self, dest: &mut [u8]) -> Result<Readback, PresentError> {
        let size = self.readback_size.unwrap_or(self.surface.size());
        let required = size.frame_bytes();
        if dest.len() < required {
            return Err(PresentError::DestinationTooSmall {
                required,
                actual: dest.len(),
            });
        }

        if self.readback_size.is_none() {
            return Ok(Readback::NotReady);
        }

        let mut copied = false;
        self.api.bind_pack_buffer(Some(self.pack_buffer));
        let mapped = self
            .api
            .map_pack_buffer(&mut |pixels: &[u8]| copied = copy_rows_flipped(pixels, dest, size));
        self.api.bind_pack_buffer(None);

        if mapped && copied {
            Ok(Readback::Copied)
        } else {
            log::trace!("readback not ready (mapped: {mapped})");
            Ok(Readback::NotReady)
        }
    }

    /// Current output size as `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.size().as_tuple()
    }

    /// Size the layout currently asks for.
    #[inline]
    pub fn requested_dimensions(&self) -> OutputDimensions {
        self.requested
    }

    /// Destination texture, for consumers that read it on the GPU directly.
    #[inline]
    pub fn texture_handle(&self) -> Option<TextureId> {
        self.surface.texture()
    }

    /// Makes the presenter's context current on the calling thread.
    pub fn make_current(&self) {
        self.context.make_current();
    }

    /// Creates another context sharing this presenter's GPU objects.
    ///
    /// The presenter's context is current again when this returns.
    pub fn create_shared_context(&self) -> Result<SharedContext<H>, PresentError> {
        self.context.create_shared()
    }

    #[inline]
    pub fn api(&self) -> &H::Api {
        &self.api
    }

    #[inline]
    pub fn api_mut(&mut self) -> &mut H::Api {
        &mut self.api
    }
}

impl<H> Drop for Presenter<H>
where
    H: GraphicsHost + ApiLoader,
{
    fn drop(&mut self) {
        self.context.make_current();
        self.surface.release(&mut self.api);
        self.api.delete_buffer(self.pack_buffer);
        // `context` is released when its field drops.
    }
}
