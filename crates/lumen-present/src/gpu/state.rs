use super::{FramebufferId, FramebufferTarget, GpuApi};

/// Global GPU state that presentation must leave untouched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PresentState {
    pub draw_framebuffer: Option<FramebufferId>,
    pub read_framebuffer: Option<FramebufferId>,
    pub scissor_test: bool,
}

impl PresentState {
    /// Snapshots the current bindings and scissor switch.
    pub fn capture<A: GpuApi + ?Sized>(api: &A) -> Self {
        Self {
            draw_framebuffer: api.framebuffer_binding(FramebufferTarget::Draw),
            read_framebuffer: api.framebuffer_binding(FramebufferTarget::Read),
            scissor_test: api.scissor_test(),
        }
    }

    /// Puts the snapshot back.
    pub fn restore<A: GpuApi + ?Sized>(self, api: &mut A) {
        api.set_scissor_test(self.scissor_test);
        api.bind_framebuffer(FramebufferTarget::Read, self.read_framebuffer);
        api.bind_framebuffer(FramebufferTarget::Draw, self.draw_framebuffer);
    }

    /// Runs `f` and restores the state observed before it ran.
    pub fn preserved<A, R>(api: &mut A, f: impl FnOnce(&mut A) -> R) -> R
    where
        A: GpuApi + ?Sized,
    {
        let saved = Self::capture(api);
        let out = f(api);
        saved.restore(api);
        out
    }
}
