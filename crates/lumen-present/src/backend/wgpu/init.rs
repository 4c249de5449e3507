/// How a readback waits for the GPU copy to land.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ReadbackPolicy {
    /// Poll the device once; report "not ready" if the copy is still in flight.
    #[default]
    Poll,
    /// Block until outstanding work completes. Useful for capture tools that
    /// want every frame.
    Wait,
}

/// Initialization parameters for the headless device.
///
/// Keep this structure minimal. Add knobs only when a concrete backend
/// requirement exists.
#[derive(Debug, Clone)]
pub struct WgpuInit {
    /// Backends wgpu may choose from.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Accept a software adapter (e.g. llvmpipe, WARP) when no hardware one exists.
    pub force_fallback_adapter: bool,

    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    pub readback: ReadbackPolicy,
}

impl Default for WgpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            readback: ReadbackPolicy::Poll,
        }
    }
}
