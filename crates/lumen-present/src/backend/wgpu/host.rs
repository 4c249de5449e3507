use anyhow::{Context, Result};

use crate::backend::contexts::ContextTable;
use crate::context::{ApiLoader, ContextHandle, GraphicsHost};

use super::{ReadbackPolicy, WgpuApi, WgpuInit};

/// Owns the wgpu device every handed-out context shares.
///
/// wgpu has no notion of a current context; handles are bookkeeping over
/// one device, which is exactly the shared-namespace contract.
pub struct WgpuHost {
    adapter_info: wgpu::AdapterInfo,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    readback: ReadbackPolicy,
    contexts: ContextTable,
}

impl WgpuHost {
    /// Acquires an adapter and device without any surface.
    pub async fn new(init: WgpuInit) -> Result<Self> {
        let WgpuInit {
            backends,
            power_preference,
            force_fallback_adapter,
            required_features,
            required_limits,
            readback,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let adapter_info = adapter.get_info();
        log::info!(
            "using adapter {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumen-present device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Self {
            adapter_info,
            device,
            queue,
            readback,
            contexts: ContextTable::default(),
        })
    }

    /// Blocking wrapper around [`new`](Self::new).
    pub fn new_blocking(init: WgpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    /// Adapter the device was created on.
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }
}

impl GraphicsHost for WgpuHost {
    fn request_context(&self) -> Option<ContextHandle> {
        self.contexts.request(None)
    }

    fn release_context(&self, context: ContextHandle) {
        self.contexts.release(context);
    }

    fn activate_context(&self, context: ContextHandle) {
        self.contexts.activate(context);
    }
}

impl ApiLoader for WgpuHost {
    type Api = WgpuApi;

    fn load_api(&self) -> Option<WgpuApi> {
        Some(WgpuApi::new(
            self.device.clone(),
            self.queue.clone(),
            self.readback,
        ))
    }
}
