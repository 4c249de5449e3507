mod capture;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lumen_present::backend::software::SoftwareHost;
use lumen_present::backend::wgpu::{ReadbackPolicy, WgpuHost, WgpuInit};
use lumen_present::logging::{init_logging, LoggingConfig};

use crate::config::CaptureConfig;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum BackendChoice {
    /// Headless GPU device through wgpu.
    Wgpu,
    /// CPU reference backend; needs no adapter.
    Software,
}

/// Render frames off-screen and write them out as PNG files.
#[derive(Debug, Parser)]
#[command(name = "lumen-capture", version)]
struct Cli {
    /// Number of frames to present.
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Directory the PNG files are written to.
    #[arg(long, default_value = "frames")]
    out: PathBuf,

    /// TOML file with a `[layout]` table.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resolution factor; overrides the config file.
    #[arg(long)]
    scale: Option<f32>,

    /// Size the output from the custom screen layout.
    #[arg(long)]
    custom_layout: bool,

    /// Exchange the primary and secondary screens.
    #[arg(long)]
    swap_screens: bool,

    /// Turn the custom layout on its side.
    #[arg(long)]
    rotated: bool,

    #[arg(long, value_enum, default_value_t = BackendChoice::Wgpu)]
    backend: BackendChoice,

    /// `env_logger` filter, e.g. "lumen_present=debug".
    #[arg(long)]
    log: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<CaptureConfig> {
        let mut config = match &self.config {
            Some(path) => CaptureConfig::load(path)?,
            None => CaptureConfig::default(),
        };

        let layout = &mut config.layout;
        if let Some(scale) = self.scale {
            layout.resolution_factor = scale;
        }
        layout.custom_layout |= self.custom_layout;
        layout.swap_screens |= self.swap_screens;
        layout.custom.rotated |= self.rotated;

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(match &cli.log {
        Some(filter) => LoggingConfig::with_filter(filter.as_str()),
        None => LoggingConfig::default(),
    });

    let config = cli.load_config()?;
    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("failed to create {}", cli.out.display()))?;

    let written = match cli.backend {
        BackendChoice::Wgpu => {
            let host = WgpuHost::new_blocking(WgpuInit {
                readback: ReadbackPolicy::Wait,
                ..WgpuInit::default()
            })?;
            let adapter = host.adapter_info();
            log::info!("capturing on {} ({:?})", adapter.name, adapter.backend);
            capture::run(Arc::new(host), &config.layout, cli.frames, &cli.out)?
        }
        BackendChoice::Software => {
            capture::run(Arc::new(SoftwareHost::new()), &config.layout, cli.frames, &cli.out)?
        }
    };

    log::info!(
        "wrote {written} of {} frame(s) to {}",
        cli.frames,
        cli.out.display()
    );
    Ok(())
}
