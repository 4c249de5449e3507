use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use lumen_present::backend::TestPattern;
use lumen_present::context::{ApiLoader, GraphicsHost};
use lumen_present::gpu::FrameRenderer;
use lumen_present::layout::LayoutSettings;
use lumen_present::{Presenter, Readback};

/// Presents `frames` frames and writes every one that reads back.
///
/// Returns the number of files written.
pub fn run<H>(host: Arc<H>, layout: &LayoutSettings, frames: u32, out: &Path) -> Result<u32>
where
    H: GraphicsHost + ApiLoader,
    TestPattern: FrameRenderer<H::Api>,
{
    let mut presenter = Presenter::new(host, layout, TestPattern::new())
        .context("failed to start the headless presenter")?;
    presenter.make_current();

    let mut pixels = Vec::new();
    let mut written = 0;

    for frame in 0..frames {
        presenter.present(frame);

        let (width, height) = presenter.dimensions();
        pixels.resize(width as usize * height as usize * 4, 0);

        match presenter.read_pixels(&mut pixels)? {
            Readback::Copied => {
                let path = out.join(format!("frame_{frame:04}.png"));
                write_png(&path, width, height, &pixels)?;
                log::debug!("wrote {}", path.display());
                written += 1;
            }
            Readback::NotReady => log::warn!("frame {frame} was not ready; skipped"),
        }
    }

    Ok(written)
}

/// Saves top-first BGRA pixels as an RGBA PNG.
fn write_png(path: &Path, width: u32, height: u32, bgra: &[u8]) -> Result<()> {
    let rgba: Vec<u8> = bgra
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0], px[3]])
        .collect();

    let image = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| anyhow::anyhow!("pixel buffer does not match {width}x{height}"))?;
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_present::backend::software::SoftwareHost;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen-capture-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn software_capture_writes_every_frame() {
        let dir = scratch_dir("frames");
        let layout = LayoutSettings {
            resolution_factor: 3.0,
            ..LayoutSettings::default()
        };

        let written = run(Arc::new(SoftwareHost::new()), &layout, 2, &dir).unwrap();

        assert_eq!(written, 2);
        let image = image::open(dir.join("frame_0001.png")).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (3, 3));
        // Pattern pixel (x, y) = [x, y, frame, 0xFF].
        assert_eq!(image.get_pixel(2, 1).0, [2, 1, 1, 0xFF]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn write_png_rejects_short_buffer() {
        let dir = scratch_dir("short");
        assert!(write_png(&dir.join("x.png"), 2, 2, &[0; 8]).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
