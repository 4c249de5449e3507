use std::path::Path;

use anyhow::{Context, Result};
use lumen_present::layout::LayoutSettings;
use serde::Deserialize;

/// Capture tool configuration file.
///
/// ```toml
/// [layout]
/// custom_layout = true
/// resolution_factor = 2.0
///
/// [layout.custom]
/// rotated = false
/// top_screen = { left = 0, top = 480, right = 400, bottom = 240 }
/// bottom_screen = { left = 40, top = 240, right = 360, bottom = 0 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub layout: LayoutSettings,
}

impl CaptureConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_present::coords::ScreenRect;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(CaptureConfig::parse("").unwrap(), CaptureConfig::default());
    }

    #[test]
    fn partial_layout_keeps_other_defaults() {
        let config = CaptureConfig::parse(
            r#"
            [layout]
            custom_layout = true
            resolution_factor = 3.0
            "#,
        )
        .unwrap();
        assert!(config.layout.custom_layout);
        assert_eq!(config.layout.resolution_factor, 3.0);
        assert!(!config.layout.swap_screens);
        assert_eq!(config.layout.custom, LayoutSettings::default().custom);
    }

    #[test]
    fn custom_rectangles_parse() {
        let config = CaptureConfig::parse(
            r#"
            [layout.custom]
            rotated = true
            top_screen = { left = 0, top = 240, right = 400, bottom = 0 }
            "#,
        )
        .unwrap();
        assert!(config.layout.custom.rotated);
        assert_eq!(config.layout.custom.top_screen, ScreenRect::new(0, 240, 400, 0));
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(CaptureConfig::parse("[layout]\ncustom_layout = \"yes\"").is_err());
    }
}
